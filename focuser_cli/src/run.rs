//! Command execution: config mapping, hardware assembly, worker wiring.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;
use eyre::WrapErr;
use focuser_core::error::FocuserError;
use focuser_core::{Focuser, FocuserHandle, MotionStatus, PollCfg, Snapshot, TelemetryCfg, Update};
use focuser_hardware::SimulatedFocuser;
use focuser_traits::FocusDirection;

use crate::cli::Commands;

pub fn run_command(cfg: &focuser_config::Config, cmd: &Commands, json: bool) -> eyre::Result<()> {
    let handle = spawn_device(cfg)?;
    handle.connect().wrap_err("connecting focuser")?;

    match cmd {
        Commands::Status => {
            let snap = handle.snapshot()?;
            print_snapshot(&snap, json);
        }
        Commands::Move {
            to,
            inward,
            outward,
            wait,
        } => {
            match (to, inward, outward) {
                (Some(target), _, _) => handle.move_absolute(*target)?,
                (None, Some(delta), _) => handle.move_relative(FocusDirection::Inward, *delta)?,
                (None, None, Some(delta)) => {
                    handle.move_relative(FocusDirection::Outward, *delta)?
                }
                (None, None, None) => {
                    return Err(eyre::Report::new(FocuserError::State(
                        "move needs --to, --in, or --out".into(),
                    )));
                }
            }
            if *wait {
                wait_for_settle(&handle, json)?;
            } else if !json {
                println!("move issued");
            }
        }
        Commands::Sync { ticks } => {
            handle.sync(*ticks)?;
            if !json {
                println!("position synced to {ticks}");
            }
        }
        Commands::Reverse { enabled } => {
            handle.set_reverse(*enabled)?;
            let snap = handle.snapshot()?;
            if json {
                println!("{}", serde_json::json!({ "reversed": snap.reversed }));
            } else {
                println!(
                    "reverse {}",
                    if snap.reversed { "enabled" } else { "disabled" }
                );
            }
        }
        Commands::SetMax { ticks } => {
            handle.set_max_position(*ticks)?;
            if !json {
                println!("max position set to {ticks}");
            }
        }
        Commands::Watch { seconds } => {
            watch(&handle, Duration::from_secs(*seconds), json)?;
        }
        Commands::SelfCheck => {
            let snap = handle.snapshot()?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "ok": snap.connected, "position": snap.position })
                );
            } else {
                println!("ok: connected at position {}", snap.position);
            }
        }
    }

    handle.disconnect().wrap_err("disconnecting focuser")
}

fn spawn_device(cfg: &focuser_config::Config) -> eyre::Result<FocuserHandle> {
    let sim = SimulatedFocuser::new(cfg.simulator.max_step, cfg.simulator.speed_ticks_per_sec)
        .with_position(cfg.simulator.start_position)
        .with_temperature(cfg.simulator.temperature_c);

    let focuser = Focuser::builder()
        .with_driver(sim)
        .with_name(cfg.device.name.clone())
        .with_poll(PollCfg::from(&cfg.poll))
        .with_telemetry(TelemetryCfg::from(&cfg.telemetry))
        .build()?;
    Ok(FocuserHandle::spawn(focuser))
}

/// Ctrl-C flips a flag; the drain loops below abort the device and bail.
fn interrupt_flag() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = flag.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed)) {
        tracing::debug!(error = %e, "ctrl-c handler not installed");
    }
    flag
}

fn wait_for_settle(handle: &FocuserHandle, json: bool) -> eyre::Result<()> {
    let interrupted = interrupt_flag();
    loop {
        if interrupted.load(Ordering::Relaxed) {
            let _ = handle.abort();
            return Err(eyre::Report::new(FocuserError::State(
                "interrupted, stop issued".into(),
            )));
        }
        match handle.updates().recv_timeout(Duration::from_millis(200)) {
            Ok(Update::Settled { ticks }) => {
                if json {
                    println!(
                        "{}",
                        serde_json::json!({ "settled": true, "position": ticks })
                    );
                } else {
                    println!("settled at {ticks}");
                }
                return Ok(());
            }
            Ok(Update::Position { ticks }) => {
                if !json {
                    println!("position {ticks}");
                }
            }
            Ok(_) => {}
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                return Err(eyre::Report::new(FocuserError::State(
                    "focuser worker stopped".into(),
                )));
            }
        }
    }
}

fn watch(handle: &FocuserHandle, duration: Duration, json: bool) -> eyre::Result<()> {
    let interrupted = interrupt_flag();
    let deadline = Instant::now() + duration;
    while Instant::now() < deadline && !interrupted.load(Ordering::Relaxed) {
        match handle.updates().recv_timeout(Duration::from_millis(200)) {
            Ok(update) => print_update(&update, json),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    Ok(())
}

fn print_update(update: &Update, json: bool) {
    if json {
        let value = match update {
            Update::Position { ticks } => serde_json::json!({ "position": ticks }),
            Update::Temperature { celsius } => serde_json::json!({ "temperature_c": celsius }),
            Update::Reversed { enabled } => serde_json::json!({ "reversed": enabled }),
            Update::Settled { ticks } => serde_json::json!({ "settled": true, "position": ticks }),
        };
        println!("{value}");
    } else {
        println!("{update:?}");
    }
}

fn print_snapshot(snap: &Snapshot, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "connected": snap.connected,
                "position": snap.position,
                "max_position": snap.max_position,
                "temperature_c": snap.temperature_c,
                "reversed": snap.reversed,
                "absolute": status_name(snap.absolute),
                "relative": status_name(snap.relative),
            })
        );
    } else {
        println!(
            "connected={} position={}/{} temperature={:.2}C reversed={} abs={} rel={}",
            snap.connected,
            snap.position,
            snap.max_position,
            snap.temperature_c,
            snap.reversed,
            status_name(snap.absolute),
            status_name(snap.relative),
        );
    }
}

pub fn status_name(status: MotionStatus) -> &'static str {
    match status {
        MotionStatus::Idle => "Idle",
        MotionStatus::Busy => "Busy",
        MotionStatus::Alert => "Alert",
    }
}
