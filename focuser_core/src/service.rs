//! Per-device worker: one thread owning the state machine.
//!
//! Host commands and poll ticks are serialized onto the same thread, so the
//! state machine itself needs no locking — there is exactly one logical actor
//! per device. Ticks re-arm at the configured period whether or not the
//! device is connected; a disconnected tick is a no-op, which lets a later
//! reconnect be observed by the same mechanism.
//!
//! The worker thread is shut down and joined when the handle is dropped,
//! preventing thread leaks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel as xch;
use focuser_traits::FocusDirection;

use crate::builder::Focuser;
use crate::error::{FocuserError, Result};
use crate::status::{Snapshot, Update};

/// Host request routed onto the device thread. Replies travel back over a
/// one-shot bounded channel.
pub enum Command {
    Connect {
        resp: xch::Sender<Result<()>>,
    },
    Disconnect {
        resp: xch::Sender<Result<()>>,
    },
    MoveAbsolute {
        target: i32,
        resp: xch::Sender<Result<()>>,
    },
    MoveRelative {
        direction: FocusDirection,
        delta: u32,
        resp: xch::Sender<Result<()>>,
    },
    Sync {
        ticks: i32,
        resp: xch::Sender<Result<()>>,
    },
    SetReverse {
        enabled: bool,
        resp: xch::Sender<Result<()>>,
    },
    SetMaxPosition {
        ticks: i32,
        resp: xch::Sender<Result<()>>,
    },
    Abort {
        resp: xch::Sender<Result<()>>,
    },
    Snapshot {
        resp: xch::Sender<Snapshot>,
    },
}

pub struct FocuserHandle {
    cmd_tx: xch::Sender<Command>,
    update_rx: xch::Receiver<Update>,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl FocuserHandle {
    /// Move the focuser onto its own worker thread and start ticking.
    pub fn spawn(mut focuser: Focuser) -> Self {
        let (cmd_tx, cmd_rx) = xch::unbounded::<Command>();
        // Telemetry is droppable: if the host stops draining, stale updates
        // are discarded rather than stalling the device thread.
        let (update_tx, update_rx) = xch::bounded::<Update>(128);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_worker = shutdown.clone();
        let period = Duration::from_millis(focuser.poll_cfg().period_ms.max(1));

        let join_handle = std::thread::spawn(move || {
            let mut next_tick = Instant::now() + period;
            loop {
                if shutdown_worker.load(Ordering::Relaxed) {
                    break;
                }

                let now = Instant::now();
                if now >= next_tick {
                    publish(&update_tx, focuser.poll());
                    next_tick += period;
                    if next_tick <= now {
                        // Fell behind (slow hardware read); re-arm from now
                        // rather than queueing catch-up ticks.
                        next_tick = now + period;
                    }
                    continue;
                }

                match cmd_rx.recv_timeout(next_tick - now) {
                    Ok(cmd) => handle_command(&mut focuser, cmd, &update_tx),
                    Err(xch::RecvTimeoutError::Timeout) => {}
                    Err(xch::RecvTimeoutError::Disconnected) => break,
                }
            }
            if focuser.is_connected()
                && let Err(e) = focuser.disconnect()
            {
                tracing::warn!(name = %focuser.name(), error = %e, "disconnect on shutdown failed");
            }
            tracing::trace!("focuser worker exiting cleanly");
        });

        Self {
            cmd_tx,
            update_rx,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Telemetry stream: position/temperature/reverse/settle events in the
    /// order the device thread produced them.
    pub fn updates(&self) -> &xch::Receiver<Update> {
        &self.update_rx
    }

    pub fn connect(&self) -> Result<()> {
        self.request(|resp| Command::Connect { resp })?
    }

    pub fn disconnect(&self) -> Result<()> {
        self.request(|resp| Command::Disconnect { resp })?
    }

    pub fn move_absolute(&self, target: i32) -> Result<()> {
        self.request(|resp| Command::MoveAbsolute { target, resp })?
    }

    pub fn move_relative(&self, direction: FocusDirection, delta: u32) -> Result<()> {
        self.request(|resp| Command::MoveRelative {
            direction,
            delta,
            resp,
        })?
    }

    pub fn sync(&self, ticks: i32) -> Result<()> {
        self.request(|resp| Command::Sync { ticks, resp })?
    }

    pub fn set_reverse(&self, enabled: bool) -> Result<()> {
        self.request(|resp| Command::SetReverse { enabled, resp })?
    }

    pub fn set_max_position(&self, ticks: i32) -> Result<()> {
        self.request(|resp| Command::SetMaxPosition { ticks, resp })?
    }

    pub fn abort(&self) -> Result<()> {
        self.request(|resp| Command::Abort { resp })?
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        self.request(|resp| Command::Snapshot { resp })
    }

    fn request<T>(&self, make: impl FnOnce(xch::Sender<T>) -> Command) -> Result<T> {
        let (resp_tx, resp_rx) = xch::bounded(1);
        self.cmd_tx.send(make(resp_tx)).map_err(|_| worker_gone())?;
        resp_rx.recv().map_err(|_| worker_gone())
    }
}

fn worker_gone() -> eyre::Report {
    eyre::Report::new(FocuserError::State("focuser worker stopped".into()))
}

fn publish(tx: &xch::Sender<Update>, updates: Vec<Update>) {
    for update in updates {
        if tx.try_send(update).is_err() {
            tracing::trace!(?update, "host not draining updates, dropping");
            break;
        }
    }
}

fn handle_command(focuser: &mut Focuser, cmd: Command, update_tx: &xch::Sender<Update>) {
    match cmd {
        Command::Connect { resp } => {
            let result = focuser.connect().map(|updates| {
                publish(update_tx, updates);
            });
            let _ = resp.send(result);
        }
        Command::Disconnect { resp } => {
            let _ = resp.send(focuser.disconnect());
        }
        Command::MoveAbsolute { target, resp } => {
            let _ = resp.send(focuser.move_absolute(target));
        }
        Command::MoveRelative {
            direction,
            delta,
            resp,
        } => {
            let _ = resp.send(focuser.move_relative(direction, delta));
        }
        Command::Sync { ticks, resp } => {
            let _ = resp.send(focuser.sync(ticks));
        }
        Command::SetReverse { enabled, resp } => {
            // Write, then separately read back: hardware owns the truth, and
            // the host only ever sees the confirmed state.
            let result = focuser.set_reverse(enabled);
            if result.is_ok() {
                match focuser.refresh_reverse() {
                    Ok(enabled) => publish(update_tx, vec![Update::Reversed { enabled }]),
                    Err(e) => {
                        tracing::warn!(name = %focuser.name(), error = %e, "reverse read-back failed")
                    }
                }
            }
            let _ = resp.send(result);
        }
        Command::SetMaxPosition { ticks, resp } => {
            let _ = resp.send(focuser.set_max_position(ticks));
        }
        Command::Abort { resp } => {
            let _ = resp.send(focuser.abort());
        }
        Command::Snapshot { resp } => {
            let _ = resp.send(focuser.snapshot());
        }
    }
}

impl Drop for FocuserHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // The worker wakes within one poll period at most.
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => tracing::trace!("focuser worker joined"),
                Err(e) => tracing::warn!(?e, "focuser worker panicked during shutdown"),
            }
        }
    }
}
