mod cli;
mod error_fmt;
mod run;

use std::fs;
use std::path::Path;

use clap::Parser;
use cli::{Cli, FILE_GUARD, JSON_MODE};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let args = Cli::parse();
    let _ = JSON_MODE.set(args.json);
    if !args.json {
        let _ = color_eyre::install();
    }

    let cfg = match load_config(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            report_error(&e);
            std::process::exit(2);
        }
    };

    init_tracing(&args.log_level, &cfg.logging);

    if let Err(e) = run::run_command(&cfg, &args.cmd, args.json) {
        report_error(&e);
        std::process::exit(error_fmt::exit_code_for_error(&e));
    }
}

/// Load and validate the TOML config; a missing file means documented
/// defaults, so the CLI works out of the box against the simulator.
fn load_config(path: &Path) -> eyre::Result<focuser_config::Config> {
    let cfg = if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("failed to read config {}: {e}", path.display()))?;
        toml::from_str::<focuser_config::Config>(&content)
            .map_err(|e| eyre::eyre!("failed to parse config {}: {e}", path.display()))?
    } else {
        focuser_config::Config::default()
    };
    cfg.validate()?;
    Ok(cfg)
}

fn init_tracing(log_level: &str, logging: &focuser_config::Logging) {
    let level = logging.level.as_deref().unwrap_or(log_level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter).with(console);

    if let Some(file) = &logging.file {
        let path = Path::new(file);
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let name = path.file_name().unwrap_or_else(|| "focuser.log".as_ref());
        let appender =
            tracing_appender::rolling::never(dir.unwrap_or_else(|| Path::new(".")), name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        registry
            .with(fmt::layer().json().with_writer(writer))
            .init();
    } else {
        registry.init();
    }
}

fn report_error(err: &eyre::Report) {
    if JSON_MODE.get().copied().unwrap_or(false) {
        eprintln!("{}", error_fmt::format_error_json(err));
    } else {
        eprintln!("{}", error_fmt::humanize(err));
    }
}
