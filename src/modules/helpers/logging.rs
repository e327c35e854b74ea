use std::env;
use dotenvy::dotenv;
use fern::Dispatch;
use log::LevelFilter;

/// # setup logging
/// log to stdout, and to the file in `LOG_FILE` when it is set.
/// the level is read from `LOGGING_LEVEL` and defaults to info.
pub fn setup_logging() -> Result<(), fern::InitError> {
    dotenv().ok();

    let verbosity = env::var("LOGGING_LEVEL").unwrap_or_default();

    let mut base_config = Dispatch::new()
        .level(level_from_str(&verbosity))
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .chain(std::io::stdout());

    if let Ok(log_file) = env::var("LOG_FILE") {
        base_config = base_config.chain(fern::log_file(log_file)?);
    }

    base_config.apply()?;

    Ok(())
}

fn level_from_str(verbosity: &str) -> LevelFilter {
    match verbosity {
        "OFF" => LevelFilter::Off,
        "ERROR" => LevelFilter::Error,
        "WARN" => LevelFilter::Warn,
        "DEBUG" => LevelFilter::Debug,
        "TRACE" => LevelFilter::Trace,
        // default to info
        _ => LevelFilter::Info,
    }
}
