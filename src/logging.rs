use std::fs;
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_DIR: &str = "logs";
const LOG_FILE_PREFIX: &str = "fome_zero.log";
const DEFAULT_DIRECTIVES: &str = "fome_zero=info,warn";

/// Console output on stderr plus a daily-rotated JSON log under `logs/`.
/// `RUST_LOG` overrides the default directives.
pub fn init_logging() {
    init_logging_in(Path::new(LOG_DIR));
}

pub fn init_logging_in(dir: &Path) {
    // Console logging still works if the directory can't be created
    let _ = fs::create_dir_all(dir);

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX));

    // stdout is reserved for report output
    let console = fmt::layer().with_target(true).with_writer(std::io::stderr);
    let file = fmt::layer().json().with_writer(file_writer);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    // The writer flushes on drop; it must outlive main
    std::mem::forget(guard);
}
