use std::path::{Path, PathBuf};

pub const LOG_FILE_BASENAME: &str = "share-todo";
pub const LOG_FILE_SUFFIX: &str = "log";
pub const LOG_ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
pub const LOG_ROTATE_KEEP_FILES: usize = 10;
pub const LOG_ENV: &str = "SHARE_TODO_LOG";

// Dependency logs stay at WARN; our crates log mutations at INFO.
const DEFAULT_LOG_SPEC: &str = "warn,share_todo_lib=info,share_todo=info";

pub fn log_directory(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

/// `SHARE_TODO_LOG` wins over `RUST_LOG`; blank values are ignored.
pub fn resolve_log_spec(app_value: Option<String>, rust_log: Option<String>) -> String {
    app_value
        .filter(|value| !value.trim().is_empty())
        .or_else(|| rust_log.filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_LOG_SPEC.to_string())
}

#[cfg(all(feature = "cli", not(test)))]
pub fn init_logging(data_dir: &Path) -> Result<(), flexi_logger::FlexiLoggerError> {
    use flexi_logger::{
        detailed_format, Cleanup, Criterion, Duplicate, FileSpec, Logger, Naming, WriteMode,
    };

    let directory = log_directory(data_dir);
    std::fs::create_dir_all(&directory)?;

    let spec = resolve_log_spec(std::env::var(LOG_ENV).ok(), std::env::var("RUST_LOG").ok());

    Logger::try_with_str(spec)?
        .log_to_file(
            FileSpec::default()
                .directory(&directory)
                .basename(LOG_FILE_BASENAME)
                .suffix(LOG_FILE_SUFFIX),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .format_for_files(detailed_format)
        .rotate(
            Criterion::Size(LOG_ROTATE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(LOG_ROTATE_KEEP_FILES),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .start()?;

    install_panic_hook();

    log::debug!(
        "logger initialized dir={} rotate_size_bytes={} keep_files={}",
        directory.display(),
        LOG_ROTATE_SIZE_BYTES,
        LOG_ROTATE_KEEP_FILES
    );
    Ok(())
}

#[cfg(all(feature = "cli", not(test)))]
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info: &std::panic::PanicHookInfo<'_>| {
        let location = info
            .location()
            .map_or_else(|| "<unknown>".to_string(), ToString::to_string);
        log::error!(
            "panicked at {location}: {}\n{}",
            panic_text(info.payload()),
            std::backtrace::Backtrace::force_capture()
        );
        // Still runs when no logger is installed, so the panic reaches stderr either way.
        default_hook(info);
    }));
}

/// `panic!` payloads are `&str` for literals and `String` for formatted messages.
#[cfg_attr(not(feature = "cli"), allow(dead_code))]
fn panic_text(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(text) = payload.downcast_ref::<&str>() {
        return text;
    }
    if let Some(text) = payload.downcast_ref::<String>() {
        return text;
    }
    "<non-string panic payload>"
}
