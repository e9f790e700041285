//! Logging setup for the ballast core: a compact terminal layer plus an
//! optional JSON file layer, both gated by the same level filter.

use std::io::Write;

/// Initialize global tracing subscribers.
///
/// `log_file` is an optional writer (e.g. an open file) that receives
/// structured JSON events in addition to the compact terminal output.
/// Call this once, at process start; subsequent calls are a no-op error
/// from `tracing`'s global-default guard, which callers may safely ignore.
pub fn init(max_level: tracing::Level, log_file: Option<impl Write + Clone + Send + 'static>) {
    use tracing_subscriber::{filter, prelude::*};

    let filter = filter::filter_fn(move |meta| meta.level() <= &max_level);

    let terminal_log = tracing_subscriber::fmt::layer()
        .compact()
        .with_file(false)
        .with_target(true)
        .without_time()
        .with_thread_names(false)
        .with_filter(filter.clone());

    let file_log = log_file.map(|file| {
        let file = std::sync::Mutex::new(file);
        tracing_subscriber::fmt::layer()
            .json()
            .with_thread_names(true)
            .with_writer(move || file.lock().unwrap().clone())
            .with_filter(filter)
    });

    let _ = tracing_subscriber::registry()
        .with(file_log)
        .with(terminal_log)
        .try_init();
}
