//! Forwarding of [`log`] records to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};
use web_sys::{console, wasm_bindgen::JsValue};

use crate::error::Error;

/// A [`Log`] implementation writing to the browser console.
#[derive(Debug)]
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from(format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&message),
            Level::Warn => console::warn_1(&message),
            Level::Info => console::info_1(&message),
            Level::Debug | Level::Trace => console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

/// Installs the console logger with the given maximum level.
pub fn init(level: LevelFilter) -> Result<(), Error> {
    log::set_logger(&LOGGER).map_err(|_| Error::LoggerAlreadySet)?;
    log::set_max_level(level);
    Ok(())
}
