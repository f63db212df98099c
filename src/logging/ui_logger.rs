use log::{Log, Metadata, Record, SetLoggerError};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

/// Logger that writes through `env_logger` and also forwards formatted lines into an
/// mpsc channel for the in-app log window.
pub struct UiLogger {
    inner: env_logger::Logger,
    sender: Mutex<Sender<String>>,
}

impl UiLogger {
    /// Install the UI logger and return the receiver to read log lines from.
    /// Filtering follows `RUST_LOG`, defaulting to `info`.
    pub fn init() -> Result<Receiver<String>, SetLoggerError> {
        let env = env_logger::Env::default().default_filter_or("info");
        let inner = env_logger::Builder::from_env(env).build();
        let max_level = inner.filter();

        let (tx, rx) = mpsc::channel();
        let logger = UiLogger {
            inner,
            sender: Mutex::new(tx),
        };

        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(max_level);
        Ok(rx)
    }
}

impl Log for UiLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.inner.matches(record) {
            return;
        }
        self.inner.log(record);

        let msg = format!("[{}] {}: {}", record.level(), record.target(), record.args());
        if let Ok(sender) = self.sender.lock() {
            let _ = sender.send(msg);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}
