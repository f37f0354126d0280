//! Console logger for the binary: level tag coloured with ansi_term, on stderr.

use ansi_term::Colour::{Blue, Green, Purple, Red, Yellow};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

pub struct ConsoleLogger {
    level: LevelFilter,
}

impl ConsoleLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    /// Install as the global logger.
    pub fn init(self) -> Result<(), SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

pub fn tag(level: Level) -> String {
    let name = level.as_str();
    let painted = match level {
        Level::Error => Red.bold().paint(name),
        Level::Warn => Yellow.bold().paint(name),
        Level::Info => Green.bold().paint(name),
        Level::Debug => Blue.bold().paint(name),
        Level::Trace => Purple.bold().paint(name),
    };
    painted.to_string()
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{} {}", tag(record.level()), record.args());
        }
    }

    fn flush(&self) {}
}
