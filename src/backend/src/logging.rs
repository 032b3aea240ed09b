//! Logger setup and the in-memory log served by `/api/logs`.

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Logger, Target};
use log::{Log, Metadata, Record};
use std::{
    collections::VecDeque,
    io::Write,
    sync::{Arc, Mutex, PoisonError},
};

/// Most recent log lines, oldest first
#[derive(Debug)]
pub struct LogBuffer {
    lines: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl LogBuffer {
    pub const DEFAULT_CAPACITY: usize = 200;

    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn push(&self, line: String) {
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

/// env_logger output plus a copy of every emitted record in a [`LogBuffer`]
struct BufferedLogger {
    inner: Logger,
    buffer: Arc<LogBuffer>,
}

impl Log for BufferedLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.inner.matches(record) {
            return;
        }

        self.inner.log(record);
        self.buffer.push(format!(
            "[{:<5}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        ));
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Install the global logger. `RUST_LOG` overrides the default filter.
pub fn init(buffer: Arc<LogBuffer>) -> Result<()> {
    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    builder.format(|f, record| match record.level() {
        log::Level::Error => {
            eprintln!("{}", record.args());
            Ok(())
        }
        _ => {
            writeln!(f, "{}", record.args())
        }
    });

    let inner = builder.target(Target::Stdout).build();
    let max_level = inner.filter();

    log::set_boxed_logger(Box::new(BufferedLogger { inner, buffer }))
        .context("failed to install logger")?;
    log::set_max_level(max_level);

    log_panics::init();

    Ok(())
}
