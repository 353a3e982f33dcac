//! Trace output for the proxy.
//!
//! Records go through the `log` facade into `env_logger`, whose output is
//! piped into a [`LogSink`]: every formatted line is appended to the log
//! file (opened lazily, flushed immediately) and mirrored to the debugger
//! channel. Failing to open or write the file is ignored; logging must never
//! get in the way of forwarding.

use crate::config::ProxyConfig;
use crate::platform;
use env_logger::{Env, Target};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

static SINK: OnceLock<LogSink> = OnceLock::new();

struct SinkState {
    path: PathBuf,
    file: Option<File>,
}

/// Shared handle to the append-only trace file.
#[derive(Clone)]
pub struct LogSink {
    inner: Arc<Mutex<SinkState>>,
}

impl LogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SinkState {
                path: path.into(),
                file: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SinkState> {
        // A panic mid-write leaves nothing worth protecting.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn path(&self) -> PathBuf {
        self.lock().path.clone()
    }

    pub fn is_open(&self) -> bool {
        self.lock().file.is_some()
    }

    /// Point the sink at another file. The current one is closed.
    pub fn retarget(&self, path: &Path) {
        let mut state = self.lock();
        if state.path != path {
            state.file = None;
            state.path = path.to_path_buf();
        }
    }

    /// Close the file. The next line written reopens it.
    pub fn close(&self) {
        self.lock().file = None;
    }

    fn append(&self, bytes: &[u8]) {
        let mut state = self.lock();
        if state.file.is_none() {
            state.file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&state.path)
                .ok();
        }
        if let Some(file) = state.file.as_mut() {
            if file.write_all(bytes).and_then(|_| file.flush()).is_err() {
                state.file = None;
            }
        }
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        platform::debug_output(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn format_line(buf: &mut env_logger::fmt::Formatter, record: &log::Record) -> io::Result<()> {
    writeln!(
        buf,
        "{} [{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        record.level(),
        record.args()
    )
}

/// Install the process-wide logger on first use and return the sink it
/// writes to. Later calls reuse the same logger and only retarget the file.
pub fn init(config: &ProxyConfig) -> LogSink {
    let sink = SINK.get_or_init(|| {
        let sink = LogSink::new(&config.log_path);
        let env = Env::default().default_filter_or(config.default_log_filter.as_str());
        // Fails only if the host already installed a `log` backend.
        let _ = env_logger::Builder::from_env(env)
            .target(Target::Pipe(Box::new(sink.clone())))
            .format(format_line)
            .try_init();
        sink
    });
    sink.retarget(&config.log_path);
    sink.clone()
}

/// The installed sink, if logging was ever initialized.
pub fn sink() -> Option<LogSink> {
    SINK.get().cloned()
}

/// Close the trace file if logging is active.
pub fn close() {
    if let Some(sink) = SINK.get() {
        sink.close();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn scratch_log() -> PathBuf {
        std::env::temp_dir().join(format!("xinput-proxy-{}.log", uuid::Uuid::new_v4()))
    }

    #[test]
    fn sink_opens_lazily() {
        let path = scratch_log();
        let mut sink = LogSink::new(&path);
        assert!(!sink.is_open());
        assert!(!path.exists());

        sink.write_all(b"[INFO] Attached to process.\n").unwrap();
        assert!(sink.is_open());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[INFO] Attached to process.\n"
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn lines_accumulate_across_close_and_reopen() {
        let path = scratch_log();

        let mut first = LogSink::new(&path);
        first.write_all(b"first attach\n").unwrap();
        first.close();
        assert!(!first.is_open());

        let mut second = LogSink::new(&path);
        second.write_all(b"second attach\n").unwrap();
        second.close();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "first attach\nsecond attach\n"
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unopenable_log_is_ignored() {
        let path = std::env::temp_dir()
            .join(uuid::Uuid::new_v4().to_string())
            .join("OL.log");
        let mut sink = LogSink::new(&path);
        assert_eq!(sink.write(b"dropped\n").unwrap(), 8);
        assert!(!sink.is_open());
    }

    #[test]
    fn retarget_switches_files() {
        let (a, b) = (scratch_log(), scratch_log());
        let mut sink = LogSink::new(&a);
        sink.write_all(b"a\n").unwrap();
        sink.retarget(&b);
        assert!(!sink.is_open());
        sink.write_all(b"b\n").unwrap();

        assert_eq!(std::fs::read_to_string(&a).unwrap(), "a\n");
        assert_eq!(std::fs::read_to_string(&b).unwrap(), "b\n");
        let _ = std::fs::remove_file(&a);
        let _ = std::fs::remove_file(&b);
    }
}
