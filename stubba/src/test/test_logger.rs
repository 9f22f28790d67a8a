use std::{
    io,
    sync::{Arc, Mutex, PoisonError},
};

use slog::{Drain, Logger};
use slog_async::Async;
use slog_term::{CompactFormat, FullFormat, PlainDecorator, PlainSyncDecorator};

/// Logger builders for tests.
pub struct TestLogger;

impl TestLogger {
    fn from_writer<W: io::Write + Send + 'static>(writer: W) -> Logger {
        let decorator = PlainDecorator::new(writer);
        let drain = CompactFormat::new(decorator).build().fuse();
        let drain = Async::new(drain).build().fuse();
        Logger::root(Arc::new(drain), slog::o!())
    }

    /// Logger writing to the test output.
    pub fn stdout() -> Logger {
        Self::from_writer(slog_term::TestStdoutWriter)
    }

    /// Logger writing synchronously to a memory buffer, so logs can be asserted right after
    /// they are emitted.
    pub fn memory() -> (Logger, LogBuffer) {
        let buffer = LogBuffer::default();
        let decorator = PlainSyncDecorator::new(buffer.clone());
        let drain = FullFormat::new(decorator).build().fuse();

        (Logger::root(drain, slog::o!()), buffer)
    }
}

/// Shared in-memory sink for [TestLogger::memory].
#[derive(Debug, Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    /// Everything logged so far.
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use slog::info;

    use super::*;

    #[test]
    fn memory_logger_keeps_emitted_logs() {
        let (logger, buffer) = TestLogger::memory();

        info!(logger, "Stub installed"; "stub" => "#<Widget:1>.greet");

        let logs = buffer.contents();
        assert!(
            logs.contains("Stub installed") && logs.contains("#<Widget:1>.greet"),
            "logs should contain the message and its key values, logs:\n{logs}"
        );
    }
}
