//! Routes `tracing` events from the gate into the browser console.

use std::io::{self, Write};

use gloo::console;

/// Line buffer flushed to `console.log` when the formatter drops it.
#[derive(Default)]
pub(crate) struct ConsoleWriter {
    buffer: Vec<u8>,
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buffer.is_empty() {
            let line = String::from_utf8_lossy(&self.buffer);
            console::log!(line.trim_end().to_string());
            self.buffer.clear();
        }
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Install the console subscriber once per page; later calls are ignored.
pub(crate) fn init_logging() {
    let installed = tracing_subscriber::fmt()
        .with_writer(ConsoleWriter::default)
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::INFO)
        .try_init();
    if installed.is_err() {
        console::warn!("tracing subscriber already installed");
    }
}
