//! Output sinks with color filtering.
//!
//! Commands and the framework itself write through an [`Output`]: a shared,
//! swappable sink. Styled text (ANSI escape sequences, e.g. from
//! [`console::style`]) passes through when colors are on and is stripped at
//! write time otherwise, so callers can style unconditionally.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use console::strip_ansi_codes;

/// A shared output sink for one stream (regular or error output).
#[derive(Clone)]
pub struct Output {
    sink: Rc<RefCell<Box<dyn Write>>>,
    colors: bool,
}

impl Output {
    /// A sink over stdout. Colors apply only when the stream supports them.
    pub fn stdout(colors: bool) -> Self {
        Self::from_writer(
            Box::new(io::stdout()),
            colors && console::colors_enabled(),
        )
    }

    /// A sink over stderr. Colors apply only when the stream supports them.
    pub fn stderr(colors: bool) -> Self {
        Self::from_writer(
            Box::new(io::stderr()),
            colors && console::colors_enabled_stderr(),
        )
    }

    /// Wraps an arbitrary writer.
    pub fn from_writer(writer: Box<dyn Write>, colors: bool) -> Self {
        Self {
            sink: Rc::new(RefCell::new(writer)),
            colors,
        }
    }

    /// A sink writing into an in-memory buffer, for tests and embedding.
    pub fn capture() -> (Self, CaptureBuffer) {
        let buffer = CaptureBuffer::default();
        (Self::from_writer(Box::new(buffer.clone()), false), buffer)
    }

    /// Whether styled text passes through unfiltered.
    pub fn colors(&self) -> bool {
        self.colors
    }

    /// Writes text followed by a newline.
    pub fn puts(&self, text: impl AsRef<str>) -> io::Result<()> {
        self.write_filtered(text.as_ref(), true)
    }

    /// Writes text without a trailing newline.
    pub fn put(&self, text: impl AsRef<str>) -> io::Result<()> {
        self.write_filtered(text.as_ref(), false)
    }

    fn write_filtered(&self, text: &str, newline: bool) -> io::Result<()> {
        let mut sink = self.sink.borrow_mut();
        if self.colors {
            sink.write_all(text.as_bytes())?;
        } else {
            sink.write_all(strip_ansi_codes(text).as_bytes())?;
        }
        if newline {
            sink.write_all(b"\n")?;
        }
        sink.flush()
    }
}

/// An in-memory buffer shared with a capturing [`Output`].
#[derive(Clone, Default)]
pub struct CaptureBuffer(Rc<RefCell<Vec<u8>>>);

impl CaptureBuffer {
    /// Everything written so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    /// Discards everything written so far.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
