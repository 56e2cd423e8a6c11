//! Console output sink and ANSI palette
//!
//! Every message the framework produces goes through [`Console::emit`], which
//! writes the whole message while holding the sink lock so that lines from
//! different callers never interleave.

use crate::config::UnitConfig;
use crate::error::Result;
use parking_lot::Mutex;
use std::fmt::Display;
use std::io::{self, Write};
use std::sync::Arc;

const RESET: &str = "\x1b[0m";
const BOLD_WHITE: &str = "\x1b[1;37m";
const BOLD_CYAN: &str = "\x1b[1;36m";
const CYAN: &str = "\x1b[0;36m";
const BOLD_GREEN: &str = "\x1b[1;32m";
const BOLD_YELLOW: &str = "\x1b[1;33m";
const BOLD_RED: &str = "\x1b[1;31m";
const RED_BACKGROUND: &str = "\x1b[1;37;41m";

/// Text styles used by the reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Neutral labels (test names, summary captions)
    Label,
    /// Assertion kind labels
    Kind,
    /// Rendered operand values
    Operand,
    /// Passing status / good band
    Good,
    /// Warning band
    Warning,
    /// Failing status / bad band
    Bad,
}

impl Style {
    fn code(&self) -> &'static str {
        match self {
            Style::Label => BOLD_WHITE,
            Style::Kind => BOLD_CYAN,
            Style::Operand => CYAN,
            Style::Good => BOLD_GREEN,
            Style::Warning => BOLD_YELLOW,
            Style::Bad => BOLD_RED,
        }
    }
}

/// ANSI colouring, or plain text when disabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub const fn ansi() -> Self {
        Self::new(true)
    }

    pub const fn plain() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Wrap `text` in the escape codes for `style`
    pub fn paint(&self, style: Style, text: impl Display) -> String {
        if self.enabled {
            format!("{}{}{}", style.code(), text, RESET)
        } else {
            text.to_string()
        }
    }

    /// Mark a single element so it stands out from its neighbours.
    ///
    /// Coloured output uses a red background; plain output brackets the
    /// value as `>>value<<` so the mark survives without escapes.
    pub fn highlight(&self, text: impl Display) -> String {
        if self.enabled {
            format!("{}{}{}", RED_BACKGROUND, text, RESET)
        } else {
            format!(">>{}<<", text)
        }
    }
}

/// Clonable in-memory sink, used to capture output in tests
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Append-only text sink shared by every test case of a harness
pub struct Console {
    writer: Mutex<Box<dyn Write + Send>>,
    palette: Palette,
    flush_each_message: bool,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("palette", &self.palette)
            .field("flush_each_message", &self.flush_each_message)
            .finish_non_exhaustive()
    }
}

impl Console {
    /// Create a console over any writer
    pub fn new(writer: impl Write + Send + 'static, palette: Palette) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            palette,
            flush_each_message: true,
        }
    }

    /// Console on standard output, coloured according to `config`
    pub fn stdout(config: &UnitConfig) -> Self {
        Self::new(io::stdout(), Palette::new(config.color.enabled_for_stdout()))
            .with_flush_each_message(config.flush_each_message)
    }

    /// Console writing into a fresh [`SharedBuffer`]
    pub fn buffered(palette: Palette) -> (Self, SharedBuffer) {
        let buffer = SharedBuffer::new();
        (Self::new(buffer.clone(), palette), buffer)
    }

    pub fn with_flush_each_message(mut self, flush: bool) -> Self {
        self.flush_each_message = flush;
        self
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Write one complete message.
    ///
    /// Failures are logged and dropped: an assertion must never fail because
    /// its report could not be written.
    pub fn emit(&self, message: &str) {
        let mut writer = self.writer.lock();
        let mut result = writer.write_all(message.as_bytes());
        if result.is_ok() && self.flush_each_message {
            result = writer.flush();
        }

        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to write test output");
        }
    }

    pub fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }
}
