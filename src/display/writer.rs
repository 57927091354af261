//! Line-oriented display writing to stdout or any other writer.

use super::DisplaySurface;
use crate::config::OutputFormat;
use crate::poller::DisplayState;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// One line of status-bar JSON output.
#[derive(Debug, Serialize)]
struct WaybarLine<'a> {
    text: &'a str,
    class: &'a str,
    tooltip: String,
}

/// Writes one line per render.
pub struct WriterDisplay<W: Write + Send> {
    writer: Mutex<W>,
    format: OutputFormat,
}

/// Display writing to the process's stdout.
pub type StdoutDisplay = WriterDisplay<io::Stdout>;

impl StdoutDisplay {
    pub fn stdout(format: OutputFormat) -> Self {
        WriterDisplay::new(io::stdout(), format)
    }
}

impl<W: Write + Send> WriterDisplay<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer: Mutex::new(writer),
            format,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_line(&self, line: &str) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let result = writeln!(writer, "{}", line).and_then(|_| writer.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to write display output");
        }
    }

    /// Line breaks inside a value would split one render across lines.
    fn plain_line(text: &str) -> String {
        text.replace(|c: char| c == '\n' || c == '\r', " ")
    }

    fn waybar_line(text: &str, class: &str) -> String {
        let line = WaybarLine {
            text,
            class,
            tooltip: format!("updated {}", chrono::Local::now().format("%H:%M:%S")),
        };
        // Serializing borrowed strings into a String cannot fail.
        serde_json::to_string(&line).unwrap_or_default()
    }
}

impl<W: Write + Send> DisplaySurface for WriterDisplay<W> {
    fn set_text(&self, text: &str) {
        match self.format {
            OutputFormat::Plain => self.write_line(&Self::plain_line(text)),
            OutputFormat::Waybar => self.write_line(&Self::waybar_line(text, "value")),
        }
    }

    fn render(&self, state: &DisplayState) {
        let text = state.to_string();
        match self.format {
            OutputFormat::Plain => self.write_line(&Self::plain_line(&text)),
            OutputFormat::Waybar => self.write_line(&Self::waybar_line(&text, state.class())),
        }
    }
}
