//! Output formatting for hash records.
//!
//! Text output is one `hash,quality,source` line per record. JSON output is
//! one object per record, optionally pretty-printed.

use std::io::{self, Write};

use crate::types::HashRecord;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `hash,quality,source`
    Text,
    /// JSON object
    Json,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// A writer that renders hash records as text or JSON.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// # Arguments
    ///
    /// * `writer` - The underlying writer (file, stdout, etc.)
    /// * `format` - Output format
    /// * `pretty` - Whether to pretty-print JSON (ignored for text)
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write a single record followed by a newline.
    pub fn write(&mut self, record: &HashRecord) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(
                    self.writer,
                    "{},{},{}",
                    record.hash, record.quality, record.source
                )?;
            }
            OutputFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, record)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, record).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
            }
        }
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
