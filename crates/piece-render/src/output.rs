//! Delivery of rendered markup.
//!
//! Rendering returns a string and never writes anywhere itself. An
//! [`OutputSink`] is the collaborator that takes the markup, and the optional
//! status code from a [`RenderRequest`](crate::RenderRequest), once rendering
//! has succeeded.
//!
//! - [`WriterSink`]: writes the body to any `io::Write`, optionally preceded
//!   by a CGI-style header block
//! - [`BufferedResponse`]: keeps status and body in memory for the host
//!   application's own response type

use std::io::Write;

use crate::error::RenderError;

/// Status used when a request does not set one.
pub const DEFAULT_STATUS: u16 = 200;

/// Receives the final markup of a successful render.
pub trait OutputSink {
    /// Delivers `body`, applying `status` when the caller provided one.
    fn write_response(&mut self, status: Option<u16>, body: &str) -> Result<(), RenderError>;
}

/// Writes rendered markup to an `io::Write`.
///
/// With headers enabled the body is preceded by
/// `Status: <code>\r\nContent-Type: text/html; charset=UTF-8\r\n\r\n`, the
/// form CGI hosts expect on stdout.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
    headers: bool,
}

impl<W: Write> WriterSink<W> {
    /// Creates a sink writing the bare body.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            headers: false,
        }
    }

    /// Creates a sink that writes a CGI header block before the body.
    pub fn with_headers(writer: W) -> Self {
        Self {
            writer,
            headers: true,
        }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for WriterSink<W> {
    fn write_response(&mut self, status: Option<u16>, body: &str) -> Result<(), RenderError> {
        if self.headers {
            write!(
                self.writer,
                "Status: {}\r\nContent-Type: text/html; charset=UTF-8\r\n\r\n",
                status.unwrap_or(DEFAULT_STATUS)
            )?;
        }
        self.writer.write_all(body.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

/// An in-memory response: status and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedResponse {
    /// Response status; stays [`DEFAULT_STATUS`] unless a request sets one.
    pub status: u16,
    /// Accumulated body.
    pub body: String,
}

impl BufferedResponse {
    /// Creates an empty `200` response.
    pub fn new() -> Self {
        Self {
            status: DEFAULT_STATUS,
            body: String::new(),
        }
    }
}

impl Default for BufferedResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for BufferedResponse {
    fn write_response(&mut self, status: Option<u16>, body: &str) -> Result<(), RenderError> {
        if let Some(status) = status {
            self.status = status;
        }
        self.body.push_str(body);
        Ok(())
    }
}
