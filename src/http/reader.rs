// Buffered line reading over a raw byte source
use std::io::Read;

use crate::error::{Result, ServeError};

/// Pulls one logical line at a time from a byte source through a fixed-size
/// internal buffer, reassembling lines that span buffer refills.
///
/// `read_line` distinguishes three outcomes: a line (possibly empty — the
/// header-terminator sentinel), end of stream, and a read failure from the
/// source. A partial line at end of stream is returned as a line rather than
/// being masked.
pub struct LineReader<R: Read> {
    src: R,
    buf: Vec<u8>,
    start: usize,
    end: usize,
    eof: bool,
}

impl<R: Read> LineReader<R> {
    pub fn new(src: R) -> Self {
        Self::with_capacity(src, 1024)
    }

    pub fn with_capacity(src: R, cap: usize) -> Self {
        LineReader {
            src,
            buf: vec![0; cap.max(1)],
            start: 0,
            end: 0,
            eof: false,
        }
    }

    /// Refill the internal buffer. Only called once the buffered region is
    /// drained. Returns the number of bytes now buffered, 0 at end of stream.
    fn fill(&mut self) -> Result<usize> {
        if self.eof {
            return Ok(0);
        }
        self.start = 0;
        self.end = 0;
        let n = self.src.read(&mut self.buf)?;
        if n == 0 {
            self.eof = true;
        }
        self.end = n;
        Ok(n)
    }

    /// Next line with its CRLF (or bare LF) terminator stripped.
    /// `Ok(Some(""))` is an empty line; `Ok(None)` is end of stream.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let mut line: Vec<u8> = Vec::new();
        loop {
            if let Some(pos) = self.buf[self.start..self.end].iter().position(|&b| b == b'\n') {
                line.extend_from_slice(&self.buf[self.start..self.start + pos]);
                self.start += pos + 1;
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }

            line.extend_from_slice(&self.buf[self.start..self.end]);
            self.start = self.end;
            if self.fill()? == 0 {
                if line.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }
        }
    }

    /// Exactly `n` body bytes, draining the buffered region before the
    /// source. Stream exhaustion before `n` bytes is an error, never a
    /// silent truncation.
    pub fn read_exact_body(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(n);
        while out.len() < n {
            if self.start == self.end && self.fill()? == 0 {
                return Err(ServeError::TruncatedBody);
            }
            let take = (n - out.len()).min(self.end - self.start);
            out.extend_from_slice(&self.buf[self.start..self.start + take]);
            self.start += take;
        }
        Ok(out)
    }
}
