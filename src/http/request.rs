// HTTP request parsing
use std::io::Read;

use super::LineReader;
use crate::error::{Result, ServeError};

/// A parsed request. Built once by `parse`, never mutated afterward.
#[derive(Clone, Debug)]
pub struct Request {
    pub method: String,
    pub target: String,
    pub http_version: String,
    pub host: String,
    pub user_agent: String,
    pub accept: String,
    pub content_type: String,
    /// -1 means the Content-Length header was absent or unparseable.
    pub content_length: i64,
    pub accept_encoding: String,
    pub body: Vec<u8>,
}

/// Header names this server records into dedicated fields. Everything else
/// is logged and skipped.
enum HeaderField {
    Host,
    UserAgent,
    Accept,
    ContentType,
    ContentLength,
    AcceptEncoding,
}

impl HeaderField {
    fn recognize(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "host" => Some(HeaderField::Host),
            "user-agent" => Some(HeaderField::UserAgent),
            "accept" => Some(HeaderField::Accept),
            "content-type" => Some(HeaderField::ContentType),
            "content-length" => Some(HeaderField::ContentLength),
            "accept-encoding" => Some(HeaderField::AcceptEncoding),
            _ => None,
        }
    }
}

impl Request {
    /// Parse one request from a captured message buffer.
    ///
    /// Body framing follows the declared Content-Length when one is present;
    /// a truncated declared body is fatal. Without a usable Content-Length a
    /// single further line is read on a best-effort basis — multi-line or
    /// binary bodies sent without a length are reduced to their first line,
    /// and end of stream here simply means "no body".
    pub fn parse<R: Read>(reader: &mut LineReader<R>) -> Result<Self> {
        let line = reader.read_line()?.ok_or(ServeError::MissingPart)?;
        let mut parts = line.splitn(3, ' ');
        let (method, target, http_version) = match (parts.next(), parts.next(), parts.next()) {
            (Some(m), Some(t), Some(v)) => (m.to_string(), t.to_string(), v.to_string()),
            _ => return Err(ServeError::MissingPart),
        };

        let mut req = Request {
            method,
            target,
            http_version,
            host: String::new(),
            user_agent: String::new(),
            accept: String::new(),
            content_type: String::new(),
            content_length: -1,
            accept_encoding: String::new(),
            body: Vec::new(),
        };

        loop {
            let line = match reader.read_line()? {
                Some(l) => l,
                None => return Err(ServeError::Io(std::io::ErrorKind::UnexpectedEof.into())),
            };
            if line.is_empty() {
                break;
            }
            let Some((name, value)) = line.split_once(": ") else {
                crate::log::debug(&format!("Skipping malformed header line: {line}"));
                continue;
            };
            match HeaderField::recognize(name) {
                Some(field) => req.set_field(field, value),
                None => crate::log::debug(&format!("Ignoring unrecognized header: {name}")),
            }
        }

        if req.content_length != -1 {
            req.body = reader.read_exact_body(req.content_length as usize)?;
        } else if let Some(line) = reader.read_line()? {
            req.body = line.into_bytes();
        }

        Ok(req)
    }

    fn set_field(&mut self, field: HeaderField, value: &str) {
        match field {
            HeaderField::Host => self.host = value.to_string(),
            HeaderField::UserAgent => self.user_agent = value.to_string(),
            HeaderField::Accept => self.accept = value.to_string(),
            HeaderField::ContentType => self.content_type = value.to_string(),
            HeaderField::ContentLength => {
                // Unparseable or negative lengths collapse to the absent
                // sentinel rather than failing the request.
                self.content_length = match value.parse::<i64>() {
                    Ok(n) if n >= 0 => n,
                    _ => {
                        crate::log::debug(&format!("Error parsing content-length: {value}"));
                        -1
                    }
                };
            }
            HeaderField::AcceptEncoding => self.accept_encoding = value.to_string(),
        }
    }
}
