// HTTP response building, encoding negotiation, and wire serialization
use super::status_line;
use crate::error::{Result, ServeError};

/// Response under construction. `body: None` means no body at all and
/// suppresses every body-related header; `Some(vec![])` is a present,
/// zero-length body and still emits `Content-Length: 0`.
#[derive(Clone, Debug)]
pub struct Response {
    pub status_code: u16,
    pub content_type: String,
    pub encoding_method: String,
    pub encoded: bool,
    pub body: Option<Vec<u8>>,
}

impl Response {
    pub fn new(status_code: u16) -> Self {
        Response {
            status_code,
            content_type: String::new(),
            encoding_method: String::new(),
            encoded: false,
            body: None,
        }
    }

    /// Run the negotiated encoding in place.
    ///
    /// gzip is negotiated by label only: `encoded` is set and the body bytes
    /// are left untouched. Any other requested method clears the method
    /// field and returns the recoverable `UnsupportedEncoding` error.
    pub fn encode(&mut self) -> Result<()> {
        if self.body.is_none() || self.encoding_method.is_empty() {
            return Ok(());
        }
        match self.encoding_method.as_str() {
            "gzip" => {
                self.encoded = true;
                Ok(())
            }
            _ => {
                let method = std::mem::take(&mut self.encoding_method);
                self.encoded = false;
                Err(ServeError::UnsupportedEncoding(method))
            }
        }
    }

    /// Encode a deep copy (fresh body buffer), leaving `self` untouched.
    /// Safe to call on a response template shared across concurrently
    /// running connections.
    pub fn encode_copy(&self) -> (Response, Result<()>) {
        let mut copy = self.clone();
        let result = copy.encode();
        (copy, result)
    }

    /// Serialize to wire bytes: status line, body-dependent headers, blank
    /// line, raw body. No trailing terminator after the body.
    ///
    /// With `mutate` false the encoding pass runs on a deep copy via
    /// `encode_copy`. Recoverable encoding errors are logged and the
    /// response proceeds unencoded; any other error kind aborts with
    /// nothing serialized.
    pub fn to_bytes(&mut self, mutate: bool) -> Result<Vec<u8>> {
        let copy;
        let (resp, result): (&Response, Result<()>) = if mutate {
            let result = self.encode();
            (&*self, result)
        } else {
            let (c, result) = self.encode_copy();
            copy = c;
            (&copy, result)
        };

        if let Err(e) = result {
            if e.is_recoverable() {
                crate::log::warn(&format!("Non-fatal error while encoding: {e}"));
            } else {
                crate::log::error(&format!("Fatal error while encoding: {e}"));
                return Err(e);
            }
        }

        Ok(resp.serialize())
    }

    fn serialize(&self) -> Vec<u8> {
        let mut out = status_line(self.status_code).into_bytes();
        if let Some(body) = &self.body {
            if self.encoded {
                out.extend_from_slice(format!("Content-Encoding: {}\r\n", self.encoding_method).as_bytes());
            }
            if !self.content_type.is_empty() {
                out.extend_from_slice(format!("Content-Type: {}\r\n", self.content_type).as_bytes());
            }
            out.extend_from_slice(format!("Content-Length: {}\r\n", body.len()).as_bytes());
        }
        out.extend_from_slice(b"\r\n");
        if let Some(body) = &self.body {
            out.extend_from_slice(body);
        }
        out
    }
}
