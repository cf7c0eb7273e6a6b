// Error taxonomy for the connection, parse, and encode stages
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServeError>;

/// Everything that can go wrong between accepting a connection and writing
/// its response. Route-level outcomes (404, 400, 501) are responses, not
/// errors, and never appear here.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Read or write failure on the client connection.
    #[error("error reading from connection: {0}")]
    Io(#[from] std::io::Error),

    /// The read deadline elapsed before a complete message arrived.
    #[error("connection read timed out")]
    Timeout,

    /// Inbound message exceeded the configured cap.
    #[error("message from connection exceeded limit of {0} bytes")]
    MessageTooLarge(u64),

    /// Request line had fewer than three tokens.
    #[error("missing part when parsing line")]
    MissingPart,

    /// Stream ended before the declared Content-Length was read.
    #[error("stream exhausted before declared body length")]
    TruncatedBody,

    /// Client asked for an encoding this server does not implement.
    #[error("tried to use unsupported encoding method: {0}")]
    UnsupportedEncoding(String),
}

impl ServeError {
    /// A recoverable error is logged and the request proceeds; every other
    /// kind is terminal for the connection it occurred on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ServeError::UnsupportedEncoding(_))
    }
}
