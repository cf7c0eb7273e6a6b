// HTTP/1.1 codec: status lines, line reading, request parsing, response encoding
mod reader;
mod request;
mod response;
pub use reader::LineReader;
pub use request::Request;
pub use response::Response;

/// Status lines this server can emit. Immutable; codes outside the table
/// deterministically resolve to the 500 line.
const STATUS_LINES: &[(u16, &str)] = &[
    (200, "HTTP/1.1 200 OK"),
    (201, "HTTP/1.1 201 Created"),
    (400, "HTTP/1.1 400 Bad Request"),
    (404, "HTTP/1.1 404 Not Found"),
    (500, "HTTP/1.1 500 Internal Server Error"),
    (501, "HTTP/1.1 501 Not Implemented"),
];

const FALLBACK_STATUS_LINE: &str = "HTTP/1.1 500 Internal Server Error";

/// Status line for a code, single trailing CRLF included.
pub fn status_line(code: u16) -> String {
    let line = STATUS_LINES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, l)| *l)
        .unwrap_or(FALLBACK_STATUS_LINE);
    format!("{line}\r\n")
}
