use crate::http::request::{Method, Request};
use thiserror::Error;

const LINE_TERMINATOR: &str = "\r\n";
const USER_AGENT_PREFIX: &str = "User-Agent:";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("request is not valid UTF-8")]
    InvalidEncoding,
    #[error("request line needs a method and a path")]
    MalformedRequestLine,
}

/// Parses the bytes of a single receive into a [`Request`].
///
/// The whole request is expected in `buf`; nothing is read ahead. Only the
/// request line, the `User-Agent` header and, for POST, the last line of the
/// request (taken as the body) are extracted.
pub fn parse_request(buf: &[u8]) -> Result<Request, ParseError> {
    let text = std::str::from_utf8(buf).map_err(|_| ParseError::InvalidEncoding)?;

    let lines: Vec<&str> = text.split(LINE_TERMINATOR).collect();

    // Request line: at most three pieces, the version keeps any extra spaces
    let mut parts = lines[0].splitn(3, ' ');
    let method = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or(ParseError::MalformedRequestLine)?;
    let path = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or(ParseError::MalformedRequestLine)?;
    let version = parts.next().map(str::to_string);

    let method = Method::from_token(method);

    let user_agent = lines
        .iter()
        .find(|line| line.starts_with(USER_AGENT_PREFIX))
        .map(|line| header_value(line))
        .filter(|value| !value.is_empty());

    let body = if method == Method::POST && lines.len() > 1 {
        lines.last().map(|line| line.to_string())
    } else {
        None
    };

    Ok(Request {
        method,
        path: path.to_string(),
        version,
        user_agent,
        body,
    })
}

/// Every whitespace-separated token after the header name, joined by single
/// spaces.
fn header_value(line: &str) -> String {
    line.split_whitespace()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ")
}
