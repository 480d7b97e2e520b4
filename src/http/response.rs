/// HTTP status code with its reason phrase looked up from a fixed catalog.
///
/// Status codes the server emits itself are available as constants:
/// - `OK` (200): Request successful
/// - `CREATED` (201): File stored
/// - `BAD_REQUEST` (400): Malformed request line or undecodable request
/// - `NOT_FOUND` (404): Unknown route or missing file
/// - `INTERNAL_SERVER_ERROR` (500): Filesystem failure
///
/// Any other code can be built with [`StatusCode::from_u16`]; its reason
/// phrase is `Unknown Status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(u16);

/// Reason phrases for every status code the server knows by name.
const CATALOG: &[(u16, &str)] = &[
    (200, "OK"),
    (201, "Created"),
    (400, "Bad Request"),
    (404, "Not Found"),
    (500, "Internal Server Error"),
];

const UNKNOWN_STATUS: &str = "Unknown Status";

impl StatusCode {
    /// 200 OK
    pub const OK: StatusCode = StatusCode(200);
    /// 201 Created
    pub const CREATED: StatusCode = StatusCode(201);
    /// 400 Bad Request
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    /// 404 Not Found
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    /// 500 Internal Server Error
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    /// Wraps an arbitrary numeric code.
    pub const fn from_u16(code: u16) -> Self {
        StatusCode(code)
    }

    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use courier::http::response::StatusCode;
    /// assert_eq!(StatusCode::OK.as_u16(), 200);
    /// assert_eq!(StatusCode::NOT_FOUND.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns the reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use courier::http::response::StatusCode;
    /// assert_eq!(StatusCode::OK.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::from_u16(418).reason_phrase(), "Unknown Status");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        CATALOG
            .iter()
            .find(|(code, _)| *code == self.0)
            .map(|(_, phrase)| *phrase)
            .unwrap_or(UNKNOWN_STATUS)
    }
}

pub const TEXT_PLAIN: &str = "text/plain";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A complete HTTP response ready to be serialized onto the wire.
///
/// Only two headers are ever emitted: `Content-Type` from `content_type` and
/// `Content-Length` computed from `body`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Value of the Content-Type header
    pub content_type: String,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use courier::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::OK)
///     .content_type("application/octet-stream")
///     .body(b"\x00\x01".to_vec())
///     .build();
/// assert_eq!(response.content_length(), 2);
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    content_type: String,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code and a
    /// `text/plain` content type.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: TEXT_PLAIN.to_string(),
            body: Vec::new(),
        }
    }

    /// Sets the Content-Type header value.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Response {
        Response {
            status: self.status,
            content_type: self.content_type,
            body: self.body,
        }
    }
}

impl Response {
    /// Creates a plain-text response with the given status.
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        let body: String = body.into();
        ResponseBuilder::new(status).body(body).build()
    }

    /// Creates a plain-text 200 OK response with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::text(StatusCode::OK, body)
    }

    /// Creates an empty 201 Created response.
    pub fn created() -> Self {
        ResponseBuilder::new(StatusCode::CREATED)
            .content_type(OCTET_STREAM)
            .build()
    }

    /// Creates a 400 Bad Request response.
    pub fn bad_request() -> Self {
        Self::text(StatusCode::BAD_REQUEST, "Bad Request")
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        Self::text(StatusCode::NOT_FOUND, "Not Found")
    }

    /// Creates a 500 Internal Server Error response carrying the given
    /// content type.
    pub fn internal_error(content_type: &str) -> Self {
        ResponseBuilder::new(StatusCode::INTERNAL_SERVER_ERROR)
            .content_type(content_type)
            .body(b"Internal Server Error".to_vec())
            .build()
    }

    /// Byte length of the body, as sent in the Content-Length header.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }
}
