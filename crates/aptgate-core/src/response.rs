//! Platform-independent response descriptor.
//!
//! The gate and redirectors produce these; the host adapter turns them into
//! whatever its HTTP stack needs.

/// Body returned when the path gate blocks a request.
pub const BLOCKED_BODY: &str = "Not Found";

/// Body returned when a pool filename does not match the artifact template.
pub const UNRESOLVED_BODY: &str = "Not found";

/// Status, headers and body of a response decided by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl GateResponse {
    /// Plain-text `404` with the given body.
    pub fn not_found(body: &str) -> Self {
        Self {
            status: 404,
            headers: vec![(
                "Content-Type".to_string(),
                "text/plain;charset=UTF-8".to_string(),
            )],
            body: body.to_string(),
        }
    }

    /// Temporary (`302`) redirect with an empty body.
    pub fn redirect(location: &str) -> Self {
        Self {
            status: 302,
            headers: vec![("Location".to_string(), location.to_string())],
            body: String::new(),
        }
    }

    /// Looks up a header value (case-insensitive name).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn location(&self) -> Option<&str> {
        self.header("Location")
    }
}
