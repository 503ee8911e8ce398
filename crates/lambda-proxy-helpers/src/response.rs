//! Gateway response envelope construction.
//!
//! [`ProxyResponse`] collects the outcome of one invocation (success payload
//! or classified error) and renders the proxy-integration envelope the
//! gateway expects: status code, headers and a JSON-encoded body.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::coerce::Payload;
use crate::error::Classified;
use crate::wrapper::FunctionResult;

const APPLICATION_JSON: &str = "application/json";
const ALLOW_ANY_ORIGIN: &str = "*";

/// The proxy-integration wire shape returned to the gateway.
///
/// The body is either the raw success payload (JSON text, or raw string
/// passthrough when the coerced payload is itself a string) or an
/// error-shaped object `{"error", "errorType"}` - never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    /// Header values are strings, except the boolean CORS credentials flag.
    pub headers: Map<String, Value>,
    pub body: Option<String>,
}

#[derive(Debug, Clone)]
struct ErrorDetail {
    message: String,
    error_type: String,
    trace: Vec<String>,
}

/// Builder for one invocation's response envelope.
///
/// Error takes absolute precedence: when an error is set, any payload or
/// location is ignored.
#[derive(Debug, Clone, Default)]
pub struct ProxyResponse {
    status: StatusCode,
    payload: Option<Payload>,
    location: Option<String>,
    error: Option<ErrorDetail>,
    context: Option<Value>,
}

impl ProxyResponse {
    /// Start a response with status 200 and no body.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Set the redirect / created-resource URL, emitted as a `Location`
    /// header on success responses.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_error(mut self, message: impl Into<String>, error_type: impl Into<String>) -> Self {
        self.error = Some(ErrorDetail {
            message: message.into(),
            error_type: error_type.into(),
            trace: Vec::new(),
        });
        self
    }

    /// Attach the error's source chain, surfaced only by
    /// [`logging_envelope`](Self::logging_envelope).
    pub(crate) fn with_trace(mut self, trace: Vec<String>) -> Self {
        if let Some(error) = self.error.as_mut() {
            error.trace = trace;
        }
        self
    }

    /// Attach opaque diagnostic context, surfaced only by
    /// [`logging_envelope`](Self::logging_envelope).
    pub(crate) fn with_context(mut self, context: Option<Value>) -> Self {
        self.context = context;
        self
    }

    /// Build a success response from a handler's [`FunctionResult`].
    pub fn from_result(result: FunctionResult) -> Self {
        Self {
            status: result.status_code,
            payload: result.payload,
            location: result.location,
            error: None,
            context: None,
        }
    }

    /// Build an error response from a classified handler error.
    pub fn from_classified(classified: Classified) -> Self {
        Self::new()
            .with_status(classified.status_code)
            .with_error(classified.message, classified.error_type)
    }

    /// Render the envelope returned to the gateway.
    pub fn into_envelope(self) -> ResponseEnvelope {
        self.build(false)
    }

    /// Render the internal logging-only variant, which additionally carries
    /// the error traceback and diagnostic context. Never returned to the
    /// caller.
    pub fn logging_envelope(&self) -> ResponseEnvelope {
        self.clone().build(true)
    }

    fn build(self, for_logging: bool) -> ResponseEnvelope {
        let mut headers = Map::new();
        headers.insert(
            "Content-Type".to_string(),
            Value::String(APPLICATION_JSON.to_string()),
        );
        headers.insert(
            "Access-Control-Allow-Origin".to_string(),
            Value::String(ALLOW_ANY_ORIGIN.to_string()),
        );
        headers.insert(
            "Access-Control-Allow-Credentials".to_string(),
            Value::Bool(true),
        );

        let body = if let Some(error) = self.error {
            let mut body = json!({
                "error": error.message,
                "errorType": error.error_type,
            });
            if for_logging {
                if !error.trace.is_empty() {
                    body["errorTraceback"] = Value::from(error.trace);
                }
                if let Some(context) = self.context {
                    body["context"] = context;
                }
            }
            Some(body.to_string())
        } else {
            if let Some(location) = self.location {
                headers.insert("Location".to_string(), Value::String(location));
            }
            match self.payload {
                Some(payload) if !payload.is_empty() => Some(render_body(payload)),
                _ => None,
            }
        };

        ResponseEnvelope {
            status_code: self.status.as_u16(),
            headers,
            body,
        }
    }
}

/// A coerced payload that is itself a string passes through as the raw body
/// text; JSON-encoding it again would produce quoted output.
fn render_body(payload: Payload) -> String {
    match payload.into_json() {
        Value::String(raw) => raw,
        other => other.to_string(),
    }
}
