//! Invocation wrapper: handler in, gateway envelope out.
//!
//! [`wrap`] lifts a fallible handler into a closure with the identical
//! invocation signature and a fixed return shape. Domain errors and anything
//! else the handler propagates (or panics with) are classified and rendered
//! as error envelopes; nothing escapes the wrapper boundary.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use http::StatusCode;
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

use crate::coerce::Payload;
use crate::error::{classify, Error, HandlerError};
use crate::response::{ProxyResponse, ResponseEnvelope};

/// Structured success outcome returned by wrapped handlers.
///
/// Exactly one of `payload` or `location` is meaningful per call; both may
/// be absent for an empty success body.
#[derive(Debug)]
pub struct FunctionResult {
    pub status_code: StatusCode,
    pub payload: Option<Payload>,
    pub location: Option<String>,
}

impl FunctionResult {
    pub fn new(
        status_code: StatusCode,
        payload: Option<Payload>,
        location: Option<String>,
    ) -> Self {
        Self {
            status_code,
            payload,
            location,
        }
    }

    /// 200 OK with a payload.
    pub fn ok(payload: impl Into<Payload>) -> Self {
        Self::new(StatusCode::OK, Some(payload.into()), None)
    }

    /// 201 Created pointing at the new resource.
    pub fn created(location: impl Into<String>) -> Self {
        Self::new(StatusCode::CREATED, None, Some(location.into()))
    }

    /// 200 OK with an empty body.
    pub fn empty() -> Self {
        Self::new(StatusCode::OK, None, None)
    }
}

/// Wrap a handler into an envelope-returning closure.
///
/// Per call, exactly one synchronous handler invocation:
/// - `Ok(FunctionResult)` renders a success envelope;
/// - `Err` is classified against the domain taxonomy and rendered as an
///   error envelope, with the logging-only variant (traceback, context)
///   emitted through `tracing`;
/// - a panic is contained and rendered as a 500, the panic payload standing
///   in for the runtime fault description.
pub fn wrap<A, F>(handler: F) -> impl Fn(A) -> ResponseEnvelope
where
    F: Fn(A) -> Result<FunctionResult, HandlerError>,
{
    move |event: A| match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
        Ok(Ok(result)) => ProxyResponse::from_result(result).into_envelope(),
        Ok(Err(err)) => {
            let classified = classify(err.as_ref());
            let context = err.downcast_ref::<Error>().and_then(Error::context).cloned();
            let response = ProxyResponse::from_classified(classified)
                .with_trace(error_chain(err.as_ref()))
                .with_context(context);
            log_failure(&response);
            response.into_envelope()
        }
        Err(panic_payload) => {
            let description = panic_description(panic_payload.as_ref());
            let response = ProxyResponse::new()
                .with_status(StatusCode::INTERNAL_SERVER_ERROR)
                .with_error(
                    format!("An unhandled exception was raised: {description}"),
                    description,
                );
            log_failure(&response);
            response.into_envelope()
        }
    }
}

fn log_failure(response: &ProxyResponse) {
    let logging = response.logging_envelope();
    error!(
        status = logging.status_code,
        body = logging.body.as_deref().unwrap_or(""),
        "handler invocation failed"
    );
}

/// Flatten an error's source chain into lines for the logging envelope.
fn error_chain(err: &dyn std::error::Error) -> Vec<String> {
    let mut lines = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(cause.to_string());
        source = cause.source();
    }
    lines
}

fn panic_description(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "handler panicked with a non-string payload".to_string()
    }
}

/// Mount a wrapped handler on the Lambda runtime.
///
/// The handler receives the raw gateway event; the wrapped envelope is
/// returned to the gateway as-is.
///
/// # Example
///
/// ```no_run
/// use lambda_proxy_helpers::{init_tracing, run_proxy, FunctionResult, HandlerError};
/// use serde_json::{json, Value};
///
/// fn handler(_event: Value) -> Result<FunctionResult, HandlerError> {
///     Ok(FunctionResult::ok(json!({"status": "healthy"})))
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), lambda_runtime::Error> {
///     init_tracing();
///     run_proxy(handler).await
/// }
/// ```
pub async fn run_proxy<F>(handler: F) -> Result<(), lambda_runtime::Error>
where
    F: Fn(Value) -> Result<FunctionResult, HandlerError> + Send + Sync + 'static,
{
    let wrapped = Arc::new(wrap(handler));
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let wrapped = Arc::clone(&wrapped);
        async move {
            let request_id = event.context.request_id.clone();
            info!(request_id = %request_id, "handling proxy invocation");
            Ok::<_, lambda_runtime::Error>(wrapped(event.payload))
        }
    }))
    .await
}
