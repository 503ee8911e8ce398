//! Shared plumbing for Lambda functions behind an API Gateway proxy
//! integration.
//!
//! Handlers behind the gateway all need the same three things:
//!
//! - [`ProxyEvent`]: typed accessors over the inbound gateway event
//!   (path/query/body parameters, Cognito identity claims)
//! - [`Error`] + [`classify`]: a closed domain-error taxonomy with fixed
//!   HTTP status codes, classified once at the wrapper boundary
//! - [`wrap`] / [`run_proxy`]: handler wrapping that turns a
//!   [`FunctionResult`] or an error into the gateway's
//!   [`ResponseEnvelope`], with JSON-compatibility coercion of decimal and
//!   timestamp payload values via [`Payload`]
//!
//! # Testing Support
//!
//! The [`test_utils`] module builds complete synthetic proxy events for unit
//! testing handlers without a live gateway. Enable the `test-utils` feature
//! to access it from dependent crates.

#![deny(warnings)]

mod coerce;
mod error;
mod event;
mod response;
mod tracing_init;
mod wrapper;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use coerce::Payload;
pub use error::{classify, Classified, Error, HandlerError, Result};
pub use event::ProxyEvent;
pub use response::{ProxyResponse, ResponseEnvelope};
pub use tracing_init::init_tracing;
pub use wrapper::{run_proxy, wrap, FunctionResult};
