//! Typed accessors over an inbound API Gateway proxy event.
//!
//! Wraps the raw event JSON and exposes the handful of fields handlers
//! actually read: method, resource, path/query parameters, body properties
//! and the Cognito identity claims.

use serde_json::Value;

use crate::error::{Error, Result};

const CLAIM_USER_ID: &str = "sub";
const CLAIM_ACCOUNT_ID: &str = "custom:account_id";
const CLAIM_ACCOUNT_CREATED: &str = "custom:account_created";

/// Truthy values of this variable switch identity resolution to the
/// `TEST_*` variables below, for running handlers outside the gateway.
const ENV_LOCAL_DEBUG: &str = "IS_LOCAL_DEBUG";
const ENV_TEST_USER_ID: &str = "TEST_USER_ID";
const ENV_TEST_ACCOUNT_ID: &str = "TEST_ACCOUNT_ID";
const ENV_TEST_ACCOUNT_CREATED: &str = "TEST_ACCOUNT_CREATED";

/// Parsed view over one gateway event.
#[derive(Debug, Clone)]
pub struct ProxyEvent {
    event: Value,
    body: Option<Value>,
    user_id: Option<String>,
    account_id: Option<String>,
    account_created: Option<String>,
}

impl ProxyEvent {
    /// Snapshot the raw event and parse its JSON body when present.
    pub fn new(event: Value) -> Result<Self> {
        let body = match event.get("body").and_then(Value::as_str) {
            Some(raw) if !raw.is_empty() => Some(serde_json::from_str(raw).map_err(|e| {
                Error::Validation(format!("request body is not valid JSON: {e}"))
            })?),
            _ => None,
        };

        Ok(Self {
            event,
            body,
            user_id: None,
            account_id: None,
            account_created: None,
        })
    }

    /// HTTP method of the request, empty when the event lacks one.
    pub fn method(&self) -> &str {
        self.event
            .get("httpMethod")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Resource template the gateway matched (e.g. `/users/{id}`).
    pub fn resource_path(&self) -> &str {
        self.event
            .get("resource")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Look up a path parameter, failing with `MissingParameter` when the
    /// parameter map is absent, the key is missing, or the value is empty.
    pub fn path_param(&self, name: &str) -> Result<String> {
        if let Some(value) = self
            .event
            .get("pathParameters")
            .and_then(|params| params.get(name))
            .and_then(Value::as_str)
        {
            if !value.is_empty() {
                return Ok(value.to_string());
            }
        }

        Err(Error::MissingParameter(format!(
            "{name} not found in path parameters or value is empty"
        )))
    }

    /// Look up a property of the parsed JSON body.
    pub fn body_prop(&self, name: &str) -> Option<&Value> {
        self.body.as_ref().and_then(|body| body.get(name))
    }

    /// Look up a query string parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.event
            .get("queryStringParameters")
            .and_then(|params| params.get(name))
            .and_then(Value::as_str)
    }

    /// Resolve the caller's identity from the authorizer claims.
    ///
    /// When `IS_LOCAL_DEBUG` is truthy the claims are bypassed and identity
    /// comes from the `TEST_*` environment variables instead. Otherwise a
    /// missing authorizer, claims block or user id (or account id when
    /// `requires_account_id` is set) fails with `InvalidUser`.
    pub fn validate_auth(&mut self, requires_account_id: bool) -> Result<()> {
        if local_debug_enabled() {
            self.user_id = std::env::var(ENV_TEST_USER_ID).ok();
            self.account_id = std::env::var(ENV_TEST_ACCOUNT_ID).ok();
            self.account_created = std::env::var(ENV_TEST_ACCOUNT_CREATED)
                .ok()
                .or_else(|| Some("N".to_string()));
            return Ok(());
        }

        let authorizer = self
            .event
            .get("requestContext")
            .and_then(|ctx| ctx.get("authorizer"))
            .filter(|auth| !auth.is_null())
            .ok_or_else(|| Error::InvalidUser("User invalid or not found (1)".to_string()))?;

        let claims = authorizer
            .get("claims")
            .filter(|claims| !claims.is_null())
            .ok_or_else(|| Error::InvalidUser("User invalid or user not found (2)".to_string()))?;

        self.user_id = claim_string(claims, CLAIM_USER_ID);
        if requires_account_id {
            self.account_id = claim_string(claims, CLAIM_ACCOUNT_ID);
            self.account_created = claim_string(claims, CLAIM_ACCOUNT_CREATED);
        }

        if self.user_id.is_none() || (requires_account_id && self.account_id.is_none()) {
            return Err(Error::InvalidUser(
                "User invalid or not found (3)".to_string(),
            ));
        }

        Ok(())
    }

    /// User id resolved by [`validate_auth`](Self::validate_auth).
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Account id resolved by [`validate_auth`](Self::validate_auth).
    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    /// Account-created flag ("Y"/"N") resolved by
    /// [`validate_auth`](Self::validate_auth).
    pub fn account_created(&self) -> Option<&str> {
        self.account_created.as_deref()
    }
}

fn claim_string(claims: &Value, name: &str) -> Option<String> {
    claims
        .get(name)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(String::from)
}

fn local_debug_enabled() -> bool {
    std::env::var(ENV_LOCAL_DEBUG)
        .map(|flag| matches!(flag.to_ascii_lowercase().as_str(), "true" | "t" | "y" | "1"))
        .unwrap_or(false)
}
