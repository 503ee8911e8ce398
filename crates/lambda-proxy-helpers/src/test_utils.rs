//! Synthetic gateway events for handler tests.
//!
//! Builds a complete API Gateway proxy event literal so handlers can be unit
//! tested without a live gateway. Only available in test builds; enable the
//! `test-utils` feature to use it from dependent crates.
//!
//! # Usage
//!
//! ```ignore
//! use lambda_proxy_helpers::test_utils::{CognitoDetail, TestProxyEvent};
//! use serde_json::json;
//!
//! let event = TestProxyEvent::new()
//!     .method("GET")
//!     .resource("/widgets/{id}")
//!     .path("/widgets/42")
//!     .path_params(json!({"id": "42"}))
//!     .build();
//! assert_eq!(event["httpMethod"], json!("GET"));
//! ```

use serde_json::{json, Value};

/// Identity record injected into the event's authorizer claims block.
#[derive(Debug, Clone)]
pub struct CognitoDetail {
    pub user_id: String,
    pub email: String,
    pub account_id: String,
    pub account_created: bool,
}

/// Builder for a synthetic API Gateway proxy event.
///
/// Defaults to a bodyless `POST /` with no parameters and no identity.
#[derive(Debug, Clone)]
pub struct TestProxyEvent {
    method: String,
    resource: String,
    path: String,
    body: Option<Value>,
    path_params: Option<Value>,
    query_params: Option<Value>,
    stage_vars: Option<Value>,
    cognito: Option<CognitoDetail>,
}

impl Default for TestProxyEvent {
    fn default() -> Self {
        Self {
            method: "POST".to_string(),
            resource: "/".to_string(),
            path: "/".to_string(),
            body: None,
            path_params: None,
            query_params: None,
            stage_vars: None,
            cognito: None,
        }
    }
}

impl TestProxyEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Resource template the gateway matched (e.g. `/widgets/{id}`).
    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into();
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Request body; JSON-serialized into the event's `body` string.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn path_params(mut self, params: Value) -> Self {
        self.path_params = Some(params);
        self
    }

    pub fn query_params(mut self, params: Value) -> Self {
        self.query_params = Some(params);
        self
    }

    pub fn stage_vars(mut self, vars: Value) -> Self {
        self.stage_vars = Some(vars);
        self
    }

    /// Inject identity claims under the event's authorizer block.
    pub fn cognito(mut self, detail: CognitoDetail) -> Self {
        self.cognito = Some(detail);
        self
    }

    /// Assemble the full proxy event literal.
    pub fn build(self) -> Value {
        let body = match &self.body {
            Some(body) => Value::String(body.to_string()),
            None => Value::Null,
        };

        let mut event = json!({
            "resource": self.resource,
            "path": self.path,
            "httpMethod": self.method,
            "headers": {
                "Accept": "*/*",
                "Accept-Encoding": "gzip, deflate, br",
                "Authorization": "Bearer <TOKEN>",
                "Cache-Control": "no-cache",
                "CloudFront-Forwarded-Proto": "https",
                "CloudFront-Is-Desktop-Viewer": "true",
                "CloudFront-Is-Mobile-Viewer": "false",
                "CloudFront-Is-SmartTV-Viewer": "false",
                "CloudFront-Is-Tablet-Viewer": "false",
                "CloudFront-Viewer-Country": "US",
                "Host": "1234567890.execute-api.us-east-1.amazonaws.com",
                "User-Agent": "Custom User Agent",
                "Via": "1.1 08f323deadbeefa7af34d5feb414ce27.cloudfront.net (CloudFront)",
                "X-Amz-Cf-Id": "cDehVQoZnx43VYQb9j2-nvCh-9z396Uhbp027Y2JvkCPNLmGJHqlaA==",
                "X-Forwarded-For": "127.0.0.1, 127.0.0.2",
                "X-Forwarded-Port": "443",
                "X-Forwarded-Proto": "https"
            },
            "queryStringParameters": self.query_params,
            "multiValueQueryStringParameters": null,
            "pathParameters": self.path_params,
            "stageVariables": self.stage_vars,
            "requestContext": {
                "resourceId": "abcdefghijk",
                "resourcePath": self.path,
                "httpMethod": self.method,
                "extendedRequestId": "abcdefghijk=",
                "requestTime": "06/Nov/2020:22:21:39 +0000",
                "path": "/Development/test",
                "accountId": "123456789",
                "protocol": "HTTP/1.1",
                "stage": "Development",
                "domainPrefix": "abcdefghi",
                "requestTimeEpoch": 1604701299694_i64,
                "requestId": "d0550a66-2c2d-11eb-8a9f-6b193de7ce54",
                "identity": {
                    "cognitoIdentityPoolId": null,
                    "accountId": null,
                    "cognitoIdentityId": null,
                    "caller": null,
                    "sourceIp": "127.0.0.1",
                    "principalOrgId": null,
                    "accessKey": null,
                    "cognitoAuthenticationType": null,
                    "cognitoAuthenticationProvider": null,
                    "userArn": null,
                    "userAgent": "Custom User Agent",
                    "user": null
                },
                "domainName": "1234567890.execute-api.us-east-1.amazonaws.com",
                "apiId": "abcdefghijk"
            },
            "body": body,
            "isBase64Encoded": false
        });

        if let Some(detail) = self.cognito {
            let account_created = if detail.account_created { "Y" } else { "N" };
            event["requestContext"]["authorizer"] = json!({
                "claims": {
                    "sub": detail.user_id,
                    "aud": "1g31q8lvpfs0uqkqpravprhth5",
                    "email_verified": "true",
                    "event_id": "ac602ff9-b2fe-45f7-a06f-ced94764b043",
                    "token_use": "id",
                    "auth_time": "1604701288",
                    "iss": "https://cognito-idp.us-west-2.amazonaws.com/us-west-2_abcdef",
                    "cognito:username": detail.user_id,
                    "exp": "Fri Nov 06 23:21:28 UTC 2020",
                    "iat": "Fri Nov 06 22:21:28 UTC 2020",
                    "email": detail.email,
                    "custom:account_id": detail.account_id,
                    "custom:account_created": account_created
                }
            });
        }

        event
    }
}
