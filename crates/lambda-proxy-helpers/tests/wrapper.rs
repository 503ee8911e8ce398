//! End-to-end tests: synthetic gateway event in, response envelope out.

use http::StatusCode;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use lambda_proxy_helpers::test_utils::{CognitoDetail, TestProxyEvent};
use lambda_proxy_helpers::{
    wrap, Error, FunctionResult, HandlerError, Payload, ProxyEvent, ResponseEnvelope,
};

fn body_json(envelope: &ResponseEnvelope) -> Value {
    serde_json::from_str(envelope.body.as_deref().expect("body present")).expect("valid JSON")
}

fn assert_error_body(envelope: &ResponseEnvelope, status: u16, message: &str, error_type: &str) {
    assert_eq!(envelope.status_code, status);
    let body = body_json(envelope);
    assert!(
        body["error"].as_str().expect("error message").contains(message),
        "unexpected error message: {body}"
    );
    assert_eq!(body["errorType"], json!(error_type));
}

#[test]
fn not_found_error_response() {
    let wrapped = wrap(|_event: Value| {
        Err(Error::NotFound("Invalid user or user not found".to_string()).into())
    });
    let envelope = wrapped(TestProxyEvent::new().build());
    assert_error_body(&envelope, 404, "Invalid user", "Not Found Error");
}

#[test]
fn missing_param_error_response() {
    let wrapped = wrap(|_event: Value| {
        Err(Error::MissingParameter("Parameter X is missing".to_string()).into())
    });
    let envelope = wrapped(TestProxyEvent::new().build());
    assert_error_body(&envelope, 400, "X is missing", "Missing Parameter Error");
}

#[test]
fn invalid_param_error_response() {
    let wrapped = wrap(|_event: Value| {
        Err(Error::InvalidParameter("Param X is invalid or missing".to_string()).into())
    });
    let envelope = wrapped(TestProxyEvent::new().build());
    assert_error_body(&envelope, 400, "invalid or missing", "Invalid Parameter Error");
}

#[test]
fn record_exists_error_response() {
    let wrapped = wrap(|_event: Value| {
        Err(Error::AlreadyExists("Record already exists".to_string()).into())
    });
    let envelope = wrapped(TestProxyEvent::new().build());
    assert_error_body(&envelope, 400, "already exists", "Object Already Exists Error");
}

#[test]
fn related_records_exist_error_response() {
    let wrapped = wrap(|_event: Value| {
        Err(
            Error::RelatedRecordsExist(
                "Record cannot be deleted as related records exist".to_string(),
            )
            .into(),
        )
    });
    let envelope = wrapped(TestProxyEvent::new().build());
    assert_error_body(&envelope, 400, "cannot be deleted", "Related Records Exist Error");
}

#[test]
fn validation_error_response() {
    let wrapped = wrap(|_event: Value| {
        Err(Error::Validation("Was unable to validate the input parameter".to_string()).into())
    });
    let envelope = wrapped(TestProxyEvent::new().build());
    assert_error_body(&envelope, 400, "unable to validate", "Validation Error");
}

#[test]
fn invalid_function_request_error_response() {
    let wrapped = wrap(|_event: Value| {
        Err(
            Error::InvalidFunctionRequest("Cannot determine the function to execute".to_string())
                .into(),
        )
    });
    let envelope = wrapped(TestProxyEvent::new().build());
    assert_error_body(
        &envelope,
        400,
        "determine the function",
        "Invalid Function Request Error",
    );
}

#[test]
fn invalid_user_error_response() {
    let wrapped = wrap(|_event: Value| {
        Err(Error::InvalidUser("User is invalid or user cannot be found".to_string()).into())
    });
    let envelope = wrapped(TestProxyEvent::new().build());
    assert_error_body(&envelope, 400, "is invalid or user", "Invalid User Error");
}

#[test]
fn general_error_response() {
    let wrapped =
        wrap(|_event: Value| Err(Error::general("A general error was raised").into()));
    let envelope = wrapped(TestProxyEvent::new().build());
    assert_error_body(&envelope, 500, "general error was raised", "General Error");
}

#[test]
fn unhandled_error_response() {
    let wrapped = wrap(|_event: Value| {
        let parsed: i32 = "oops".parse()?;
        Ok(FunctionResult::ok(json!({"parsed": parsed})))
    });
    let envelope = wrapped(TestProxyEvent::new().build());
    assert_eq!(envelope.status_code, 500);
    let body = body_json(&envelope);
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("unhandled exception"));
    assert_eq!(body["errorType"], json!("ParseIntError"));
}

#[test]
fn auth_failure_surfaces_through_the_wrapper() {
    let wrapped = wrap(|event: Value| {
        let mut parsed = ProxyEvent::new(event)?;
        parsed.validate_auth(true)?;
        Ok(FunctionResult::ok(json!({"user": parsed.user_id()})))
    });

    // No authorizer block on the event.
    let envelope = wrapped(TestProxyEvent::new().build());
    assert_error_body(&envelope, 400, "User invalid", "Invalid User Error");
}

#[test]
fn full_pipeline_success() {
    let wrapped = wrap(|event: Value| -> Result<FunctionResult, HandlerError> {
        let mut parsed = ProxyEvent::new(event)?;
        parsed.validate_auth(true)?;
        let widget_id = parsed.path_param("id")?;
        let name = parsed
            .body_prop("name")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::MissingParameter("name not found in body".to_string()))?
            .to_string();

        Ok(FunctionResult::ok(json!({
            "id": widget_id,
            "name": name,
            "owner": parsed.user_id(),
        })))
    });

    let event = TestProxyEvent::new()
        .method("PUT")
        .resource("/widgets/{id}")
        .path("/widgets/42")
        .path_params(json!({"id": "42"}))
        .body(json!({"name": "flux capacitor"}))
        .cognito(CognitoDetail {
            user_id: "abcdefg".to_string(),
            email: "someone@email.com".to_string(),
            account_id: "123456".to_string(),
            account_created: true,
        })
        .build();

    let envelope = wrapped(event);
    assert_eq!(envelope.status_code, 200);
    assert_eq!(
        body_json(&envelope),
        json!({"id": "42", "name": "flux capacitor", "owner": "abcdefg"})
    );
    assert_eq!(
        envelope.headers.get("Content-Type"),
        Some(&json!("application/json"))
    );
}

#[test]
fn full_pipeline_missing_path_param() {
    let wrapped = wrap(|event: Value| -> Result<FunctionResult, HandlerError> {
        let parsed = ProxyEvent::new(event)?;
        let widget_id = parsed.path_param("id")?;
        Ok(FunctionResult::ok(json!({"id": widget_id})))
    });

    let envelope = wrapped(TestProxyEvent::new().build());
    assert_error_body(&envelope, 400, "id not found", "Missing Parameter Error");
}

#[test]
fn created_response_carries_location() {
    let wrapped = wrap(|_event: Value| {
        Ok(FunctionResult::new(
            StatusCode::CREATED,
            None,
            Some("http://x/1".to_string()),
        ))
    });

    let envelope = wrapped(TestProxyEvent::new().build());
    assert_eq!(envelope.status_code, 201);
    assert_eq!(envelope.headers.get("Location"), Some(&json!("http://x/1")));
    assert!(envelope.body.is_none());
}

#[test]
fn mixed_payload_coerces_cleanly() {
    let wrapped = wrap(|_event: Value| {
        let pi: Decimal = "3.14159265359".parse()?;
        let count: Decimal = "12345".parse()?;
        let payload = Payload::from(json!({
            "test_string": "abcedfgh",
            "test_bool": true,
        }));
        let payload = match payload {
            Payload::Object(mut entries) => {
                entries.insert("test_decimal".to_string(), Payload::Decimal(pi));
                entries.insert("test_int".to_string(), Payload::Decimal(count));
                Payload::Object(entries)
            }
            other => other,
        };
        Ok(FunctionResult::ok(payload))
    });

    let envelope = wrapped(TestProxyEvent::new().build());
    assert_eq!(envelope.status_code, 200);
    let body = body_json(&envelope);
    assert_eq!(body["test_string"], json!("abcedfgh"));
    assert_eq!(body["test_bool"], json!(true));
    assert_eq!(body["test_decimal"], json!(3.14159265359));
    assert_eq!(body["test_int"], json!(12345));
}

#[test]
fn string_payload_is_not_double_encoded() {
    let wrapped = wrap(|_event: Value| Ok(FunctionResult::ok("pong")));
    let envelope = wrapped(TestProxyEvent::new().build());
    assert_eq!(envelope.body.as_deref(), Some("pong"));
}
