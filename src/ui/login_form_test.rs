use super::{extract_error_message, LoginForm, FALLBACK_ERROR_MESSAGE};
use crate::api::endpoints::Role;
use crate::error::ClientError;
use serde_json::json;

fn api_error(status: u16, data: serde_json::Value) -> ClientError {
    let message = crate::api::body::error_message(&data, status);
    ClientError::Api {
        message,
        status,
        data,
    }
}

#[test]
fn test_login_form_defaults() {
    let form = LoginForm::new();
    assert_eq!(form.role, Role::Patient);
    assert!(form.email.is_empty());
    assert!(form.password.is_empty());
    assert!(!form.loading);
    assert!(form.error.is_none());
    assert!(form.success.is_none());
}

#[test]
fn test_credentials_carry_form_fields() {
    let form = LoginForm {
        role: Role::Doctor,
        email: "doc@clinic.test".to_string(),
        password: "pw".to_string(),
        ..Default::default()
    };

    let body = serde_json::to_value(form.credentials()).unwrap();
    assert_eq!(
        body,
        json!({"email": "doc@clinic.test", "password": "pw", "role": "doctor"})
    );
}

#[test]
fn test_extract_validation_detail_message() {
    let err = api_error(
        422,
        json!({"detail": [{"loc": ["body", "email"], "msg": "value is not a valid email address", "type": "value_error"}]}),
    );
    assert_eq!(extract_error_message(&err), "value is not a valid email address");
}

#[test]
fn test_extract_joins_multiple_details() {
    let err = api_error(
        422,
        json!({"detail": [{"msg": "field required"}, {"msg": "value is not a valid email address"}]}),
    );
    assert_eq!(
        extract_error_message(&err),
        "field required, value is not a valid email address"
    );
}

#[test]
fn test_extract_string_detail_uses_error_message() {
    let err = api_error(401, json!({"detail": "Invalid credentials or role"}));
    assert_eq!(extract_error_message(&err), "Request failed with 401");
}

#[test]
fn test_extract_uses_message_field() {
    let err = api_error(503, json!({"message": "Service Unavailable"}));
    assert_eq!(extract_error_message(&err), "Service Unavailable");
}

#[test]
fn test_extract_non_api_error() {
    let err = ClientError::MissingRefreshToken;
    assert_eq!(extract_error_message(&err), err.to_string());
}

#[test]
fn test_extract_falls_back_on_blank_message() {
    let err = ClientError::Other(String::new());
    assert_eq!(extract_error_message(&err), FALLBACK_ERROR_MESSAGE);
}
