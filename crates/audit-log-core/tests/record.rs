mod common;

use audit_log_core::record::{AuditRecord, DEFAULT_LOGGER_NAME, LogLevel};
use common::{FakeRequest, FakeResponse};

#[test]
fn new_record_is_empty() {
    let record = AuditRecord::default();

    assert_eq!(record.logger_name, DEFAULT_LOGGER_NAME);
    assert_eq!(record.level, LogLevel::Info);
    assert!(record.http_request.is_none());
    assert!(record.http_response.is_none());
    assert!(record.user.is_none());
}

#[test]
fn request_fields_copied_from_request() {
    let request = FakeRequest::get("http://localhost/foo/bar?querystr=value")
        .header("User-Agent", "test_agent");

    let mut record = AuditRecord::default();
    record.set_request_from(&request);

    let http_request = record.http_request.expect("request recorded");
    assert_eq!(http_request.method, "GET");
    assert_eq!(http_request.url, "http://localhost/foo/bar?querystr=value");
    assert_eq!(http_request.user_agent, "test_agent");
}

#[test]
fn missing_user_agent_recorded_as_question_mark() {
    let request = FakeRequest::new("POST", "http://localhost/items");

    let mut record = AuditRecord::default();
    record.set_request_from(&request);

    assert_eq!(record.http_request.unwrap().user_agent, "?");
}

#[test]
fn user_fields_assigned() {
    let mut record = AuditRecord::default();
    record.set_user(
        true,
        "keycloak",
        "datapunt",
        "user@test.nl",
        vec!["admin".to_string()],
        None,
    );

    let user = record.user.expect("user recorded");
    assert!(user.authenticated);
    assert_eq!(user.provider, "keycloak");
    assert_eq!(user.realm, "datapunt");
    assert_eq!(user.email, "user@test.nl");
    assert_eq!(user.roles, vec!["admin"]);
    assert_eq!(user.ip, None);
}

#[test]
fn response_headers_all_preserved() {
    let response = FakeResponse::new(404, "404 Not Found")
        .header("Header1", "value1")
        .header("Header2", "value2")
        .header("Header3", "value3")
        .header("content-type", "text/plain");

    let mut record = AuditRecord::default();
    record.set_response_from(&response);

    let http_response = record.http_response.expect("response recorded");
    assert_eq!(http_response.status_code, Some(404));
    assert_eq!(http_response.reason, "404 Not Found");
    for (name, value) in &response.headers {
        assert_eq!(http_response.headers.get(name), Some(value));
    }
}

#[test]
fn response_without_status_or_reason_defaults_to_empty() {
    let mut record = AuditRecord::default();
    record.set_response_from(&FakeResponse::default());

    let http_response = record.http_response.unwrap();
    assert_eq!(http_response.status_code, None);
    assert_eq!(http_response.reason, "");
    assert!(http_response.headers.is_empty());
}

#[test]
fn level_setters_replace_message() {
    let mut record = AuditRecord::default();
    record.info("listed items").warning("partial results");

    assert_eq!(record.level, LogLevel::Warning);
    assert_eq!(record.message, "partial results");
}

#[test]
fn serialized_record_shape() {
    let mut record = AuditRecord::new("custom");
    record.set_request("GET", "http://localhost/", "curl");
    record.set_user(false, "", "", "", Vec::new(), Some("127.0.0.1".to_string()));
    record.set_filter("item", "name", "foo");
    record.set_results(vec![serde_json::json!({"id": 1})]);
    record.set_authorization(true, "user@test.nl", vec!["items:read".to_string()]);
    record.critical("it broke");

    let value = serde_json::to_value(&record).unwrap();

    assert_eq!(value["logger"], "custom");
    assert_eq!(value["type"], "CRITICAL");
    assert_eq!(value["message"], "it broke");
    assert_eq!(value["http_request"]["user_agent"], "curl");
    assert!(value["http_response"].is_null());
    assert_eq!(value["user"]["ip"], "127.0.0.1");
    assert_eq!(value["user"]["roles"], serde_json::json!([]));
    assert_eq!(value["filter"]["terms"], "foo");
    assert_eq!(value["results"][0]["id"], 1);
    assert_eq!(value["authorization"]["scopes"][0], "items:read");
}

#[test]
fn optional_sections_omitted_when_unset() {
    let value = serde_json::to_value(AuditRecord::default()).unwrap();
    let object = value.as_object().unwrap();

    assert!(!object.contains_key("filter"));
    assert!(!object.contains_key("results"));
    assert!(!object.contains_key("authorization"));
}
