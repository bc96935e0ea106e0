mod common;

use serde_json::json;

use common::{FakeWhatagraph, FixedResponse};
use target_whatagraph::ExportError;
use target_whatagraph::api::{ApiResponse, Method, WhatagraphClient};
use target_whatagraph::observability::NoopObserver;
use target_whatagraph::purge::purge;
use target_whatagraph::report::Operation;

#[test]
fn purge_deletes_every_listed_record() {
    let fake = FakeWhatagraph::new();
    fake.source_data
        .borrow_mut()
        .extend([json!({"clicks": 1}), json!({"clicks": 2})]);

    let report = purge(&WhatagraphClient::new(&fake), &NoopObserver).unwrap();
    assert_eq!(report.listed, 2);
    assert_eq!(report.deleted, 2);
    assert_eq!(
        fake.request_lines(),
        vec![
            "GET /v1/integration-source-data",
            "DELETE /v1/integration-source-data/1",
            "DELETE /v1/integration-source-data/2",
        ]
    );
    assert!(fake.requests().iter().all(|r| r.body.is_none()));
}

#[test]
fn failed_listing_deletes_nothing() {
    let fake = FakeWhatagraph::new().failing(Method::Get, "/v1/integration-source-data", 503);
    let report = purge(&WhatagraphClient::new(&fake), &NoopObserver).unwrap();

    assert_eq!(report.deleted, 0);
    assert_eq!(report.soft_failures.len(), 1);
    assert_eq!(report.soft_failures[0].operation, Operation::ListSourceData);
    assert_eq!(fake.request_lines().len(), 1);
}

#[test]
fn failed_delete_is_soft_and_later_deletes_continue() {
    let fake = FakeWhatagraph::new().failing(Method::Delete, "/v1/integration-source-data/1", 404);
    fake.source_data
        .borrow_mut()
        .extend([json!({"clicks": 1}), json!({"clicks": 2})]);

    let report = purge(&WhatagraphClient::new(&fake), &NoopObserver).unwrap();
    assert_eq!(report.deleted, 1);
    assert_eq!(
        report.soft_failures[0].operation,
        Operation::DeleteSourceData { id: "1".to_string() }
    );
}

#[test]
fn record_without_id_aborts_the_purge() {
    let client = WhatagraphClient::new(FixedResponse(ApiResponse::new(
        200,
        r#"{"data": [{"id": "abc"}, {"name": "no id"}]}"#,
    )));
    let err = purge(&client, &NoopObserver).unwrap_err();
    assert!(matches!(err, ExportError::MalformedResponse { .. }));
    assert!(err.to_string().contains("record without an id"));
}
