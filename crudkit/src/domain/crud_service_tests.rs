//! Tests for the CRUD service.

use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockCrudRepository, MockRecordModel, RecordModelError};
use crate::domain::{ErrorCode, Repository, ValidationIssue};
use crate::test_support::RecordingDiagnosticSink;

fn require_name(data: &Value) -> Result<(), ValidationIssue> {
    match data.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => Ok(()),
        _ => Err(ValidationIssue::new("name required")),
    }
}

fn unreachable_cache<T>() -> Result<T, RepositoryFailure> {
    Err(RepositoryFailure::unexpected("cache node unreachable"))
}

#[fixture]
fn sink() -> Arc<RecordingDiagnosticSink> {
    Arc::new(RecordingDiagnosticSink::default())
}

#[fixture]
fn validated() -> ServiceOptions<Value> {
    ServiceOptions::default()
        .with_create_validator(require_name)
        .with_update_validator(require_name)
}

fn make_service(
    repository: MockCrudRepository,
    options: ServiceOptions<Value>,
    sink: &Arc<RecordingDiagnosticSink>,
) -> CrudService<MockCrudRepository> {
    CrudService::new(Arc::new(repository), options).with_diagnostics(sink.clone())
}

#[rstest]
#[tokio::test]
async fn create_rejects_invalid_payload_without_touching_repository(
    sink: Arc<RecordingDiagnosticSink>,
    validated: ServiceOptions<Value>,
) {
    let mut repository = MockCrudRepository::new();
    repository.expect_create().times(0);

    let service = make_service(repository, validated, &sink);
    let error = service
        .create(json!({ "name": "" }))
        .await
        .expect_err("validation fails");

    assert_eq!(error, Error::validation_failed("name required"));
    assert_eq!(error.status_code(), 422);
    assert_eq!(
        sink.dispositions(),
        vec![(Layer::Service, Disposition::Rejected)]
    );
}

#[rstest]
#[tokio::test]
async fn update_rejects_invalid_payload_without_touching_repository(
    sink: Arc<RecordingDiagnosticSink>,
    validated: ServiceOptions<Value>,
) {
    let mut repository = MockCrudRepository::new();
    repository.expect_update().times(0);

    let service = make_service(repository, validated, &sink);
    let error = service
        .update(&"1".to_owned(), json!({}))
        .await
        .expect_err("validation fails");

    assert_eq!(error.code(), ErrorCode::ValidationFailed);
    assert_eq!(error.message(), "name required");
}

#[rstest]
#[tokio::test]
async fn create_delegates_accepted_payload(
    sink: Arc<RecordingDiagnosticSink>,
    validated: ServiceOptions<Value>,
) {
    let mut repository = MockCrudRepository::new();
    repository
        .expect_create()
        .withf(|data: &Value| data == &json!({ "name": "A" }))
        .times(1)
        .return_once(|_| Ok(json!({ "id": "1", "name": "A" })));

    let service = make_service(repository, validated, &sink);
    let created = service
        .create(json!({ "name": "A" }))
        .await
        .expect("create succeeds");

    assert_eq!(created, json!({ "id": "1", "name": "A" }));
    assert!(sink.events().is_empty());
}

#[rstest]
#[tokio::test]
async fn update_without_validator_delegates(sink: Arc<RecordingDiagnosticSink>) {
    let mut repository = MockCrudRepository::new();
    repository
        .expect_update()
        .withf(|id: &String, _: &Value| id == "1")
        .times(1)
        .return_once(|_, data| Ok(data));

    let service = make_service(repository, ServiceOptions::default(), &sink);
    let updated = service
        .update(&"1".to_owned(), json!({ "name": "" }))
        .await
        .expect("no validator configured");

    assert_eq!(updated, json!({ "name": "" }));
}

#[rstest]
#[tokio::test]
async fn blank_validator_message_still_yields_validation_error(
    sink: Arc<RecordingDiagnosticSink>,
) {
    let mut repository = MockCrudRepository::new();
    repository.expect_create().times(0);
    let options =
        ServiceOptions::default().with_create_validator(|_: &Value| Err(ValidationIssue::new(" ")));

    let service = make_service(repository, options, &sink);
    let error = service.create(json!({})).await.expect_err("rejected");

    assert_eq!(error.status_code(), 422);
    assert_eq!(error.message(), "Validation failed");
}

#[rstest]
#[tokio::test]
async fn classified_errors_pass_through_unchanged(sink: Arc<RecordingDiagnosticSink>) {
    let not_found = Error::not_found("Resource not found to update with id: 9");
    let returned = not_found.clone();
    let mut repository = MockCrudRepository::new();
    repository
        .expect_update()
        .times(1)
        .return_once(move |_, _| Err(RepositoryFailure::classified(returned)));

    let service = make_service(repository, ServiceOptions::default(), &sink);
    let error = service
        .update(&"9".to_owned(), json!({ "name": "B" }))
        .await
        .expect_err("not found");

    assert_eq!(error, not_found);
    assert_eq!(
        sink.dispositions(),
        vec![(Layer::Service, Disposition::Propagated)]
    );
}

#[rstest]
#[case::get_all(Operation::GetAll, "Something went wrong while fetching resources")]
#[case::insert_many(Operation::InsertMany, "Something went wrong while inserting data")]
#[case::count(Operation::Count, "Something went wrong while counting documents")]
#[case::exists(Operation::Exists, "Something went wrong while checking existence")]
#[tokio::test]
async fn unexpected_failures_become_internal_errors(
    sink: Arc<RecordingDiagnosticSink>,
    #[case] operation: Operation,
    #[case] expected: &str,
) {
    let mut repository = MockCrudRepository::new();
    repository.expect_get_all().returning(|| unreachable_cache());
    repository.expect_insert_many().returning(|_| unreachable_cache());
    repository.expect_count().returning(|_| unreachable_cache());
    repository.expect_exists().returning(|_| unreachable_cache());

    let service = make_service(repository, ServiceOptions::default(), &sink);
    let error = match operation {
        Operation::GetAll => service.get_all().await.map(|_| ()),
        Operation::InsertMany => service.insert_many(vec![json!({})]).await.map(|_| ()),
        Operation::Count => service.count(None).await.map(|_| ()),
        _ => service.exists(None).await.map(|_| ()),
    }
    .expect_err("unexpected failure");

    assert_eq!(error, Error::internal(expected));
    let events = sink.events_for(Layer::Service, operation);
    let event = events.first().expect("conversion recorded");
    assert_eq!(event.disposition, Disposition::Converted);
    assert_eq!(event.detail, "cache node unreachable");
}

#[rstest]
#[tokio::test]
async fn get_and_delete_convert_unexpected_failures(sink: Arc<RecordingDiagnosticSink>) {
    let mut repository = MockCrudRepository::new();
    repository
        .expect_get()
        .times(1)
        .return_once(|_| Err(RepositoryFailure::unexpected("timeout")));
    repository
        .expect_delete()
        .times(1)
        .return_once(|_| Err(RepositoryFailure::unexpected("timeout")));

    let service = make_service(repository, ServiceOptions::default(), &sink);
    let id = "1".to_owned();

    let get_error = service.get(&id).await.expect_err("get fails");
    let delete_error = service.delete(&id).await.expect_err("delete fails");

    assert_eq!(get_error.message(), "Something went wrong while fetching resource");
    assert_eq!(delete_error.message(), "Something went wrong while deleting resource");
}

#[rstest]
#[tokio::test]
async fn count_and_exists_forward_missing_filters(sink: Arc<RecordingDiagnosticSink>) {
    let mut repository = MockCrudRepository::new();
    repository
        .expect_count()
        .withf(Option::is_none)
        .times(1)
        .return_once(|_| Ok(7));
    repository
        .expect_exists()
        .withf(Option::is_none)
        .times(1)
        .return_once(|_| Ok(Some(true)));

    let service = make_service(repository, ServiceOptions::default(), &sink);

    assert_eq!(service.count(None).await.expect("count"), 7);
    assert_eq!(service.exists(None).await.expect("exists"), Some(true));
}

#[rstest]
#[tokio::test]
async fn missing_update_through_repository_stays_not_found(sink: Arc<RecordingDiagnosticSink>) {
    let mut model = MockRecordModel::new();
    model
        .expect_find_by_id_and_update()
        .times(1)
        .return_once(|_, _| Ok(None));
    let repository = Repository::new(Arc::new(model)).with_diagnostics(sink.clone());

    let service = CrudService::new(Arc::new(repository), ServiceOptions::default())
        .with_diagnostics(sink.clone());
    let error = service
        .update(&"9".to_owned(), json!({ "name": "B" }))
        .await
        .expect_err("not found");

    assert_eq!(error.status_code(), 404);
    assert!(error.message().contains('9'));
    assert_eq!(
        sink.dispositions(),
        vec![
            (Layer::Repository, Disposition::Rejected),
            (Layer::Service, Disposition::Propagated),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn backend_fault_surfaces_repository_message(
    sink: Arc<RecordingDiagnosticSink>,
    validated: ServiceOptions<Value>,
) {
    let mut model = MockRecordModel::new();
    model
        .expect_create()
        .times(1)
        .return_once(|_| Err(RecordModelError::connection("refused")));
    let repository = Repository::new(Arc::new(model)).with_diagnostics(sink.clone());

    let service = CrudService::new(Arc::new(repository), validated)
        .with_diagnostics(sink.clone());
    let error = service
        .create(json!({ "name": "A" }))
        .await
        .expect_err("backend fault");

    assert_eq!(error, Error::internal("Failed to create resource"));
}

#[rstest]
#[tokio::test]
async fn silent_diagnostics_leave_outcomes_unchanged(validated: ServiceOptions<Value>) {
    let mut repository = MockCrudRepository::new();
    repository.expect_create().times(0);
    repository
        .expect_get()
        .returning(|_| Err(RepositoryFailure::from(Error::not_found("gone"))));

    let service = CrudService::new(Arc::new(repository), validated)
        .with_diagnostics(Arc::new(crate::domain::ports::NoOpDiagnosticSink));

    assert_eq!(
        service.create(json!({ "name": "" })).await,
        Err(Error::validation_failed("name required"))
    );
    assert_eq!(
        service.get(&"7".to_owned()).await,
        Err(Error::not_found("gone"))
    );
}
