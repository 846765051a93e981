//! Demo entry-point: runs the repository and service layers against the
//! in-memory record model and logs every outcome.

use std::sync::Arc;

use color_eyre::eyre::{Result, eyre};
use ortho_config::OrthoConfig;
use serde_json::{Value, json};
use tracing::{info, warn};
use tracing_subscriber::fmt;

use crudkit::config::TelemetrySettings;
use crudkit::domain::ValidationIssue;
use crudkit::outbound::memory::{DocumentFilter, InMemoryRecordModel};
use crudkit::{CrudService, Error, Repository, ServiceOptions};

fn require_name(data: &Value) -> Result<(), ValidationIssue> {
    match data.get("name").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => Ok(()),
        _ => Err(ValidationIssue::new("name required")),
    }
}

fn init_tracing(settings: &TelemetrySettings) -> Result<()> {
    let filter = settings.env_filter()?;
    let installed = if settings.json_logs {
        fmt().with_env_filter(filter).json().try_init()
    } else {
        fmt().with_env_filter(filter).try_init()
    };
    if let Err(e) = installed {
        warn!(error = %e, "tracing init failed");
    }
    Ok(())
}

fn log_outcome<T: std::fmt::Debug>(step: &str, outcome: &Result<T, Error>) {
    match outcome {
        Ok(value) => info!(step, ?value, "operation succeeded"),
        Err(error) => info!(
            step,
            status_code = error.status_code(),
            error = error.message(),
            "operation failed"
        ),
    }
}

/// Application bootstrap.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let settings = TelemetrySettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load telemetry settings: {err}"))?;
    init_tracing(&settings)?;

    let model = Arc::new(InMemoryRecordModel::seeded([json!({ "id": "1", "name": "A" })])?);
    let repository = Arc::new(Repository::new(Arc::clone(&model)));
    let service = CrudService::new(
        Arc::clone(&repository),
        ServiceOptions::default()
            .with_create_validator(require_name)
            .with_update_validator(require_name),
    );

    log_outcome("get existing", &service.get(&"1".to_owned()).await);
    log_outcome("get missing", &service.get(&"2".to_owned()).await);
    log_outcome("create invalid", &service.create(json!({ "name": "" })).await);
    log_outcome("create valid", &service.create(json!({ "name": "B" })).await);
    log_outcome(
        "update missing",
        &service.update(&"9".to_owned(), json!({ "name": "B" })).await,
    );
    log_outcome(
        "count named B",
        &service
            .count(Some(DocumentFilter::default().with("name", "B")))
            .await,
    );
    log_outcome("exists", &service.exists(None).await);

    model.set_offline(true);
    log_outcome("get all while offline", &service.get_all().await);

    Ok(())
}
