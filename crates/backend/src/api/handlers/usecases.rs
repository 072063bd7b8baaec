use axum::{extract::Path, http::StatusCode, Json};
use once_cell::sync::OnceCell;
use std::sync::Arc;

use contracts::usecases::u508_import_translations::{ImportProgress, ImportRequest, ImportResponse};

use crate::usecases;

// ============================================================================
// UseCase u508: Import translations
// ============================================================================

static TRANSLATION_IMPORT_EXECUTOR: OnceCell<
    Arc<usecases::u508_import_translations::ImportExecutor>,
> = OnceCell::new();

/// Зарегистрировать executor (вызывается один раз при старте)
pub fn init_u508(executor: Arc<usecases::u508_import_translations::ImportExecutor>) {
    if TRANSLATION_IMPORT_EXECUTOR.set(executor).is_err() {
        tracing::warn!("u508 import executor is already initialized");
    }
}

fn u508_executor(
) -> Result<&'static Arc<usecases::u508_import_translations::ImportExecutor>, StatusCode> {
    TRANSLATION_IMPORT_EXECUTOR.get().ok_or_else(|| {
        tracing::error!("u508 import executor is not initialized");
        StatusCode::SERVICE_UNAVAILABLE
    })
}

/// POST /api/u508/import/start
pub async fn u508_start_import(
    Json(request): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, (StatusCode, String)> {
    let executor = u508_executor().map_err(|s| (s, String::new()))?;
    match executor.start_import(request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::warn!("Rejected translation import: {}", e);
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

/// GET /api/u508/import/:session_id/progress
pub async fn u508_get_progress(
    Path(session_id): Path<String>,
) -> Result<Json<ImportProgress>, StatusCode> {
    match u508_executor()?.get_progress(&session_id) {
        Some(progress) => Ok(Json(progress)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// POST /api/u508/import/:session_id/cancel
pub async fn u508_cancel_import(Path(session_id): Path<String>) -> StatusCode {
    match u508_executor() {
        Ok(executor) if executor.cancel_import(&session_id) => StatusCode::NO_CONTENT,
        Ok(_) => StatusCode::NOT_FOUND,
        Err(status) => status,
    }
}
