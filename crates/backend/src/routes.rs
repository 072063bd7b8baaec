use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u508_import_translations::ImportTranslations;

use crate::api::handlers::usecases;

/// Конфигурация всех роутов приложения.
///
/// `max_request_bytes` ограничивает тело запроса на запуск импорта:
/// вся книга переводов приходит одним JSON.
pub fn configure_routes(max_request_bytes: usize) -> Router {
    let u508 = ImportTranslations::route_prefix();

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // U508 IMPORT TRANSLATIONS
        // ========================================
        .route(
            &format!("{}/import/start", u508),
            post(usecases::u508_start_import).layer(DefaultBodyLimit::max(max_request_bytes)),
        )
        .route(
            &format!("{}/import/:session_id/progress", u508),
            get(usecases::u508_get_progress),
        )
        .route(
            &format!("{}/import/:session_id/cancel", u508),
            post(usecases::u508_cancel_import),
        )
}
