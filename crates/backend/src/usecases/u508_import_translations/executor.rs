use super::batch_accumulator::BatchAccumulator;
use super::batch_executor::{BatchExecutor, RunOutcome};
use super::metadata_client::MetadataService;
use super::progress_tracker::ProgressTracker;
use contracts::usecases::common::{UseCaseError, UseCaseResult};
use contracts::usecases::u508_import_translations::{
    ImportProgress, ImportRequest, ImportResponse, ImportStartStatus, ImportStatus, LogLevel,
    SheetOperations, TranslationLogEntry, TranslationProgress, TranslationResult,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Executor для UseCase импорта переводов
#[derive(Clone)]
pub struct ImportExecutor {
    service: Arc<dyn MetadataService>,
    pub progress_tracker: Arc<ProgressTracker>,
    batch_size: usize,
    session_max_age_hours: i64,
}

impl ImportExecutor {
    pub fn new(
        service: Arc<dyn MetadataService>,
        progress_tracker: Arc<ProgressTracker>,
        batch_size: usize,
        session_max_age_hours: i64,
    ) -> Self {
        Self {
            service,
            progress_tracker,
            batch_size,
            session_max_age_hours,
        }
    }

    /// Запустить импорт (создаёт async task и возвращает session_id)
    pub async fn start_import(&self, request: ImportRequest) -> UseCaseResult<ImportResponse> {
        validate(&request)?;

        self.progress_tracker
            .cleanup_old_sessions(self.session_max_age_hours);

        let session_id = Uuid::new_v4().to_string();
        let cancel = self.progress_tracker.create_session(session_id.clone());
        let total = request.total_operations();

        tracing::info!(
            "Starting translation import {}: {} sheets, {} operations",
            session_id,
            request.sheets.len(),
            total
        );

        let executor = Arc::new(self.clone());
        let sid = session_id.clone();

        tokio::spawn(async move {
            let tracker = executor.progress_tracker.clone();
            let task_sid = sid.clone();
            let handle =
                tokio::spawn(async move { executor.run_import(&task_sid, request, cancel).await });

            if let Err(e) = handle.await {
                tracing::error!("Translation import {} aborted: {}", sid, e);
                tracker.add_log(
                    &sid,
                    TranslationLogEntry::error(format!("Import failed: {}", e)),
                );
                tracker.complete_session(&sid, ImportStatus::Failed);
            }
        });

        Ok(ImportResponse {
            session_id,
            status: ImportStartStatus::Started,
            message: format!("Импорт запущен для {} меток", total),
        })
    }

    /// Получить прогресс сессии
    pub fn get_progress(&self, session_id: &str) -> Option<ImportProgress> {
        self.progress_tracker.get_progress(session_id)
    }

    /// Запросить остановку импорта после текущего пакета
    pub fn cancel_import(&self, session_id: &str) -> bool {
        let found = self.progress_tracker.request_cancel(session_id);
        if found {
            tracing::info!("Cancellation requested for translation import {}", session_id);
        }
        found
    }

    /// Выполнить импорт (фоновая задача). Листы обрабатываются по очереди.
    pub async fn run_import(
        &self,
        session_id: &str,
        request: ImportRequest,
        cancel: CancellationToken,
    ) -> ImportStatus {
        let mut cancelled = false;
        let mut has_failures = false;

        for sheet in request.sheets {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let (result, outcome) = self.import_sheet(session_id, sheet, &cancel).await;
            has_failures |= result.progress.failure_count > 0;
            self.progress_tracker.finish_sheet(session_id, result);

            if matches!(outcome, RunOutcome::Cancelled { .. }) {
                cancelled = true;
                break;
            }
        }

        let status = if cancelled {
            ImportStatus::Cancelled
        } else if has_failures {
            ImportStatus::CompletedWithErrors
        } else {
            ImportStatus::Completed
        };

        if cancelled {
            self.log(session_id, TranslationLogEntry::warning("Import cancelled"));
        }
        self.progress_tracker.complete_session(session_id, status);

        if let Some(p) = self.progress_tracker.get_progress(session_id) {
            tracing::info!(
                "Translation import {} finished ({:?}): total={}, success={}, failed={}",
                session_id,
                status,
                p.total_items,
                p.success_count,
                p.failure_count
            );
        }

        status
    }

    async fn import_sheet(
        &self,
        session_id: &str,
        sheet: SheetOperations,
        cancel: &CancellationToken,
    ) -> (TranslationResult, RunOutcome) {
        let sheet_name = sheet.sheet_name;
        let mut progress = TranslationProgress::new(sheet_name.clone());
        self.progress_tracker.begin_sheet(session_id, &sheet_name);

        if sheet.operations.is_empty() {
            self.log(
                session_id,
                TranslationLogEntry::warning(format!(
                    "Sheet '{}' has no labels to import",
                    sheet_name
                )),
            );
            let result = TranslationResult {
                sheet_name,
                success: true,
                message: "Nothing to import".to_string(),
                progress,
            };
            return (result, RunOutcome::Completed);
        }

        self.log(
            session_id,
            TranslationLogEntry::info(format!(
                "Importing {} labels from sheet '{}'",
                sheet.operations.len(),
                sheet_name
            )),
        );

        let mut accumulator = BatchAccumulator::new(self.batch_size);
        accumulator.extend(sheet.operations);
        let queue = accumulator.flush();

        let tracker = &self.progress_tracker;
        let outcome = BatchExecutor::new(self.service.clone())
            .run(
                queue,
                &mut progress,
                |entry| self.log(session_id, entry),
                |p| tracker.update_sheet(session_id, p),
                cancel,
            )
            .await;

        let message = match outcome {
            RunOutcome::Completed => format!(
                "{} labels processed: {} updated, {} failed",
                progress.total_items, progress.success_count, progress.failure_count
            ),
            RunOutcome::Cancelled { skipped_items, .. } => format!(
                "Cancelled: {} updated, {} failed, {} not submitted",
                progress.success_count, progress.failure_count, skipped_items
            ),
        };

        let result = TranslationResult {
            sheet_name,
            success: progress.failure_count == 0 && outcome == RunOutcome::Completed,
            message,
            progress,
        };
        (result, outcome)
    }

    fn log(&self, session_id: &str, entry: TranslationLogEntry) {
        match entry.level {
            LogLevel::Info => tracing::info!("[{}] {}", session_id, entry.message),
            LogLevel::Warning => tracing::warn!("[{}] {}", session_id, entry.message),
            LogLevel::Error => tracing::error!("[{}] {}", session_id, entry.message),
        }
        self.progress_tracker.add_log(session_id, entry);
    }
}

fn validate(request: &ImportRequest) -> UseCaseResult<()> {
    if request.sheets.is_empty() {
        return Err(UseCaseError::validation("Import request contains no sheets"));
    }
    if let Some(pos) = request
        .sheets
        .iter()
        .position(|s| s.sheet_name.trim().is_empty())
    {
        return Err(UseCaseError::validation("Sheet name must not be empty")
            .with_details(format!("sheet #{}", pos + 1)));
    }
    Ok(())
}
