use super::batch_accumulator::{Batch, PendingQueue};
use super::metadata_client::{
    ExecuteMultipleRequest, ExecuteMultipleResponse, ExecuteMultipleSettings, MetadataService,
};
use contracts::usecases::u508_import_translations::{TranslationLogEntry, TranslationProgress};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Чем закончился прогон очереди
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Очередь обработана полностью
    Completed,
    /// Остановлен между пакетами; оставшиеся пакеты не отправлялись
    Cancelled {
        skipped_batches: usize,
        skipped_items: usize,
    },
}

/// Последовательно отправляет пакеты в сервис метаданных и ведёт счётчики.
///
/// Ни одна ошибка не прерывает прогон: сбой операции или всего пакета
/// превращается в счётчик `failure_count` и записи лога.
pub struct BatchExecutor {
    service: Arc<dyn MetadataService>,
    settings: ExecuteMultipleSettings,
}

impl BatchExecutor {
    pub fn new(service: Arc<dyn MetadataService>) -> Self {
        Self {
            service,
            settings: ExecuteMultipleSettings::default(),
        }
    }

    /// Обработать очередь пакетов.
    ///
    /// `on_progress` вызывается дважды на каждый непустой пакет: после
    /// увеличения `total_items` (до ответа сервиса) и после пересчёта
    /// счётчиков. `on_log` получает по одной записи на каждую неудачную операцию.
    pub async fn run<L, P>(
        &self,
        mut queue: PendingQueue,
        progress: &mut TranslationProgress,
        mut on_log: L,
        mut on_progress: P,
        cancel: &CancellationToken,
    ) -> RunOutcome
    where
        L: FnMut(TranslationLogEntry),
        P: FnMut(&TranslationProgress),
    {
        let mut batch_no = 0usize;

        while let Some(batch) = queue.pop_front() {
            if cancel.is_cancelled() {
                let skipped_items =
                    batch.len() + queue.iter().map(Vec::len).sum::<usize>();
                let skipped_batches = queue.len() + 1;
                tracing::warn!(
                    "Sheet '{}': cancelled before batch {}, {} batches ({} items) not submitted",
                    progress.sheet_name,
                    batch_no + 1,
                    skipped_batches,
                    skipped_items
                );
                return RunOutcome::Cancelled {
                    skipped_batches,
                    skipped_items,
                };
            }

            if batch.is_empty() {
                continue;
            }
            batch_no += 1;

            let batch_size = batch.len() as i32;
            progress.total_items += batch_size;
            on_progress(progress);

            let request = ExecuteMultipleRequest {
                requests: &batch,
                settings: self.settings,
            };

            match self.service.execute_multiple(&request).await {
                Ok(response) => {
                    let failed = Self::report_faults(&batch, &response, &mut on_log);
                    progress.failure_count += failed;
                    progress.success_count += batch_size - failed;
                    tracing::debug!(
                        "Sheet '{}': batch {} done, {} ok, {} failed",
                        progress.sheet_name,
                        batch_no,
                        batch_size - failed,
                        failed
                    );
                }
                Err(e) => {
                    tracing::debug!(
                        "Sheet '{}': batch {} ({} items) could not be submitted: {}",
                        progress.sheet_name,
                        batch_no,
                        batch_size,
                        e
                    );
                    progress.failure_count += batch_size;
                    let detail = e.to_string();
                    for op in &batch {
                        on_log(TranslationLogEntry::error(op.failure_message(&detail)));
                    }
                }
            }

            on_progress(progress);
        }

        RunOutcome::Completed
    }

    /// Записать в лог ошибки пакета; возвращает число неудачных операций.
    /// Несколько ошибок с одним индексом считаются одной операцией,
    /// ошибка с индексом вне пакета логируется без счёта.
    fn report_faults<L>(
        batch: &Batch,
        response: &ExecuteMultipleResponse,
        on_log: &mut L,
    ) -> i32
    where
        L: FnMut(TranslationLogEntry),
    {
        let mut faulted = BTreeSet::new();

        for (index, fault) in response.faults() {
            match batch.get(index) {
                Some(op) => {
                    if faulted.insert(index) {
                        on_log(TranslationLogEntry::error(op.failure_message(&fault.message)));
                    }
                }
                None => {
                    tracing::warn!(
                        "Fault for request index {} outside of batch of {}",
                        index,
                        batch.len()
                    );
                    on_log(TranslationLogEntry::error(fault.message.clone()));
                }
            }
        }

        faulted.len() as i32
    }
}
