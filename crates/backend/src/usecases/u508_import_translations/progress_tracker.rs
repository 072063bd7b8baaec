use contracts::usecases::u508_import_translations::{
    ImportProgress, ImportStatus, TranslationLogEntry, TranslationProgress, TranslationResult,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio_util::sync::CancellationToken;

struct Session {
    progress: ImportProgress,
    cancel: CancellationToken,
}

/// Трекер прогресса импорта переводов (in-memory)
#[derive(Clone)]
pub struct ProgressTracker {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Session>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }

    fn with_session(&self, session_id: &str, f: impl FnOnce(&mut ImportProgress)) {
        let mut sessions = self.write();
        if let Some(s) = sessions.get_mut(session_id) {
            f(&mut s.progress);
            s.progress.updated_at = chrono::Utc::now();
        }
    }

    /// Создать сессию; возвращает токен отмены для фоновой задачи
    pub fn create_session(&self, session_id: String) -> CancellationToken {
        let cancel = CancellationToken::new();
        let session = Session {
            progress: ImportProgress::new(session_id.clone()),
            cancel: cancel.clone(),
        };
        self.write().insert(session_id, session);
        cancel
    }

    pub fn get_progress(&self, session_id: &str) -> Option<ImportProgress> {
        self.read().get(session_id).map(|s| s.progress.clone())
    }

    pub fn begin_sheet(&self, session_id: &str, sheet_name: &str) {
        self.with_session(session_id, |p| {
            p.current_sheet = Some(TranslationProgress::new(sheet_name));
        });
    }

    /// Обновить счётчики текущего листа
    pub fn update_sheet(&self, session_id: &str, sheet: &TranslationProgress) {
        self.with_session(session_id, |p| {
            p.current_sheet = Some(sheet.clone());
        });
    }

    pub fn add_log(&self, session_id: &str, entry: TranslationLogEntry) {
        self.with_session(session_id, |p| p.log.push(entry));
    }

    /// Зафиксировать итог листа и добавить его счётчики к общим
    pub fn finish_sheet(&self, session_id: &str, result: TranslationResult) {
        self.with_session(session_id, |p| {
            p.total_items += result.progress.total_items;
            p.success_count += result.progress.success_count;
            p.failure_count += result.progress.failure_count;
            p.current_sheet = None;
            p.sheets.push(result);
        });
    }

    pub fn complete_session(&self, session_id: &str, status: ImportStatus) {
        self.with_session(session_id, |p| {
            p.status = status;
            p.completed_at = Some(chrono::Utc::now());
        });
    }

    /// Запросить остановку; `false`, если сессия не найдена
    pub fn request_cancel(&self, session_id: &str) -> bool {
        match self.read().get(session_id) {
            Some(s) => {
                s.cancel.cancel();
                true
            }
            None => false,
        }
    }

    pub fn cleanup_old_sessions(&self, max_age_hours: i64) {
        let mut sessions = self.write();
        let now = chrono::Utc::now();
        sessions.retain(|_, s| match s.progress.completed_at {
            Some(completed_at) => (now - completed_at).num_hours() < max_age_hours,
            None => true,
        });
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(name: &str, total: i32, ok: i32, failed: i32) -> TranslationProgress {
        TranslationProgress {
            sheet_name: name.into(),
            total_items: total,
            success_count: ok,
            failure_count: failed,
        }
    }

    #[test]
    fn test_session_lifecycle() {
        let tracker = ProgressTracker::new();
        tracker.create_session("s1".into());

        tracker.begin_sheet("s1", "Entities");
        tracker.update_sheet("s1", &sheet("Entities", 5, 4, 1));
        tracker.add_log("s1", TranslationLogEntry::error("bad label"));
        let p = tracker.get_progress("s1").unwrap();
        assert_eq!(p.current_sheet, Some(sheet("Entities", 5, 4, 1)));
        assert_eq!(p.status, ImportStatus::Running);

        tracker.finish_sheet(
            "s1",
            TranslationResult {
                sheet_name: "Entities".into(),
                success: false,
                message: String::new(),
                progress: sheet("Entities", 5, 4, 1),
            },
        );
        tracker.complete_session("s1", ImportStatus::CompletedWithErrors);

        let p = tracker.get_progress("s1").unwrap();
        assert_eq!((p.total_items, p.success_count, p.failure_count), (5, 4, 1));
        assert!(p.current_sheet.is_none());
        assert_eq!(p.sheets.len(), 1);
        assert_eq!(p.log.len(), 1);
        assert!(p.is_finished());
        assert!(p.completed_at.is_some());
    }

    #[test]
    fn test_cancel_flags_token() {
        let tracker = ProgressTracker::new();
        let token = tracker.create_session("s1".into());
        assert!(!token.is_cancelled());
        assert!(tracker.request_cancel("s1"));
        assert!(token.is_cancelled());
        assert!(!tracker.request_cancel("missing"));
    }

    #[test]
    fn test_cleanup_keeps_running_sessions() {
        let tracker = ProgressTracker::new();
        tracker.create_session("running".into());
        tracker.create_session("done".into());
        tracker.complete_session("done", ImportStatus::Completed);

        tracker.cleanup_old_sessions(0);
        assert!(tracker.get_progress("running").is_some());
        assert!(tracker.get_progress("done").is_none());
    }
}
