use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Уровень записи лога импорта
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// Запись лога импорта переводов
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslationLogEntry {
    pub level: LogLevel,
    pub message: String,
}

impl TranslationLogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Error,
            message: message.into(),
        }
    }
}

/// Счётчики одного прогона (одного листа книги переводов).
///
/// Обновляются после каждого пакета и не сбрасываются в течение прогона.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslationProgress {
    pub sheet_name: String,
    /// Запланировано операций (растёт до отправки пакета)
    pub total_items: i32,
    pub success_count: i32,
    pub failure_count: i32,
}

impl TranslationProgress {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            ..Default::default()
        }
    }
}

/// Итог по одному листу
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub sheet_name: String,
    pub success: bool,
    pub message: String,
    pub progress: TranslationProgress,
}

/// Текущий прогресс сессии импорта переводов
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportProgress {
    pub session_id: String,
    pub status: ImportStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,

    /// Прогресс по текущему листу
    pub current_sheet: Option<TranslationProgress>,

    /// Завершённые листы
    pub sheets: Vec<TranslationResult>,

    /// Суммарные счётчики по всем листам
    pub total_items: i32,
    pub success_count: i32,
    pub failure_count: i32,

    pub log: Vec<TranslationLogEntry>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    /// Импорт запущен
    Running,
    /// Импорт завершен успешно
    Completed,
    /// Импорт завершен с ошибками
    CompletedWithErrors,
    /// Импорт остановлен по запросу
    Cancelled,
    /// Импорт провален
    Failed,
}

impl ImportProgress {
    pub fn new(session_id: String) -> Self {
        Self {
            session_id,
            status: ImportStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            updated_at: Utc::now(),
            current_sheet: None,
            sheets: Vec::new(),
            total_items: 0,
            success_count: 0,
            failure_count: 0,
            log: Vec::new(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status != ImportStatus::Running
    }
}
