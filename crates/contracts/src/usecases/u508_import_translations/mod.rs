pub mod operation;
pub mod progress;
pub mod request;
pub mod response;

pub use operation::{LabelOperation, LocalizedLabel};
pub use progress::{
    ImportProgress, ImportStatus, LogLevel, TranslationLogEntry, TranslationProgress,
    TranslationResult,
};
pub use request::{ImportRequest, SheetOperations};
pub use response::{ImportResponse, ImportStartStatus};

use super::common::UseCaseMetadata;

/// Метаданные UseCase u508
pub struct ImportTranslations;

impl UseCaseMetadata for ImportTranslations {
    fn usecase_index() -> &'static str {
        "u508"
    }

    fn usecase_name() -> &'static str {
        "import_translations"
    }

    fn display_name() -> &'static str {
        "Импорт переводов меток"
    }

    fn description() -> &'static str {
        "Применение отредактированных локализованных меток к метаданным целевой системы"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usecase_full_name() {
        assert_eq!(ImportTranslations::full_name(), "u508_import_translations");
    }
}
