use super::operation::LabelOperation;
use serde::{Deserialize, Serialize};

/// Операции одного листа книги переводов
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetOperations {
    /// Имя листа (Entities, Attributes, Views, ...)
    pub sheet_name: String,

    /// Операции в порядке применения
    #[serde(default)]
    pub operations: Vec<LabelOperation>,
}

/// Запрос на применение отредактированных переводов
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    /// Листы обрабатываются последовательно, в порядке следования
    pub sheets: Vec<SheetOperations>,
}

impl ImportRequest {
    pub fn total_operations(&self) -> usize {
        self.sheets.iter().map(|s| s.operations.len()).sum()
    }
}
