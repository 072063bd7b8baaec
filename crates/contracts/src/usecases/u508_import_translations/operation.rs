use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Локализованная строка для одного языка (LCID)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedLabel {
    pub label: String,
    pub language_code: i32,
}

impl LocalizedLabel {
    pub fn new(label: impl Into<String>, language_code: i32) -> Self {
        Self {
            label: label.into(),
            language_code,
        }
    }
}

/// Одна атомарная операция обновления метки в удалённой системе.
///
/// Операции создаются на этапе разбора файла переводов и передаются
/// исполнителю пакетов ровно один раз. Каждый вариант хранит поля,
/// по которым можно описать операцию в сообщении об ошибке.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LabelOperation {
    /// Обновление полей записи (view, form, chart, dashboard, sitemap)
    UpdateRecordField {
        logical_name: String,
        id: String,
        #[serde(default)]
        fields: BTreeMap<String, serde_json::Value>,
    },

    /// Обновление отображаемого имени и описания атрибута
    UpdateAttributeDefinition {
        entity_logical_name: String,
        attribute_logical_name: String,
        #[serde(default)]
        display_name: Vec<LocalizedLabel>,
        #[serde(default)]
        description: Vec<LocalizedLabel>,
    },

    UpdateRelationshipLabel {
        schema_name: String,
        #[serde(default)]
        labels: Vec<LocalizedLabel>,
    },

    /// Обновление имени глобального набора параметров
    UpdateOptionSetLabel {
        name: String,
        #[serde(default)]
        display_name: Vec<LocalizedLabel>,
        #[serde(default)]
        description: Vec<LocalizedLabel>,
    },

    /// Обновление метки значения набора параметров.
    /// Если `option_set_name` задан и не пуст, набор глобальный,
    /// иначе значение принадлежит локальному набору атрибута.
    UpdateOptionValueLabel {
        #[serde(default)]
        option_set_name: Option<String>,
        #[serde(default)]
        entity_logical_name: String,
        #[serde(default)]
        attribute_logical_name: String,
        value: i32,
        #[serde(default)]
        labels: Vec<LocalizedLabel>,
    },

    /// Установка набора локализованных меток для атрибута записи
    UpdateLocalizedLabelSet {
        entity_logical_name: String,
        id: String,
        attribute_name: String,
        #[serde(default)]
        labels: Vec<LocalizedLabel>,
    },

    /// Запрос, который исполнитель не распознаёт
    Other {
        request_name: String,
        #[serde(default)]
        parameters: serde_json::Value,
    },
}

impl LabelOperation {
    /// Сообщение об ошибке для операции; `detail` добавляется как есть
    pub fn failure_message(&self, detail: &str) -> String {
        match self {
            LabelOperation::UpdateRecordField { logical_name, id, .. } => {
                format!("Error while updating record {} ({}): {}", logical_name, id, detail)
            }
            LabelOperation::UpdateAttributeDefinition {
                attribute_logical_name,
                ..
            } => format!(
                "Error while updating attribute {}: {}",
                attribute_logical_name, detail
            ),
            LabelOperation::UpdateRelationshipLabel { schema_name, .. } => format!(
                "Error while updating relationship {}: {}",
                schema_name, detail
            ),
            LabelOperation::UpdateOptionSetLabel { name, .. } => {
                format!("Error while updating optionset {}: {}", name, detail)
            }
            LabelOperation::UpdateOptionValueLabel {
                option_set_name,
                entity_logical_name,
                attribute_logical_name,
                value,
                ..
            } => match option_set_name.as_deref().filter(|n| !n.is_empty()) {
                Some(option_set_name) => format!(
                    "Error while updating global optionset ({}) value ({}) label: {}",
                    option_set_name, value, detail
                ),
                None => format!(
                    "Error while updating option ({}) label for attribute {} ({}): {}",
                    value, attribute_logical_name, entity_logical_name, detail
                ),
            },
            LabelOperation::UpdateLocalizedLabelSet {
                entity_logical_name,
                id,
                attribute_name,
                ..
            } => format!(
                "Error while updating {} of record {} ({}): {}",
                attribute_name, entity_logical_name, id, detail
            ),
            LabelOperation::Other { .. } => detail.to_string(),
        }
    }
}
