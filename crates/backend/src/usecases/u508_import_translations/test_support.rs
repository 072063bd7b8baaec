use super::metadata_client::{
    ExecuteMultipleRequest, ExecuteMultipleResponse, ExecuteMultipleResponseItem,
    MetadataService, MetadataServiceError, OrganizationFault,
};
use async_trait::async_trait;
use contracts::usecases::u508_import_translations::LabelOperation;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

pub type Reply = Result<ExecuteMultipleResponse, MetadataServiceError>;

/// Сервис с заранее заданными ответами; без сценария отвечает успехом
#[derive(Default)]
pub struct ScriptedService {
    pub replies: Mutex<VecDeque<Reply>>,
    pub submitted: Mutex<Vec<Vec<LabelOperation>>>,
    pub cancel_on_call: Option<CancellationToken>,
}

impl ScriptedService {
    pub fn with_replies(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    pub fn submitted_sizes(&self) -> Vec<usize> {
        self.submitted.lock().unwrap().iter().map(Vec::len).collect()
    }
}

#[async_trait]
impl MetadataService for ScriptedService {
    async fn execute_multiple(
        &self,
        request: &ExecuteMultipleRequest<'_>,
    ) -> Result<ExecuteMultipleResponse, MetadataServiceError> {
        assert!(request.settings.continue_on_error);
        assert!(!request.settings.return_responses);
        self.submitted.lock().unwrap().push(request.requests.to_vec());
        if let Some(token) = &self.cancel_on_call {
            token.cancel();
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ExecuteMultipleResponse::default()))
    }
}

pub fn faulted_at(indices: &[usize]) -> Reply {
    Ok(ExecuteMultipleResponse {
        is_faulted: true,
        responses: indices
            .iter()
            .map(|&i| ExecuteMultipleResponseItem {
                request_index: i,
                fault: Some(OrganizationFault {
                    error_code: -1,
                    message: format!("fault {}", i),
                }),
            })
            .collect(),
    })
}

pub fn attribute(n: usize) -> LabelOperation {
    LabelOperation::UpdateAttributeDefinition {
        entity_logical_name: "account".into(),
        attribute_logical_name: format!("attr_{}", n),
        display_name: vec![],
        description: vec![],
    }
}
