use async_trait::async_trait;
use contracts::usecases::u508_import_translations::LabelOperation;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::config::MetadataServiceConfig;

/// Ошибки обращения к сервису метаданных (пакет целиком не выполнен)
#[derive(Debug, Error)]
pub enum MetadataServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Настройки пакетного запроса
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecuteMultipleSettings {
    /// Не прерывать пакет на первой ошибочной операции
    pub continue_on_error: bool,
    /// Возвращать ответы по успешным операциям
    pub return_responses: bool,
}

impl Default for ExecuteMultipleSettings {
    fn default() -> Self {
        Self {
            continue_on_error: true,
            return_responses: false,
        }
    }
}

/// Пакетный запрос: N операций в одном вызове
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteMultipleRequest<'a> {
    pub requests: &'a [LabelOperation],
    pub settings: ExecuteMultipleSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationFault {
    #[serde(default)]
    pub error_code: i64,
    pub message: String,
}

/// Ответ по одной операции пакета; request_index считается от начала пакета
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteMultipleResponseItem {
    pub request_index: usize,
    #[serde(default)]
    pub fault: Option<OrganizationFault>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteMultipleResponse {
    #[serde(default)]
    pub is_faulted: bool,
    #[serde(default)]
    pub responses: Vec<ExecuteMultipleResponseItem>,
}

impl ExecuteMultipleResponse {
    pub fn faults(&self) -> impl Iterator<Item = (usize, &OrganizationFault)> {
        self.responses
            .iter()
            .filter_map(|r| r.fault.as_ref().map(|f| (r.request_index, f)))
    }
}

/// Трейт для сервиса метаданных целевой системы
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Выполнить пакет операций одним запросом
    async fn execute_multiple(
        &self,
        request: &ExecuteMultipleRequest<'_>,
    ) -> Result<ExecuteMultipleResponse, MetadataServiceError>;
}

/// HTTP-клиент сервиса метаданных
pub struct HttpMetadataService {
    client: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
}

impl HttpMetadataService {
    pub fn new(config: &MetadataServiceConfig) -> Result<Self, MetadataServiceError> {
        if config.base_url.trim().is_empty() {
            return Err(MetadataServiceError::Configuration(
                "metadata_service.base_url is empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MetadataServiceError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            access_token: config.access_token.clone().filter(|t| !t.is_empty()),
        })
    }
}

#[async_trait]
impl MetadataService for HttpMetadataService {
    async fn execute_multiple(
        &self,
        request: &ExecuteMultipleRequest<'_>,
    ) -> Result<ExecuteMultipleResponse, MetadataServiceError> {
        tracing::debug!(
            "Metadata API: POST {} ({} requests)",
            self.endpoint,
            request.requests.len()
        );

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(request);
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| MetadataServiceError::Network(format!("{}: {}", self.endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataServiceError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<ExecuteMultipleResponse>()
            .await
            .map_err(|e| MetadataServiceError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_continue_without_responses() {
        let settings = ExecuteMultipleSettings::default();
        assert!(settings.continue_on_error);
        assert!(!settings.return_responses);
    }

    #[test]
    fn test_parse_faulted_response() {
        let json = r#"{
            "is_faulted": true,
            "responses": [
                { "request_index": 1, "fault": { "error_code": -2147220969, "message": "Label too long" } },
                { "request_index": 3, "fault": { "message": "Not found" } }
            ]
        }"#;
        let response: ExecuteMultipleResponse = serde_json::from_str(json).unwrap();
        let faults: Vec<_> = response.faults().map(|(i, f)| (i, f.message.as_str())).collect();
        assert_eq!(faults, vec![(1, "Label too long"), (3, "Not found")]);
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        let config = MetadataServiceConfig {
            base_url: "  ".into(),
            ..Default::default()
        };
        assert!(matches!(
            HttpMetadataService::new(&config),
            Err(MetadataServiceError::Configuration(_))
        ));
    }

    #[test]
    fn test_http_error_display_is_transport_detail() {
        let err = MetadataServiceError::Http {
            status: 503,
            body: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
    }

    mod http {
        use super::*;
        use contracts::usecases::u508_import_translations::LocalizedLabel;
        use serde_json::json;
        use wiremock::matchers::{body_json, header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        const PATH: &str = "/api/metadata/execute-multiple";

        fn service(server: &MockServer, access_token: Option<&str>) -> HttpMetadataService {
            HttpMetadataService::new(&MetadataServiceConfig {
                base_url: server.uri(),
                access_token: access_token.map(str::to_string),
                timeout_secs: 5,
                ..Default::default()
            })
            .unwrap()
        }

        fn operations() -> Vec<LabelOperation> {
            vec![
                LabelOperation::UpdateRelationshipLabel {
                    schema_name: "account_contacts".into(),
                    labels: vec![LocalizedLabel::new("Contacts", 1036)],
                },
                LabelOperation::UpdateOptionSetLabel {
                    name: "new_color".into(),
                    display_name: vec![LocalizedLabel::new("Couleur", 1036)],
                    description: vec![],
                },
            ]
        }

        fn request(operations: &[LabelOperation]) -> ExecuteMultipleRequest<'_> {
            ExecuteMultipleRequest {
                requests: operations,
                settings: ExecuteMultipleSettings::default(),
            }
        }

        #[tokio::test]
        async fn test_posts_batch_with_bearer_token() {
            let server = MockServer::start().await;
            let ops = operations();
            let expected_body = json!({
                "requests": serde_json::to_value(&ops).unwrap(),
                "settings": { "continue_on_error": true, "return_responses": false },
            });

            Mock::given(method("POST"))
                .and(path(PATH))
                .and(header("authorization", "Bearer secret"))
                .and(body_json(expected_body))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "is_faulted": true,
                    "responses": [
                        { "request_index": 1, "fault": { "error_code": -1, "message": "Label too long" } }
                    ]
                })))
                .expect(1)
                .mount(&server)
                .await;

            let response = service(&server, Some("secret"))
                .execute_multiple(&request(&ops))
                .await
                .unwrap();
            let faults: Vec<_> = response
                .faults()
                .map(|(i, f)| (i, f.message.clone()))
                .collect();
            assert_eq!(faults, vec![(1, "Label too long".to_string())]);
        }

        #[tokio::test]
        async fn test_non_success_status_is_http_error() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path(PATH))
                .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
                .mount(&server)
                .await;

            let ops = operations();
            let err = service(&server, None)
                .execute_multiple(&request(&ops))
                .await
                .unwrap_err();
            match err {
                MetadataServiceError::Http { status, body } => {
                    assert_eq!(status, 503);
                    assert_eq!(body, "Service Unavailable");
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }

        #[tokio::test]
        async fn test_unparseable_body_is_decode_error() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path(PATH))
                .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
                .mount(&server)
                .await;

            let ops = operations();
            let err = service(&server, None)
                .execute_multiple(&request(&ops))
                .await
                .unwrap_err();
            assert!(matches!(err, MetadataServiceError::Decode(_)));
        }

        #[tokio::test]
        async fn test_no_authorization_header_without_token() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path(PATH))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
                .expect(1)
                .mount(&server)
                .await;

            let ops = operations();
            service(&server, Some(""))
                .execute_multiple(&request(&ops))
                .await
                .unwrap();

            let received = server.received_requests().await.unwrap();
            assert_eq!(received.len(), 1);
            assert!(!received[0].headers.contains_key("authorization"));
        }
    }
}
