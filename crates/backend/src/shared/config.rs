use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub metadata_service: MetadataServiceConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Подключение к сервису метаданных целевой системы
#[derive(Debug, Deserialize, Clone)]
pub struct MetadataServiceConfig {
    pub base_url: String,
    #[serde(default = "default_execute_multiple_path")]
    pub execute_multiple_path: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl MetadataServiceConfig {
    /// Полный URL пакетного запроса
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.execute_multiple_path.trim_start_matches('/')
        )
    }
}

impl Default for MetadataServiceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            execute_multiple_path: default_execute_multiple_path(),
            access_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    /// Максимум операций в одном пакетном запросе
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Через сколько часов забывать завершённые сессии
    #[serde(default = "default_session_max_age_hours")]
    pub session_max_age_hours: i64,
    /// Предельный размер тела запроса на запуск импорта
    #[serde(default = "default_max_request_bytes")]
    pub max_request_bytes: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            session_max_age_hours: default_session_max_age_hours(),
            max_request_bytes: default_max_request_bytes(),
        }
    }
}

fn default_execute_multiple_path() -> String {
    "api/metadata/execute-multiple".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_batch_size() -> usize {
    5
}

fn default_session_max_age_hours() -> i64 {
    24
}

fn default_max_request_bytes() -> usize {
    64 * 1024 * 1024
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[metadata_service]
base_url = "http://localhost:5555"
execute_multiple_path = "api/metadata/execute-multiple"
timeout_secs = 120

[import]
batch_size = 5
session_max_age_hours = 24
max_request_bytes = 67108864
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.import.batch_size == 0 {
        anyhow::bail!("import.batch_size must be greater than zero");
    }
    if config.import.max_request_bytes == 0 {
        anyhow::bail!("import.max_request_bytes must be greater than zero");
    }
    Ok(config)
}
