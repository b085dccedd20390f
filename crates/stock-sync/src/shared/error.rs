use thiserror::Error;

/// Ошибки синхронизации
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Request timed out: {0}")]
    TransportTimeout(String),

    #[error("Connection failed: {0}")]
    ConnectionFailure(String),

    #[error("API request failed with status {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Invalid data: {0}")]
    DataError(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Batch size must be greater than zero")]
    InvalidBatchSize,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SyncError {
    pub fn data(message: impl Into<String>) -> Self {
        SyncError::DataError(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        SyncError::Config(message.into())
    }

    /// Сообщение для вывода в консоль
    pub fn user_message(&self) -> String {
        match self {
            SyncError::TransportTimeout(_) => "Превышено время ожидания...".to_string(),
            SyncError::ConnectionFailure(details) => {
                format!("{} Ошибка соединения", details)
            }
            SyncError::ApiError { status, body } => {
                format!("Маркетплейс вернул ошибку {}: {}", status, body)
            }
            other => format!("{} ERROR", other),
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SyncError::TransportTimeout(e.to_string())
        } else if e.is_connect() {
            SyncError::ConnectionFailure(e.to_string())
        } else if let Some(status) = e.status() {
            SyncError::ApiError {
                status: status.as_u16(),
                body: e.to_string(),
            }
        } else if e.is_decode() {
            SyncError::DataError(e.to_string())
        } else {
            SyncError::Http(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::DataError(e.to_string())
    }
}
