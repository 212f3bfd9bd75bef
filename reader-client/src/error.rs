use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Ошибки клиентской библиотеки `reader-client`.
///
/// Разделяет случаи «ответа нет вообще», «сервер ответил не-2xx» и «ресурс
/// не найден», но для UI-слоя сохраняет общий контракт `message` + `status?`.
pub enum ApiError {
    /// Ответ не получен: соединение, таймаут, обрыв.
    #[error("transport error: {0}")]
    Transport(String),

    /// Сервер ответил не-2xx статусом (кроме 404).
    #[error("http error {status}: {message}")]
    Http {
        /// HTTP-статус ответа.
        status: u16,
        /// Сообщение из тела ответа или `http status <code>`.
        message: String,
    },

    /// Запрошенный ресурс не найден (404).
    #[error("not found")]
    NotFound,

    /// Тело ответа не соответствует ожидаемой модели.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Результат операций `reader-client`.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP-статус, если ответ был получен.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::NotFound => Some(404),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    /// Человекочитаемое сообщение для показа пользователю.
    pub fn message(&self) -> String {
        match self {
            Self::Transport(message) | Self::Decode(message) => message.clone(),
            Self::Http { message, .. } => message.clone(),
            Self::NotFound => "resource not found".to_string(),
        }
    }

    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        if status == reqwest::StatusCode::NOT_FOUND {
            return Self::NotFound;
        }

        let message = message.unwrap_or_else(|| format!("http status {status}"));
        Self::Http {
            status: status.as_u16(),
            message,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        if err.is_timeout() {
            return Self::Transport(format!("request timed out: {err}"));
        }
        Self::Transport(err.to_string())
    }
}
