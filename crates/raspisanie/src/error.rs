//! Error types for schedule retrieval.

use thiserror::Error;

/// Errors that can occur while fetching and normalizing a schedule.
///
/// The `Display` text of each variant is the message shown to end users.
#[derive(Debug, Error, Clone)]
pub enum ScheduleError {
    /// Network/HTTP request failed
    #[error("Не удалось загрузить {url}: {message}")]
    Transport { url: String, message: String },

    /// An embedded script variable was found but did not hold valid JSON
    #[error("Не удалось преобразовать данные из скрипта в JSON (переменная `{variable}`): {message}")]
    MalformedData { variable: String, message: String },

    /// The page carried no schedule data for the requested group
    #[error("Расписание не найдено. Проверь название группы или доступность данных.{}", hint_suffix(.hint))]
    ScheduleNotFound { group: String, hint: Option<String> },

    /// The group listing page yielded no candidate groups
    #[error("Не удалось получить список групп ({url})")]
    ListingUnavailable { url: String },

    /// No known group matched the requested label
    #[error("Группа '{group}' не найдена")]
    GroupNotFound { group: String },

    /// URL parsing/construction failed
    #[error("Некорректный URL: {message}")]
    Url { message: String },

    /// Configuration could not be read or is invalid
    #[error("Ошибка конфигурации: {message}")]
    Config { message: String },
}

fn hint_suffix(hint: &Option<String>) -> String {
    match hint {
        Some(url) => format!(" Попробуйте перейти на {url}."),
        None => String::new(),
    }
}

impl ScheduleError {
    /// Returns true if the error means the source page changed shape.
    pub fn is_format_drift(&self) -> bool {
        matches!(
            self,
            ScheduleError::MalformedData { .. } | ScheduleError::ListingUnavailable { .. }
        )
    }

    /// Process exit code the binary uses for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScheduleError::Config { .. } | ScheduleError::Url { .. } => 2,
            _ => 1,
        }
    }
}

impl From<reqwest::Error> for ScheduleError {
    fn from(err: reqwest::Error) -> Self {
        ScheduleError::Transport {
            url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for ScheduleError {
    fn from(err: url::ParseError) -> Self {
        ScheduleError::Url {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
