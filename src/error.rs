use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgendaError {
    #[error("not an agenda store (run `agenda init` first)")]
    NotInitialized,

    #[error("agenda already initialized in this directory")]
    AlreadyInitialized,

    #[error("task {0} not found")]
    TaskNotFound(String),

    #[error("task id prefix '{0}' is ambiguous; matches: {1}")]
    TaskIdAmbiguous(String, String),

    #[error("invalid task id '{0}': {1}")]
    InvalidTaskId(String, String),

    #[error("task title cannot be empty")]
    EmptyTitle,

    #[error("refusing to delete all tasks without --yes")]
    ConfirmationRequired,

    #[error("locked by another process: {0}")]
    Locked(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
}

impl AgendaError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotInitialized => "not_initialized",
            Self::AlreadyInitialized => "already_initialized",
            Self::TaskNotFound(_) => "task_not_found",
            Self::TaskIdAmbiguous(_, _) => "task_id_ambiguous",
            Self::InvalidTaskId(_, _) => "invalid_task_id",
            Self::EmptyTitle => "empty_title",
            Self::ConfirmationRequired => "confirmation_required",
            Self::Locked(_) => "locked",
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
            Self::Db(_) => "db_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, AgendaError>;
