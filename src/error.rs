use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Table \"{0}\" not found")]
    UnknownTable(String),

    #[error("Column \"{column}\" does not exist in {table}")]
    UnknownColumn { table: &'static str, column: String },

    #[error("Missing {key} in form data")]
    MissingKey { table: &'static str, key: &'static str },

    #[error("No fields submitted")]
    NoFields,

    #[error("A record with the same value already exists in {table}")]
    RecordExists { table: &'static str },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Chart rendering error: {0}")]
    Chart(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Convert AppError to an HTML error response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::UnknownTable(_)
            | AppError::UnknownColumn { .. }
            | AppError::MissingKey { .. }
            | AppError::NoFields => StatusCode::BAD_REQUEST,
            AppError::RecordExists { .. } => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Chart(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        tracing::error!(?self);
        let body = Html(crate::views::error_page(status.as_u16(), &self.to_string()));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
