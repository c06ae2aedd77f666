use serde::Deserialize;
use sqlx::FromRow;

/// Database officer record. Created out of band; read-only to the app.
#[derive(Debug, Clone, FromRow)]
pub struct Officer {
    pub batch_number: String,
    pub name: Option<String>,
    pub password_hash: String,
}

/// Login form submission.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub batch_number: String,
    pub password: String,
}
