use sha2::{Digest, Sha256};

use crate::{
    db::DbPool,
    error::{AppError, Result},
    models::officer::Officer,
};

/// Deterministic SHA-256 hex digest of a plaintext password.
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    format!("{digest:x}")
}

/// Officer store for credential lookups
#[derive(Clone)]
pub struct OfficerStore {
    pool: DbPool,
}

impl OfficerStore {
    /// Create a new OfficerStore with the provided database pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Look up an officer whose batch number and password digest both match.
    ///
    /// Returns `None` on any mismatch; callers must not distinguish an
    /// unknown batch number from a wrong password.
    pub async fn authenticate(&self, batch_number: &str, password: &str) -> Result<Option<Officer>> {
        let password_hash = hash_password(password);

        let officer = sqlx::query_as::<_, Officer>(
            "SELECT * FROM inventory_officers WHERE batch_number = ? AND password_hash = ?",
        )
        .bind(batch_number)
        .bind(&password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(officer)
    }
}
