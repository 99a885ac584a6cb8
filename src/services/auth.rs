use argon2::password_hash::rand_core::OsRng;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::entities::personnel;
use crate::errors::ServiceError;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Hashes a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::InternalError(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Single credential check against personnel records. No tokens or sessions.
#[derive(Clone)]
pub struct AuthService {
    db: Arc<DatabaseConnection>,
}

impl AuthService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<personnel::Model, ServiceError> {
        let member = personnel::Entity::find()
            .filter(personnel::Column::Email.eq(email.trim()))
            .one(&*self.db)
            .await
            .map_err(|e| ServiceError::db_error("Failed to look up personnel by email", e))?;

        let Some(member) = member else {
            warn!("Login attempt for unknown email");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let verified = member
            .password_hash
            .as_deref()
            .map(|hash| verify_password(password, hash))
            .unwrap_or(false);

        if !verified {
            warn!(personnel_id = member.id, "Login rejected");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        info!(personnel_id = member.id, "Login succeeded");
        Ok(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
