//! Registration, login and password hashing

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{LoginRequest, RegisterRequest, Role, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new user with the default role
    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        request.validate()?;

        let username = request.username.trim();
        let email = request.email.trim();
        let password_hash = hash_password(&request.password)?;

        let user = self
            .repository
            .users
            .create(username, email, &password_hash, Role::User)
            .await?;

        tracing::info!(user_id = user.id, "User registered: {}", user.username);
        Ok(user)
    }

    /// Authenticate by username (or email) and return a JWT token
    pub async fn login(&self, request: LoginRequest) -> AppResult<(String, User)> {
        request.validate()?;

        let invalid = || AppError::Authentication("Invalid credentials".to_string());

        let user = self
            .repository
            .users
            .get_by_login(request.username.trim())
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&user.password_hash, &request.password)? {
            tracing::warn!(user_id = user.id, "Failed login attempt");
            return Err(invalid());
        }

        let token = UserClaims::for_user(&user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok((token, user))
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
