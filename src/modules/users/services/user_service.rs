use std::sync::Arc;

use chrono::Utc;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::middleware::auth::{
    hash_password, verify_password, TokenSigner, ROLE_CUSTOMER, ROLE_STAFF,
};
use crate::modules::users::models::{
    LoginRequest, LoginResponse, RegisterUserRequest, UserResponse,
};
use crate::modules::users::repositories::UserRepository;

/// Registration and login
pub struct UserService {
    pool: MySqlPool,
    user_repo: UserRepository,
    signer: Arc<TokenSigner>,
}

impl UserService {
    pub fn new(pool: MySqlPool, signer: Arc<TokenSigner>) -> Self {
        Self {
            user_repo: UserRepository::new(pool.clone()),
            pool,
            signer,
        }
    }

    pub async fn register_customer(&self, request: RegisterUserRequest) -> Result<UserResponse> {
        self.register(request, ROLE_CUSTOMER).await
    }

    pub async fn register_staff(&self, request: RegisterUserRequest) -> Result<UserResponse> {
        self.register(request, ROLE_STAFF).await
    }

    async fn register(&self, request: RegisterUserRequest, role_name: &str) -> Result<UserResponse> {
        request.validate()?;
        let email = request.normalized_email();

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User with this email already exists"));
        }

        let password_hash = hash_password(&request.password)?;

        let mut tx = self.pool.begin().await?;

        // Seeded by the initial migration
        let role = self
            .user_repo
            .find_role_by_name_with_tx(&mut tx, role_name)
            .await?
            .ok_or_else(|| AppError::internal(format!("Role '{}' not found", role_name)))?;

        let user_id = self
            .user_repo
            .create_with_tx(
                &mut tx,
                request.full_name.trim(),
                &email,
                &password_hash,
                request.phone_number.trim(),
                request.address.trim(),
            )
            .await?;

        self.user_repo
            .assign_role_with_tx(&mut tx, user_id, role.id)
            .await?;

        tx.commit().await?;

        tracing::info!(user_id, role = role_name, "User registered");

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::internal("User vanished after insert"))?;

        Ok(user.into())
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        let email = request.email.trim().to_lowercase();

        let user = match self.user_repo.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("Login attempt for unknown email");
                return Err(AppError::unauthenticated("Invalid email or password"));
            }
        };

        if !verify_password(&request.password, &user.password_hash)? {
            tracing::debug!(user_id = user.id, "Login attempt with wrong password");
            return Err(AppError::unauthenticated("Invalid email or password"));
        }

        let token = self.signer.issue(user.id, &user.roles, Utc::now())?;

        tracing::info!(user_id = user.id, "User logged in");

        Ok(LoginResponse {
            token,
            user: user.into(),
        })
    }
}
