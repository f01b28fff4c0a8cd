// src/services/auth_service.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{AuthResponse, Claims, RefreshClaims, User},
};

const ACCESS_TOKEN_TTL_MINUTES: i64 = 60;
const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AppError::InactiveUser);
        }

        // Verificação de senha em thread separada (bcrypt é pesado).
        let password = password.to_owned();
        let password_hash = user.password_hash.clone();
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password, &password_hash))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.issue_tokens(&user).await
    }

    /// Rotaciona o par de tokens: valida o refresh token recebido contra o
    /// hash guardado no usuário e emite um novo par.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, AppError> {
        let token_data = decode::<RefreshClaims>(
            refresh_token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let user = self
            .user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !user.is_active {
            return Err(AppError::InactiveUser);
        }

        // O token apresentado precisa bater com o hash do último emitido.
        let stored_hash = user.refresh_token.clone().ok_or(AppError::InvalidToken)?;
        let presented = refresh_token.to_owned();
        let matches = tokio::task::spawn_blocking(move || verify(&presented, &stored_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de token: {}", e))??;

        if !matches {
            return Err(AppError::InvalidToken);
        }

        self.issue_tokens(&user).await
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AppError::InvalidToken)
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound(user_id))?;

        let old_password = old_password.to_owned();
        let password_hash = user.password_hash.clone();
        let is_match = tokio::task::spawn_blocking(move || verify(&old_password, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_match {
            return Err(AppError::InvalidCredentials);
        }

        let new_password = new_password.to_owned();
        let new_hash = tokio::task::spawn_blocking(move || hash(&new_password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.user_repo.update_password(user.id, &new_hash).await?;
        Ok(())
    }

    async fn issue_tokens(&self, user: &User) -> Result<AuthResponse, AppError> {
        let now = Utc::now();

        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            role: user.role,
            exp: (now + Duration::minutes(ACCESS_TOKEN_TTL_MINUTES)).timestamp(),
        };
        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        let refresh_claims = RefreshClaims {
            sub: user.id,
            exp: (now + Duration::days(REFRESH_TOKEN_TTL_DAYS)).timestamp(),
        };
        let refresh_token = encode(
            &Header::default(),
            &refresh_claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        // Guarda só o hash do refresh token: vazamento do banco não vira sessão.
        let to_hash = refresh_token.clone();
        let refresh_hash = tokio::task::spawn_blocking(move || hash(&to_hash, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        self.user_repo
            .update_refresh_token(user.id, Some(&refresh_hash))
            .await?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
        })
    }
}
