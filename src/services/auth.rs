// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BusinessRepository, UserRepository},
    models::{
        auth::{Claims, User},
        business::MemberRole,
    },
};

const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    business_repo: BusinessRepository,
    jwt_secret: String,
    default_time_zone: String,
    pool: PgPool,
}

// Hash em thread separada: bcrypt é CPU-bound
pub(crate) async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(valid)
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        business_repo: BusinessRepository,
        jwt_secret: String,
        default_time_zone: String,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            business_repo,
            jwt_secret,
            default_time_zone,
            pool,
        }
    }

    /// Cadastro do dono: usuário, filial e vínculo OWNER na mesma transação.
    pub async fn register_owner(
        &self,
        username: &str,
        email: &str,
        password: &str,
        business_name: &str,
    ) -> Result<String, AppError> {
        let hashed_password = hash_password(password).await?;

        let mut tx = self.pool.begin().await?;

        let user = self
            .user_repo
            .create_user(&mut *tx, username, email, "", "", &hashed_password)
            .await?;

        let business = self
            .business_repo
            .create_business(&mut *tx, business_name, &self.default_time_zone)
            .await?;

        self.business_repo
            .add_member(&mut *tx, business.id, user.id, MemberRole::Owner, false)
            .await?;

        tx.commit().await?;

        tracing::info!(user_id = %user.id, business_id = %business.id, "novo dono cadastrado");
        self.create_token(user.id)
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    /// Troca a senha e limpa o `must_change_password` de todos os vínculos do usuário.
    pub async fn change_password(
        &self,
        user: &User,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if !verify_password(old_password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        let hashed_password = hash_password(new_password).await?;

        let mut tx = self.pool.begin().await?;
        self.user_repo
            .update_password(&mut *tx, user.id, &hashed_password)
            .await?;
        let cleared = self
            .business_repo
            .clear_password_change_flag(&mut *tx, user.id)
            .await?;
        tx.commit().await?;

        if cleared > 0 {
            tracing::info!(user_id = %user.id, "senha temporária substituída");
        }
        Ok(())
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn requires_password_change(&self, user_id: Uuid) -> Result<bool, AppError> {
        self.business_repo.has_pending_password_change(user_id).await
    }

    pub(crate) fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(TOKEN_TTL_DAYS);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
