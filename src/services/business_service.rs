// src/services/business_service.rs

use std::sync::Arc;

use rand::{distributions::Alphanumeric, thread_rng, Rng};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BusinessRepository, UserRepository},
    models::{
        auth::UserBusiness,
        business::{parse_time_zone, Business, InvitationResponse, MemberRole, StaffMember},
    },
    services::{
        auth::hash_password,
        mailer::{invitation_message, Mailer},
    },
};

const TEMP_PASSWORD_LEN: usize = 12;
const MAX_USERNAME_ATTEMPTS: u32 = 50;

#[derive(Clone)]
pub struct BusinessService {
    business_repo: BusinessRepository,
    user_repo: UserRepository,
    mailer: Arc<dyn Mailer>,
    default_time_zone: String,
    pool: PgPool,
}

pub fn generate_temporary_password() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TEMP_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

/// Parte local do e-mail, só com caracteres seguros.
pub fn username_base(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let cleaned: String = local
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect::<String>()
        .to_lowercase();
    if cleaned.is_empty() {
        "staff".to_string()
    } else {
        cleaned
    }
}

pub fn username_candidate(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{}{}", base, attempt + 1)
    }
}

/// Ordena por nome de exibição (sem diferenciar maiúsculas), estável.
pub fn sort_by_display_name(staff: &mut [StaffMember]) {
    staff.sort_by_cached_key(|m| (m.display_name().to_lowercase(), m.username.clone()));
}

impl BusinessService {
    pub fn new(
        business_repo: BusinessRepository,
        user_repo: UserRepository,
        mailer: Arc<dyn Mailer>,
        default_time_zone: String,
        pool: PgPool,
    ) -> Self {
        Self {
            business_repo,
            user_repo,
            mailer,
            default_time_zone,
            pool,
        }
    }

    /// Cria uma nova filial e, atomicamente, torna o criador seu dono.
    pub async fn create_branch(
        &self,
        owner_id: Uuid,
        name: &str,
        time_zone: Option<&str>,
    ) -> Result<Business, AppError> {
        let time_zone = time_zone.unwrap_or(&self.default_time_zone);
        parse_time_zone(time_zone)?;

        let mut tx = self.pool.begin().await?;

        let business = self
            .business_repo
            .create_business(&mut *tx, name.trim(), time_zone)
            .await?;

        self.business_repo
            .add_member(&mut *tx, business.id, owner_id, MemberRole::Owner, false)
            .await?;

        tx.commit().await?;

        tracing::info!(business_id = %business.id, %owner_id, "filial criada");
        Ok(business)
    }

    pub async fn list_user_businesses(&self, user_id: Uuid) -> Result<Vec<UserBusiness>, AppError> {
        self.business_repo.memberships_for_user(user_id).await
    }

    /// Convida um funcionário: cria a conta com senha temporária e envia o convite.
    pub async fn invite_staff(
        &self,
        business: &Business,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<InvitationResponse, AppError> {
        let email = email.trim();
        if self.user_repo.email_exists(email).await? {
            return Err(AppError::EmailAlreadyExists);
        }

        let username = self.free_username(&username_base(email)).await?;
        let temp_password = generate_temporary_password();
        let hashed_password = hash_password(&temp_password).await?;

        let mut tx = self.pool.begin().await?;

        let user = self
            .user_repo
            .create_user(
                &mut *tx,
                &username,
                email,
                first_name.trim(),
                last_name.trim(),
                &hashed_password,
            )
            .await?;

        self.business_repo
            .add_member(&mut *tx, business.id, user.id, MemberRole::Employee, true)
            .await?;

        // Envia antes do commit: se o envio falhar, nada fica gravado
        let (subject, body) = invitation_message(&business.name, &username, &temp_password);
        self.mailer
            .send(email, &subject, &body)
            .await
            .map_err(AppError::InternalServerError)?;

        tx.commit().await?;

        tracing::info!(business_id = %business.id, user_id = %user.id, "funcionário convidado");
        Ok(InvitationResponse {
            user_id: user.id,
            username,
            email: user.email,
        })
    }

    pub async fn list_staff(&self, business_id: Uuid) -> Result<Vec<StaffMember>, AppError> {
        let mut staff = self.business_repo.list_staff(business_id).await?;
        sort_by_display_name(&mut staff);
        Ok(staff)
    }

    async fn free_username(&self, base: &str) -> Result<String, AppError> {
        for attempt in 0..MAX_USERNAME_ATTEMPTS {
            let candidate = username_candidate(base, attempt);
            if !self.user_repo.username_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        Err(AppError::UsernameAlreadyExists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporary_password_is_twelve_alphanumerics() {
        let password = generate_temporary_password();
        assert_eq!(password.len(), TEMP_PASSWORD_LEN);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn username_comes_from_email_local_part() {
        assert_eq!(username_base("Ana.Souza+x@example.com"), "ana.souzax");
        assert_eq!(username_base("@example.com"), "staff");
        assert_eq!(username_candidate("ana", 0), "ana");
        assert_eq!(username_candidate("ana", 1), "ana2");
    }

    #[test]
    fn staff_sorted_by_display_name() {
        let member = |username: &str, first: &str| StaffMember {
            user_id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            first_name: first.to_string(),
            last_name: String::new(),
            must_change_password: false,
        };
        let mut staff = vec![member("zed", ""), member("b", "Carla"), member("a", "bruno")];
        sort_by_display_name(&mut staff);
        let names: Vec<String> = staff.iter().map(|m| m.display_name()).collect();
        assert_eq!(names, vec!["bruno", "Carla", "zed"]);
    }
}
