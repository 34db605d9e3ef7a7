// src/services/membership_service.rs
//
// A autoridade de vínculos: única fonte da decisão "o usuário U tem o papel R na filial B?".

use uuid::Uuid;

use crate::{
    common::error::{AppError, DenialReason, DenialStyle},
    db::BusinessRepository,
    models::business::{Business, MemberRole, Membership},
};

#[derive(Clone)]
pub struct MembershipService {
    repo: BusinessRepository,
}

/// Decide com base no vínculo já carregado. `None` em `required` aceita qualquer papel.
pub fn authorize(
    membership: Option<Membership>,
    required: Option<MemberRole>,
    style: DenialStyle,
) -> Result<Membership, AppError> {
    let membership = membership.ok_or(AppError::Forbidden {
        reason: DenialReason::NotMember,
        style,
    })?;

    match required {
        Some(role) if membership.role != role => Err(AppError::Forbidden {
            reason: DenialReason::RoleRequired(role),
            style,
        }),
        _ => Ok(membership),
    }
}

impl MembershipService {
    pub fn new(repo: BusinessRepository) -> Self {
        Self { repo }
    }

    /// Sem cache: sempre reflete o estado atual do banco.
    pub async fn find_membership(
        &self,
        user_id: Uuid,
        business_id: Uuid,
        required: Option<MemberRole>,
        style: DenialStyle,
    ) -> Result<(Membership, Business), AppError> {
        let business = self
            .repo
            .find_business(business_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("business {}", business_id)))?;

        let membership = self.repo.find_membership(user_id, business_id).await?;

        let membership = authorize(membership, required, style).inspect_err(|_| {
            tracing::warn!(
                %user_id,
                %business_id,
                ?required,
                "acesso negado à filial"
            );
        })?;

        Ok((membership, business))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn membership(role: MemberRole) -> Membership {
        Membership {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            role,
            must_change_password: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn missing_membership_is_denied() {
        let result = authorize(None, None, DenialStyle::Structured);
        assert!(matches!(
            result,
            Err(AppError::Forbidden {
                reason: DenialReason::NotMember,
                style: DenialStyle::Structured
            })
        ));
    }

    #[test]
    fn employee_cannot_pass_owner_check() {
        let result = authorize(
            Some(membership(MemberRole::Employee)),
            Some(MemberRole::Owner),
            DenialStyle::Redirect,
        );
        assert!(matches!(
            result,
            Err(AppError::Forbidden {
                reason: DenialReason::RoleRequired(MemberRole::Owner),
                style: DenialStyle::Redirect
            })
        ));
    }

    #[test]
    fn employee_passes_staff_and_any_checks() {
        let m = membership(MemberRole::Employee);
        assert!(authorize(Some(m.clone()), Some(MemberRole::Employee), DenialStyle::Structured).is_ok());
        assert!(authorize(Some(m), None, DenialStyle::Structured).is_ok());
    }

    #[test]
    fn owner_passes_owner_check() {
        let m = membership(MemberRole::Owner);
        let granted = authorize(Some(m.clone()), Some(MemberRole::Owner), DenialStyle::Structured)
            .unwrap();
        assert_eq!(granted.id, m.id);
    }
}
