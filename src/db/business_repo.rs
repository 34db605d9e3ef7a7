// src/db/business_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{unique_violation, MEMBERSHIP_UNIQUE},
        error::AppError,
    },
    models::{
        auth::UserBusiness,
        business::{Business, MemberRole, Membership, StaffMember},
    },
};

#[derive(Clone)]
pub struct BusinessRepository {
    pool: PgPool,
}

impl BusinessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_business<'e, E>(
        &self,
        executor: E,
        name: &str,
        time_zone: &str,
    ) -> Result<Business, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let business = sqlx::query_as::<_, Business>(
            "INSERT INTO businesses (name, time_zone) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(time_zone)
        .fetch_one(executor)
        .await?;
        Ok(business)
    }

    pub async fn find_business(&self, business_id: Uuid) -> Result<Option<Business>, AppError> {
        let business = sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE id = $1")
            .bind(business_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(business)
    }

    /// Vincula um usuário à filial. O par (usuário, filial) é único no banco.
    pub async fn add_member<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
        must_change_password: bool,
    ) -> Result<Membership, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (business_id, user_id, role, must_change_password)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(business_id)
        .bind(user_id)
        .bind(role)
        .bind(must_change_password)
        .fetch_one(executor)
        .await
        .map_err(|e| match unique_violation(&e).as_deref() {
            Some(MEMBERSHIP_UNIQUE) => AppError::EmailAlreadyExists,
            _ => e.into(),
        })
    }

    /// O vínculo único de (usuário, filial), sempre lido do banco.
    pub async fn find_membership(
        &self,
        user_id: Uuid,
        business_id: Uuid,
    ) -> Result<Option<Membership>, AppError> {
        let membership = sqlx::query_as::<_, Membership>(
            "SELECT * FROM memberships WHERE user_id = $1 AND business_id = $2",
        )
        .bind(user_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(membership)
    }

    /// Trava a linha do vínculo até o fim da transação.
    /// Serializa bater ponto do mesmo (usuário, filial).
    pub async fn lock_membership<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        business_id: Uuid,
    ) -> Result<Option<Membership>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let membership = sqlx::query_as::<_, Membership>(
            "SELECT * FROM memberships WHERE user_id = $1 AND business_id = $2 FOR UPDATE",
        )
        .bind(user_id)
        .bind(business_id)
        .fetch_optional(executor)
        .await?;
        Ok(membership)
    }

    pub async fn memberships_for_user(&self, user_id: Uuid) -> Result<Vec<UserBusiness>, AppError> {
        let rows = sqlx::query_as::<_, UserBusiness>(
            r#"
            SELECT m.business_id, b.name AS business_name, m.role, m.must_change_password
            FROM memberships m
            JOIN businesses b ON b.id = m.business_id
            WHERE m.user_id = $1
            ORDER BY b.name ASC, b.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn owned_businesses(&self, user_id: Uuid) -> Result<Vec<Business>, AppError> {
        let rows = sqlx::query_as::<_, Business>(
            r#"
            SELECT b.*
            FROM businesses b
            JOIN memberships m ON m.business_id = b.id
            WHERE m.user_id = $1 AND m.role = 'OWNER'
            ORDER BY b.name ASC, b.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn has_pending_password_change(&self, user_id: Uuid) -> Result<bool, AppError> {
        let pending: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM memberships
                WHERE user_id = $1 AND role = 'EMPLOYEE' AND must_change_password = TRUE
            )
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(pending)
    }

    pub async fn clear_password_change_flag<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE memberships SET must_change_password = FALSE WHERE user_id = $1 AND must_change_password = TRUE",
        )
        .bind(user_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Funcionários (papel EMPLOYEE) da filial.
    pub async fn list_staff(&self, business_id: Uuid) -> Result<Vec<StaffMember>, AppError> {
        let rows = sqlx::query_as::<_, StaffMember>(
            r#"
            SELECT u.id AS user_id, u.username, u.email, u.first_name, u.last_name,
                   m.must_change_password
            FROM memberships m
            JOIN users u ON u.id = m.user_id
            WHERE m.business_id = $1 AND m.role = 'EMPLOYEE'
            ORDER BY u.username ASC, u.id ASC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
