// src/services/shift_service.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BusinessRepository, ShiftRepository},
    models::schedule::{ShiftView, WorkShift},
};

#[derive(Clone)]
pub struct ShiftService {
    repo: ShiftRepository,
    business_repo: BusinessRepository,
    pool: PgPool,
}

pub fn check_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AppError> {
    if end <= start {
        return Err(AppError::InvalidShiftWindow);
    }
    Ok(())
}

impl ShiftService {
    pub fn new(repo: ShiftRepository, business_repo: BusinessRepository, pool: PgPool) -> Self {
        Self {
            repo,
            business_repo,
            pool,
        }
    }

    pub async fn list_shifts(
        &self,
        business_id: Uuid,
        range_start: Option<DateTime<Utc>>,
        range_end: Option<DateTime<Utc>>,
        assignee: Option<Uuid>,
    ) -> Result<Vec<ShiftView>, AppError> {
        let rows = self
            .repo
            .list_shifts(business_id, range_start, range_end, assignee)
            .await?;
        Ok(rows.into_iter().map(ShiftView::from).collect())
    }

    pub async fn create_shift(
        &self,
        business_id: Uuid,
        created_by: Uuid,
        assignee_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        notes: &str,
    ) -> Result<WorkShift, AppError> {
        check_window(start, end)?;

        if self
            .business_repo
            .find_membership(assignee_id, business_id)
            .await?
            .is_none()
        {
            return Err(AppError::AssigneeNotMember);
        }

        let shift = self
            .repo
            .create_shift(
                &self.pool,
                business_id,
                assignee_id,
                start,
                end,
                notes.trim(),
                created_by,
            )
            .await?;

        tracing::info!(shift_id = %shift.id, %business_id, %assignee_id, "turno criado");
        Ok(shift)
    }

    pub async fn delete_shift(&self, business_id: Uuid, shift_id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete_shift(business_id, shift_id).await? {
            return Err(AppError::ResourceNotFound(format!("shift {}", shift_id)));
        }
        tracing::info!(%shift_id, %business_id, "turno removido");
        Ok(())
    }
}
