// src/db/shift_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::schedule::{ShiftRow, WorkShift},
};

const SHIFT_ROW_SELECT: &str = r#"
    SELECT s.id, s.user_id, u.username, u.first_name, u.last_name,
           s.start_at, s.end_at, s.notes
    FROM work_shifts s
    JOIN users u ON u.id = s.user_id
    WHERE s.business_id = "#;

#[derive(Clone)]
pub struct ShiftRepository {
    pool: PgPool,
}

impl ShiftRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_shift<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        user_id: Uuid,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        notes: &str,
        created_by: Uuid,
    ) -> Result<WorkShift, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let shift = sqlx::query_as::<_, WorkShift>(
            r#"
            INSERT INTO work_shifts (business_id, user_id, start_at, end_at, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(business_id)
        .bind(user_id)
        .bind(start_at)
        .bind(end_at)
        .bind(notes)
        .bind(created_by)
        .fetch_one(executor)
        .await?;
        Ok(shift)
    }

    /// Remoção definitiva, sempre no escopo da filial. Retorna se algo foi apagado.
    pub async fn delete_shift(&self, business_id: Uuid, shift_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM work_shifts WHERE id = $1 AND business_id = $2")
            .bind(shift_id)
            .bind(business_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Listagem da filial, com filtros opcionais de sobreposição e de responsável.
    /// Ordem: início ascendente, desempate pelo menor id.
    pub async fn list_shifts(
        &self,
        business_id: Uuid,
        range_start: Option<DateTime<Utc>>,
        range_end: Option<DateTime<Utc>>,
        assignee: Option<Uuid>,
    ) -> Result<Vec<ShiftRow>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new(SHIFT_ROW_SELECT);
        query.push_bind(business_id);

        // Sobreposição: start <= fim da faixa AND end >= início da faixa
        if let Some(range_end) = range_end {
            query.push(" AND s.start_at <= ").push_bind(range_end);
        }
        if let Some(range_start) = range_start {
            query.push(" AND s.end_at >= ").push_bind(range_start);
        }
        if let Some(user_id) = assignee {
            query.push(" AND s.user_id = ").push_bind(user_id);
        }
        query.push(" ORDER BY s.start_at ASC, s.id ASC");

        let rows = query
            .build_query_as::<ShiftRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Turnos do usuário que contêm o instante (start <= now <= end).
    pub async fn active_shifts_for_user<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<WorkShift>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let shifts = sqlx::query_as::<_, WorkShift>(
            r#"
            SELECT * FROM work_shifts
            WHERE business_id = $1 AND user_id = $2
              AND start_at <= $3 AND end_at >= $3
            ORDER BY start_at ASC, id ASC
            "#,
        )
        .bind(business_id)
        .bind(user_id)
        .bind(now)
        .fetch_all(executor)
        .await?;
        Ok(shifts)
    }

    /// Turnos que já começaram (ou começam dentro da tolerância) e ainda não acabaram.
    pub async fn shifts_in_progress(
        &self,
        business_id: Uuid,
        starts_before: DateTime<Utc>,
        ends_after: DateTime<Utc>,
    ) -> Result<Vec<WorkShift>, AppError> {
        let shifts = sqlx::query_as::<_, WorkShift>(
            r#"
            SELECT * FROM work_shifts
            WHERE business_id = $1 AND start_at <= $2 AND end_at >= $3
            ORDER BY start_at ASC, id ASC
            "#,
        )
        .bind(business_id)
        .bind(starts_before)
        .bind(ends_after)
        .fetch_all(&self.pool)
        .await?;
        Ok(shifts)
    }

    /// Turnos do usuário que cruzam a janela [start, end).
    pub async fn shifts_for_user_in_window(
        &self,
        business_id: Uuid,
        user_id: Uuid,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<WorkShift>, AppError> {
        let shifts = sqlx::query_as::<_, WorkShift>(
            r#"
            SELECT * FROM work_shifts
            WHERE business_id = $1 AND user_id = $2
              AND start_at < $4 AND end_at > $3
            ORDER BY start_at ASC, id ASC
            "#,
        )
        .bind(business_id)
        .bind(user_id)
        .bind(window_start)
        .bind(window_end)
        .fetch_all(&self.pool)
        .await?;
        Ok(shifts)
    }
}
