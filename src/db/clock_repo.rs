// src/db/clock_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{unique_violation, CLOCKED_SHIFT_INDEX, OPEN_CLOCK_INDEX},
        error::AppError,
    },
    models::clock::TimeClock,
};

#[derive(Clone)]
pub struct ClockRepository {
    pool: PgPool,
}

impl ClockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// O ponto aberto mais recente de (filial, usuário).
    pub async fn find_open<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<TimeClock>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, TimeClock>(
            r#"
            SELECT * FROM time_clocks
            WHERE business_id = $1 AND user_id = $2 AND clock_out IS NULL
            ORDER BY clock_in DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(business_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;
        Ok(entry)
    }

    /// Dentre os turnos informados, os que já têm ponto registrado.
    pub async fn clocked_shift_ids<'e, E>(
        &self,
        executor: E,
        shift_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT DISTINCT work_shift_id FROM time_clocks WHERE work_shift_id = ANY($1)",
        )
        .bind(shift_ids)
        .fetch_all(executor)
        .await?;
        Ok(ids)
    }

    /// Abre o ponto. Os índices únicos parciais são a última barreira contra corridas.
    pub async fn open_entry<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        user_id: Uuid,
        shift_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<TimeClock, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, TimeClock>(
            r#"
            INSERT INTO time_clocks (business_id, user_id, work_shift_id, clock_in)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(business_id)
        .bind(user_id)
        .bind(shift_id)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(|e| match unique_violation(&e).as_deref() {
            Some(OPEN_CLOCK_INDEX) => AppError::AlreadyClockedIn,
            Some(CLOCKED_SHIFT_INDEX) => AppError::ShiftAlreadyClocked,
            _ => e.into(),
        })
    }

    pub async fn close_entry<'e, E>(
        &self,
        executor: E,
        entry_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<TimeClock, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // A condição clock_out IS NULL garante uma única transição OPEN -> CLOSED
        sqlx::query_as::<_, TimeClock>(
            r#"
            UPDATE time_clocks SET clock_out = $2
            WHERE id = $1 AND clock_out IS NULL
            RETURNING *
            "#,
        )
        .bind(entry_id)
        .bind(now)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotClockedIn)
    }

    /// Pontos abertos da filial inteira (classificação de presença).
    pub async fn open_entries_for_business(
        &self,
        business_id: Uuid,
    ) -> Result<Vec<TimeClock>, AppError> {
        let entries = sqlx::query_as::<_, TimeClock>(
            r#"
            SELECT * FROM time_clocks
            WHERE business_id = $1 AND clock_out IS NULL
            ORDER BY clock_in DESC, id DESC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Pontos fechados do usuário que cruzam a janela [start, end).
    pub async fn closed_entries_in_window(
        &self,
        business_id: Uuid,
        user_id: Uuid,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<TimeClock>, AppError> {
        let entries = sqlx::query_as::<_, TimeClock>(
            r#"
            SELECT * FROM time_clocks
            WHERE business_id = $1 AND user_id = $2
              AND clock_out IS NOT NULL
              AND clock_in < $4 AND clock_out > $3
            ORDER BY clock_in ASC, id ASC
            "#,
        )
        .bind(business_id)
        .bind(user_id)
        .bind(window_start)
        .bind(window_end)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    use crate::{
        models::business::MemberRole,
        test_support::{seed_business, seed_member, seed_shift, seed_user},
    };

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 24, h, m, 0).unwrap()
    }

    async fn open_count(pool: &PgPool, business_id: Uuid, user_id: Uuid) -> i64 {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM time_clocks WHERE business_id = $1 AND user_id = $2 AND clock_out IS NULL",
        )
        .bind(business_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn unique_index_blocks_second_open_entry(pool: PgPool) {
        let business = seed_business(&pool, "Centro").await;
        let user = seed_user(&pool, "ana").await;
        seed_member(&pool, business.id, user.id, MemberRole::Employee, false).await;
        let morning = seed_shift(&pool, business.id, user.id, at(8, 0), at(12, 0)).await;
        let overlap = seed_shift(&pool, business.id, user.id, at(9, 0), at(13, 0)).await;

        let repo = ClockRepository::new(pool.clone());
        repo.open_entry(&pool, business.id, user.id, morning.id, at(9, 0))
            .await
            .unwrap();

        // Sem passar pela checagem do serviço: quem barra é o índice parcial
        let second = repo
            .open_entry(&pool, business.id, user.id, overlap.id, at(9, 5))
            .await;
        assert!(matches!(second, Err(AppError::AlreadyClockedIn)));
        assert_eq!(open_count(&pool, business.id, user.id).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn shift_cannot_be_clocked_twice(pool: PgPool) {
        let business = seed_business(&pool, "Centro").await;
        let user = seed_user(&pool, "ana").await;
        seed_member(&pool, business.id, user.id, MemberRole::Employee, false).await;
        let shift = seed_shift(&pool, business.id, user.id, at(9, 0), at(17, 0)).await;

        let repo = ClockRepository::new(pool.clone());
        let entry = repo
            .open_entry(&pool, business.id, user.id, shift.id, at(9, 0))
            .await
            .unwrap();
        repo.close_entry(&pool, entry.id, at(12, 0)).await.unwrap();

        let again = repo
            .open_entry(&pool, business.id, user.id, shift.id, at(13, 0))
            .await;
        assert!(matches!(again, Err(AppError::ShiftAlreadyClocked)));
        assert_eq!(open_count(&pool, business.id, user.id).await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn closing_twice_keeps_first_clock_out(pool: PgPool) {
        let business = seed_business(&pool, "Centro").await;
        let user = seed_user(&pool, "ana").await;
        seed_member(&pool, business.id, user.id, MemberRole::Employee, false).await;
        let shift = seed_shift(&pool, business.id, user.id, at(9, 0), at(17, 0)).await;

        let repo = ClockRepository::new(pool.clone());
        let entry = repo
            .open_entry(&pool, business.id, user.id, shift.id, at(9, 0))
            .await
            .unwrap();
        let closed = repo.close_entry(&pool, entry.id, at(17, 0)).await.unwrap();
        assert_eq!(closed.clock_out, Some(at(17, 0)));

        let second = repo
            .close_entry(&pool, entry.id, at(17, 0) + Duration::minutes(30))
            .await;
        assert!(matches!(second, Err(AppError::NotClockedIn)));

        let stored: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT clock_out FROM time_clocks WHERE id = $1")
                .bind(entry.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(stored, Some(at(17, 0)));
        assert!(repo.find_open(&pool, business.id, user.id).await.unwrap().is_none());
    }
}
