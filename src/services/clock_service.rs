// src/services/clock_service.rs
//
// Máquina de estados do ponto por (filial, usuário): CLOSED -> OPEN -> CLOSED.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{AppError, DenialReason, DenialStyle},
    db::{BusinessRepository, ClockRepository, ShiftRepository},
    models::{clock::TimeClock, schedule::WorkShift},
};

#[derive(Clone)]
pub struct ClockService {
    clock_repo: ClockRepository,
    shift_repo: ShiftRepository,
    business_repo: BusinessRepository,
    pool: PgPool,
}

/// O turno que contém `now`; havendo vários, o de início mais cedo (desempate pelo id).
pub fn pick_active_shift(shifts: &[WorkShift], now: DateTime<Utc>) -> Option<&WorkShift> {
    shifts
        .iter()
        .filter(|s| s.contains(now))
        .min_by_key(|s| (s.start_at, s.id))
}

/// Pré-condições de entrada, na ordem: ponto aberto, turno ativo, turno já batido.
pub fn plan_clock_in<'a>(
    open_entry: Option<&TimeClock>,
    active_shifts: &'a [WorkShift],
    clocked_shift_ids: &HashSet<Uuid>,
    now: DateTime<Utc>,
) -> Result<&'a WorkShift, AppError> {
    if open_entry.is_some() {
        return Err(AppError::AlreadyClockedIn);
    }

    let shift = pick_active_shift(active_shifts, now).ok_or(AppError::NoActiveShift)?;

    if clocked_shift_ids.contains(&shift.id) {
        return Err(AppError::ShiftAlreadyClocked);
    }

    Ok(shift)
}

fn not_member() -> AppError {
    AppError::Forbidden {
        reason: DenialReason::NotMember,
        style: DenialStyle::Structured,
    }
}

impl ClockService {
    pub fn new(
        clock_repo: ClockRepository,
        shift_repo: ShiftRepository,
        business_repo: BusinessRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            clock_repo,
            shift_repo,
            business_repo,
            pool,
        }
    }

    pub async fn clock_in(
        &self,
        business_id: Uuid,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<TimeClock, AppError> {
        let mut tx = self.pool.begin().await?;

        // A trava no vínculo serializa entradas concorrentes do mesmo par
        self.business_repo
            .lock_membership(&mut *tx, user_id, business_id)
            .await?
            .ok_or_else(not_member)?;

        let open_entry = self
            .clock_repo
            .find_open(&mut *tx, business_id, user_id)
            .await?;

        let active_shifts = self
            .shift_repo
            .active_shifts_for_user(&mut *tx, business_id, user_id, now)
            .await?;

        let shift_ids: Vec<Uuid> = active_shifts.iter().map(|s| s.id).collect();
        let clocked: HashSet<Uuid> = if shift_ids.is_empty() {
            HashSet::new()
        } else {
            self.clock_repo
                .clocked_shift_ids(&mut *tx, &shift_ids)
                .await?
                .into_iter()
                .collect()
        };

        let shift = plan_clock_in(open_entry.as_ref(), &active_shifts, &clocked, now)?;

        let entry = self
            .clock_repo
            .open_entry(&mut *tx, business_id, user_id, shift.id, now)
            .await?;

        tx.commit().await?;

        tracing::info!(%business_id, %user_id, shift_id = %shift.id, "entrada registrada");
        Ok(entry)
    }

    pub async fn clock_out(
        &self,
        business_id: Uuid,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<TimeClock, AppError> {
        let mut tx = self.pool.begin().await?;

        self.business_repo
            .lock_membership(&mut *tx, user_id, business_id)
            .await?
            .ok_or_else(not_member)?;

        let open_entry = self
            .clock_repo
            .find_open(&mut *tx, business_id, user_id)
            .await?
            .ok_or(AppError::NotClockedIn)?;

        let entry = self
            .clock_repo
            .close_entry(&mut *tx, open_entry.id, now)
            .await?;

        tx.commit().await?;

        tracing::info!(%business_id, %user_id, entry_id = %entry.id, "saída registrada");
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 24, h, m, 0).unwrap()
    }

    fn shift(start: DateTime<Utc>, hours: i64) -> WorkShift {
        WorkShift {
            id: Uuid::new_v4(),
            business_id: Uuid::nil(),
            user_id: Uuid::nil(),
            start_at: start,
            end_at: start + Duration::hours(hours),
            notes: String::new(),
            created_by: None,
            created_at: start,
        }
    }

    fn open_entry(clock_in: DateTime<Utc>) -> TimeClock {
        TimeClock {
            id: Uuid::new_v4(),
            business_id: Uuid::nil(),
            user_id: Uuid::nil(),
            work_shift_id: None,
            clock_in,
            clock_out: None,
            created_at: clock_in,
        }
    }

    #[test]
    fn open_entry_wins_over_everything() {
        let shifts = vec![shift(at(9, 0), 8)];
        let result = plan_clock_in(Some(&open_entry(at(9, 0))), &shifts, &HashSet::new(), at(10, 0));
        assert!(matches!(result, Err(AppError::AlreadyClockedIn)));

        // Mesmo sem turno, o ponto aberto é a primeira falha
        let result = plan_clock_in(Some(&open_entry(at(9, 0))), &[], &HashSet::new(), at(10, 0));
        assert!(matches!(result, Err(AppError::AlreadyClockedIn)));
    }

    #[test]
    fn no_shift_containing_now() {
        let shifts = vec![shift(at(12, 0), 4)];
        let result = plan_clock_in(None, &shifts, &HashSet::new(), at(11, 59));
        assert!(matches!(result, Err(AppError::NoActiveShift)));
    }

    #[test]
    fn shift_bounds_are_inclusive() {
        let shifts = vec![shift(at(9, 0), 8)];
        assert!(plan_clock_in(None, &shifts, &HashSet::new(), at(9, 0)).is_ok());
        assert!(plan_clock_in(None, &shifts, &HashSet::new(), at(17, 0)).is_ok());
    }

    #[test]
    fn earliest_overlapping_shift_is_chosen() {
        let early = shift(at(8, 0), 4);
        let late = shift(at(9, 0), 4);
        let shifts = vec![late.clone(), early.clone()];
        let chosen = plan_clock_in(None, &shifts, &HashSet::new(), at(10, 0)).unwrap();
        assert_eq!(chosen.id, early.id);
    }

    #[test]
    fn already_clocked_shift_is_rejected() {
        let s = shift(at(9, 0), 8);
        let clocked: HashSet<Uuid> = [s.id].into_iter().collect();
        let result = plan_clock_in(None, std::slice::from_ref(&s), &clocked, at(10, 0));
        assert!(matches!(result, Err(AppError::ShiftAlreadyClocked)));
    }

    #[test]
    fn overnight_shift_is_active_after_midnight() {
        let s = shift(at(23, 0), 3);
        let after_midnight = Utc.with_ymd_and_hms(2026, 2, 25, 1, 30, 0).unwrap();
        assert_eq!(pick_active_shift(std::slice::from_ref(&s), after_midnight).map(|x| x.id), Some(s.id));
    }

    mod with_database {
        use super::*;
        use crate::{
            db::{BusinessRepository, ClockRepository, ShiftRepository},
            models::business::MemberRole,
            test_support::{seed_business, seed_member, seed_shift, seed_user},
        };

        fn service(pool: &PgPool) -> ClockService {
            ClockService::new(
                ClockRepository::new(pool.clone()),
                ShiftRepository::new(pool.clone()),
                BusinessRepository::new(pool.clone()),
                pool.clone(),
            )
        }

        #[sqlx::test(migrations = "./migrations")]
        async fn second_clock_out_changes_nothing(pool: PgPool) {
            let business = seed_business(&pool, "Centro").await;
            let user = seed_user(&pool, "ana").await;
            seed_member(&pool, business.id, user.id, MemberRole::Employee, false).await;
            let shift = seed_shift(&pool, business.id, user.id, at(9, 0), at(17, 0)).await;
            let clock = service(&pool);

            let opened = clock.clock_in(business.id, user.id, at(9, 2)).await.unwrap();
            assert_eq!(opened.work_shift_id, Some(shift.id));

            let closed = clock.clock_out(business.id, user.id, at(17, 1)).await.unwrap();
            assert_eq!(closed.id, opened.id);
            assert_eq!(closed.clock_out, Some(at(17, 1)));

            let again = clock.clock_out(business.id, user.id, at(17, 30)).await;
            assert!(matches!(again, Err(AppError::NotClockedIn)));

            let entries: Vec<TimeClock> =
                sqlx::query_as("SELECT * FROM time_clocks WHERE business_id = $1 AND user_id = $2")
                    .bind(business.id)
                    .bind(user.id)
                    .fetch_all(&pool)
                    .await
                    .unwrap();
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].clock_out, Some(at(17, 1)));
        }

        #[sqlx::test(migrations = "./migrations")]
        async fn clock_in_twice_is_rejected(pool: PgPool) {
            let business = seed_business(&pool, "Centro").await;
            let user = seed_user(&pool, "ana").await;
            seed_member(&pool, business.id, user.id, MemberRole::Employee, false).await;
            seed_shift(&pool, business.id, user.id, at(9, 0), at(17, 0)).await;
            let clock = service(&pool);

            clock.clock_in(business.id, user.id, at(9, 0)).await.unwrap();
            let again = clock.clock_in(business.id, user.id, at(9, 30)).await;
            assert!(matches!(again, Err(AppError::AlreadyClockedIn)));
        }

        #[sqlx::test(migrations = "./migrations")]
        async fn outsider_cannot_clock_in(pool: PgPool) {
            let business = seed_business(&pool, "Centro").await;
            let user = seed_user(&pool, "intruso").await;
            let clock = service(&pool);

            let result = clock.clock_in(business.id, user.id, at(9, 0)).await;
            assert!(matches!(
                result,
                Err(AppError::Forbidden {
                    reason: DenialReason::NotMember,
                    ..
                })
            ));
        }
    }
}
