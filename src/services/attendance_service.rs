// src/services/attendance_service.rs

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BusinessRepository, ClockRepository, ShiftRepository},
    models::{
        attendance::{AttendanceSnapshot, ShiftWindow, StaffIn, StaffLate, StaffOut},
        business::StaffMember,
        clock::TimeClock,
        schedule::WorkShift,
    },
    services::business_service::sort_by_display_name,
};

/// Tolerância fixa depois do início do turno antes de "fora" virar "atrasado".
pub const GRACE_PERIOD_MINUTES: i64 = 15;

pub fn grace_period() -> Duration {
    Duration::minutes(GRACE_PERIOD_MINUTES)
}

#[derive(Clone)]
pub struct AttendanceService {
    business_repo: BusinessRepository,
    clock_repo: ClockRepository,
    shift_repo: ShiftRepository,
}

fn window(shift: &WorkShift) -> ShiftWindow {
    ShiftWindow {
        id: shift.id,
        start: shift.start_at,
        end: shift.end_at,
    }
}

/// Classifica cada funcionário em dentro / atrasado / fora.
/// `open_entries` e `shifts` podem conter outros usuários; o filtro é por usuário.
pub fn classify(
    staff: &[StaffMember],
    open_entries: &[TimeClock],
    shifts: &[WorkShift],
    now: DateTime<Utc>,
) -> AttendanceSnapshot {
    let grace = grace_period();
    let mut ordered = staff.to_vec();
    sort_by_display_name(&mut ordered);

    let mut snapshot = AttendanceSnapshot::default();

    for member in &ordered {
        let display_name = member.display_name();

        let open = open_entries
            .iter()
            .filter(|e| e.user_id == member.user_id && e.is_open())
            .max_by_key(|e| (e.clock_in, e.id));

        if let Some(entry) = open {
            snapshot.in_.push(StaffIn {
                user_id: member.user_id,
                display_name,
                clock_in: entry.clock_in,
            });
            continue;
        }

        let current_shift = shifts
            .iter()
            .filter(|s| s.user_id == member.user_id)
            .filter(|s| s.start_at <= now + grace && s.end_at >= now)
            .min_by_key(|s| (s.start_at, s.id));

        match current_shift {
            Some(shift) if now > shift.start_at + grace => snapshot.late.push(StaffLate {
                user_id: member.user_id,
                display_name,
                shift: window(shift),
            }),
            other => snapshot.out.push(StaffOut {
                user_id: member.user_id,
                display_name,
                shift: other.map(window),
            }),
        }
    }

    snapshot
}

impl AttendanceService {
    pub fn new(
        business_repo: BusinessRepository,
        clock_repo: ClockRepository,
        shift_repo: ShiftRepository,
    ) -> Self {
        Self {
            business_repo,
            clock_repo,
            shift_repo,
        }
    }

    pub async fn snapshot(
        &self,
        business_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<AttendanceSnapshot, AppError> {
        let staff = self.business_repo.list_staff(business_id).await?;
        let open_entries = self.clock_repo.open_entries_for_business(business_id).await?;
        let shifts = self
            .shift_repo
            .shifts_in_progress(business_id, now + grace_period(), now)
            .await?;

        Ok(classify(&staff, &open_entries, &shifts, now))
    }
}
