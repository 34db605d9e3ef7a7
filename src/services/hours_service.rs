// src/services/hours_service.rs
//
// Horas trabalhadas (ponto) e planejadas (turnos) na semana e no mês correntes,
// recortando cada intervalo pela janela no fuso local da filial.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClockRepository, ShiftRepository},
    models::{
        business::Business,
        clock::TimeClock,
        hours::{HoursPair, HoursSummary},
        schedule::WorkShift,
    },
};

/// Janela semiaberta [start, end) em UTC, com os dias locais que ela cobre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
}

#[derive(Clone)]
pub struct HoursService {
    clock_repo: ClockRepository,
    shift_repo: ShiftRepository,
}

/// Meia-noite local em UTC. Se a meia-noite cair num buraco de horário de verão,
/// usa o primeiro instante válido do dia.
pub fn local_midnight(tz: &Tz, day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_hms_opt(0, 0, 0).unwrap_or_default();
    (0..=3)
        .find_map(|h| {
            tz.from_local_datetime(&(midnight + Duration::hours(h)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

fn window_between(tz: &Tz, first_day: NaiveDate, last_day: NaiveDate) -> Window {
    Window {
        start: local_midnight(tz, first_day),
        end: local_midnight(tz, last_day + Duration::days(1)),
        first_day,
        last_day,
    }
}

/// Segunda 00:00 até domingo 23:59:59.999 (hora local).
pub fn week_window(tz: &Tz, today: NaiveDate) -> Window {
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    window_between(tz, monday, monday + Duration::days(6))
}

/// Do primeiro ao último dia do mês de `today` (hora local).
pub fn month_window(tz: &Tz, today: NaiveDate) -> Window {
    let first = today.with_day(1).unwrap_or(today);
    let next_month_first = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    }
    .unwrap_or(first);
    window_between(tz, first, next_month_first - Duration::days(1))
}

/// Soma, em minutos, da interseção de cada intervalo com a janela.
pub fn clipped_minutes<I>(intervals: I, window: &Window) -> i64
where
    I: IntoIterator<Item = (DateTime<Utc>, DateTime<Utc>)>,
{
    let seconds: i64 = intervals
        .into_iter()
        .map(|(start, end)| {
            let start = start.max(window.start);
            let end = end.min(window.end);
            if end > start {
                (end - start).num_seconds()
            } else {
                0
            }
        })
        .sum();
    seconds / 60
}

/// Pontos abertos não contam (ainda não há o que medir).
fn worked_intervals(entries: &[TimeClock]) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    entries
        .iter()
        .filter_map(|e| e.clock_out.map(|out| (e.clock_in, out)))
        .collect()
}

fn scheduled_intervals(shifts: &[WorkShift]) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    shifts.iter().map(|s| (s.start_at, s.end_at)).collect()
}

pub fn summarize(
    tz: &Tz,
    now: DateTime<Utc>,
    entries: &[TimeClock],
    shifts: &[WorkShift],
) -> HoursSummary {
    let today = now.with_timezone(tz).date_naive();
    let week = week_window(tz, today);
    let month = month_window(tz, today);

    let worked = worked_intervals(entries);
    let scheduled = scheduled_intervals(shifts);

    HoursSummary {
        week_worked: HoursPair::from_minutes(clipped_minutes(worked.iter().copied(), &week)),
        week_scheduled: HoursPair::from_minutes(clipped_minutes(scheduled.iter().copied(), &week)),
        month_worked: HoursPair::from_minutes(clipped_minutes(worked.iter().copied(), &month)),
        month_scheduled: HoursPair::from_minutes(clipped_minutes(scheduled.iter().copied(), &month)),
        week_start: week.first_day,
        week_end: week.last_day,
        month_start: month.first_day,
        month_end: month.last_day,
    }
}

impl HoursService {
    pub fn new(clock_repo: ClockRepository, shift_repo: ShiftRepository) -> Self {
        Self {
            clock_repo,
            shift_repo,
        }
    }

    pub async fn aggregate(
        &self,
        business: &Business,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<HoursSummary, AppError> {
        let tz = business.tz()?;
        let today = now.with_timezone(&tz).date_naive();
        let week = week_window(&tz, today);
        let month = month_window(&tz, today);

        // Uma consulta cobrindo as duas janelas
        let span_start = week.start.min(month.start);
        let span_end = week.end.max(month.end);

        let entries = self
            .clock_repo
            .closed_entries_in_window(business.id, user_id, span_start, span_end)
            .await?;
        let shifts = self
            .shift_repo
            .shifts_for_user_in_window(business.id, user_id, span_start, span_end)
            .await?;

        Ok(summarize(&tz, now, &entries, &shifts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Dublin;

    fn local(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> DateTime<Utc> {
        Dublin
            .with_ymd_and_hms(y, m, d, hh, mm, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn entry(clock_in: DateTime<Utc>, clock_out: Option<DateTime<Utc>>) -> TimeClock {
        TimeClock {
            id: Uuid::new_v4(),
            business_id: Uuid::nil(),
            user_id: Uuid::nil(),
            work_shift_id: None,
            clock_in,
            clock_out,
            created_at: clock_in,
        }
    }

    fn shift(start: DateTime<Utc>, end: DateTime<Utc>) -> WorkShift {
        WorkShift {
            id: Uuid::new_v4(),
            business_id: Uuid::nil(),
            user_id: Uuid::nil(),
            start_at: start,
            end_at: end,
            notes: String::new(),
            created_by: None,
            created_at: start,
        }
    }

    fn pair(hours: i64, minutes: i64) -> HoursPair {
        HoursPair { hours, minutes }
    }

    fn friday_noon() -> DateTime<Utc> {
        local(2026, 2, 27, 12, 0)
    }

    #[test]
    fn worked_totals_for_week_and_month() {
        let entries = vec![
            entry(local(2026, 2, 24, 9, 0), Some(local(2026, 2, 24, 17, 0))),
            entry(local(2026, 2, 26, 10, 0), Some(local(2026, 2, 26, 14, 30))),
            entry(local(2026, 3, 2, 9, 0), Some(local(2026, 3, 2, 12, 0))),
            entry(local(2026, 2, 27, 9, 0), None),
        ];

        let summary = summarize(&Dublin, friday_noon(), &entries, &[]);

        assert_eq!(summary.week_worked, pair(12, 30));
        assert_eq!(summary.month_worked, pair(12, 30));
        assert_eq!(summary.week_start, NaiveDate::from_ymd_opt(2026, 2, 23).unwrap());
        assert_eq!(summary.week_end, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(summary.month_start, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(summary.month_end, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
    }

    #[test]
    fn scheduled_totals_clip_overnight_shift() {
        let shifts = vec![
            shift(local(2026, 2, 24, 9, 0), local(2026, 2, 24, 17, 0)),
            shift(local(2026, 2, 26, 10, 0), local(2026, 2, 26, 14, 30)),
            shift(local(2026, 2, 28, 23, 0), local(2026, 3, 1, 2, 0)),
            shift(local(2026, 3, 2, 9, 0), local(2026, 3, 2, 12, 0)),
        ];

        let summary = summarize(&Dublin, friday_noon(), &[], &shifts);

        assert_eq!(summary.week_scheduled, pair(15, 30));
        assert_eq!(summary.month_scheduled, pair(13, 30));
    }

    #[test]
    fn no_activity_is_zero() {
        let summary = summarize(&Dublin, friday_noon(), &[], &[]);
        assert_eq!(summary.week_worked, pair(0, 0));
        assert_eq!(summary.week_scheduled, pair(0, 0));
        assert_eq!(summary.month_worked, pair(0, 0));
        assert_eq!(summary.month_scheduled, pair(0, 0));
    }

    #[test]
    fn entry_across_month_boundary_splits_exactly() {
        let entries = vec![entry(local(2026, 2, 28, 23, 0), Some(local(2026, 3, 1, 2, 0)))];

        let february = summarize(&Dublin, friday_noon(), &entries, &[]);
        let march = summarize(&Dublin, local(2026, 3, 10, 12, 0), &entries, &[]);

        assert_eq!(february.month_worked, pair(1, 0));
        assert_eq!(march.month_worked, pair(2, 0));
        let total = february.month_worked.hours * 60
            + february.month_worked.minutes
            + march.month_worked.hours * 60
            + march.month_worked.minutes;
        assert_eq!(total, 180);
    }

    #[test]
    fn entry_across_week_boundary_is_clipped() {
        // Domingo 22:00 até segunda 01:00
        let entries = vec![entry(local(2026, 3, 1, 22, 0), Some(local(2026, 3, 2, 1, 0)))];
        let this_week = summarize(&Dublin, friday_noon(), &entries, &[]);
        let next_week = summarize(&Dublin, local(2026, 3, 3, 12, 0), &entries, &[]);
        assert_eq!(this_week.week_worked, pair(2, 0));
        assert_eq!(next_week.week_worked, pair(1, 0));
    }

    #[test]
    fn december_month_window_ends_on_the_31st() {
        let window = month_window(&Dublin, NaiveDate::from_ymd_opt(2026, 12, 15).unwrap());
        assert_eq!(window.last_day, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
        assert_eq!(window.end, local(2027, 1, 1, 0, 0));
    }

    #[test]
    fn week_window_follows_local_time_in_summer() {
        // Em julho Dublin está em UTC+1: segunda 00:00 local = domingo 23:00 UTC
        let window = week_window(&Dublin, NaiveDate::from_ymd_opt(2026, 7, 15).unwrap());
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 7, 12, 23, 0, 0).unwrap());
    }
}
