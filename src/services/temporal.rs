// src/services/temporal.rs
//
// Resolve expressões como "next friday" / "this monday" para uma data concreta.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Weekday};

use crate::common::error::AppError;

const WEEKDAYS: [(&str, Weekday); 7] = [
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    Next,
    This,
    Bare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayHint {
    pub qualifier: Qualifier,
    pub weekday: Weekday,
}

/// Primeiro dia da semana citado no texto (palavra inteira, sem diferenciar maiúsculas).
pub fn weekday_hint(raw_text: &str) -> Option<WeekdayHint> {
    let lowered = raw_text.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphabetic())
        .filter(|t| !t.is_empty())
        .collect();

    tokens.iter().enumerate().find_map(|(i, token)| {
        let weekday = WEEKDAYS
            .iter()
            .find(|(name, _)| name == token)
            .map(|(_, wd)| *wd)?;

        let qualifier = match i.checked_sub(1).map(|prev| tokens[prev]) {
            Some("next") => Qualifier::Next,
            Some("this") => Qualifier::This,
            _ => Qualifier::Bare,
        };
        Some(WeekdayHint { qualifier, weekday })
    })
}

/// Próxima ocorrência estritamente futura (nunca hoje).
pub fn next_occurrence(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let target = weekday.num_days_from_monday() as i64;
    let current = today.weekday().num_days_from_monday() as i64;
    let mut days_ahead = (target - current).rem_euclid(7);
    if days_ahead == 0 {
        days_ahead = 7;
    }
    today + Duration::days(days_ahead)
}

/// Ocorrência na semana corrente (segunda a domingo) se ainda não passou.
pub fn this_occurrence(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let week_start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    let candidate = week_start + Duration::days(weekday.num_days_from_monday() as i64);
    if candidate >= today {
        candidate
    } else {
        next_occurrence(today, weekday)
    }
}

pub fn apply_hint(today: NaiveDate, hint: WeekdayHint) -> NaiveDate {
    match hint.qualifier {
        Qualifier::This => this_occurrence(today, hint.weekday),
        // Dia da semana sem qualificador sempre significa o próximo
        Qualifier::Next | Qualifier::Bare => next_occurrence(today, hint.weekday),
    }
}

/// Aceita "YYYY-MM-DD" ou um timestamp RFC 3339.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, AppError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .ok_or_else(|| AppError::InvalidDateExpression(value.to_string()))
}

/// O dia da semana citado no texto tem precedência sobre a data extraída.
pub fn resolve(
    raw_text: &str,
    today: NaiveDate,
    extracted_iso_date: Option<&str>,
) -> Result<NaiveDate, AppError> {
    if let Some(hint) = weekday_hint(raw_text) {
        return Ok(apply_hint(today, hint));
    }

    match extracted_iso_date {
        Some(value) => parse_iso_date(value),
        None => Err(AppError::InvalidDateExpression(raw_text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2026-02-23 é uma segunda-feira
    const MONDAY: (i32, u32, u32) = (2026, 2, 23);

    #[test]
    fn this_friday_on_monday_is_same_week() {
        let today = date(MONDAY.0, MONDAY.1, MONDAY.2);
        assert_eq!(
            resolve("who works this Friday?", today, None).unwrap(),
            date(2026, 2, 27)
        );
    }

    #[test]
    fn this_friday_on_saturday_rolls_to_next_week() {
        let saturday = date(2026, 2, 28);
        assert_eq!(
            resolve("this friday", saturday, None).unwrap(),
            date(2026, 3, 6)
        );
    }

    #[test]
    fn this_weekday_today_is_today() {
        let today = date(MONDAY.0, MONDAY.1, MONDAY.2);
        assert_eq!(resolve("this monday", today, None).unwrap(), today);
    }

    #[test]
    fn next_weekday_never_returns_today() {
        let today = date(MONDAY.0, MONDAY.1, MONDAY.2);
        assert_eq!(
            resolve("next Monday please", today, None).unwrap(),
            date(2026, 3, 2)
        );
    }

    #[test]
    fn bare_weekday_is_strictly_future() {
        let today = date(MONDAY.0, MONDAY.1, MONDAY.2);
        assert_eq!(resolve("MONDAY", today, None).unwrap(), date(2026, 3, 2));
        assert_eq!(resolve("wednesday", today, None).unwrap(), date(2026, 2, 25));
    }

    #[test]
    fn weekday_overrides_extracted_date() {
        let today = date(MONDAY.0, MONDAY.1, MONDAY.2);
        assert_eq!(
            resolve("this friday", today, Some("2026-05-01")).unwrap(),
            date(2026, 2, 27)
        );
    }

    #[test]
    fn weekday_must_be_whole_word() {
        assert_eq!(weekday_hint("mondays are slow"), None);
        assert_eq!(weekday_hint("sundaybrunch"), None);
        assert_eq!(
            weekday_hint("Next-Sunday?"),
            Some(WeekdayHint {
                qualifier: Qualifier::Next,
                weekday: Weekday::Sun
            })
        );
    }

    #[test]
    fn falls_back_to_extracted_date() {
        let today = date(MONDAY.0, MONDAY.1, MONDAY.2);
        assert_eq!(
            resolve("who works tomorrow", today, Some("2026-02-24")).unwrap(),
            date(2026, 2, 24)
        );
        assert_eq!(
            resolve("who works tomorrow", today, Some("2026-02-24T00:00:00Z")).unwrap(),
            date(2026, 2, 24)
        );
    }

    #[test]
    fn unparsable_extracted_date_is_invalid_expression() {
        let today = date(MONDAY.0, MONDAY.1, MONDAY.2);
        assert!(matches!(
            resolve("who works soon", today, Some("soonish")),
            Err(AppError::InvalidDateExpression(_))
        ));
        assert!(matches!(
            resolve("who works soon", today, None),
            Err(AppError::InvalidDateExpression(_))
        ));
    }
}
