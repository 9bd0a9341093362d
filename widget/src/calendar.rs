//! Month calendar view.
//!
//! Records carry their schedule in `status` as `"<start>"` or
//! `"<start> ~ <end>"`. Every record whose inclusive date range covers a day
//! is placed in that day's cell. Comparison is on calendar dates only, so
//! time-of-day and UTC offsets in the tokens never move an event to another
//! day.

use std::fmt;

use chrono::{Datelike, Months, NaiveDate};
use shared::NormalizedRecord;

use crate::{Result, WidgetError};

/// Titles shown per day before collapsing into `+N more`.
pub const MAX_EVENTS_PER_DAY: usize = 3;
/// Longer titles are cut to this many characters plus `...`.
pub const TITLE_MAX_CHARS: usize = 9;
pub const UNTITLED: &str = "Untitled";
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A record with its parsed date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent<'a> {
    pub record: &'a NormalizedRecord,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl<'a> CalendarEvent<'a> {
    pub fn from_record(record: &'a NormalizedRecord) -> Self {
        match parse_schedule(&record.status) {
            Some((start, end)) => Self {
                record,
                start: Some(start),
                end: Some(end),
            },
            None => Self {
                record,
                start: None,
                end: None,
            },
        }
    }

    /// Inclusive membership test. Undated events never match.
    pub fn occurs_on(&self, day: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= day && day <= end,
            _ => false,
        }
    }
}

/// Parse `"<start>"` or `"<start> ~ <end>"` into an inclusive range.
///
/// A lone start is a one-day range. Placeholders such as `No Date` or
/// `No Status` simply fail to parse.
pub fn parse_schedule(status: &str) -> Option<(NaiveDate, NaiveDate)> {
    let mut parts = status.split('~');
    let start = parse_date_token(parts.next()?)?;
    let end = match parts.next() {
        Some(token) => parse_date_token(token)?,
        None => start,
    };
    if parts.next().is_some() {
        return None;
    }
    Some((start, end))
}

/// Parse a `YYYY-MM-DD`-like token.
///
/// The token is split on `-` and each of the first three components
/// contributes its leading digits, so `2024-03-01T09:30:00.000+09:00` reads as
/// 2024-03-01.
fn parse_date_token(token: &str) -> Option<NaiveDate> {
    let mut components = token.trim().split('-');
    let year = leading_number(components.next()?)?;
    let month = leading_number(components.next()?)?;
    let day = leading_number(components.next()?)?;

    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

fn leading_number(component: &str) -> Option<u32> {
    let digits: &str = component
        .find(|c: char| !c.is_ascii_digit())
        .map_or(component, |end| &component[..end]);
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// First day of the month `offset` months away from `today`'s month.
pub fn viewed_month(today: NaiveDate, offset: i32) -> Option<NaiveDate> {
    let first = today.with_day(1)?;
    let months = Months::new(offset.unsigned_abs());
    if offset >= 0 {
        first.checked_add_months(months)
    } else {
        first.checked_sub_months(months)
    }
}

/// Number of days in a month: the day before the 1st of the next month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|last| last.day())
}

/// Day numbers laid out in Sunday-first weeks of exactly seven cells.
pub fn month_grid(year: i32, month: u32) -> Option<Vec<Vec<Option<u32>>>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let days = days_in_month(year, month)?;
    let leading = first.weekday().num_days_from_sunday() as usize;

    let mut cells: Vec<Option<u32>> = vec![None; leading];
    cells.extend((1..=days).map(Some));
    while cells.len() % 7 != 0 {
        cells.push(None);
    }

    Some(cells.chunks(7).map(|week| week.to_vec()).collect())
}

/// Shorten a title for a day cell.
pub fn truncate_title(title: &str) -> String {
    if title.is_empty() {
        return UNTITLED.to_string();
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        let head: String = title.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        title.to_string()
    }
}

/// One non-blank cell of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_today: bool,
    pub is_sunday: bool,
    /// Up to `MAX_EVENTS_PER_DAY` truncated titles, in record order.
    pub titles: Vec<String>,
    /// Matching records beyond the ones shown.
    pub overflow: usize,
}

impl DayCell {
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn event_count(&self) -> usize {
        self.titles.len() + self.overflow
    }

    pub fn overflow_label(&self) -> Option<String> {
        (self.overflow > 0).then(|| format!("+{} more", self.overflow))
    }
}

/// A fully laid out month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarView {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Vec<Option<DayCell>>>,
}

impl CalendarView {
    /// Lay out the month `offset` months from `today` with `records` placed.
    pub fn build(records: &[NormalizedRecord], today: NaiveDate, offset: i32) -> Result<Self> {
        let first = viewed_month(today, offset).ok_or(WidgetError::MonthOutOfRange(offset))?;
        let (year, month) = (first.year(), first.month());
        let grid = month_grid(year, month).ok_or(WidgetError::MonthOutOfRange(offset))?;

        let events: Vec<CalendarEvent<'_>> = records
            .iter()
            .map(CalendarEvent::from_record)
            .filter(|event| event.start.is_some())
            .collect();

        let weeks: Vec<Vec<Option<DayCell>>> = grid
            .into_iter()
            .map(|week| {
                week.into_iter()
                    .enumerate()
                    .map(|(column, day)| {
                        let date = NaiveDate::from_ymd_opt(year, month, day?)?;
                        Some(day_cell(&events, date, today, column == 0))
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        Ok(Self { year, month, weeks })
    }

    /// e.g. `January 2024`
    pub fn title(&self) -> String {
        format!("{} {}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }

    pub fn cell(&self, day: u32) -> Option<&DayCell> {
        self.weeks
            .iter()
            .flatten()
            .flatten()
            .find(|cell| cell.day() == day)
    }
}

fn day_cell(
    events: &[CalendarEvent<'_>],
    date: NaiveDate,
    today: NaiveDate,
    is_sunday: bool,
) -> DayCell {
    let matching: Vec<&CalendarEvent<'_>> = events.iter().filter(|e| e.occurs_on(date)).collect();

    DayCell {
        date,
        is_today: date == today,
        is_sunday,
        titles: matching
            .iter()
            .take(MAX_EVENTS_PER_DAY)
            .map(|event| truncate_title(&event.record.title))
            .collect(),
        overflow: matching.len().saturating_sub(MAX_EVENTS_PER_DAY),
    }
}

impl fmt::Display for CalendarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<  {}  >", self.title())?;
        for label in WEEKDAY_LABELS {
            write!(f, "{:>5}", label)?;
        }
        writeln!(f)?;

        for week in &self.weeks {
            for cell in week {
                match cell {
                    None => write!(f, "{:>5}", "")?,
                    Some(cell) => {
                        let marker = if cell.event_count() > 0 { "*" } else { " " };
                        let day = if cell.is_today {
                            format!("[{}]", cell.day())
                        } else {
                            cell.day().to_string()
                        };
                        write!(f, "{:>4}{}", day, marker)?;
                    }
                }
            }
            writeln!(f)?;
        }

        let busy: Vec<&DayCell> = self
            .weeks
            .iter()
            .flatten()
            .flatten()
            .filter(|cell| cell.event_count() > 0)
            .collect();
        if !busy.is_empty() {
            writeln!(f)?;
        }
        for cell in busy {
            write!(f, "{:>2}: {}", cell.day(), cell.titles.join(", "))?;
            if let Some(label) = cell.overflow_label() {
                write!(f, " {}", label)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
