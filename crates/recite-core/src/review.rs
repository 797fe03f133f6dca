use chrono::{Days, NaiveDate};

/// `recent_days` consecutive dates ending at `today`, newest first.
///
/// Each one can stand in for "today" when asking which units were due that day.
pub fn review_date_options(today: NaiveDate, recent_days: u32) -> Vec<NaiveDate> {
    (0..recent_days)
        .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
        .collect()
}
