use chrono::{Datelike, Days, NaiveDate, Weekday};

pub const TITLE_SUBJECT: &str = "Troubleshooting Sessions";

/// First day of the week `week_offset` weeks away from the week holding `today`.
/// `None` when that date is outside chrono's calendar range.
pub fn week_start_date(
    today: NaiveDate,
    week_offset: i32,
    week_start: Weekday,
) -> Option<NaiveDate> {
    let into_week = (today.weekday().num_days_from_monday() + 7
        - week_start.num_days_from_monday())
        % 7;
    let start = today.checked_sub_days(Days::new(u64::from(into_week)))?;
    let shift = Days::new(i64::from(week_offset).unsigned_abs() * 7);
    if week_offset < 0 {
        start.checked_sub_days(shift)
    } else {
        start.checked_add_days(shift)
    }
}

pub fn week_title(today: NaiveDate, week_offset: i32, week_start: Weekday) -> String {
    match week_offset {
        0 => format!("This Week's {TITLE_SUBJECT}"),
        -1 => format!("Last Week's {TITLE_SUBJECT}"),
        _ => {
            match week_start_date(today, week_offset, week_start) {
                Some(start) => {
                    format!("Week of {} {TITLE_SUBJECT}", start.format("%b %-d, %Y"))
                }
                None => format!(
                    "{} Weeks Ago {TITLE_SUBJECT}",
                    i64::from(week_offset).unsigned_abs()
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thursday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    #[test]
    fn relative_titles() {
        assert_eq!(
            week_title(thursday(), 0, Weekday::Mon),
            "This Week's Troubleshooting Sessions"
        );
        assert_eq!(
            week_title(thursday(), -1, Weekday::Mon),
            "Last Week's Troubleshooting Sessions"
        );
    }

    #[test]
    fn older_weeks_name_their_start_date() {
        assert_eq!(
            week_title(thursday(), -3, Weekday::Mon),
            "Week of Sep 21, 2026 Troubleshooting Sessions"
        );
        assert_eq!(
            week_title(thursday(), -2, Weekday::Sun),
            "Week of Sep 27, 2026 Troubleshooting Sessions"
        );
    }

    #[test]
    fn start_of_week_on_the_start_day_is_today() {
        let monday = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        assert_eq!(week_start_date(monday, 0, Weekday::Mon), Some(monday));
    }

    #[test]
    fn weeks_beyond_the_calendar_get_an_undated_title() {
        assert_eq!(week_start_date(thursday(), -20_000_000, Weekday::Mon), None);
        assert_eq!(
            week_title(thursday(), -20_000_000, Weekday::Mon),
            "20000000 Weeks Ago Troubleshooting Sessions"
        );
        assert_eq!(
            week_title(thursday(), i32::MIN, Weekday::Sun),
            "2147483648 Weeks Ago Troubleshooting Sessions"
        );
    }
}
