use super::WeekStart;
use std::iter::successors;
use time::{Date, Weekday};

pub(super) trait WeekdayExt {
    /// 1-based weekday number counting from Sunday, except that Sunday is
    /// numbered 8 when weeks start on Monday so that it sorts after Saturday
    fn index1(&self, week_start: WeekStart) -> usize;
}

impl WeekdayExt for Weekday {
    fn index1(&self, week_start: WeekStart) -> usize {
        match (week_start, self) {
            (WeekStart::Monday, Weekday::Sunday) => 8,
            (_, wd) => wd.number_from_sunday().into(),
        }
    }
}

pub(super) fn iter_days_after(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day()).skip(1)
}

pub(super) fn iter_days_before(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.previous_day()).skip(1)
}

/// Text shown in a date cell; today is bracketed
pub(super) fn show_day(date: Date, is_today: bool) -> String {
    if is_today {
        format!("[{:2}]", date.day())
    } else {
        format!(" {:2} ", date.day())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_index1_sunday_start() {
        assert_eq!(Weekday::Sunday.index1(WeekStart::Sunday), 1);
        assert_eq!(Weekday::Wednesday.index1(WeekStart::Sunday), 4);
        assert_eq!(Weekday::Saturday.index1(WeekStart::Sunday), 7);
    }

    #[test]
    fn test_index1_monday_start() {
        assert_eq!(Weekday::Monday.index1(WeekStart::Monday), 2);
        assert_eq!(Weekday::Saturday.index1(WeekStart::Monday), 7);
        assert_eq!(Weekday::Sunday.index1(WeekStart::Monday), 8);
    }

    #[test]
    fn test_iter_days_across_month() {
        let mut iter = iter_days_after(date!(2024 - 06 - 29));
        assert_eq!(iter.next(), Some(date!(2024 - 06 - 30)));
        assert_eq!(iter.next(), Some(date!(2024 - 07 - 01)));
        let mut iter = iter_days_before(date!(2024 - 03 - 01));
        assert_eq!(iter.next(), Some(date!(2024 - 02 - 29)));
    }

    #[test]
    fn test_iter_days_at_end_of_time() {
        assert_eq!(iter_days_after(Date::MAX).next(), None);
        assert_eq!(iter_days_before(Date::MIN).next(), None);
    }

    #[test]
    fn test_show_day() {
        assert_eq!(show_day(date!(2024 - 06 - 09), false), "  9 ");
        assert_eq!(show_day(date!(2024 - 06 - 12), true), "[12]");
    }
}
