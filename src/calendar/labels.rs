use super::config::ConfigError;
use super::window::DAYS_IN_WEEK;
use time::Date;

pub(crate) const DEFAULT_WEEKDAY_LABELS: [&str; DAYS_IN_WEEK] = ["S", "M", "T", "W", "T", "F", "S"];

/// Formatting policy for the labels a calendar displays
pub(crate) trait LabelFormat {
    /// E.g., "June 2024"
    fn month_year(&self, date: Date) -> String;

    /// E.g., "June"
    fn month(&self, date: Date) -> String;

    /// E.g., "Wednesday, June 12, 2024"
    fn long_date(&self, date: Date) -> String;

    /// Label for a visible range of dates from `first` through `last`
    fn month_span(&self, first: Date, last: Date) -> String {
        if first.month() == last.month() {
            self.month_year(first)
        } else {
            format!("{} – {}", self.month(first), self.month_year(last))
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct EnglishLabels;

impl LabelFormat for EnglishLabels {
    fn month_year(&self, date: Date) -> String {
        format!("{} {}", date.month(), date.year())
    }

    fn month(&self, date: Date) -> String {
        date.month().to_string()
    }

    fn long_date(&self, date: Date) -> String {
        format!(
            "{}, {} {}, {}",
            date.weekday(),
            date.month(),
            date.day(),
            date.year()
        )
    }
}

/// Header text for each day of the week, stored Sunday first
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct WeekdayLabels([String; DAYS_IN_WEEK]);

impl WeekdayLabels {
    /// Labels in display order: when weeks start on Monday, Sunday's label
    /// moves to the end.
    pub(crate) fn ordered(&self, monday_first: bool) -> impl Iterator<Item = &str> + '_ {
        self.0
            .iter()
            .cycle()
            .skip(usize::from(monday_first))
            .take(DAYS_IN_WEEK)
            .map(String::as_str)
    }
}

impl Default for WeekdayLabels {
    fn default() -> WeekdayLabels {
        WeekdayLabels(DEFAULT_WEEKDAY_LABELS.map(String::from))
    }
}

impl TryFrom<Vec<String>> for WeekdayLabels {
    type Error = ConfigError;

    fn try_from(labels: Vec<String>) -> Result<WeekdayLabels, ConfigError> {
        let actual = labels.len();
        <[String; DAYS_IN_WEEK]>::try_from(labels)
            .map(WeekdayLabels)
            .map_err(|_| ConfigError::LabelCount {
                expected: DAYS_IN_WEEK,
                actual,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_month_span_single_month() {
        let s = EnglishLabels.month_span(date!(2024 - 06 - 09), date!(2024 - 06 - 22));
        assert_eq!(s, "June 2024");
    }

    #[test]
    fn test_month_span_two_months() {
        let s = EnglishLabels.month_span(date!(2024 - 06 - 23), date!(2024 - 07 - 06));
        assert_eq!(s, "June – July 2024");
    }

    #[test]
    fn test_month_span_across_year() {
        let s = EnglishLabels.month_span(date!(2024 - 12 - 22), date!(2025 - 01 - 04));
        assert_eq!(s, "December – January 2025");
    }

    #[test]
    fn test_long_date() {
        assert_eq!(
            EnglishLabels.long_date(date!(2024 - 06 - 12)),
            "Wednesday, June 12, 2024"
        );
    }

    #[test]
    fn test_ordered_labels() {
        let labels = WeekdayLabels::try_from(
            ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]
                .map(String::from)
                .to_vec(),
        )
        .unwrap();
        assert_eq!(
            labels.ordered(false).collect::<Vec<_>>(),
            ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]
        );
        assert_eq!(
            labels.ordered(true).collect::<Vec<_>>(),
            ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"]
        );
    }

    #[test]
    fn test_wrong_label_count() {
        let r = WeekdayLabels::try_from(vec![String::from("S"); 5]);
        assert_eq!(
            r,
            Err(ConfigError::LabelCount {
                expected: 7,
                actual: 5
            })
        );
    }
}
