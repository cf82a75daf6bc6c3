use super::{mean_of_daily_sums, PEAK};
use crate::data::{date, EntryTable};
use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

/// Canonical day order for every day-of-week display
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Inclusive date window of the CRZ vs excluded-roadway comparison
pub const COMPARISON_WINDOW: (NaiveDate, NaiveDate) = (date(2025, 1, 5), date(2025, 1, 25));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodGroupAverage {
    pub time_period: String,
    pub detection_group: String,
    pub average_daily: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakVsOffPeak {
    /// Ascending by average, ties by (period, group)
    pub rows: Vec<PeriodGroupAverage>,
    /// Display order of detection groups: descending by their peak average
    pub group_order: Vec<String>,
}

/// Average daily entries per (time period, detection group)
pub fn peak_vs_off_peak(table: &EntryTable) -> PeakVsOffPeak {
    let mut rows: Vec<PeriodGroupAverage> =
        mean_of_daily_sums(table, |row| (row.time_period.as_str(), row.detection_group.as_str()))
            .into_iter()
            .map(|((period, group), average_daily)| PeriodGroupAverage {
                time_period: period.to_string(),
                detection_group: group.to_string(),
                average_daily,
            })
            .collect();
    // BTreeMap already ordered by (period, group); stable sort keeps that for ties
    rows.sort_by(|a, b| a.average_daily.total_cmp(&b.average_daily));

    let mut peak: BTreeMap<&str, Option<f64>> = BTreeMap::new();
    for row in &rows {
        let slot = peak.entry(row.detection_group.as_str()).or_insert(None);
        if row.time_period == PEAK {
            *slot = Some(row.average_daily);
        }
    }
    let mut ranked: Vec<(&str, Option<f64>)> = peak.into_iter().collect();
    // Groups with no peak row go last
    ranked.sort_by(|a, b| match (a.1, b.1) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    let group_order = ranked.into_iter().map(|(g, _)| g.to_string()).collect();

    PeakVsOffPeak { rows, group_order }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayOfWeekAverage {
    pub day_of_week: Weekday,
    pub time_period: String,
    pub average_daily: f64,
}

/// Average daily entries per (day of week, time period), Monday first
pub fn day_of_week_average(table: &EntryTable) -> Vec<DayOfWeekAverage> {
    mean_of_daily_sums(table, |row| {
        (row.day_of_week.num_days_from_monday(), row.time_period.as_str())
    })
    .into_iter()
    .map(|((day, period), average_daily)| DayOfWeekAverage {
        day_of_week: WEEK[day as usize],
        time_period: period.to_string(),
        average_daily,
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub toll_date: NaiveDate,
    pub day_of_week: Weekday,
    pub time_period: String,
    pub crz_entries: f64,
}

/// Per-date entries for each time period.
///
/// Runs the same sum-then-mean as the other daily views, but the grouping
/// key already contains the date, so the mean step sees one value per group
/// and the result equals the plain per-date sum.
pub fn daily_totals(table: &EntryTable) -> Vec<DailyTotal> {
    mean_of_daily_sums(table, |row| {
        (row.toll_date, row.day_of_week.num_days_from_monday(), row.time_period.as_str())
    })
    .into_iter()
    .map(|((toll_date, day, period), crz_entries)| DailyTotal {
        toll_date,
        day_of_week: WEEK[day as usize],
        time_period: period.to_string(),
        crz_entries,
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeOfDayAverage {
    /// Minute resolution, no further bucketing
    pub time: NaiveTime,
    pub average: f64,
}

/// Average entries at each minute of the day across all dates
pub fn time_of_day_average(table: &EntryTable) -> Vec<TimeOfDayAverage> {
    mean_of_daily_sums(table, |row| row.time)
        .into_iter()
        .map(|(time, average)| TimeOfDayAverage { time, average })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyComparison {
    pub toll_date: NaiveDate,
    pub crz_entries: u64,
    pub excluded_roadway_entries: u64,
}

/// Daily CRZ and excluded-roadway totals inside [`COMPARISON_WINDOW`]
pub fn crz_vs_excluded(table: &EntryTable) -> Vec<DailyComparison> {
    let (start, end) = COMPARISON_WINDOW;
    let mut days: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();
    for row in table.iter().filter(|r| (start..=end).contains(&r.toll_date)) {
        let slot = days.entry(row.toll_date).or_insert((0, 0));
        slot.0 += row.crz_entries;
        slot.1 += row.excluded_roadway_entries;
    }

    days.into_iter()
        .map(|(toll_date, (crz_entries, excluded_roadway_entries))| DailyComparison {
            toll_date,
            crz_entries,
            excluded_roadway_entries,
        })
        .collect()
}

/// Saturday or Sunday
pub fn is_weekend(day: Weekday) -> bool {
    day.number_from_monday() >= 6
}

/// Dates in `rows` falling on a weekend, deduplicated and ordered
pub fn weekend_dates(rows: &[DailyTotal]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = rows
        .iter()
        .filter(|r| is_weekend(r.day_of_week))
        .map(|r| r.toll_date)
        .collect();
    dates.dedup();
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::OVERNIGHT;
    use crate::data::fixtures::event;
    use crate::data::EntryTable;

    fn period(stamp: &str, group: &str, period: &str, crz: u64) -> crate::data::EntryEvent {
        event(stamp, group, "Brooklyn", "Cars", period, crz, 0)
    }

    #[test]
    fn test_peak_vs_off_peak_two_stage() {
        // Brooklyn peak: day 1 = 10 + 30, day 2 = 20 -> (40 + 20) / 2 = 30 (row mean would be 20)
        let table = EntryTable::new([
            period("2025-01-06 08:00", "Brooklyn Bridge", PEAK, 10),
            period("2025-01-06 09:00", "Brooklyn Bridge", PEAK, 30),
            period("2025-01-07 08:00", "Brooklyn Bridge", PEAK, 20),
            period("2025-01-06 02:00", "Brooklyn Bridge", OVERNIGHT, 4),
            period("2025-01-06 08:00", "Holland Tunnel", PEAK, 50),
            period("2025-01-06 02:00", "Holland Tunnel", OVERNIGHT, 6),
            period("2025-01-06 02:00", "Lincoln Tunnel", OVERNIGHT, 1),
        ]);
        let result = peak_vs_off_peak(&table);

        let brooklyn_peak = result
            .rows
            .iter()
            .find(|r| r.detection_group == "Brooklyn Bridge" && r.time_period == PEAK)
            .unwrap();
        assert_eq!(brooklyn_peak.average_daily, 30.0);

        let values: Vec<f64> = result.rows.iter().map(|r| r.average_daily).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));

        assert_eq!(result.group_order, ["Holland Tunnel", "Brooklyn Bridge", "Lincoln Tunnel"]);
    }

    #[test]
    fn test_day_of_week_order_independent_of_input() {
        // 2025-01-05 is a Sunday, 2025-01-06 a Monday
        let rows = vec![
            period("2025-01-05 08:00", "Brooklyn Bridge", PEAK, 3),
            period("2025-01-11 08:00", "Brooklyn Bridge", PEAK, 3),
            period("2025-01-08 08:00", "Brooklyn Bridge", OVERNIGHT, 3),
            period("2025-01-06 08:00", "Brooklyn Bridge", PEAK, 3),
            period("2025-01-10 08:00", "Brooklyn Bridge", PEAK, 3),
            period("2025-01-07 08:00", "Brooklyn Bridge", PEAK, 3),
            period("2025-01-09 08:00", "Brooklyn Bridge", PEAK, 3),
        ];
        let mut reversed = rows.clone();
        reversed.reverse();

        for input in [rows, reversed] {
            let days: Vec<Weekday> = day_of_week_average(&EntryTable::new(input))
                .iter()
                .map(|r| r.day_of_week)
                .collect();
            assert_eq!(days, WEEK);
        }
    }

    #[test]
    fn test_day_of_week_mean_of_daily_sums() {
        // Two Mondays: 10 + 10 and 40 -> mean 30
        let table = EntryTable::new([
            period("2025-01-06 08:00", "Brooklyn Bridge", PEAK, 10),
            period("2025-01-06 09:00", "Holland Tunnel", PEAK, 10),
            period("2025-01-13 08:00", "Brooklyn Bridge", PEAK, 40),
        ]);
        let result = day_of_week_average(&table);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].day_of_week, Weekday::Mon);
        assert_eq!(result[0].average_daily, 30.0);
    }

    #[test]
    fn test_daily_totals_equal_plain_daily_sum() {
        let table = EntryTable::new([
            period("2025-01-06 08:00", "Brooklyn Bridge", PEAK, 10),
            period("2025-01-06 09:00", "Holland Tunnel", PEAK, 15),
            period("2025-01-06 01:00", "Holland Tunnel", OVERNIGHT, 2),
            period("2025-01-07 08:00", "Brooklyn Bridge", PEAK, 7),
        ]);
        let totals = daily_totals(&table);

        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0].time_period, OVERNIGHT);
        assert_eq!(totals[0].crz_entries, 2.0);
        assert_eq!(totals[1].crz_entries, 25.0);
        assert_eq!(totals[2].toll_date, date(2025, 1, 7));
        assert_eq!(totals[2].day_of_week, Weekday::Tue);
        assert_eq!(totals[2].crz_entries, 7.0);
    }

    #[test]
    fn test_time_of_day_native_minutes() {
        let table = EntryTable::new([
            period("2025-01-06 08:10", "Brooklyn Bridge", PEAK, 10),
            period("2025-01-06 08:10", "Holland Tunnel", PEAK, 20),
            period("2025-01-07 08:10", "Brooklyn Bridge", PEAK, 0),
            period("2025-01-07 08:13", "Brooklyn Bridge", PEAK, 5),
        ]);
        let curve = time_of_day_average(&table);

        assert_eq!(curve.len(), 2);
        assert_eq!(curve[0].time.format("%H:%M").to_string(), "08:10");
        assert_eq!(curve[0].average, 15.0);
        assert_eq!(curve[1].time.format("%H:%M").to_string(), "08:13");
        assert_eq!(curve[1].average, 5.0);
    }

    #[test]
    fn test_comparison_outside_window_is_empty() {
        let table = EntryTable::new([
            event("2025-01-04 08:00", "Brooklyn Bridge", "Brooklyn", "Cars", PEAK, 10, 1),
            event("2025-01-26 08:00", "Brooklyn Bridge", "Brooklyn", "Cars", PEAK, 10, 1),
            event("2025-02-01 08:00", "Brooklyn Bridge", "Brooklyn", "Cars", PEAK, 10, 1),
        ]);
        assert!(crz_vs_excluded(&table).is_empty());
    }

    #[test]
    fn test_comparison_keeps_window_only() {
        let table = EntryTable::new([
            event("2025-01-04 23:00", "Brooklyn Bridge", "Brooklyn", "Cars", OVERNIGHT, 100, 100),
            event("2025-01-05 00:00", "Brooklyn Bridge", "Brooklyn", "Cars", OVERNIGHT, 1, 2),
            event("2025-01-05 12:00", "West Side Highway at 60th St", "West Side Highway", "Cars", PEAK, 3, 4),
            event("2025-01-25 23:50", "Holland Tunnel", "New Jersey", "Cars", OVERNIGHT, 5, 6),
            event("2025-01-26 00:00", "Holland Tunnel", "New Jersey", "Cars", OVERNIGHT, 100, 100),
        ]);
        let days = crz_vs_excluded(&table);

        assert_eq!(
            days,
            vec![
                DailyComparison { toll_date: date(2025, 1, 5), crz_entries: 4, excluded_roadway_entries: 6 },
                DailyComparison { toll_date: date(2025, 1, 25), crz_entries: 5, excluded_roadway_entries: 6 },
            ]
        );
    }

    #[test]
    fn test_weekend_dates() {
        let table = EntryTable::new([
            period("2025-01-10 08:00", "Brooklyn Bridge", PEAK, 1),
            period("2025-01-11 08:00", "Brooklyn Bridge", PEAK, 1),
            period("2025-01-11 02:00", "Brooklyn Bridge", OVERNIGHT, 1),
            period("2025-01-12 08:00", "Brooklyn Bridge", PEAK, 1),
        ]);
        let weekends = weekend_dates(&daily_totals(&table));
        assert_eq!(weekends, [date(2025, 1, 11), date(2025, 1, 12)]);
    }
}
