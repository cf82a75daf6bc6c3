//! Group-by queries behind each dashboard view.
//!
//! Every function here is pure over a borrowed [`EntryTable`] and returns a
//! small, deterministically ordered summary. Nothing is cached: each view
//! recomputes from the full table.

mod entry_points;
mod timing;

pub use entry_points::{entry_point_frequency, entry_point_volume, EntryPointVolume, LabelCount};
pub use timing::{
    crz_vs_excluded, daily_totals, day_of_week_average, is_weekend, peak_vs_off_peak,
    time_of_day_average, weekend_dates, DailyComparison, DailyTotal, DayOfWeekAverage, PeakVsOffPeak, PeriodGroupAverage,
    TimeOfDayAverage, COMPARISON_WINDOW, WEEK,
};

use crate::data::{EntryEvent, EntryTable};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

pub const PEAK: &str = "Peak";
pub const OVERNIGHT: &str = "Overnight";

/// Sum `crz_entries` per key
pub(crate) fn sum_by<'a, K, F>(table: &'a EntryTable, key: F) -> BTreeMap<K, u64>
where
    K: Ord,
    F: Fn(&'a EntryEvent) -> K,
{
    let mut sums = BTreeMap::new();
    for row in table.iter() {
        *sums.entry(key(row)).or_insert(0) += row.crz_entries;
    }
    sums
}

/// Two-stage "average daily" aggregate: sum `crz_entries` per (date, key),
/// then take the mean of those daily sums across the dates each key occurs on.
///
/// This is deliberately not a mean over raw rows.
pub(crate) fn mean_of_daily_sums<'a, K, F>(table: &'a EntryTable, key: F) -> BTreeMap<K, f64>
where
    K: Ord,
    F: Fn(&'a EntryEvent) -> K,
{
    let daily: BTreeMap<(NaiveDate, K), u64> = sum_by(table, |row| (row.toll_date, key(row)));

    let mut acc: BTreeMap<K, (u64, u32)> = BTreeMap::new();
    for ((_, k), sum) in daily {
        let slot = acc.entry(k).or_insert((0, 0));
        slot.0 += sum;
        slot.1 += 1;
    }

    acc.into_iter()
        .map(|(k, (sum, days))| (k, sum as f64 / days as f64))
        .collect()
}

/// Share of CRZ entries per detection region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionShare {
    pub detection_region: String,
    pub crz_entries: u64,
    /// Percent of the grand total, 0..=100
    pub percentage: f64,
}

pub fn regional_share(table: &EntryTable) -> Vec<RegionShare> {
    let sums = sum_by(table, |row| row.detection_region.as_str());
    let total: u64 = sums.values().sum();

    sums.into_iter()
        .map(|(region, crz_entries)| RegionShare {
            detection_region: region.to_string(),
            crz_entries,
            percentage: if total == 0 {
                0.0
            } else {
                crz_entries as f64 / total as f64 * 100.0
            },
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleDailyAverage {
    pub vehicle_class: String,
    pub average_daily: f64,
}

/// Average daily CRZ entries per vehicle class (mean of per-date sums)
pub fn vehicle_daily_average(table: &EntryTable) -> Vec<VehicleDailyAverage> {
    mean_of_daily_sums(table, |row| row.vehicle_class.as_str())
        .into_iter()
        .map(|(class, average_daily)| VehicleDailyAverage {
            vehicle_class: class.to_string(),
            average_daily,
        })
        .collect()
}

/// Shape of the loaded table for the overview section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableOverview {
    pub rows: usize,
    pub first: Option<NaiveDateTime>,
    pub last: Option<NaiveDateTime>,
    pub head: Vec<EntryEvent>,
}

pub const OVERVIEW_HEAD_ROWS: usize = 5;

pub fn table_overview(table: &EntryTable) -> TableOverview {
    TableOverview {
        rows: table.len(),
        first: table.iter().map(|r| r.toll_hour).min(),
        last: table.iter().map(|r| r.toll_hour).max(),
        head: table.iter().take(OVERVIEW_HEAD_ROWS).cloned().collect(),
    }
}
