mod basemap;

pub use basemap::{basemap_or_outline, generate_manhattan_outline, load_basemap};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Format of the `Toll Hour` column, e.g. `01/05/2025 12:00:00 AM`
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Rows stamped after this instant are dropped at load time
pub const CUTOFF: NaiveDateTime = NaiveDateTime::new(date(2025, 2, 5), time(12, 59, 59));

pub(crate) const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(d) => d,
        None => panic!("invalid calendar date"),
    }
}

const fn time(hour: u32, min: u32, sec: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, min, sec) {
        Some(t) => t,
        None => panic!("invalid time of day"),
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("row {row}: {source}")]
    Csv { row: usize, source: csv::Error },
    #[error("row {row}: timestamp {value:?} does not match {fmt:?}: {source}", fmt = TIMESTAMP_FORMAT)]
    Timestamp {
        row: usize,
        value: String,
        source: chrono::ParseError,
    },
    #[error("row {row}: unknown day of week {value:?}")]
    DayOfWeek { row: usize, value: String },
}

/// One toll-crossing entry record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryEvent {
    pub toll_hour: NaiveDateTime,
    pub toll_date: NaiveDate,
    /// Time of day truncated to the minute
    pub time: NaiveTime,
    pub detection_group: String,
    pub detection_region: String,
    pub vehicle_class: String,
    pub time_period: String,
    pub day_of_week: Weekday,
    pub crz_entries: u64,
    pub excluded_roadway_entries: u64,
}

impl EntryEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        toll_hour: NaiveDateTime,
        detection_group: impl Into<String>,
        detection_region: impl Into<String>,
        vehicle_class: impl Into<String>,
        time_period: impl Into<String>,
        day_of_week: Weekday,
        crz_entries: u64,
        excluded_roadway_entries: u64,
    ) -> Self {
        let clock = toll_hour.time();
        Self {
            toll_hour,
            toll_date: toll_hour.date(),
            time: clock.with_second(0).unwrap_or(clock),
            detection_group: detection_group.into(),
            detection_region: detection_region.into(),
            vehicle_class: vehicle_class.into(),
            time_period: time_period.into(),
            day_of_week,
            crz_entries,
            excluded_roadway_entries,
        }
    }

    /// `HH:MM` label of the minute-resolution time of day
    pub fn time_label(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

/// The working table. Every row satisfies `toll_hour <= CUTOFF`.
#[derive(Debug, Clone, Default)]
pub struct EntryTable {
    rows: Vec<EntryEvent>,
}

impl EntryTable {
    /// Build a table, dropping rows past [`CUTOFF`]
    pub fn new(rows: impl IntoIterator<Item = EntryEvent>) -> Self {
        Self {
            rows: rows.into_iter().filter(|r| r.toll_hour <= CUTOFF).collect(),
        }
    }

    pub fn rows(&self) -> &[EntryEvent] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EntryEvent> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Column layout of the source CSV (extra columns are ignored)
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(rename = "Toll Hour")]
    toll_hour: String,
    #[serde(rename = "Detection Group")]
    detection_group: String,
    #[serde(rename = "Detection Region")]
    detection_region: String,
    #[serde(rename = "Vehicle Class")]
    vehicle_class: String,
    #[serde(rename = "Time Period")]
    time_period: String,
    #[serde(rename = "Day of Week")]
    day_of_week: String,
    #[serde(rename = "CRZ Entries")]
    crz_entries: u64,
    #[serde(rename = "Excluded Roadway Entries")]
    excluded_roadway_entries: u64,
}

impl RawEntry {
    fn into_event(self, row: usize) -> Result<EntryEvent, LoadError> {
        let toll_hour = NaiveDateTime::parse_from_str(self.toll_hour.trim(), TIMESTAMP_FORMAT)
            .map_err(|source| LoadError::Timestamp {
                row,
                value: self.toll_hour.clone(),
                source,
            })?;
        let day_of_week = self
            .day_of_week
            .trim()
            .parse::<Weekday>()
            .map_err(|_| LoadError::DayOfWeek {
                row,
                value: self.day_of_week.clone(),
            })?;

        Ok(EntryEvent::new(
            toll_hour,
            self.detection_group,
            self.detection_region,
            self.vehicle_class,
            self.time_period,
            day_of_week,
            self.crz_entries,
            self.excluded_roadway_entries,
        ))
    }
}

/// Load the entry table from a CSV file
pub fn load_entries(path: &Path) -> Result<EntryTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("loading entries from {}", path.display());
    read_entries(file)
}

/// Parse CSV entries from any reader, applying the cutoff
pub fn read_entries<R: Read>(reader: R) -> Result<EntryTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut events = Vec::new();
    for (idx, record) in reader.deserialize::<RawEntry>().enumerate() {
        let row = idx + 1;
        let raw = record.map_err(|source| LoadError::Csv { row, source })?;
        events.push(raw.into_event(row)?);
    }

    let read = events.len();
    let table = EntryTable::new(events);
    log::info!(
        "read {read} rows, kept {}, dropped {} past cutoff {CUTOFF}",
        table.len(),
        read - table.len()
    );

    if let (Some(first), Some(last)) = (
        table.iter().map(|r| r.toll_hour).min(),
        table.iter().map(|r| r.toll_hour).max(),
    ) {
        log::debug!("entries span {first} .. {last}");
    }

    Ok(table)
}


#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Toll Date,Toll Hour,Toll 10 Minute Block,Day of Week,Time Period,Vehicle Class,Detection Group,Detection Region,CRZ Entries,Excluded Roadway Entries\n";

    fn csv(rows: &[&str]) -> String {
        let mut s = HEADER.to_string();
        for r in rows {
            s.push_str(r);
            s.push('\n');
        }
        s
    }

    #[test]
    fn test_parse_row() {
        let data = csv(&[
            "01/05/2025,01/05/2025 03:00:00 PM,01/05/2025 03:10:00 PM,Sunday,Peak,1 - Cars; Pickups and Vans,Brooklyn Bridge,Brooklyn,120,4",
        ]);
        let table = read_entries(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);

        let row = &table.rows()[0];
        assert_eq!(row.toll_date, date(2025, 1, 5));
        assert_eq!(row.time_label(), "15:00");
        assert_eq!(row.day_of_week, Weekday::Sun);
        assert_eq!(row.detection_group, "Brooklyn Bridge");
        assert_eq!(row.detection_region, "Brooklyn");
        assert_eq!(row.crz_entries, 120);
        assert_eq!(row.excluded_roadway_entries, 4);
    }

    #[test]
    fn test_cutoff_drops_later_rows() {
        let data = csv(&[
            "02/05/2025,02/05/2025 12:00:00 PM,,Wednesday,Peak,Buses,Lincoln Tunnel,New Jersey,5,0",
            "02/05/2025,02/05/2025 01:00:00 PM,,Wednesday,Peak,Buses,Lincoln Tunnel,New Jersey,7,0",
            "02/06/2025,02/06/2025 01:00:00 AM,,Thursday,Overnight,Buses,Lincoln Tunnel,New Jersey,9,0",
        ]);
        let table = read_entries(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.iter().all(|r| r.toll_hour <= CUTOFF));
        assert_eq!(table.rows()[0].crz_entries, 5);
    }

    #[test]
    fn test_cutoff_is_inclusive() {
        let at_cutoff = EntryEvent::new(CUTOFF, "g", "r", "c", "Peak", Weekday::Wed, 1, 0);
        let table = EntryTable::new([at_cutoff]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_bad_timestamp_is_fatal() {
        let data = csv(&[
            "01/05/2025,01/05/2025 03:00:00 PM,,Sunday,Peak,Buses,Holland Tunnel,New Jersey,1,0",
            "01/05/2025,2025-01-05 15:00,,Sunday,Peak,Buses,Holland Tunnel,New Jersey,1,0",
        ]);
        match read_entries(data.as_bytes()) {
            Err(LoadError::Timestamp { row, value, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "2025-01-05 15:00");
            }
            other => panic!("expected timestamp error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_weekday_is_fatal() {
        let data = csv(&["01/05/2025,01/05/2025 03:00:00 PM,,Someday,Peak,Buses,Holland Tunnel,New Jersey,1,0"]);
        assert!(matches!(
            read_entries(data.as_bytes()),
            Err(LoadError::DayOfWeek { row: 1, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_entries(Path::new("/nonexistent/entries.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }

    #[test]
    fn test_minute_truncation() {
        let ts = NaiveDateTime::parse_from_str("01/07/2025 08:40:59 AM", TIMESTAMP_FORMAT).unwrap();
        let ev = EntryEvent::new(ts, "g", "r", "c", "Peak", Weekday::Tue, 1, 0);
        assert_eq!(ev.time_label(), "08:40");
        assert_eq!(ev.time.second(), 0);
    }
}
