use super::sum_by;
use crate::data::EntryTable;
use crate::geocode;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

/// Number of rows per detection group, most frequent first (ties by label)
pub fn entry_point_frequency(table: &EntryTable) -> Vec<LabelCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for row in table.iter() {
        *counts.entry(row.detection_group.as_str()).or_insert(0) += 1;
    }

    let mut out: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();
    // Stable sort keeps the BTreeMap label order among equal counts
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Summed CRZ entries at a geocoded entry point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryPointVolume {
    pub detection_group: String,
    pub lat: f64,
    pub lon: f64,
    pub crz_entries: u64,
}

/// CRZ entries per detection group joined to the geocode table.
/// Groups without coordinates are dropped.
pub fn entry_point_volume(table: &EntryTable) -> Vec<EntryPointVolume> {
    sum_by(table, |row| row.detection_group.as_str())
        .into_iter()
        .filter_map(|(label, crz_entries)| match geocode::lookup(label) {
            Some(point) => Some(EntryPointVolume {
                detection_group: label.to_string(),
                lat: point.lat,
                lon: point.lon,
                crz_entries,
            }),
            None => {
                log::debug!("no coordinates for {label:?}, leaving it off the map");
                None
            }
        })
        .collect()
}
