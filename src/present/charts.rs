use super::figure::{
    Band, BarFigure, Category, Figure, LineFigure, LineSeries, MapFigure, Orientation, Series, Word,
    WordCloud,
};
use crate::aggregate::{
    weekend_dates, DailyComparison, DailyTotal, DayOfWeekAverage, EntryPointVolume,
    LabelCount, PeakVsOffPeak, RegionShare, TableOverview, TimeOfDayAverage, VehicleDailyAverage,
    OVERNIGHT, PEAK, WEEK,
};
use crate::map::{bubble_radius, Bubble, LinearColormap, MapPoint, Overlay, Rgb};
use chrono::{Duration, NaiveDate, NaiveTime, Timelike, Weekday};
use std::collections::BTreeMap;

/// Plotly's default qualitative palette, used where a chart colors by category
pub const PALETTE: [Rgb; 10] = [
    (0x63, 0x6E, 0xFA),
    (0xEF, 0x55, 0x3B),
    (0x00, 0xCC, 0x96),
    (0xAB, 0x63, 0xFA),
    (0xFF, 0xA1, 0x5A),
    (0x19, 0xD3, 0xF3),
    (0xFF, 0x66, 0x92),
    (0xB6, 0xE8, 0x80),
    (0xFF, 0x97, 0xFF),
    (0xFE, 0xCB, 0x52),
];

pub const PEAK_COLOR: Rgb = (0xEF, 0x55, 0x3B);
pub const OVERNIGHT_COLOR: Rgb = (0x63, 0x6E, 0xFA);
pub const CRZ_COLOR: Rgb = (0x00, 0x74, 0xCC);
pub const EXCLUDED_COLOR: Rgb = (0xC1, 0xD3, 0xF7);
const WEEKEND_BAND: Rgb = (0x80, 0x80, 0x80);
const COMMUTE_BAND: Rgb = (0xAD, 0xD8, 0xE6);

/// Matplotlib "Blues", light to dark
const BLUES: [Rgb; 3] = [(0xC6, 0xDB, 0xEF), (0x42, 0x92, 0xC6), (0x08, 0x30, 0x6B)];
const WORD_SIZES: u8 = 5;

pub const WEEKEND_NOTE: &str = "Gray areas indicate weekends";
const MORNING_COMMUTE: (u32, u32) = (6 * 60, 10 * 60);
const EVENING_COMMUTE: (u32, u32) = (16 * 60, 20 * 60);
const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

/// Which of the three entry-point map renderings to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapVariant {
    Basic,
    Labeled,
    Bubbles,
}

/// Full English day name; chrono's `Display` only gives the short form
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn overview(summary: TableOverview) -> Figure {
    Figure::Overview(summary)
}

/// Words sized by frequency: the heaviest label gets class 5, the rest scale
/// linearly down to class 1. Shades follow the same ratio.
pub fn word_cloud(freq: &[LabelCount]) -> Figure {
    let max = freq.iter().map(|f| f.count).max().unwrap_or(0);
    let shades = LinearColormap::new(BLUES.to_vec(), 0.0, max as f64);

    let words = freq
        .iter()
        .map(|f| {
            let ratio = if max == 0 { 0.0 } else { f.count as f64 / max as f64 };
            let size = 1 + (ratio * (WORD_SIZES - 1) as f64).round() as u8;
            Word {
                text: f.label.clone(),
                weight: f.count,
                size,
                color: shades.color(f.count as f64),
            }
        })
        .collect();

    Figure::WordCloud(WordCloud {
        title: "Word Cloud of Vehicle Entry Points (Detection Groups)".to_string(),
        words,
    })
}

pub fn entry_point_map(volume: &[EntryPointVolume], variant: MapVariant) -> Figure {
    let counts = volume.iter().map(|v| v.crz_entries);
    let legend = match (counts.clone().min(), counts.max()) {
        (Some(lo), Some(hi)) if variant == MapVariant::Bubbles => {
            Some(LinearColormap::bubbles(lo as f64, hi as f64))
        }
        _ => None,
    };

    let points = volume
        .iter()
        .map(|v| MapPoint {
            label: v.detection_group.clone(),
            lon: v.lon,
            lat: v.lat,
            weight: v.crz_entries,
            popup: match variant {
                MapVariant::Basic => None,
                MapVariant::Labeled | MapVariant::Bubbles => {
                    Some(format!("{}: {} entries", v.detection_group, v.crz_entries))
                }
            },
            bubble: legend.as_ref().map(|cmap| Bubble {
                radius: bubble_radius(v.crz_entries),
                color: cmap.color(v.crz_entries as f64),
            }),
        })
        .collect();

    let (title, overlay) = match variant {
        MapVariant::Basic => (
            "Basic Heatmap: Traffic Volume at Entry Points",
            Overlay { heat: true, markers: false, points },
        ),
        MapVariant::Labeled => (
            "Heatmap with Labels and Markers",
            Overlay { heat: true, markers: true, points },
        ),
        MapVariant::Bubbles => (
            "Bubble Map with Colormap",
            Overlay { heat: false, markers: false, points },
        ),
    };

    Figure::Map(MapFigure {
        title: title.to_string(),
        overlay,
        legend,
    })
}

pub fn region_share_chart(shares: &[RegionShare]) -> Figure {
    let categories = shares
        .iter()
        .enumerate()
        .map(|(i, s)| Category {
            label: s.detection_region.clone(),
            values: vec![Some(s.percentage)],
            color: Some(PALETTE[i % PALETTE.len()]),
        })
        .collect();

    Figure::Bars(BarFigure {
        title: "Percentage of CRZ Entries by Detection Region".to_string(),
        x_title: "Detection Region".to_string(),
        y_title: "Percentage of Entries (%)".to_string(),
        orientation: Orientation::Vertical,
        stacked: false,
        series: vec![Series {
            name: "Percentage".to_string(),
            color: PALETTE[0],
        }],
        categories,
        precision: 1,
    })
}

pub fn vehicle_chart(averages: &[VehicleDailyAverage]) -> Figure {
    let categories = averages
        .iter()
        .enumerate()
        .map(|(i, a)| Category {
            label: a.vehicle_class.clone(),
            values: vec![Some(a.average_daily)],
            color: Some(PALETTE[i % PALETTE.len()]),
        })
        .collect();

    Figure::Bars(BarFigure {
        title: "Average Daily Number of Entries by Vehicle Type".to_string(),
        x_title: "Vehicle Class".to_string(),
        y_title: "Average Daily Count".to_string(),
        orientation: Orientation::Vertical,
        stacked: false,
        series: vec![Series {
            name: "Average Daily Count".to_string(),
            color: PALETTE[0],
        }],
        categories,
        precision: 0,
    })
}

/// Series for the given periods: known periods first in `lead` order with
/// their fixed colors, anything else after in label order.
fn period_series<'a>(lead: &[&'a str], periods: impl Iterator<Item = &'a str>) -> Vec<Series> {
    let mut extra: Vec<&str> = periods.filter(|p| !lead.contains(p)).collect();
    extra.sort_unstable();
    extra.dedup();

    lead.iter()
        .copied()
        .chain(extra)
        .enumerate()
        .map(|(i, name)| Series {
            name: name.to_string(),
            color: match name {
                PEAK => PEAK_COLOR,
                OVERNIGHT => OVERNIGHT_COLOR,
                _ => PALETTE[(i + 2) % PALETTE.len()],
            },
        })
        .collect()
}

pub fn peak_chart(data: &PeakVsOffPeak) -> Figure {
    let series = period_series(&[OVERNIGHT, PEAK], data.rows.iter().map(|r| r.time_period.as_str()));

    let categories = data
        .group_order
        .iter()
        .map(|group| Category {
            label: group.clone(),
            values: series
                .iter()
                .map(|s| {
                    data.rows
                        .iter()
                        .find(|r| &r.detection_group == group && r.time_period == s.name)
                        .map(|r| r.average_daily)
                })
                .collect(),
            color: None,
        })
        .collect();

    Figure::Bars(BarFigure {
        title: "Average Daily Entries by Detection Group and Time Period".to_string(),
        x_title: "Entries".to_string(),
        y_title: "Detection Group".to_string(),
        orientation: Orientation::Horizontal,
        stacked: false,
        series,
        categories,
        precision: 0,
    })
}

pub fn day_of_week_chart(averages: &[DayOfWeekAverage]) -> Figure {
    let series = period_series(&[PEAK, OVERNIGHT], averages.iter().map(|a| a.time_period.as_str()));

    let categories = WEEK
        .iter()
        .filter(|day| averages.iter().any(|a| a.day_of_week == **day))
        .map(|day| Category {
            label: weekday_name(*day).to_string(),
            values: series
                .iter()
                .map(|s| {
                    averages
                        .iter()
                        .find(|a| a.day_of_week == *day && a.time_period == s.name)
                        .map(|a| a.average_daily)
                })
                .collect(),
            color: None,
        })
        .collect();

    Figure::Bars(BarFigure {
        title: "Average Daily Entries by Day of Week and Time Period".to_string(),
        x_title: "Day of Week".to_string(),
        y_title: "Average Daily Entries".to_string(),
        orientation: Orientation::Vertical,
        stacked: false,
        series,
        categories,
        precision: 0,
    })
}

/// `count` date labels evenly spaced from `first` across `span` days
fn date_labels(first: NaiveDate, span: i64, count: i64) -> Vec<String> {
    (0..count)
        .map(|i| {
            let offset = if count > 1 { span * i / (count - 1) } else { 0 };
            (first + Duration::days(offset)).format("%b %d").to_string()
        })
        .collect()
}

/// One line per period over calendar days, with a one-day band behind every
/// weekend date. x is days since the first date.
pub fn daily_series_chart(totals: &[DailyTotal]) -> Figure {
    let first = totals.iter().map(|t| t.toll_date).min();
    let last = totals.iter().map(|t| t.toll_date).max();
    let span = match (first, last) {
        (Some(a), Some(b)) => (b - a).num_days() + 1,
        _ => 1,
    };
    let x_of = |d: NaiveDate| first.map_or(0.0, |f| (d - f).num_days() as f64);

    let mut by_period: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
    for t in totals {
        by_period
            .entry(t.time_period.as_str())
            .or_default()
            .push((x_of(t.toll_date), t.crz_entries));
    }

    let series = period_series(&[PEAK, OVERNIGHT], by_period.keys().copied())
        .into_iter()
        .filter_map(|s| {
            let points = by_period.remove(s.name.as_str())?;
            Some(LineSeries { name: s.name, color: s.color, points })
        })
        .collect();

    let bands = weekend_dates(totals)
        .into_iter()
        .map(|d| Band {
            x0: x_of(d),
            x1: x_of(d) + 1.0,
            color: WEEKEND_BAND,
            label: None,
        })
        .collect();

    Figure::Lines(LineFigure {
        title: "Average Daily Entries Over Time".to_string(),
        x_title: "Date".to_string(),
        y_title: "Total Daily Entries".to_string(),
        x_bounds: [0.0, span as f64],
        x_labels: first.map_or_else(Vec::new, |f| date_labels(f, span - 1, 5)),
        series,
        bands,
        note: Some(WEEKEND_NOTE.to_string()),
        markers: true,
    })
}

fn minute_of_day(t: NaiveTime) -> f64 {
    (t.hour() * 60 + t.minute()) as f64
}

pub fn time_of_day_chart(curve: &[TimeOfDayAverage]) -> Figure {
    let points = curve.iter().map(|c| (minute_of_day(c.time), c.average)).collect();

    let band = |(from, to): (u32, u32), label: &str| Band {
        x0: from as f64,
        x1: to as f64,
        color: COMMUTE_BAND,
        label: Some(label.to_string()),
    };

    Figure::Lines(LineFigure {
        title: "CRZ Entries by Time of Day (10-minute increments)".to_string(),
        x_title: "Time of Day (10-minute increments)".to_string(),
        y_title: "Average CRZ Entries".to_string(),
        x_bounds: [0.0, MINUTES_PER_DAY],
        x_labels: ["00:00", "06:00", "12:00", "18:00", "24:00"]
            .into_iter()
            .map(String::from)
            .collect(),
        series: vec![LineSeries {
            name: "Average CRZ Entries".to_string(),
            color: PALETTE[0],
            points,
        }],
        bands: vec![
            band(MORNING_COMMUTE, "Morning Commute Hours"),
            band(EVENING_COMMUTE, "Evening Commute Hours"),
        ],
        note: None,
        markers: false,
    })
}

pub fn crz_vs_excluded_chart(daily: &[DailyComparison]) -> Figure {
    let categories = daily
        .iter()
        .map(|d| Category {
            label: d.toll_date.format("%m-%d").to_string(),
            values: vec![
                Some(d.crz_entries as f64),
                Some(d.excluded_roadway_entries as f64),
            ],
            color: None,
        })
        .collect();

    Figure::Bars(BarFigure {
        title: "Daily Entries to CRZ and Excluded Roadways (Jan 5 - Jan 25)".to_string(),
        x_title: "Date".to_string(),
        y_title: "Daily Entries".to_string(),
        orientation: Orientation::Vertical,
        stacked: true,
        series: vec![
            Series {
                name: "CRZ Entries".to_string(),
                color: CRZ_COLOR,
            },
            Series {
                name: "Excluded Roadway Entries".to_string(),
                color: EXCLUDED_COLOR,
            },
        ],
        categories,
        precision: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::PeriodGroupAverage;
    use chrono::{Datelike, Weekday};

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn bars(figure: Figure) -> BarFigure {
        match figure {
            Figure::Bars(b) => b,
            other => panic!("expected bars, got {other:?}"),
        }
    }

    fn lines(figure: Figure) -> LineFigure {
        match figure {
            Figure::Lines(l) => l,
            other => panic!("expected lines, got {other:?}"),
        }
    }

    fn volume(group: &str, crz: u64) -> EntryPointVolume {
        EntryPointVolume {
            detection_group: group.to_string(),
            lat: 40.7,
            lon: -73.99,
            crz_entries: crz,
        }
    }

    #[test]
    fn test_word_cloud_sizes() {
        let freq = vec![
            LabelCount { label: "Brooklyn Bridge".into(), count: 100 },
            LabelCount { label: "Holland Tunnel".into(), count: 50 },
            LabelCount { label: "West Side Highway".into(), count: 0 },
        ];
        let Figure::WordCloud(cloud) = word_cloud(&freq) else {
            panic!("expected word cloud");
        };
        let sizes: Vec<u8> = cloud.words.iter().map(|w| w.size).collect();
        assert_eq!(sizes, vec![5, 3, 1]);
        assert_eq!(cloud.words[0].color, BLUES[2]);
        assert_eq!(cloud.words[2].color, BLUES[0]);
    }

    #[test]
    fn test_map_variants() {
        let vol = vec![volume("Brooklyn Bridge", 4_900), volume("Holland Tunnel", 100)];

        let Figure::Map(basic) = entry_point_map(&vol, MapVariant::Basic) else {
            panic!("expected map");
        };
        assert!(basic.overlay.heat && !basic.overlay.markers);
        assert!(basic.legend.is_none());
        assert!(basic.overlay.points.iter().all(|p| p.popup.is_none() && p.bubble.is_none()));

        let Figure::Map(labeled) = entry_point_map(&vol, MapVariant::Labeled) else {
            panic!("expected map");
        };
        assert!(labeled.overlay.heat && labeled.overlay.markers);
        assert_eq!(
            labeled.overlay.points[0].popup.as_deref(),
            Some("Brooklyn Bridge: 4900 entries")
        );

        let Figure::Map(bubbles) = entry_point_map(&vol, MapVariant::Bubbles) else {
            panic!("expected map");
        };
        assert!(!bubbles.overlay.heat);
        let legend = bubbles.legend.unwrap();
        assert_eq!((legend.vmin, legend.vmax), (100.0, 4_900.0));
        assert_eq!(
            bubbles.overlay.points[1].popup.as_deref(),
            Some("Holland Tunnel: 100 entries")
        );
        let big = bubbles.overlay.points[0].bubble.unwrap();
        let small = bubbles.overlay.points[1].bubble.unwrap();
        assert_eq!(big.radius, 2);
        assert_eq!(big.color, (255, 0, 0));
        assert_eq!(small.color, (0, 0, 255));
    }

    #[test]
    fn test_region_chart_colors_each_bar() {
        let shares = vec![
            RegionShare { detection_region: "Brooklyn".into(), crz_entries: 3, percentage: 75.0 },
            RegionShare { detection_region: "Queens".into(), crz_entries: 1, percentage: 25.0 },
        ];
        let chart = bars(region_share_chart(&shares));
        assert_eq!(chart.orientation, Orientation::Vertical);
        assert_eq!(chart.y_title, "Percentage of Entries (%)");
        assert_eq!(chart.categories[0].color, Some(PALETTE[0]));
        assert_eq!(chart.categories[1].color, Some(PALETTE[1]));
        assert_eq!(chart.value(1, "Percentage"), Some(25.0));
    }

    #[test]
    fn test_peak_chart_bindings() {
        let row = |period: &str, group: &str, v: f64| PeriodGroupAverage {
            time_period: period.into(),
            detection_group: group.into(),
            average_daily: v,
        };
        let data = PeakVsOffPeak {
            rows: vec![
                row(OVERNIGHT, "Holland Tunnel", 5.0),
                row(PEAK, "Holland Tunnel", 20.0),
                row(PEAK, "Brooklyn Bridge", 90.0),
            ],
            group_order: vec!["Brooklyn Bridge".into(), "Holland Tunnel".into()],
        };
        let chart = bars(peak_chart(&data));
        assert_eq!(chart.orientation, Orientation::Horizontal);
        assert!(!chart.stacked);
        let names: Vec<_> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec![OVERNIGHT, PEAK]);
        assert_eq!(chart.categories[0].label, "Brooklyn Bridge");
        assert_eq!(chart.value(0, OVERNIGHT), None);
        assert_eq!(chart.value(0, PEAK), Some(90.0));
        assert_eq!(chart.value(1, OVERNIGHT), Some(5.0));
    }

    #[test]
    fn test_day_of_week_chart_bindings() {
        let avg = |day, period: &str, v| DayOfWeekAverage {
            day_of_week: day,
            time_period: period.into(),
            average_daily: v,
        };
        let chart = bars(day_of_week_chart(&[
            avg(Weekday::Sun, OVERNIGHT, 1.0),
            avg(Weekday::Mon, PEAK, 2.0),
            avg(Weekday::Mon, OVERNIGHT, 3.0),
        ]));
        let labels: Vec<_> = chart.categories.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Monday", "Sunday"]);
        assert_eq!(chart.series[0].name, PEAK);
        assert_eq!(chart.series[0].color, PEAK_COLOR);
        assert_eq!(chart.series[1].name, OVERNIGHT);
        assert_eq!(chart.series[1].color, OVERNIGHT_COLOR);
        assert_eq!(chart.value(1, PEAK), None);
    }

    #[test]
    fn test_daily_series_weekend_bands() {
        // 2025-01-10 is a Friday
        let total = |day: u32, period: &str, v: f64| DailyTotal {
            toll_date: d(1, day),
            day_of_week: d(1, day).weekday(),
            time_period: period.into(),
            crz_entries: v,
        };
        let chart = lines(daily_series_chart(&[
            total(10, PEAK, 10.0),
            total(10, OVERNIGHT, 1.0),
            total(11, PEAK, 5.0),
            total(12, PEAK, 4.0),
            total(13, PEAK, 12.0),
        ]));
        assert_eq!(chart.note.as_deref(), Some(WEEKEND_NOTE));
        assert_eq!(chart.x_bounds, [0.0, 4.0]);
        let bands: Vec<_> = chart.bands.iter().map(|b| (b.x0, b.x1)).collect();
        assert_eq!(bands, vec![(1.0, 2.0), (2.0, 3.0)]);
        assert_eq!(chart.series[0].name, PEAK);
        assert_eq!(chart.series[0].points.len(), 4);
        assert_eq!(chart.series[1].points, vec![(0.0, 1.0)]);
        assert_eq!(chart.y_max(), 12.0);
    }

    #[test]
    fn test_time_of_day_commute_bands() {
        let curve = vec![
            TimeOfDayAverage { time: NaiveTime::from_hms_opt(7, 30, 0).unwrap(), average: 50.0 },
            TimeOfDayAverage { time: NaiveTime::from_hms_opt(23, 0, 0).unwrap(), average: 5.0 },
        ];
        let chart = lines(time_of_day_chart(&curve));
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].points, vec![(450.0, 50.0), (1380.0, 5.0)]);
        assert_eq!(chart.bands.len(), 2);
        assert_eq!((chart.bands[0].x0, chart.bands[0].x1), (360.0, 600.0));
        assert_eq!(chart.bands[0].label.as_deref(), Some("Morning Commute Hours"));
        assert_eq!((chart.bands[1].x0, chart.bands[1].x1), (960.0, 1200.0));
        assert_eq!(chart.bands[1].label.as_deref(), Some("Evening Commute Hours"));
    }

    #[test]
    fn test_crz_vs_excluded_stacked() {
        let chart = bars(crz_vs_excluded_chart(&[DailyComparison {
            toll_date: d(1, 5),
            crz_entries: 500_000,
            excluded_roadway_entries: 80_000,
        }]));
        assert!(chart.stacked);
        assert_eq!(chart.series[0].color, CRZ_COLOR);
        assert_eq!(chart.series[1].color, EXCLUDED_COLOR);
        assert_eq!(chart.categories[0].label, "01-05");
        assert_eq!(chart.value(0, "Excluded Roadway Entries"), Some(80_000.0));
    }

    #[test]
    fn test_empty_inputs_give_empty_figures() {
        assert!(word_cloud(&[]).is_empty());
        assert!(entry_point_map(&[], MapVariant::Bubbles).is_empty());
        assert!(region_share_chart(&[]).is_empty());
        assert!(daily_series_chart(&[]).is_empty());
        assert!(time_of_day_chart(&[]).is_empty());
        assert!(crz_vs_excluded_chart(&[]).is_empty());
    }
}
