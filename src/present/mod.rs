//! Turns aggregates into chart-ready [`Figure`]s and maps each dashboard
//! selection to the query and adapter that build it.

mod charts;
mod figure;

pub use charts::{
    crz_vs_excluded_chart, daily_series_chart, day_of_week_chart, entry_point_map, overview, peak_chart,
    region_share_chart, time_of_day_chart, vehicle_chart, weekday_name, word_cloud, MapVariant, CRZ_COLOR,
    EXCLUDED_COLOR, OVERNIGHT_COLOR, PALETTE, PEAK_COLOR, WEEKEND_NOTE,
};
pub use figure::{
    Band, BarFigure, Category, Figure, LineFigure, LineSeries, MapFigure, Orientation, Series, Word,
    WordCloud,
};

use crate::aggregate;
use crate::data::EntryTable;
use serde_json::Value;

/// Data attribution shown with every figure
pub const SOURCE: &str = "Source: MTA Official Website (new.mta.info)";
pub const CAPTION: &str = "2025 MTA Congestion Data Visualization · Group_G";

/// Headed block of commentary under a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub heading: &'static str,
    pub body: &'static str,
}

/// Top-level navigation entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Overview,
    WordCloud,
    Heatmaps,
    RegionShare,
    VehicleType,
    EntriesByTime,
    CrzVsExcluded,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Overview,
        Section::WordCloud,
        Section::Heatmaps,
        Section::RegionShare,
        Section::VehicleType,
        Section::EntriesByTime,
        Section::CrzVsExcluded,
    ];

    /// 1-based position in the sidebar
    pub fn number(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0) + 1
    }

    pub fn from_number(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i)).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::Overview => "Project Overview",
            Section::WordCloud => "Word Cloud of Entry Points",
            Section::Heatmaps => "Heatmaps of Entry Points",
            Section::RegionShare => "Percentage of Entries by Region",
            Section::VehicleType => "Average Daily Entries by Vehicle Type",
            Section::EntriesByTime => "Number of Entries by Time",
            Section::CrzVsExcluded => "CRZ vs. Excluded Roadway Entries",
        }
    }

    /// One-paragraph context shown above the figure
    pub fn summary(self) -> &'static str {
        match self {
            Section::Overview => {
                "Vehicle entries into Manhattan's Congestion Relief Zone (CRZ) under congestion \
                 pricing, Jan 5 - Feb 5, 2025: entry points, vehicle mix, timing and excluded roadways."
            }
            Section::WordCloud => {
                "Most frequently recorded entry points. Larger, darker names appear in more records."
            }
            Section::Heatmaps => {
                "Total CRZ entries per entry point. Hotter areas and larger bubbles mean more traffic."
            }
            Section::RegionShare => "Share of all CRZ entries contributed by each detection region.",
            Section::VehicleType => "Average number of entries per day for each vehicle class.",
            Section::EntriesByTime => {
                "Peak vs. overnight traffic by entry point, by weekday, over the calendar and through the day."
            }
            Section::CrzVsExcluded => {
                "Daily entries into the tolled zone against trips that only use the FDR Drive, \
                 the West Side Highway or the Hugh L. Carey Tunnel surface connection."
            }
        }
    }

    /// Commentary blocks shown in the insights panel
    pub fn insights(self) -> &'static [Note] {
        match self {
            Section::Overview => &[Note {
                heading: "Key Analyses",
                body: "Entry points distribution. Vehicle type composition. Temporal patterns \
                       (hourly, daily, peak/off-peak). CRZ vs. excluded roadway entries.",
            }],
            Section::WordCloud => &[Note {
                heading: "Why it Matters?",
                body: "Helps quickly identify major access points for targeted traffic management.",
            }],
            Section::Heatmaps => &[
                Note {
                    heading: "Key Observation",
                    body: "Brooklyn Bridge, Queensboro Bridge and Manhattan Bridge are major \
                           congestion hotspots. These entries contribute to increased congestion \
                           and longer travel times.",
                },
                Note {
                    heading: "Recommended Policy Improvement",
                    body: "Consider a higher toll at the most congested entry points instead of \
                           the same charge everywhere. Dynamic or peak-time pricing at specific \
                           crossings could reduce rush-hour traffic there.",
                },
            ],
            Section::RegionShare => &[
                Note {
                    heading: "Why it Matters?",
                    body: "Supports region-level congestion management and policy focus.",
                },
                Note {
                    heading: "Key Insights",
                    body: "Brooklyn contributes the highest share of entries (over 20%), followed \
                           by East 60th St and Queens. FDR Drive, New Jersey and West 60th St have \
                           moderate entries, while West Side Highway has the least.",
                },
                Note {
                    heading: "Recommended Policy Improvement",
                    body: "For Brooklyn and Queens, improve bus and subway access and offer \
                           discounted fares to commuters who switch from driving.",
                },
            ],
            Section::VehicleType => &[
                Note {
                    heading: "Why it Matters?",
                    body: "Traffic composition shows how the tolling policy lands on each vehicle type.",
                },
                Note {
                    heading: "Key Insights",
                    body: "Cars, pickups and vans make up the vast majority of entries into the CRZ.",
                },
                Note {
                    heading: "Recommended Policy Improvement",
                    body: "Discounted rates for high-occupancy or electric vehicles would encourage \
                           ride-sharing and carpooling.",
                },
            ],
            Section::EntriesByTime => &[
                Note {
                    heading: "Policy Context",
                    body: "Peak hours have higher toll rates to reduce congestion.",
                },
                Note {
                    heading: "Key Insights",
                    body: "Weekday peak hours keep a high volume of traffic despite the higher \
                           toll, likely commuters from outside Manhattan driving in for work.",
                },
                Note {
                    heading: "Recommended Policy Improvement",
                    body: "Rather than raising peak tolls further, fund ride-sharing and transit \
                           incentives on weekdays, particularly Thursday and Friday when peak \
                           congestion is most intense.",
                },
            ],
            Section::CrzVsExcluded => &[
                Note {
                    heading: "Why this Matters?",
                    body: "Shows how traffic splits between tolled CRZ entries and toll-free \
                           excluded routes, and whether congestion shifts onto the excluded roadways.",
                },
                Note {
                    heading: "Key Insights",
                    body: "CRZ entries stay consistently high against excluded roadway entries on \
                           every day, regardless of the toll rates.",
                },
                Note {
                    heading: "Recommended Policy Improvement",
                    body: "Given their lower volume, the city could promote the excluded roadways \
                           with incentives or temporary toll-free periods to spread traffic more evenly.",
                },
            ],
        }
    }

    /// Views under this section, in display order
    pub fn views(self) -> impl Iterator<Item = &'static ViewSpec> {
        VIEWS.iter().filter(move |v| v.section == self)
    }

    pub fn view_count(self) -> usize {
        self.views().count()
    }

    pub fn next(self) -> Self {
        Self::ALL[self.number() % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.number() + Self::ALL.len() - 2) % Self::ALL.len()]
    }
}

/// One selectable view: how to build its figure and how to dump its
/// underlying aggregate
pub struct ViewSpec {
    pub section: Section,
    pub name: &'static str,
    /// Stable identifier for `--dump`
    pub slug: &'static str,
    pub build: fn(&EntryTable) -> Figure,
    pub dump: fn(&EntryTable) -> serde_json::Result<Value>,
}

pub static VIEWS: [ViewSpec; 12] = [
    ViewSpec {
        section: Section::Overview,
        name: "Project Overview",
        slug: "overview",
        build: |t| overview(aggregate::table_overview(t)),
        dump: |t| serde_json::to_value(aggregate::table_overview(t)),
    },
    ViewSpec {
        section: Section::WordCloud,
        name: "Word Cloud",
        slug: "word-cloud",
        build: |t| word_cloud(&aggregate::entry_point_frequency(t)),
        dump: |t| serde_json::to_value(aggregate::entry_point_frequency(t)),
    },
    ViewSpec {
        section: Section::Heatmaps,
        name: "Basic Heatmap",
        slug: "heatmap",
        build: |t| entry_point_map(&aggregate::entry_point_volume(t), MapVariant::Basic),
        dump: |t| serde_json::to_value(aggregate::entry_point_volume(t)),
    },
    ViewSpec {
        section: Section::Heatmaps,
        name: "Heatmap with Labels and Markers",
        slug: "heatmap-labeled",
        build: |t| entry_point_map(&aggregate::entry_point_volume(t), MapVariant::Labeled),
        dump: |t| serde_json::to_value(aggregate::entry_point_volume(t)),
    },
    ViewSpec {
        section: Section::Heatmaps,
        name: "Bubble Map with Colormap",
        slug: "bubble-map",
        build: |t| entry_point_map(&aggregate::entry_point_volume(t), MapVariant::Bubbles),
        dump: |t| serde_json::to_value(aggregate::entry_point_volume(t)),
    },
    ViewSpec {
        section: Section::RegionShare,
        name: "Percentage by Region",
        slug: "region-share",
        build: |t| region_share_chart(&aggregate::regional_share(t)),
        dump: |t| serde_json::to_value(aggregate::regional_share(t)),
    },
    ViewSpec {
        section: Section::VehicleType,
        name: "Vehicle Type",
        slug: "vehicle-type",
        build: |t| vehicle_chart(&aggregate::vehicle_daily_average(t)),
        dump: |t| serde_json::to_value(aggregate::vehicle_daily_average(t)),
    },
    ViewSpec {
        section: Section::EntriesByTime,
        name: "Peak vs. Off-Peak",
        slug: "peak-vs-off-peak",
        build: |t| peak_chart(&aggregate::peak_vs_off_peak(t)),
        dump: |t| serde_json::to_value(aggregate::peak_vs_off_peak(t)),
    },
    ViewSpec {
        section: Section::EntriesByTime,
        name: "By Day of the Week",
        slug: "day-of-week",
        build: |t| day_of_week_chart(&aggregate::day_of_week_average(t)),
        dump: |t| serde_json::to_value(aggregate::day_of_week_average(t)),
    },
    ViewSpec {
        section: Section::EntriesByTime,
        name: "Average Daily Entries Over Time",
        slug: "daily-totals",
        build: |t| daily_series_chart(&aggregate::daily_totals(t)),
        dump: |t| serde_json::to_value(aggregate::daily_totals(t)),
    },
    ViewSpec {
        section: Section::EntriesByTime,
        name: "By Time of Day",
        slug: "time-of-day",
        build: |t| time_of_day_chart(&aggregate::time_of_day_average(t)),
        dump: |t| serde_json::to_value(aggregate::time_of_day_average(t)),
    },
    ViewSpec {
        section: Section::CrzVsExcluded,
        name: "CRZ vs. Excluded",
        slug: "crz-vs-excluded",
        build: |t| crz_vs_excluded_chart(&aggregate::crz_vs_excluded(t)),
        dump: |t| serde_json::to_value(aggregate::crz_vs_excluded(t)),
    },
];

/// Look up a view by its slug
pub fn find_view(slug: &str) -> Option<&'static ViewSpec> {
    VIEWS.iter().find(|v| v.slug == slug)
}

/// Current (section, view) pair. `view` is always in range for `section`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub section: Section,
    pub view: usize,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            section: Section::Overview,
            view: 0,
        }
    }
}

impl Selection {
    /// Selection at `section`, with `view` clamped to the section's range
    pub fn new(section: Section, view: usize) -> Self {
        let view = view.min(section.view_count().saturating_sub(1));
        Self { section, view }
    }

    pub fn spec(&self) -> &'static ViewSpec {
        self.section
            .views()
            .nth(self.view)
            .unwrap_or(&VIEWS[0])
    }

    /// Switching section starts at its first view
    pub fn select_section(&mut self, section: Section) {
        *self = Self::new(section, 0);
    }

    pub fn next_view(&mut self) {
        self.view = (self.view + 1) % self.section.view_count().max(1);
    }

    pub fn prev_view(&mut self) {
        let n = self.section.view_count().max(1);
        self.view = (self.view + n - 1) % n;
    }

    pub fn build(&self, table: &EntryTable) -> Figure {
        (self.spec().build)(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::crz;
    use std::collections::HashSet;

    #[test]
    fn test_section_view_counts() {
        let counts: Vec<usize> = Section::ALL.iter().map(|s| s.view_count()).collect();
        assert_eq!(counts, vec![1, 1, 3, 1, 1, 4, 1]);
    }

    #[test]
    fn test_slugs_unique() {
        let slugs: HashSet<_> = VIEWS.iter().map(|v| v.slug).collect();
        assert_eq!(slugs.len(), VIEWS.len());
        assert_eq!(find_view("bubble-map").unwrap().name, "Bubble Map with Colormap");
        assert!(find_view("nope").is_none());
    }

    #[test]
    fn test_every_section_has_insights() {
        for section in Section::ALL {
            let notes = section.insights();
            assert!(!notes.is_empty(), "{section:?}");
            assert!(notes.iter().all(|n| !n.heading.is_empty() && !n.body.is_empty()));
        }
        assert!(Section::EntriesByTime
            .insights()
            .iter()
            .any(|n| n.body.contains("Thursday and Friday")));
    }

    #[test]
    fn test_section_numbering() {
        assert_eq!(Section::Overview.number(), 1);
        assert_eq!(Section::CrzVsExcluded.number(), 7);
        assert_eq!(Section::from_number(3), Some(Section::Heatmaps));
        assert_eq!(Section::from_number(0), None);
        assert_eq!(Section::from_number(8), None);
        assert_eq!(Section::CrzVsExcluded.next(), Section::Overview);
        assert_eq!(Section::Overview.prev(), Section::CrzVsExcluded);
        assert_eq!(Section::Heatmaps.prev(), Section::WordCloud);
    }

    #[test]
    fn test_selection_cycles_views() {
        let mut sel = Selection::default();
        sel.select_section(Section::EntriesByTime);
        assert_eq!(sel.spec().slug, "peak-vs-off-peak");
        sel.prev_view();
        assert_eq!(sel.spec().slug, "time-of-day");
        sel.next_view();
        sel.next_view();
        assert_eq!(sel.spec().slug, "day-of-week");

        sel.select_section(Section::VehicleType);
        assert_eq!(sel.view, 0);
        sel.next_view();
        assert_eq!(sel.view, 0);
    }

    #[test]
    fn test_selection_clamps_view() {
        let sel = Selection::new(Section::Heatmaps, 9);
        assert_eq!(sel.view, 2);
        assert_eq!(sel.spec().slug, "bubble-map");
    }

    #[test]
    fn test_every_view_builds_and_dumps() {
        let table = EntryTable::new(vec![
            crz("2025-01-06 08:00", "Brooklyn Bridge", 10),
            crz("2025-01-11 09:10", "Holland Tunnel", 4),
        ]);
        for view in &VIEWS {
            let figure = (view.build)(&table);
            assert!(!figure.is_empty(), "{} is empty", view.slug);
            assert!((view.dump)(&table).is_ok(), "{} failed to dump", view.slug);
        }
    }

    #[test]
    fn test_empty_table_gives_empty_figures() {
        let table = EntryTable::default();
        for view in &VIEWS {
            assert!((view.build)(&table).is_empty(), "{} not empty", view.slug);
        }
    }
}
