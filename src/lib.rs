//! Terminal dashboard for vehicle entries into Manhattan's Congestion Relief
//! Zone: loads the MTA entries CSV, aggregates it per view and draws bar,
//! line, word-cloud and braille map figures.

pub mod aggregate;
pub mod app;
pub mod braille;
pub mod data;
pub mod geocode;
pub mod map;
pub mod present;
pub mod ui;
