/// A CRZ entry point with its map position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryPoint {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

/// The ten named crossings into the zone. Detection groups outside this set
/// can't be placed on a map.
pub const ENTRY_POINTS: [EntryPoint; 10] = [
    EntryPoint { name: "Brooklyn Bridge", lat: 40.70563, lon: -73.99635 },
    EntryPoint { name: "Queensboro Bridge", lat: 40.759, lon: -73.955 },
    EntryPoint { name: "East 60th St", lat: 40.76305, lon: -73.96818 },
    EntryPoint { name: "Manhattan Bridge", lat: 40.7075, lon: -73.99077 },
    EntryPoint { name: "Lincoln Tunnel", lat: 40.760128, lon: -74.003065 },
    EntryPoint { name: "West Side Highway at 60th St", lat: 40.7714, lon: -73.9905 },
    EntryPoint { name: "Queens Midtown Tunnel", lat: 40.7407, lon: -73.9588 },
    EntryPoint { name: "Williamsburg Bridge", lat: 40.71369, lon: -73.97262 },
    EntryPoint { name: "Holland Tunnel", lat: 40.727399, lon: -74.021338 },
    EntryPoint { name: "Hugh L. Carey Tunnel", lat: 40.6958, lon: -74.0136 },
];

/// Default map center (lon, lat), midtown Manhattan
pub const MAP_CENTER: (f64, f64) = (-73.985, 40.758);

/// Look up an entry point by its detection group label (exact match)
pub fn lookup(label: &str) -> Option<&'static EntryPoint> {
    ENTRY_POINTS.iter().find(|p| p.name == label)
}
