use crate::map::{LineString, MapRenderer};
use anyhow::Result;
use geojson::{GeoJson, Geometry, Value};
use std::fs;
use std::path::Path;

/// Load every `.json` / `.geojson` file in `data_dir` as basemap lines.
/// Files that fail to parse are skipped with a warning.
pub fn load_basemap(renderer: &mut MapRenderer, data_dir: &Path) -> Result<usize> {
    let mut paths: Vec<_> = fs::read_dir(data_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            matches!(
                p.extension().and_then(|e| e.to_str()),
                Some("json") | Some("geojson")
            )
        })
        .collect();
    paths.sort();

    let mut loaded = 0;
    for path in paths {
        match load_lines(renderer, &path) {
            Ok(n) => {
                log::debug!("basemap {}: {n} lines", path.display());
                loaded += n;
            }
            Err(e) => log::warn!("skipping basemap {}: {e}", path.display()),
        }
    }
    Ok(loaded)
}

/// Basemap from `data_dir`, or the built-in outline when nothing loads.
/// Runs before the terminal is taken over so its log lines reach a clean stderr.
pub fn basemap_or_outline(data_dir: &Path) -> MapRenderer {
    let mut renderer = MapRenderer::new();
    if data_dir.exists() {
        match load_basemap(&mut renderer, data_dir) {
            Ok(n) => log::info!("loaded {n} basemap lines from {}", data_dir.display()),
            Err(e) => log::warn!("basemap {}: {e}", data_dir.display()),
        }
    }

    if !renderer.has_data() {
        log::info!("no basemap in {}, using built-in outline", data_dir.display());
        generate_manhattan_outline(&mut renderer);
    }
    renderer
}

/// Parse one GeoJSON file and add its line features
fn load_lines(renderer: &mut MapRenderer, path: &Path) -> Result<usize> {
    let mut bytes = fs::read(path)?;
    let geojson: GeoJson = simd_json::serde::from_slice(&mut bytes)?;

    let mut count = 0;
    process_geojson_lines(&geojson, |line| {
        renderer.add_line(line);
        count += 1;
    });
    Ok(count)
}

/// Walk a GeoJSON document and extract line features
fn process_geojson_lines<F>(geojson: &GeoJson, mut add_line: F)
where
    F: FnMut(LineString),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    process_geometry_lines(geometry, &mut add_line);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                process_geometry_lines(geometry, &mut add_line);
            }
        }
        GeoJson::Geometry(geometry) => {
            process_geometry_lines(geometry, &mut add_line);
        }
    }
}

fn process_geometry_lines<F>(geometry: &Geometry, add_line: &mut F)
where
    F: FnMut(LineString),
{
    match &geometry.value {
        Value::LineString(coords) => add_line(to_line(coords)),
        Value::MultiLineString(lines) => {
            for coords in lines {
                add_line(to_line(coords));
            }
        }
        // Polygons contribute every ring so islands and piers show up
        Value::Polygon(rings) => {
            for ring in rings {
                add_line(to_line(ring));
            }
        }
        Value::MultiPolygon(polygons) => {
            for ring in polygons.iter().flatten() {
                add_line(to_line(ring));
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                process_geometry_lines(g, add_line);
            }
        }
        _ => {}
    }
}

fn to_line(coords: &[Vec<f64>]) -> LineString {
    coords
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| (c[0], c[1]))
        .collect()
}

/// Built-in outline of Manhattan and the 60th St zone boundary, used when no
/// basemap files are available
pub fn generate_manhattan_outline(renderer: &mut MapRenderer) {
    renderer.add_line(vec![
        (-74.0186, 40.7003), (-74.0134, 40.7230), (-74.0105, 40.7420),
        (-74.0088, 40.7540), (-73.9967, 40.7713), (-73.9880, 40.7867),
        (-73.9717, 40.8120), (-73.9480, 40.8420), (-73.9330, 40.8650),
        (-73.9110, 40.8740), (-73.9300, 40.8340), (-73.9340, 40.8080),
        (-73.9290, 40.7970), (-73.9430, 40.7830), (-73.9580, 40.7620),
        (-73.9720, 40.7440), (-73.9720, 40.7290), (-73.9750, 40.7110),
        (-73.9980, 40.7070), (-74.0186, 40.7003),
    ]);

    // 60th St, northern edge of the zone
    renderer.add_line(vec![(-73.9890, 40.7706), (-73.9585, 40.7621)]);

    // Brooklyn and Queens waterfront
    renderer.add_line(vec![
        (-74.0200, 40.6800), (-74.0010, 40.6950), (-73.9930, 40.7020),
        (-73.9700, 40.7050), (-73.9620, 40.7200), (-73.9590, 40.7350),
        (-73.9520, 40.7450), (-73.9430, 40.7600), (-73.9360, 40.7720),
    ]);

    // New Jersey shore
    renderer.add_line(vec![
        (-74.0350, 40.7000), (-74.0330, 40.7200), (-74.0250, 40.7450),
        (-74.0180, 40.7600), (-74.0050, 40.7800), (-73.9900, 40.8000),
    ]);
}
