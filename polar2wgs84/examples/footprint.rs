//! This example repairs a few footprints that are broken in lon/lat space and prints them as GeoJSON.
//!
//! Run with `RUST_LOG=debug` to see every step of the processing.

use geo_types::polygon;
use polar2wgs84::{check_polygon, Footprint, ProcessingOptions};

fn main() -> polar2wgs84::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let footprints = [
        (
            "around the North Pole",
            polygon![
                (x: -170.0, y: 75.0),
                (x: -80.0, y: 78.0),
                (x: 10.0, y: 76.0),
                (x: 100.0, y: 79.0),
                (x: 170.0, y: 77.0),
                (x: -170.0, y: 75.0),
            ],
        ),
        (
            "over the antimeridian",
            polygon![
                (x: 170.0, y: 60.0),
                (x: 179.0, y: 60.0),
                (x: -170.0, y: 60.0),
                (x: -160.0, y: 70.0),
                (x: 150.0, y: 80.0),
                (x: 170.0, y: 60.0),
            ],
        ),
        (
            "over the equator and the antimeridian",
            polygon![
                (x: 170.0, y: -10.0),
                (x: -170.0, y: -10.0),
                (x: -170.0, y: 10.0),
                (x: 170.0, y: 10.0),
                (x: 170.0, y: -10.0),
            ],
        ),
    ];

    let options = ProcessingOptions::default().with_max_points(30);

    for (name, polygon) in footprints {
        let footprint = Footprint::new(polygon)?;
        let valid = footprint.make_valid_geojson_geometry()?;
        let simplified = footprint.to_wgs84_plate_carre(&valid, &options)?;

        let report = check_polygon(&simplified);
        println!("Footprint {name}: {}", simplified.type_name());
        println!(
            "{}",
            serde_json::to_string(&report).unwrap_or_else(|e| e.to_string())
        );
        println!("{}", simplified.to_geojson());
    }

    Ok(())
}
