use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use rand::Rng;
use serde_json::{json, Value};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationAvailability {
    pub city: String,
    pub state: String,
    pub coordinates: Coordinates,
    pub available_bikes: u32,
    pub total_bikes: u32,
    pub popular_bikes: Vec<String>,
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Great-circle distance in kilometres.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

pub async fn get_map_data(app: State<Arc<AppState>>) -> Json<Value> {
    let mut rng = rand::thread_rng();
    // Each call jitters availability downward a little to look live.
    let locations: Vec<LocationAvailability> = app
        .store
        .locations()
        .into_iter()
        .map(|mut loc| {
            loc.available_bikes = loc.available_bikes.saturating_sub(rng.gen_range(0..10));
            loc
        })
        .collect();
    Json(json!({ "locations": locations }))
}

pub async fn get_location(
    app: State<Arc<AppState>>,
    Path(city): Path<String>,
) -> Result<Json<Value>, AppError> {
    let location = app
        .store
        .locations()
        .into_iter()
        .find(|loc| loc.city.eq_ignore_ascii_case(&city))
        .ok_or_else(|| AppError::not_found("Location not found"))?;
    Ok(Json(json!({ "success": true, "location": location })))
}

#[derive(Debug, serde::Deserialize)]
pub struct NearbyQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
}

pub async fn search_nearby(
    app: State<Arc<AppState>>,
    query: Query<NearbyQuery>,
) -> Result<Json<Value>, AppError> {
    let (Some(lat), Some(lng)) = (query.lat, query.lng) else {
        return Err(AppError::bad_request("Latitude and longitude are required"));
    };
    let radius = query.radius.unwrap_or(100.0);

    let mut nearby: Vec<(f64, LocationAvailability)> = app
        .store
        .locations()
        .into_iter()
        .filter_map(|loc| {
            let distance = haversine_km(lat, lng, loc.coordinates.lat, loc.coordinates.lng);
            (distance <= radius).then_some((distance, loc))
        })
        .collect();
    nearby.sort_by(|a, b| a.0.total_cmp(&b.0));

    let locations: Vec<LocationAvailability> = nearby.into_iter().map(|(_, loc)| loc).collect();
    Ok(Json(json!({ "success": true, "locations": locations })))
}

/// The twelve demo cities and their mock fleet numbers.
pub fn seed_locations() -> Vec<LocationAvailability> {
    let loc = |city: &str,
               state: &str,
               lat: f64,
               lng: f64,
               available_bikes: u32,
               total_bikes: u32,
               popular: [&str; 3]| LocationAvailability {
        city: city.to_string(),
        state: state.to_string(),
        coordinates: Coordinates { lat, lng },
        available_bikes,
        total_bikes,
        popular_bikes: popular.iter().map(|p| p.to_string()).collect(),
    };

    vec![
        loc("Mumbai", "Maharashtra", 19.0760, 72.8777, 120, 150,
            ["Royal Enfield Classic 350", "Honda Activa 6G", "KTM Duke 390"]),
        loc("Delhi", "Delhi", 28.6139, 77.2090, 95, 120,
            ["Honda Activa 6G", "Hero Splendor Plus", "Bajaj Pulsar 220F"]),
        loc("Bangalore", "Karnataka", 12.9716, 77.5946, 80, 100,
            ["KTM Duke 390", "Royal Enfield Classic 350", "TVS Jupiter"]),
        loc("Chennai", "Tamil Nadu", 13.0827, 80.2707, 65, 80,
            ["Bajaj Pulsar 220F", "Honda Activa 6G", "TVS Jupiter"]),
        loc("Hyderabad", "Telangana", 17.3850, 78.4867, 70, 90,
            ["TVS Jupiter", "Hero Splendor Plus", "Royal Enfield Classic 350"]),
        loc("Pune", "Maharashtra", 18.5204, 73.8567, 55, 70,
            ["Hero Splendor Plus", "Honda Activa 6G", "KTM Duke 390"]),
        loc("Kolkata", "West Bengal", 22.5726, 88.3639, 45, 60,
            ["Honda Activa 6G", "Hero Splendor Plus", "TVS Jupiter"]),
        loc("Ahmedabad", "Gujarat", 23.0225, 72.5714, 40, 55,
            ["Hero Splendor Plus", "Bajaj Pulsar 220F", "Honda Activa 6G"]),
        loc("Jaipur", "Rajasthan", 26.9124, 75.7873, 35, 45,
            ["Royal Enfield Classic 350", "Hero Splendor Plus", "Honda Activa 6G"]),
        loc("Kochi", "Kerala", 9.9312, 76.2673, 30, 40,
            ["Honda Activa 6G", "TVS Jupiter", "Hero Splendor Plus"]),
        loc("Goa", "Goa", 15.2993, 74.1240, 50, 65,
            ["Royal Enfield Classic 350", "KTM Duke 390", "Honda Activa 6G"]),
        loc("Chandigarh", "Punjab", 30.7333, 76.7794, 25, 35,
            ["Hero Splendor Plus", "Bajaj Pulsar 220F", "Honda Activa 6G"]),
    ]
}
