use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bike {
    pub id: u32,
    pub name: String,
    pub location: String,
    pub price: u32,
    pub rating: f64,
    pub image: String,
    pub features: Vec<String>,
    pub available: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub brand: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specifications: Option<Specifications>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specifications {
    pub engine: String,
    pub mileage: String,
    pub fuel_capacity: String,
    pub weight: String,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BikeQuery {
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub brand: Option<String>,
    pub price_min: Option<u32>,
    pub price_max: Option<u32>,
    pub available: Option<bool>,
    pub sort_by: Option<SortBy>,
}

#[derive(Debug, Clone, Copy, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Price,
    Rating,
    Name,
}

/// Applies every supplied filter, then the requested sort. `all` in the
/// location/type/brand filters means "no filter", matching the web client's
/// dropdown defaults.
pub fn search_catalog(mut bikes: Vec<Bike>, query: &BikeQuery) -> Vec<Bike> {
    if let Some(location) = query.location.as_deref().filter(|l| *l != "all") {
        let needle = location.to_lowercase();
        bikes.retain(|b| b.location.to_lowercase().contains(&needle));
    }
    if let Some(kind) = query.kind.as_deref().filter(|k| *k != "all") {
        bikes.retain(|b| b.kind == kind);
    }
    if let Some(brand) = query.brand.as_deref().filter(|b| *b != "all") {
        bikes.retain(|b| b.brand == brand);
    }
    if let Some(min) = query.price_min {
        bikes.retain(|b| b.price >= min);
    }
    if let Some(max) = query.price_max {
        bikes.retain(|b| b.price <= max);
    }
    if let Some(available) = query.available {
        bikes.retain(|b| b.available == available);
    }

    match query.sort_by {
        Some(SortBy::Price) => bikes.sort_by_key(|b| b.price),
        Some(SortBy::Rating) => bikes.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        Some(SortBy::Name) => bikes.sort_by(|a, b| a.name.cmp(&b.name)),
        None => {}
    }
    bikes
}

pub async fn get_bikes(app: State<Arc<AppState>>, query: Query<BikeQuery>) -> Json<Value> {
    let bikes = search_catalog(app.store.bikes(), &query);
    let total = bikes.len();
    Json(json!({ "bikes": bikes, "total": total }))
}

pub async fn get_bike(
    app: State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<Bike>, AppError> {
    app.store
        .bike(id)
        .map(Json)
        .ok_or_else(|| AppError::not_found("Bike not found"))
}

pub async fn get_featured_bikes(app: State<Arc<AppState>>) -> Json<Vec<Bike>> {
    let featured: Vec<Bike> = app
        .store
        .bikes()
        .into_iter()
        .filter(|b| b.rating >= 4.5)
        .take(6)
        .collect();
    Json(featured)
}

/// The static demo catalog.
pub fn seed_bikes() -> Vec<Bike> {
    let bike = |id: u32,
                name: &str,
                location: &str,
                price: u32,
                rating: f64,
                image: &str,
                features: [&str; 3],
                available: bool,
                kind: &str,
                brand: &str,
                description: &str,
                specs: [&str; 4]| Bike {
        id,
        name: name.to_string(),
        location: location.to_string(),
        price,
        rating,
        image: image.to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
        available,
        kind: kind.to_string(),
        brand: brand.to_string(),
        description: Some(description.to_string()),
        specifications: Some(Specifications {
            engine: specs[0].to_string(),
            mileage: specs[1].to_string(),
            fuel_capacity: specs[2].to_string(),
            weight: specs[3].to_string(),
        }),
    };

    vec![
        bike(
            1,
            "Royal Enfield Classic 350",
            "Mumbai",
            1000,
            4.8,
            "https://cdn.builder.io/api/v1/image/assets%2F51218e8445d94a61bcf324c702b7ca69%2F2bb6b62497af4e0480a47e1815233ea4",
            ["350cc", "Manual", "Petrol"],
            true,
            "Cruiser",
            "Royal Enfield",
            "Experience the classic charm of Royal Enfield with modern reliability.",
            ["346cc Single Cylinder", "41 km/l", "13.5 L", "195 kg"],
        ),
        bike(
            2,
            "Honda Activa 6G",
            "Delhi",
            500,
            4.6,
            "https://cdn.builder.io/api/v1/image/assets%2F51218e8445d94a61bcf324c702b7ca69%2Fce42bd7c282447599b4b8037f27383e7",
            ["110cc", "Automatic", "Petrol"],
            true,
            "Scooter",
            "Honda",
            "Perfect for city commuting with excellent fuel efficiency.",
            ["109.51cc Air Cooled", "60 km/l", "5.3 L", "109 kg"],
        ),
        bike(
            3,
            "KTM Duke 390",
            "Bangalore",
            1200,
            4.9,
            "https://cdn.builder.io/api/v1/image/assets%2F51218e8445d94a61bcf324c702b7ca69%2F3e65d192410c4554b4119cbdae16e131",
            ["390cc", "Manual", "Petrol"],
            false,
            "Sports",
            "KTM",
            "Unleash the beast with KTM's performance-oriented street bike.",
            ["373.2cc Single Cylinder", "25 km/l", "13.4 L", "167 kg"],
        ),
        bike(
            4,
            "Bajaj Pulsar N250",
            "Chennai",
            900,
            4.4,
            "https://cdn.builder.io/api/v1/image/assets%2F51218e8445d94a61bcf324c702b7ca69%2Fed592590e9194d03a33a66d59abcd1fc?format=webp",
            ["250cc", "Manual", "Petrol"],
            true,
            "Sports",
            "Bajaj",
            "Adventure-ready sports bike with superior performance.",
            ["250cc DTS-i", "35 km/l", "14 L", "162 kg"],
        ),
        bike(
            5,
            "TVS Jupiter",
            "Hyderabad",
            500,
            4.3,
            "https://cdn.builder.io/api/v1/image/assets%2F51218e8445d94a61bcf324c702b7ca69%2F15dc895e731a410aba9ed54cf0c8c332?format=webp",
            ["110cc", "Automatic", "Petrol"],
            true,
            "Scooter",
            "TVS",
            "Smooth and comfortable ride for everyday commuting.",
            ["109.7cc CVTi-REVV", "62 km/l", "6 L", "108 kg"],
        ),
        bike(
            6,
            "Hero Splendor Plus",
            "Pune",
            500,
            4.2,
            "https://cdn.builder.io/o/assets%2F51218e8445d94a61bcf324c702b7ca69%2Fec8f6cdb969b421fb156f72297d7b50b?alt=media&token=fa90e95b-934a-4de2-ad57-acd05df1a4a5&apiKey=51218e8445d94a61bcf324c702b7ca69",
            ["97cc", "Manual", "Petrol"],
            true,
            "Commuter",
            "Hero",
            "Reliable and economical bike for daily commuting.",
            ["97.2cc Air Cooled", "70 km/l", "9.5 L", "112 kg"],
        ),
    ]
}
