use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use super::bikes::Bike;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

const MAX_DISTANCE: usize = 2;

fn word_matches(haystack: &str, keyword: &str) -> bool {
    haystack
        .split_whitespace()
        .any(|word| levenshtein::levenshtein(&word.to_lowercase(), keyword) <= MAX_DISTANCE)
}

/// Typo-tolerant keyword match over name, brand and location.
pub fn matches_keyword(bike: &Bike, keyword: &str) -> bool {
    let keyword = keyword.to_lowercase();
    word_matches(&bike.name, &keyword)
        || word_matches(&bike.brand, &keyword)
        || word_matches(&bike.location, &keyword)
}

pub async fn search_bikes(app: State<Arc<AppState>>, query: Query<SearchQuery>) -> Json<Value> {
    let bikes: Vec<Bike> = app
        .store
        .bikes()
        .into_iter()
        .filter(|b| matches_keyword(b, &query.q))
        .collect();
    let total = bikes.len();
    Json(json!({ "bikes": bikes, "total": total }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bikes::bikes::seed_bikes;

    #[test]
    fn exact_brand_matches() {
        let bikes = seed_bikes();
        let hits: Vec<&Bike> = bikes.iter().filter(|b| matches_keyword(b, "Honda")).collect();
        assert!(hits.iter().any(|b| b.name == "Honda Activa 6G"));
    }

    #[test]
    fn close_misspelling_still_matches() {
        let bikes = seed_bikes();
        assert!(bikes.iter().any(|b| matches_keyword(b, "Hondda")));
        assert!(bikes.iter().any(|b| matches_keyword(b, "mumbai")));
    }

    #[test]
    fn distant_keyword_does_not_match() {
        let bikes = seed_bikes();
        assert!(!bikes.iter().any(|b| matches_keyword(b, "helicopter")));
    }
}
