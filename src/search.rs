use serde::{Deserialize, Serialize};
use std::fmt;

/// A geocoded place as returned by the Open-Meteo search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub country_code: Option<String>,
    /// State or province
    #[serde(default)]
    pub admin1: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Candidate {
    /// Identity of a place. Names collide across countries, coordinates don't.
    pub fn coordinate_key(&self) -> String {
        // -0.0 and 0.0 are the same place
        format!("{}-{}", self.latitude + 0.0, self.longitude + 0.0)
    }

    pub fn label(&self) -> String {
        let mut label = format!("{}, {}", self.name, self.country);
        if let Some(admin1) = self.admin1.as_deref().filter(|a| !a.is_empty()) {
            label.push_str(", ");
            label.push_str(admin1);
        }
        label
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    pub candidate: Candidate,
    pub label: String,
    pub score: f64,
}

impl fmt::Display for RankedResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Absent when nothing matched
    #[serde(default)]
    pub results: Vec<Candidate>,
    #[serde(default)]
    pub generationtime_ms: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_includes_region_when_present() {
        let mut candidate = Candidate {
            id: Some(4717560),
            name: "Paris".to_string(),
            latitude: 33.66094,
            longitude: -95.55551,
            country: "United States".to_string(),
            country_code: Some("US".to_string()),
            admin1: Some("Texas".to_string()),
            timezone: None,
        };
        assert_eq!(candidate.label(), "Paris, United States, Texas");
        candidate.admin1 = None;
        assert_eq!(candidate.label(), "Paris, United States");
    }

    #[test]
    fn coordinate_key_uses_shortest_float_form() {
        let candidate = Candidate {
            id: None,
            name: "Null Island".to_string(),
            latitude: 0.0,
            longitude: -74.00597,
            country: String::new(),
            country_code: None,
            admin1: None,
            timezone: None,
        };
        assert_eq!(candidate.coordinate_key(), "0--74.00597");
    }

    #[test]
    fn negative_zero_shares_a_key_with_zero() {
        let mut candidate = Candidate {
            id: None,
            name: "Null Island".to_string(),
            latitude: -0.0,
            longitude: 1.0,
            country: String::new(),
            country_code: None,
            admin1: None,
            timezone: None,
        };
        assert_eq!(candidate.coordinate_key(), "0-1");
        candidate.latitude = 1.0;
        candidate.longitude = -0.0;
        assert_eq!(candidate.coordinate_key(), "1-0");
    }

    #[test]
    fn missing_results_mean_no_matches() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"generationtime_ms": 0.5}"#).unwrap();
        assert!(response.results.is_empty());

        let json = r#"{"results": [{"id": 2988507, "name": "Paris", "latitude": 48.85341,
            "longitude": 2.3488, "country": "France", "country_code": "FR",
            "admin1": "Île-de-France", "timezone": "Europe/Paris", "population": 2138551}]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].id, Some(2988507));
        assert_eq!(response.results[0].coordinate_key(), "48.85341-2.3488");
    }
}
