use crate::client::Client;
use crate::search::Candidate;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Location {
    /// Slug followed by the GeoNames id e.g. new-york-5128581
    pub id: String,
    pub geonames_id: u64,
    pub name: String,
    pub country: String,
    pub admin1: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
}

impl TryFrom<Candidate> for Location {
    type Error = anyhow::Error;

    fn try_from(candidate: Candidate) -> Result<Self> {
        let Some(geonames_id) = candidate.id else {
            return Err(anyhow!("{} has no GeoNames id", candidate.label()));
        };
        Ok(Location {
            id: location_id(&candidate.name, geonames_id),
            geonames_id,
            name: candidate.name,
            country: candidate.country,
            admin1: candidate.admin1,
            latitude: candidate.latitude,
            longitude: candidate.longitude,
            timezone: candidate.timezone,
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}, {}", self.name, self.country)
    }
}

pub fn location_id(name: &str, geonames_id: u64) -> String {
    let slug = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("{slug}-{geonames_id}")
}

/// Split a Location ID into its slug and GeoNames id.
pub fn parse_location_id(id: &str) -> Option<(&str, u64)> {
    let (slug, number) = id.rsplit_once('-')?;
    if slug.is_empty() {
        return None;
    }
    Some((slug, number.parse().ok()?))
}

/// Find the single best place for a city name or Location ID.
pub fn resolve_city(client: &Client, name: &str) -> Result<Option<Location>> {
    if let Some((_, geonames_id)) = parse_location_id(name) {
        debug!("{name} looks like a Location ID");
        let candidate = client.get_candidate(geonames_id)?;
        return Ok(Some(candidate.try_into()?));
    }

    // Hyphenated slugs like new-york are searched with spaces first
    let spaced = name.replace('-', " ");
    let mut results = client.search(&spaced, 1)?;
    if results.is_empty() && spaced != name {
        debug!("No results for {spaced}, trying {name}");
        results = client.search(name, 1)?;
    }

    match results.into_iter().next() {
        Some(candidate) => {
            let location: Location = candidate.try_into()?;
            info!("Resolved {name} to {location}");
            Ok(Some(location))
        }
        None => Ok(None),
    }
}

pub fn ids_to_locations(location_ids: &[String], client: &Client) -> Result<Vec<Location>> {
    let mut locations = Vec::with_capacity(location_ids.len());
    for id in location_ids {
        let Some((_, geonames_id)) = parse_location_id(id) else {
            return Err(anyhow!("{} is not a valid Location ID", id));
        };
        let location: Location = client.get_candidate(geonames_id)?.try_into()?;
        if location.id != *id {
            debug!("{id} is now known as {}", location.id);
        }
        locations.push(location);
    }
    Ok(locations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_slug_and_number() {
        assert_eq!(location_id("New York", 5128581), "new-york-5128581");
        assert_eq!(location_id("Paris", 2988507), "paris-2988507");
        assert_eq!(parse_location_id("new-york-5128581"), Some(("new-york", 5128581)));
        assert_eq!(parse_location_id("new-york"), None);
        assert_eq!(parse_location_id("-42"), None);
        assert_eq!(parse_location_id("Paris"), None);
    }

    #[test]
    fn candidates_need_an_id() {
        let mut candidate = Candidate {
            id: None,
            name: "Sydney".to_string(),
            latitude: -33.86785,
            longitude: 151.20732,
            country: "Australia".to_string(),
            country_code: Some("AU".to_string()),
            admin1: Some("New South Wales".to_string()),
            timezone: Some("Australia/Sydney".to_string()),
        };
        assert!(Location::try_from(candidate.clone()).is_err());

        candidate.id = Some(2147714);
        let location = Location::try_from(candidate).unwrap();
        assert_eq!(location.id, "sydney-2147714");
        assert_eq!(location.to_string(), "Sydney, Australia");
        assert_eq!(location.timezone.as_deref(), Some("Australia/Sydney"));
    }
}
