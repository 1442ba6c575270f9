use crate::background::{Background, Mood, PhotoResponse};
use crate::location::Location;
use crate::ranker::Lookup;
use crate::retry::RetryPolicy;
use crate::search::{Candidate, SearchResponse};
use crate::weather::{ForecastResponse, Units, Weather};
use anyhow::{anyhow, Result};
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use ureq::{Agent, AgentBuilder, Request};

const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1";
const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const UNSPLASH_URL: &str = "https://api.unsplash.com/photos/random";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,apparent_temperature,wind_speed_10m,weather_code,is_day";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,\
    precipitation_probability_max,sunrise,sunset";

/// How many places one ranked search variant asks for
pub const SEARCH_COUNT: u8 = 10;

#[derive(Debug)]
pub struct Client {
    client: Agent,
    retry: RetryPolicy,
}

impl Client {
    pub fn new(retry: RetryPolicy) -> Client {
        let client = AgentBuilder::new()
            .timeout_read(Duration::from_secs(5))
            .timeout_write(Duration::from_secs(5))
            .user_agent(USER_AGENT)
            .build();
        Client { client, retry }
    }

    fn get<T: DeserializeOwned>(&self, what: &str, request: impl Fn() -> Request) -> Result<T> {
        debug!("Fetching {what}");
        let response = self.retry.run(what, || request().call())?;
        Ok(response.into_json()?)
    }

    pub fn search(&self, term: &str, count: u8) -> Result<Vec<Candidate>> {
        let url = format!("{GEOCODING_URL}/search");
        let response: SearchResponse = self.get(&format!("search {term:?}"), || {
            self.client
                .get(&url)
                .query("name", term)
                .query("count", &count.to_string())
                .query("language", "en")
                .query("format", "json")
        })?;
        debug!("{} results for {term:?}", response.results.len());
        Ok(response.results)
    }

    pub fn get_candidate(&self, id: u64) -> Result<Candidate> {
        let url = format!("{GEOCODING_URL}/get");
        self.get(&format!("location {id}"), || {
            self.client.get(&url).query("id", &id.to_string())
        })
    }

    pub fn get_weather(&self, location: &Location, units: &Units) -> Result<Weather> {
        let timezone = location.timezone.as_deref().unwrap_or("auto");
        let response: ForecastResponse = self.get(&format!("forecast for {}", location.id), || {
            self.client
                .get(FORECAST_URL)
                .query("latitude", &location.latitude.to_string())
                .query("longitude", &location.longitude.to_string())
                .query("current", CURRENT_FIELDS)
                .query("daily", DAILY_FIELDS)
                .query("timezone", timezone)
                .query("forecast_days", "6")
                .query("past_days", "1")
                .query("temperature_unit", &units.temperature.to_string())
                .query("wind_speed_unit", &units.wind_speed.to_string())
        })?;
        Weather::from_response(response, Utc::now())
    }

    pub fn get_background(&self, mood: Mood, access_key: Option<&str>) -> Result<Background> {
        let Some(access_key) = access_key.filter(|k| !k.is_empty()) else {
            return Err(anyhow!(
                "An Unsplash access key is needed for backgrounds (unsplash_access_key)"
            ));
        };
        let authorization = format!("Client-ID {access_key}");
        let response: PhotoResponse = self.get(&format!("{mood} background"), || {
            self.client
                .get(UNSPLASH_URL)
                .set("Authorization", &authorization)
                .set("Accept-Version", "v1")
                .query("query", mood.keyword())
                .query("orientation", "landscape")
                .query("content_filter", "high")
        })?;
        Background::from_response(mood, response)
    }
}

impl Lookup for Client {
    fn lookup(&self, term: &str) -> Result<Vec<Candidate>> {
        self.search(term, SEARCH_COUNT)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}
