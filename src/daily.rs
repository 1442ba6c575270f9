use crate::descriptor::WeatherCode;
use anyhow::{anyhow, Result};
use chrono::prelude::*;
use serde::{Deserialize, Serialize};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tues", "Wed", "Thur", "Fri", "Sat"];
pub const DISPLAY_DAYS: usize = 7;

/// Column-oriented daily block of an Open-Meteo forecast response.
#[derive(Debug, Deserialize, Serialize)]
pub struct DailyResponse {
    pub time: Vec<NaiveDate>,
    pub weather_code: Vec<Option<WeatherCode>>,
    pub temperature_2m_max: Vec<Option<f32>>,
    pub temperature_2m_min: Vec<Option<f32>>,
    #[serde(default)]
    pub precipitation_probability_max: Vec<Option<u8>>,
    #[serde(default)]
    pub sunrise: Vec<Option<String>>,
    #[serde(default)]
    pub sunset: Vec<Option<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    Yesterday,
    Today,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub weekday: String,
    pub kind: DayKind,
    pub temp_max: Option<f32>,
    pub temp_min: Option<f32>,
    pub weather_code: Option<WeatherCode>,
    pub rain_chance: Option<u8>,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
}

impl DayForecast {
    /// "Yesterday", "Today" or the short weekday name
    pub fn label(&self) -> &str {
        match self.kind {
            DayKind::Yesterday => "Yesterday",
            DayKind::Today => "Today",
            DayKind::Other => &self.weekday,
        }
    }

    pub fn text(&self) -> &'static str {
        self.weather_code.map(|c| c.text()).unwrap_or("Unknown")
    }
}

impl DailyResponse {
    /// Zip the columns into one forecast per day. `today` is the location's local date.
    pub fn into_days(self, today: NaiveDate) -> Result<Vec<DayForecast>> {
        let len = self.time.len();
        check_len("weather_code", self.weather_code.len(), len)?;
        check_len("temperature_2m_max", self.temperature_2m_max.len(), len)?;
        check_len("temperature_2m_min", self.temperature_2m_min.len(), len)?;
        check_optional_len(
            "precipitation_probability_max",
            self.precipitation_probability_max.len(),
            len,
        )?;
        check_optional_len("sunrise", self.sunrise.len(), len)?;
        check_optional_len("sunset", self.sunset.len(), len)?;

        let yesterday = today.pred_opt();
        let mut days = Vec::with_capacity(len);
        for (i, date) in self.time.into_iter().enumerate() {
            let kind = if date == today {
                DayKind::Today
            } else if Some(date) == yesterday {
                DayKind::Yesterday
            } else {
                DayKind::Other
            };
            let weekday = WEEKDAYS[date.weekday().num_days_from_sunday() as usize];
            days.push(DayForecast {
                date,
                weekday: weekday.to_string(),
                kind,
                temp_max: self.temperature_2m_max[i],
                temp_min: self.temperature_2m_min[i],
                weather_code: self.weather_code[i],
                rain_chance: self.precipitation_probability_max.get(i).copied().flatten(),
                sunrise: parse_local_time(self.sunrise.get(i))?,
                sunset: parse_local_time(self.sunset.get(i))?,
            });
        }
        Ok(days)
    }
}

fn check_len(name: &str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(anyhow!(
            "daily.{name} has {actual} values but daily.time has {expected}"
        ));
    }
    Ok(())
}

// Columns that weren't requested come back empty
fn check_optional_len(name: &str, actual: usize, expected: usize) -> Result<()> {
    if actual == 0 {
        return Ok(());
    }
    check_len(name, actual, expected)
}

/// Open-Meteo sends local times without seconds e.g. 2024-06-01T05:32
fn parse_local_time(value: Option<&Option<String>>) -> Result<Option<NaiveDateTime>> {
    let Some(Some(value)) = value else {
        return Ok(None);
    };
    let parsed = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| anyhow!("{value} is not a valid local time: {e}"))?;
    Ok(Some(parsed))
}

/// Yesterday first, today second, then the remaining days in date order.
pub fn display_days(days: &[DayForecast]) -> Vec<&DayForecast> {
    let mut ordered: Vec<&DayForecast> = days.iter().collect();
    ordered.sort_by_key(|day| {
        let rank = match day.kind {
            DayKind::Yesterday => 0,
            DayKind::Today => 1,
            DayKind::Other => 2,
        };
        (rank, day.date)
    });
    ordered.truncate(DISPLAY_DAYS);
    ordered
}
