use crate::background::Mood;
use crate::daily::{display_days, DailyResponse, DayForecast, DayKind};
use crate::descriptor::WeatherCode;
use crate::location::Location;
use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WindSpeedUnit {
    #[default]
    Kmh,
    Ms,
    Mph,
    Kn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Units {
    pub temperature: TemperatureUnit,
    pub wind_speed: WindSpeedUnit,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub utc_offset_seconds: i32,
    pub timezone: String,
    pub current: CurrentResponse,
    pub daily: DailyResponse,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CurrentResponse {
    pub time: String,
    pub temperature_2m: f32,
    pub relative_humidity_2m: f32,
    pub apparent_temperature: f32,
    pub wind_speed_10m: f32,
    pub weather_code: WeatherCode,
    #[serde(default)]
    pub is_day: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp: f32,
    pub temp_feels_like: f32,
    pub humidity: f32,
    pub wind_speed: f32,
    pub weather_code: WeatherCode,
    pub is_day: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub timezone: String,
    pub utc_offset_seconds: i32,
    pub fetched_at: DateTime<Utc>,
    pub current: CurrentConditions,
    pub days: Vec<DayForecast>,
}

impl Weather {
    pub fn from_response(response: ForecastResponse, now: DateTime<Utc>) -> Result<Self> {
        let offset = FixedOffset::east_opt(response.utc_offset_seconds)
            .ok_or_else(|| anyhow!("Invalid UTC offset {}", response.utc_offset_seconds))?;
        let today = now.with_timezone(&offset).date_naive();
        let current = response.current;

        Ok(Weather {
            timezone: response.timezone,
            utc_offset_seconds: response.utc_offset_seconds,
            fetched_at: now,
            current: CurrentConditions {
                temp: current.temperature_2m,
                temp_feels_like: current.apparent_temperature,
                humidity: current.relative_humidity_2m,
                wind_speed: current.wind_speed_10m,
                weather_code: current.weather_code,
                is_day: current.is_day.map_or(true, |d| d == 1),
            },
            days: response.daily.into_days(today)?,
        })
    }

    pub fn local_date(&self) -> Option<NaiveDate> {
        Some(self.local_time(self.fetched_at)?.date_naive())
    }

    /// Wall clock time at the location.
    pub fn local_time(&self, now: DateTime<Utc>) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.utc_offset_seconds)?;
        Some(now.with_timezone(&offset))
    }

    pub fn today(&self) -> Option<&DayForecast> {
        self.days.iter().find(|d| d.kind == DayKind::Today)
    }

    pub fn yesterday(&self) -> Option<&DayForecast> {
        self.days.iter().find(|d| d.kind == DayKind::Yesterday)
    }

    pub fn display_days(&self) -> Vec<&DayForecast> {
        display_days(&self.days)
    }

    pub fn mood(&self) -> Mood {
        self.current.weather_code.mood(self.current.is_day)
    }

    pub fn temperature_comparison(&self) -> Option<String> {
        let today = self.today()?.temp_max?;
        let yesterday = self.yesterday()?.temp_max?;
        let diff = (today - yesterday).round() as i32;
        let text = match diff {
            d if d > 0 => format!("Today is {}° warmer than yesterday", d),
            d if d < 0 => format!("Today is {}° cooler than yesterday", d.abs()),
            _ => "Today's temperature is the same as yesterday".to_string(),
        };
        Some(text)
    }

    pub fn current<'a>(&'a self, location: &'a Location) -> CurrentWeather<'a> {
        CurrentWeather {
            location,
            weather: self,
        }
    }
}

/// Temperatures are shown as whole degrees
pub fn whole(value: f32) -> i32 {
    value.round() as i32
}

fn optional_whole(value: Option<f32>) -> String {
    value.map(|v| whole(v).to_string()).unwrap_or_else(|| "-".to_string())
}

pub struct CurrentWeather<'a> {
    pub location: &'a Location,
    pub weather: &'a Weather,
}

impl<'a> CurrentWeather<'a> {
    /// Process a user-provided format string e.g. "{icon} {temp}° {text}".
    /// Just a basic implementation that doesn't handle nested curly brackets
    pub fn process_fstring(&self, fstring: &str) -> Result<String> {
        let mut remainder = fstring;
        let mut output = String::new();
        while let Some(start) = remainder.find('{') {
            output.push_str(&remainder[..start]);
            let Some(len) = remainder[start..].find('}') else {
                return Err(anyhow!("{fstring} is not a valid format string"));
            };
            let key = &remainder[start + 1..start + len];
            self.push_value(key, &mut output)?;
            remainder = &remainder[start + len + 1..];
        }
        output.push_str(remainder);
        Ok(output)
    }

    fn push_value(&self, key: &str, output: &mut String) -> Result<()> {
        let current = &self.weather.current;
        let today = self.weather.today();
        match key {
            "icon" => output.push_str(current.weather_code.icon_emoji(current.is_day)),
            "text" => output.push_str(current.weather_code.text()),
            "temp" => output.push_str(&whole(current.temp).to_string()),
            "feels_like" => output.push_str(&whole(current.temp_feels_like).to_string()),
            "humidity" => output.push_str(&whole(current.humidity).to_string()),
            "wind_speed" => output.push_str(&whole(current.wind_speed).to_string()),
            "max_temp" => output.push_str(&optional_whole(today.and_then(|t| t.temp_max))),
            "min_temp" => output.push_str(&optional_whole(today.and_then(|t| t.temp_min))),
            "rain_chance" => {
                let chance = today.and_then(|t| t.rain_chance).unwrap_or(0);
                output.push_str(&chance.to_string())
            }
            "sunrise" | "sunset" => {
                let time = today.and_then(|t| if key == "sunrise" { t.sunrise } else { t.sunset });
                match time {
                    Some(time) => output.push_str(&time.format("%H:%M").to_string()),
                    None => output.push('-'),
                }
            }
            "comparison" => {
                output.push_str(&self.weather.temperature_comparison().unwrap_or_default())
            }
            "city" => output.push_str(&self.location.name),
            "country" => output.push_str(&self.location.country),
            _ => return Err(anyhow!("{} is not a valid key", key)),
        }

        Ok(())
    }
}
