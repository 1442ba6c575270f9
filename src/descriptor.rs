use crate::background::Mood;
use serde::{Deserialize, Serialize};

// https://open-meteo.com/en/docs#weathervariables (WMO weather interpretation codes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum WeatherCode {
    ClearSky,
    MainlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    RimeFog,
    LightDrizzle,
    ModerateDrizzle,
    DenseDrizzle,
    SlightRain,
    ModerateRain,
    HeavyRain,
    SlightSnow,
    ModerateSnow,
    HeavySnow,
    SnowGrains,
    SlightShowers,
    ModerateShowers,
    ViolentShowers,
    SlightSnowShowers,
    HeavySnowShowers,
    Thunderstorm,
    ThunderstormSlightHail,
    ThunderstormHeavyHail,
    Unknown(u8),
}

impl From<u8> for WeatherCode {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::ClearSky,
            1 => Self::MainlyClear,
            2 => Self::PartlyCloudy,
            3 => Self::Overcast,
            45 => Self::Fog,
            48 => Self::RimeFog,
            51 => Self::LightDrizzle,
            53 => Self::ModerateDrizzle,
            55 => Self::DenseDrizzle,
            61 => Self::SlightRain,
            63 => Self::ModerateRain,
            65 => Self::HeavyRain,
            71 => Self::SlightSnow,
            73 => Self::ModerateSnow,
            75 => Self::HeavySnow,
            77 => Self::SnowGrains,
            80 => Self::SlightShowers,
            81 => Self::ModerateShowers,
            82 => Self::ViolentShowers,
            85 => Self::SlightSnowShowers,
            86 => Self::HeavySnowShowers,
            95 => Self::Thunderstorm,
            96 => Self::ThunderstormSlightHail,
            99 => Self::ThunderstormHeavyHail,
            other => Self::Unknown(other),
        }
    }
}

impl From<WeatherCode> for u8 {
    fn from(code: WeatherCode) -> Self {
        match code {
            WeatherCode::ClearSky => 0,
            WeatherCode::MainlyClear => 1,
            WeatherCode::PartlyCloudy => 2,
            WeatherCode::Overcast => 3,
            WeatherCode::Fog => 45,
            WeatherCode::RimeFog => 48,
            WeatherCode::LightDrizzle => 51,
            WeatherCode::ModerateDrizzle => 53,
            WeatherCode::DenseDrizzle => 55,
            WeatherCode::SlightRain => 61,
            WeatherCode::ModerateRain => 63,
            WeatherCode::HeavyRain => 65,
            WeatherCode::SlightSnow => 71,
            WeatherCode::ModerateSnow => 73,
            WeatherCode::HeavySnow => 75,
            WeatherCode::SnowGrains => 77,
            WeatherCode::SlightShowers => 80,
            WeatherCode::ModerateShowers => 81,
            WeatherCode::ViolentShowers => 82,
            WeatherCode::SlightSnowShowers => 85,
            WeatherCode::HeavySnowShowers => 86,
            WeatherCode::Thunderstorm => 95,
            WeatherCode::ThunderstormSlightHail => 96,
            WeatherCode::ThunderstormHeavyHail => 99,
            WeatherCode::Unknown(other) => other,
        }
    }
}

impl WeatherCode {
    pub fn text(&self) -> &'static str {
        match self {
            Self::ClearSky => "Clear sky",
            Self::MainlyClear => "Mainly clear",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Overcast => "Overcast",
            Self::Fog => "Foggy",
            Self::RimeFog => "Depositing rime fog",
            Self::LightDrizzle => "Light drizzle",
            Self::ModerateDrizzle => "Moderate drizzle",
            Self::DenseDrizzle => "Dense drizzle",
            Self::SlightRain => "Slight rain",
            Self::ModerateRain => "Moderate rain",
            Self::HeavyRain => "Heavy rain",
            Self::SlightSnow => "Slight snow fall",
            Self::ModerateSnow => "Moderate snow fall",
            Self::HeavySnow => "Heavy snow fall",
            Self::SnowGrains => "Snow grains",
            Self::SlightShowers => "Slight rain showers",
            Self::ModerateShowers => "Moderate rain showers",
            Self::ViolentShowers => "Violent rain showers",
            Self::SlightSnowShowers => "Slight snow showers",
            Self::HeavySnowShowers => "Heavy snow showers",
            Self::Thunderstorm => "Thunderstorm",
            Self::ThunderstormSlightHail => "Thunderstorm with slight hail",
            Self::ThunderstormHeavyHail => "Thunderstorm with heavy hail",
            Self::Unknown(_) => "Unknown",
        }
    }

    pub fn icon_emoji(&self, is_day: bool) -> &'static str {
        match self {
            Self::ClearSky | Self::MainlyClear if !is_day => "🌙",
            Self::ClearSky => "☀️",
            Self::MainlyClear => "🌤️",
            Self::PartlyCloudy => "⛅",
            Self::Overcast => "☁️",
            Self::Fog | Self::RimeFog => "🌫️",
            Self::LightDrizzle
            | Self::ModerateDrizzle
            | Self::DenseDrizzle
            | Self::SlightRain
            | Self::ModerateRain
            | Self::HeavyRain => "🌧️",
            Self::SlightSnow
            | Self::ModerateSnow
            | Self::HeavySnow
            | Self::SnowGrains
            | Self::SlightSnowShowers
            | Self::HeavySnowShowers => "🌨️",
            Self::SlightShowers | Self::ModerateShowers | Self::ViolentShowers => "🌦️",
            Self::Thunderstorm | Self::ThunderstormSlightHail | Self::ThunderstormHeavyHail => {
                "⛈️"
            }
            Self::Unknown(_) => "❓",
        }
    }

    pub fn mood(&self, is_day: bool) -> Mood {
        match self {
            Self::ClearSky | Self::MainlyClear if is_day => Mood::Sunny,
            Self::ClearSky | Self::MainlyClear => Mood::ClearNight,
            Self::PartlyCloudy | Self::Overcast | Self::Fog | Self::RimeFog => Mood::Cloudy,
            Self::SlightSnow
            | Self::ModerateSnow
            | Self::HeavySnow
            | Self::SnowGrains
            | Self::SlightSnowShowers
            | Self::HeavySnowShowers => Mood::Snowy,
            Self::Thunderstorm | Self::ThunderstormSlightHail | Self::ThunderstormHeavyHail => {
                Mood::Stormy
            }
            Self::Unknown(_) => Mood::Cloudy,
            _ => Mood::Rainy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_text() {
        assert_eq!(WeatherCode::from(0).text(), "Clear sky");
        assert_eq!(WeatherCode::from(48).text(), "Depositing rime fog");
        assert_eq!(WeatherCode::from(96).text(), "Thunderstorm with slight hail");
        assert_eq!(WeatherCode::from(42), WeatherCode::Unknown(42));
        assert_eq!(WeatherCode::from(42).text(), "Unknown");
    }

    #[test]
    fn clear_night_gets_a_moon() {
        assert_eq!(WeatherCode::ClearSky.icon_emoji(true), "☀️");
        assert_eq!(WeatherCode::ClearSky.icon_emoji(false), "🌙");
        assert_eq!(WeatherCode::Overcast.icon_emoji(false), "☁️");
        assert_eq!(WeatherCode::Unknown(7).icon_emoji(true), "❓");
    }

    #[test]
    fn moods() {
        assert_eq!(WeatherCode::MainlyClear.mood(true), Mood::Sunny);
        assert_eq!(WeatherCode::MainlyClear.mood(false), Mood::ClearNight);
        assert_eq!(WeatherCode::DenseDrizzle.mood(true), Mood::Rainy);
        assert_eq!(WeatherCode::ViolentShowers.mood(true), Mood::Rainy);
        assert_eq!(WeatherCode::SnowGrains.mood(true), Mood::Snowy);
        assert_eq!(WeatherCode::ThunderstormHeavyHail.mood(false), Mood::Stormy);
    }

    #[test]
    fn deserializes_from_wmo_number() {
        let codes: Vec<WeatherCode> = serde_json::from_str("[3, 61, 250]").unwrap();
        assert_eq!(
            codes,
            vec![WeatherCode::Overcast, WeatherCode::SlightRain, WeatherCode::Unknown(250)]
        );
        assert_eq!(serde_json::to_string(&WeatherCode::Fog).unwrap(), "45");
    }
}
