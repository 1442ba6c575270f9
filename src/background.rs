use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The feel of the current weather, used to pick a background photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Sunny,
    ClearNight,
    Cloudy,
    Rainy,
    Snowy,
    Stormy,
}

impl Mood {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny landscape",
            Self::ClearNight => "clear sky nature",
            Self::Cloudy => "cloudy mountains",
            Self::Rainy => "rainy city",
            Self::Snowy => "snowy landscape",
            Self::Stormy => "storm landscape",
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PhotoResponse {
    pub id: String,
    pub description: Option<String>,
    pub alt_description: Option<String>,
    pub urls: PhotoUrls,
    pub user: Option<Photographer>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PhotoUrls {
    pub full: Option<String>,
    pub raw: Option<String>,
    pub regular: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Photographer {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Background {
    pub mood: Mood,
    pub url: String,
    pub description: Option<String>,
    pub photographer: Option<String>,
}

impl Background {
    pub fn from_response(mood: Mood, response: PhotoResponse) -> Result<Self> {
        let urls = response.urls;
        let Some(url) = urls.full.or(urls.raw).or(urls.regular) else {
            return Err(anyhow!("Photo {} has no usable URL", response.id));
        };
        Ok(Self {
            mood,
            url,
            description: response.description.or(response.alt_description),
            photographer: response.user.map(|u| u.name),
        })
    }
}
