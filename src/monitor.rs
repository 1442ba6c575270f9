use crate::client::Client;
use crate::location::Location;
use crate::weather::{Units, Weather};
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_with::DurationSeconds;
use tracing::{debug, error};

#[serde_with::serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorOptions {
    #[serde_as(as = "DurationSeconds<i64>")]
    pub refresh_interval: Duration,
    /// How soon to try again after a failed refresh
    #[serde_as(as = "DurationSeconds<i64>")]
    pub failure_delay: Duration,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::minutes(30),
            failure_delay: Duration::minutes(5),
        }
    }
}

/// Periodic weather refresh for one location.
#[derive(Debug)]
pub struct WeatherMonitor {
    pub location: Location,
    pub weather: Option<Weather>,
    pub next_refresh_due: DateTime<Utc>,
    opts: MonitorOptions,
}

impl WeatherMonitor {
    /// A new monitor is due immediately
    pub fn new(location: Location, opts: MonitorOptions, now: DateTime<Utc>) -> Self {
        Self {
            location,
            weather: None,
            next_refresh_due: now,
            opts,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.next_refresh_due
    }

    pub fn update_if_due(&mut self, client: &Client, units: &Units, now: DateTime<Utc>) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.record(client.get_weather(&self.location, units), now)
    }

    /// Store the outcome of a refresh and schedule the next one.
    pub fn record(&mut self, result: Result<Weather>, now: DateTime<Utc>) -> bool {
        match result {
            Ok(weather) => {
                self.weather = Some(weather);
                self.next_refresh_due = now + self.opts.refresh_interval;
                debug!(
                    "Refreshed {}. Next refresh in {} minutes",
                    self.location.id,
                    self.opts.refresh_interval.num_minutes()
                );
                true
            }
            Err(err) => {
                error!("Failed to refresh {}: {err:#}", self.location.id);
                self.next_refresh_due = now + self.opts.failure_delay;
                false
            }
        }
    }
}

/// Refresh every due monitor. Returns the indices of the monitors that got new
/// weather and the earliest next refresh time.
pub fn update_if_due(
    monitors: &mut [WeatherMonitor],
    client: &Client,
    units: &Units,
    now: DateTime<Utc>,
) -> (Vec<usize>, Option<DateTime<Utc>>) {
    let mut updated = Vec::new();
    for (i, monitor) in monitors.iter_mut().enumerate() {
        if monitor.update_if_due(client, units, now) {
            updated.push(i);
        }
    }
    let next = monitors.iter().map(|m| m.next_refresh_due).min();
    (updated, next)
}
