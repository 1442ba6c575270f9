use crate::client::Client;
use crate::config::Config;
use crate::location::{ids_to_locations, resolve_city, Location};
use crate::logging::{setup_logging, LogLevel};
use crate::monitor::{update_if_due, WeatherMonitor};
use crate::ranker;
use crate::search::RankedResult;
use crate::util::format_duration;
use crate::weather::{whole, Weather};
use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use inquire::{Select, Text};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::Duration;
use tracing::{debug, error, info};

fn default(path: &Path) -> String {
    format!("[default: {}]", path.as_os_str().to_string_lossy())
}

/// Weather for any city, with ranked search and mood-matched backgrounds
#[derive(Parser, Debug, Serialize)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long = "config", value_name = "FILE", help = default(&Config::default_path()))]
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = default(&Config::default_dirs().cache))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// [default: info]
    #[arg(short, long)]
    #[serde(skip)]
    log_level: Option<LogLevel>,

    /// Location ID e.g. paris-2988507 (overrides config)
    #[arg(short = 'i', long = "location-id", value_name = "ID")]
    #[serde(skip_serializing_if = "Option::is_none")]
    locations: Option<Vec<String>>,

    #[command(subcommand)]
    #[serde(skip)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for a city and show the best matches
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Search for a city and save it in the config file
    AddLocation,
    /// Print the current weather
    Current {
        /// City name or Location ID (overrides config)
        city: Option<String>,
        /// Custom format string
        #[arg(short, long)]
        fstring: Option<String>,
    },
    /// Print current conditions and the daily forecast
    Forecast {
        /// City name or Location ID (overrides config)
        city: Option<String>,
    },
    /// Print a background image URL that suits the current weather
    Background {
        /// City name or Location ID (overrides config)
        city: Option<String>,
    },
    /// Run continuously and refresh the weather when it's due
    Monitor,
    /// Open the config file in your editor
    EditConfig,
}

pub fn cli() -> Result<()> {
    let args = Cli::parse();

    let mut config = Config::from_cli(&args)?;
    if let Some(level) = args.log_level {
        config.main.logging.console_level = level;
        config.main.logging.file_level = level;
    }
    let _guard = setup_logging(&config.main.logging, &config.main.log_dir)?;
    debug!("Command line arguments: {:#?}", &args);
    debug!("Config: {:#?}", &config);

    let client = Client::new(config.main.retry.clone());
    match &args.command {
        Some(Commands::Search { query }) => search(&client, &query.join(" ")),
        Some(Commands::AddLocation) => add_location(&mut config, &client)?,
        Some(Commands::Current { city, fstring }) => {
            print_current(&config, &client, city.as_deref(), fstring.as_deref())?
        }
        Some(Commands::Forecast { city }) => print_forecast(&config, &client, city.as_deref())?,
        Some(Commands::Background { city }) => {
            print_background(&config, &client, city.as_deref())?
        }
        Some(Commands::Monitor) => monitor(&config, &client)?,
        Some(Commands::EditConfig) => edit_config(&config)?,
        None => {}
    }
    Ok(())
}

fn get_locations(config: &Config, client: &Client, city: Option<&str>) -> Result<Vec<Location>> {
    if let Some(city) = city {
        return match resolve_city(client, city)? {
            Some(location) => Ok(vec![location]),
            None => Err(anyhow!("No results found for {city}")),
        };
    }
    if config.main.locations.is_empty() {
        return Err(anyhow!("No locations specified"));
    }
    ids_to_locations(&config.main.locations, client)
}

fn output(line: &str) {
    if std::io::stdout().is_terminal() {
        println!("{line}");
    } else {
        print!("{line}");
    }
}

fn search(client: &Client, query: &str) {
    let results = ranker::search(query, client);
    if results.is_empty() {
        info!("No search results for {query}");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Place", "Latitude", "Longitude", "Score", "Location ID"]);
    for result in &results {
        let candidate = &result.candidate;
        let id = Location::try_from(candidate.clone())
            .map(|l| l.id)
            .unwrap_or_default();
        table.add_row(vec![
            result.label.clone(),
            candidate.latitude.to_string(),
            candidate.longitude.to_string(),
            format!("{:.0}", result.score),
            id,
        ]);
    }
    println!("{table}");
}

fn add_location(config: &mut Config, client: &Client) -> Result<()> {
    let result = search_for_location(client)?;
    let location = Location::try_from(result.candidate)?;
    config.add_location(&location)?;
    Ok(())
}

fn search_for_location(client: &Client) -> Result<RankedResult> {
    loop {
        let input = Text::new("Enter a city").prompt()?;
        let mut results = ranker::search(&input, client);
        if results.is_empty() {
            info!("No search results for {input}");
            continue;
        } else if results.len() == 1 {
            let result = results.remove(0);
            info!("Selecting only result: {result}");
            return Ok(result);
        };

        let selection = match Select::new("Select a result: ", results).prompt() {
            Ok(s) => s,
            Err(_) => {
                error!("An error occured. Please try again.");
                continue;
            }
        };
        return Ok(selection);
    }
}

fn print_current(
    config: &Config,
    client: &Client,
    city: Option<&str>,
    fstring: Option<&str>,
) -> Result<()> {
    let fstring = fstring.unwrap_or(&config.main.current_fstring);
    for location in get_locations(config, client, city)? {
        let weather = client.get_weather(&location, &config.main.units)?;
        output(&weather.current(&location).process_fstring(fstring)?);
    }
    Ok(())
}

fn print_forecast(config: &Config, client: &Client, city: Option<&str>) -> Result<()> {
    let units = &config.main.units;
    for location in get_locations(config, client, city)? {
        let weather = client.get_weather(&location, units)?;
        match weather.local_time(Utc::now()) {
            Some(local) => println!(
                "{} ({}) {}",
                location,
                weather.timezone,
                local.format("%H:%M %A %-d %B %Y")
            ),
            None => println!("{} ({})", location, weather.timezone),
        }
        let summary = format!(
            "{{icon}} {{temp}}° {{text}}, feels like {{feels_like}}°, \
            humidity {{humidity}}%, wind {{wind_speed}} {}",
            units.wind_speed
        );
        println!("{}", weather.current(&location).process_fstring(&summary)?);
        if let Some(comparison) = weather.temperature_comparison() {
            println!("{comparison}");
        }
        println!("{}", forecast_table(&weather));
    }
    Ok(())
}

fn forecast_table(weather: &Weather) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Day", "", "Max", "Min", "Rain", "Sunrise", "Sunset", "Conditions"]);
    let temp = |t: Option<f32>| t.map(|t| format!("{}°", whole(t))).unwrap_or_default();
    let time = |t: Option<chrono::NaiveDateTime>| {
        t.map(|t| t.format("%H:%M").to_string()).unwrap_or_default()
    };
    for day in weather.display_days() {
        table.add_row(vec![
            day.label().to_string(),
            day.weather_code
                .map(|c| c.icon_emoji(true).to_string())
                .unwrap_or_default(),
            temp(day.temp_max),
            temp(day.temp_min),
            day.rain_chance.map(|r| format!("{r}%")).unwrap_or_default(),
            time(day.sunrise),
            time(day.sunset),
            day.text().to_string(),
        ]);
    }
    table
}

fn print_background(config: &Config, client: &Client, city: Option<&str>) -> Result<()> {
    let key = config.main.unsplash_access_key.as_deref();
    for location in get_locations(config, client, city)? {
        let weather = client.get_weather(&location, &config.main.units)?;
        let background = client.get_background(weather.mood(), key)?;
        info!("{} feels {}", location, background.mood);
        if let Some(photographer) = &background.photographer {
            info!("Photo by {photographer} on Unsplash");
        }
        output(&background.url);
    }
    Ok(())
}

fn monitor(config: &Config, client: &Client) -> Result<()> {
    let now = Utc::now();
    let mut monitors: Vec<WeatherMonitor> = get_locations(config, client, None)?
        .into_iter()
        .map(|location| WeatherMonitor::new(location, config.main.monitor.clone(), now))
        .collect();

    for monitor in &monitors {
        info!("Monitoring weather for {}", monitor.location.id);
    }
    loop {
        let now = Utc::now();
        let (updated, next) = update_if_due(&mut monitors, client, &config.main.units, now);
        for i in &updated {
            let monitor = &monitors[*i];
            if let Some(weather) = &monitor.weather {
                let current = weather.current(&monitor.location);
                println!("{}", current.process_fstring(&config.main.current_fstring)?);
            }
        }
        if !updated.is_empty() {
            if let Some(next) = next {
                info!("Next refresh in {}", format_duration(next - now));
            }
        }
        sleep(Duration::from_secs(1));
    }
}

fn edit_config(config: &Config) -> Result<()> {
    if !config.config_path.exists() {
        info!("Creating {}", config.config_path.display());
        config.write_config_file()?;
    }
    edit::edit_file(&config.config_path)?;
    Ok(())
}
