use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{Select, Text};
use weathernow_core::{
    Config, Directory, LocalTimeResolver, Selection, build_report, provider::provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathernow", version, about = "Current weather and weekly forecast for any city")]
pub struct Cli {
    /// Path to the world cities CSV; overrides the configured one.
    #[arg(long, global = true)]
    pub cities: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every country in the dataset.
    Countries,

    /// List the cities of a country.
    Cities {
        /// Country name as written in the dataset, e.g. "United States".
        country: String,
    },

    /// Show current weather, the weekly forecast and the map link for a city.
    Show {
        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        city: Option<String>,

        /// Print the full report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Set the dataset path and default city.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Countries => {
                let directory = load_directory(&config, self.cities.as_deref())?;
                for country in directory.countries() {
                    println!("{country}");
                }
            }
            Command::Cities { country } => {
                let directory = load_directory(&config, self.cities.as_deref())?;
                let cities = directory.cities(&country);
                if cities.is_empty() {
                    anyhow::bail!(
                        "No cities found for country '{country}'.\n\
                         Hint: run `weathernow countries` to see the exact names."
                    );
                }
                for city in cities {
                    println!("{city}");
                }
            }
            Command::Show { country, city, json } => {
                let directory = load_directory(&config, self.cities.as_deref())?;
                let selection = resolve_selection(&directory, &config, country, city)?;
                tracing::debug!(country = %selection.country, city = %selection.city, "selected city");

                let provider = provider_from_config(&config);
                let resolver = LocalTimeResolver::new();

                let report = build_report(&directory, provider.as_ref(), &resolver, &selection)
                    .await
                    .with_context(|| {
                        format!("Failed to build report for {}, {}", selection.city, selection.country)
                    })?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print!("{}", render::render_report(&report));
                }
            }
            Command::Configure => configure(config, self.cities)?,
        }

        Ok(())
    }
}

fn load_directory(config: &Config, cli_override: Option<&std::path::Path>) -> Result<Directory> {
    let path = config.resolve_cities_path(cli_override)?;
    Directory::load(&path).with_context(|| {
        format!(
            "Could not load the city dataset.\n\
             Hint: download worldcities.csv from https://simplemaps.com/data/world-cities and \
             place it at {}, or pass --cities <PATH>.",
            path.display()
        )
    })
}

/// Flags first, then the configured default, then interactive pickers for whatever is missing.
fn resolve_selection(
    directory: &Directory,
    config: &Config,
    country: Option<String>,
    city: Option<String>,
) -> Result<Selection> {
    if let (Some(country), Some(city)) = (&country, &city) {
        return Ok(Selection::new(country.as_str(), city.as_str()));
    }

    if country.is_none() && city.is_none() {
        if let Some(default) = &config.default_location {
            return Ok(default.clone());
        }
    }

    let country = match country {
        Some(country) => country,
        None => pick_country(directory)?,
    };
    let city = match city {
        Some(city) => city,
        None => pick_city(directory, &country)?,
    };

    Ok(Selection::new(country, city))
}

fn pick_country(directory: &Directory) -> Result<String> {
    let options: Vec<&str> = directory.countries().into_iter().collect();
    let choice = Select::new("Country", options)
        .prompt()
        .context("Country selection cancelled")?;
    Ok(choice.to_string())
}

fn pick_city(directory: &Directory, country: &str) -> Result<String> {
    let options: Vec<&str> = directory.cities(country).into_iter().collect();
    if options.is_empty() {
        anyhow::bail!("No cities found for country '{country}'.");
    }

    let choice = Select::new("City", options)
        .prompt()
        .context("City selection cancelled")?;
    Ok(choice.to_string())
}

fn configure(mut config: Config, cities_flag: Option<PathBuf>) -> Result<()> {
    let current = config.resolve_cities_path(cities_flag.as_deref())?;
    let entered = Text::new("Path to worldcities.csv")
        .with_default(&current.display().to_string())
        .prompt()
        .context("Configuration cancelled")?;

    let path = PathBuf::from(entered.trim());
    let directory = Directory::load(&path)
        .with_context(|| format!("Could not load the city dataset at {}", path.display()))?;
    config.cities_path = Some(path);

    let country = pick_country(&directory)?;
    let city = pick_city(&directory, &country)?;
    config.set_default_location(Selection::new(country, city));

    let saved_to = config.save()?;
    println!("Configuration saved to {}", saved_to.display());

    Ok(())
}
