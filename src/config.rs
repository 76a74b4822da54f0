use std::path::{Path, PathBuf};

use log::{error, info};
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::{
    dataset::Datasets,
    leaderboard::{FlagScore, Leaderboard, PiScore},
};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,
    #[serde(default = "default_leaderboard_dir")]
    leaderboard_dir: PathBuf,
    #[serde(default = "default_templates_dir")]
    templates_dir: PathBuf,
    #[serde(default = "default_static_dir")]
    static_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_leaderboard_dir() -> PathBuf {
    PathBuf::from("leaderboards")
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Config {
    /// Root of the game datasets, one subdirectory per game.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory holding the leaderboard files.
    pub fn leaderboard_dir(&self) -> &Path {
        &self.leaderboard_dir
    }

    /// Directory holding the HTML pages.
    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    /// Directory holding assets shared by every game.
    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }
}

/// A fairing that loads the application config and puts it in managed state.
/// This could easily be achieved using `AdHoc::config`, but is written out
/// explicitly for symmetry with the other fairings and control over error
/// messages.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// A fairing that loads every game's dataset and places each snapshot into
/// managed state. A dataset that fails to load leaves its game empty; this
/// fairing never aborts launch.
pub struct DatasetFairing;

#[rocket::async_trait]
impl Fairing for DatasetFairing {
    fn info(&self) -> Info {
        Info {
            name: "Datasets",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        let Some(config) = rocket.state::<Config>() else {
            error!("Datasets requested before the config was loaded");
            return Err(rocket);
        };
        let data_dir = config.data_dir().to_owned();
        info!("Loading datasets from {}...", data_dir.display());

        // Loading is blocking filesystem work.
        let datasets =
            match rocket::tokio::task::spawn_blocking(move || Datasets::load(&data_dir)).await {
                Ok(datasets) => datasets,
                Err(e) => {
                    error!("Dataset loading panicked: {e}");
                    return Err(rocket);
                }
            };
        info!("...datasets loaded!");

        // Manage the state.
        rocket = rocket
            .manage(datasets.countries)
            .manage(datasets.roster)
            .manage(datasets.season);
        Ok(rocket)
    }
}

/// A fairing that ensures the leaderboard directory exists and places one
/// [`Leaderboard`] per ranked game into managed state.
pub struct LeaderboardFairing;

#[rocket::async_trait]
impl Fairing for LeaderboardFairing {
    fn info(&self) -> Info {
        Info {
            name: "Leaderboards",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        let Some(config) = rocket.state::<Config>() else {
            error!("Leaderboards requested before the config was loaded");
            return Err(rocket);
        };
        let dir = config.leaderboard_dir().to_owned();

        if let Err(e) = rocket::tokio::fs::create_dir_all(&dir).await {
            error!(
                "Failed to create leaderboard directory {}: {e}",
                dir.display()
            );
            return Err(rocket);
        }
        info!("Leaderboards stored in {}", dir.display());

        // Manage the state.
        rocket = rocket
            .manage(Leaderboard::<FlagScore>::new(&dir))
            .manage(Leaderboard::<PiScore>::new(&dir));
        Ok(rocket)
    }
}
