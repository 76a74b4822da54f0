#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{figment::Figment, Build, Rocket};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

#[cfg(test)]
mod fixtures;

use api::Game;
use config::{ConfigFairing, DatasetFairing, LeaderboardFairing};
use logging::LoggerFairing;

/// Build the server from `Rocket.toml` and `ROCKET_*` environment variables.
pub fn build() -> Rocket<Build> {
    rocket_for_figment(rocket::Config::figment())
}

/// Build the server from the given configuration.
pub fn rocket_for_figment(figment: Figment) -> Rocket<Build> {
    let mut rocket = rocket::custom(figment)
        .attach(LoggerFairing)
        .attach(ConfigFairing)
        .attach(DatasetFairing)
        .attach(LeaderboardFairing)
        .mount("/", api::routes());
    for game in Game::ALL {
        rocket = rocket.mount(game.prefix(), game.routes());
    }
    rocket
}

/// Build a server whose every directory lives under `dir`.
#[cfg(test)]
pub(crate) fn rocket_for_data_dir(dir: &DataDir) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("data_dir", dir.data()))
        .merge(("leaderboard_dir", dir.leaderboards()))
        .merge(("templates_dir", dir.templates()))
        .merge(("static_dir", dir.static_files()));
    rocket_for_figment(figment)
}

/// A scratch directory for one test, holding the data, leaderboard,
/// template and static folders.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct DataDir(std::path::PathBuf);

#[cfg(test)]
impl DataDir {
    /// A fresh path under the system temporary directory. Nothing is created.
    pub fn random() -> Self {
        let random: u32 = rand::random();
        let dir = std::env::temp_dir().join(format!("minigames-test{random}"));
        log::info!("Using data directory {}", dir.display());
        Self(dir)
    }

    pub fn data(&self) -> std::path::PathBuf {
        self.0.join("data")
    }

    pub fn leaderboards(&self) -> std::path::PathBuf {
        self.0.join("leaderboards")
    }

    pub fn templates(&self) -> std::path::PathBuf {
        self.0.join("templates")
    }

    pub fn static_files(&self) -> std::path::PathBuf {
        self.0.join("static")
    }
}

#[cfg(test)]
impl std::ops::Deref for DataDir {
    type Target = std::path::Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
