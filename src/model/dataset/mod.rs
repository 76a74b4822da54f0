//! Datasets loaded once at startup and served from memory afterwards.
//!
//! Every loader is tolerant: numeric fields that are empty or malformed are
//! coerced to zero, rows failing a required-field check are skipped and
//! counted, and a dataset that cannot be read at all leaves its game with an
//! empty snapshot rather than stopping the server.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use log::info;
use rocket::serde::json::{serde_json, Value};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub mod country;
pub mod pi;
pub mod player;
pub mod season;

pub use country::{Countries, Country};
pub use player::{Player, Position, Roster};
pub use season::Season;

/// Subdirectory of the data directory holding the flag game's files.
pub const FLAG_GAME_DIR: &str = "flag_game";
/// Subdirectory of the data directory holding the player game's files.
pub const PLAYER_GAME_DIR: &str = "toulouse_game";
/// Subdirectory of the data directory holding the Top 14 quiz's files.
pub const SEASON_DIR: &str = "top14_quiz";

/// Failure to load a dataset as a whole.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl LoadError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_owned(),
            source,
        }
    }
}

/// How many records a loader kept and how many it threw away.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

impl Display for LoadReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} loaded, {} skipped", self.loaded, self.skipped)
    }
}

/// The immutable snapshot of every game's data.
pub struct Datasets {
    pub countries: Countries,
    pub roster: Roster,
    pub season: Season,
}

impl Datasets {
    /// Load every dataset found under `data_dir`.
    /// Failures are logged and leave the affected game empty.
    pub fn load(data_dir: &Path) -> Self {
        let flag_dir = data_dir.join(FLAG_GAME_DIR);
        let countries = match Countries::load(&flag_dir) {
            Ok((countries, report)) => {
                info!("Countries: {report}");
                countries
            }
            Err(e) => {
                log::error!("Failed to load countries, flag game will be empty: {e}");
                Countries::empty(&flag_dir)
            }
        };

        let player_dir = data_dir.join(PLAYER_GAME_DIR);
        let roster = match Roster::load(&player_dir) {
            Ok((roster, report)) => {
                info!("Players: {report}");
                roster
            }
            Err(e) => {
                log::error!("Failed to load players, player game will be empty: {e}");
                Roster::empty(&player_dir)
            }
        };

        let season = Season::load(&data_dir.join(SEASON_DIR));
        info!("Top 14 season: {}", season.summary());

        Self {
            countries,
            roster,
            season,
        }
    }
}

/// Strip thousands separators and spaces from a raw numeric field.
fn clean_numeric(raw: &str) -> String {
    raw.chars().filter(|c| *c != ',' && *c != ' ').collect()
}

/// Parse an integer, going through a float so that `"12.7"` gives `12`.
/// Anything unparseable becomes zero.
pub fn coerce_int(raw: &str) -> i64 {
    let cleaned = clean_numeric(raw.trim());
    if cleaned.is_empty() {
        return 0;
    }
    cleaned
        .parse::<i64>()
        .ok()
        .or_else(|| {
            cleaned
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|f| f as i64)
        })
        .unwrap_or(0)
}

/// Parse a float. Anything unparseable becomes zero.
pub fn coerce_float(raw: &str) -> f64 {
    let cleaned = clean_numeric(raw.trim());
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
}

/// A number from a dataset, keeping track of whether it was written as an
/// integer so it renders the way it was written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Default for Number {
    fn default() -> Self {
        Self::Int(0)
    }
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    /// Shift by a whole offset, keeping the representation. `None` when the
    /// shifted value cannot be represented: an integer overflows, or a float
    /// is too large for the offset to change it.
    pub fn offset(self, by: i64) -> Option<Self> {
        match self {
            Self::Int(i) => i.checked_add(by).map(Self::Int),
            Self::Float(f) => {
                let shifted = f + by as f64;
                (shifted.is_finite() && (by == 0 || shifted != f)).then_some(Self::Float(shifted))
            }
        }
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(0.0)),
            },
            Value::String(s) if s.contains('.') => Self::Float(coerce_float(s)),
            Value::String(s) => Self::Int(coerce_int(s)),
            _ => Self::Int(0),
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            // Floats keep their decimal point, so 70.0 stays "70.0".
            Self::Float(x) => write!(f, "{x:?}"),
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
        }
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Deserialize an integer field leniently: numbers, numeric strings and
/// anything else (null, objects, garbage) all succeed, the last as zero.
pub fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match Number::from_value(&value) {
        Number::Int(i) => i,
        Number::Float(f) if f.is_finite() => f as i64,
        Number::Float(_) => 0,
    })
}

/// Deserialize a string field leniently: non-strings become their JSON text,
/// null becomes empty.
pub fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_coerce_to_zero_on_garbage() {
        assert_eq!(coerce_int("1,402,112,000"), 1_402_112_000);
        assert_eq!(coerce_int(" 67 391 582 "), 67_391_582);
        assert_eq!(coerce_int("12.7"), 12);
        assert_eq!(coerce_int(""), 0);
        assert_eq!(coerce_int("   "), 0);
        assert_eq!(coerce_int("n/a"), 0);
    }

    #[test]
    fn floats_coerce_to_zero_on_garbage() {
        assert_eq!(coerce_float("122.3"), 122.3);
        assert_eq!(coerce_float("1,024.5"), 1024.5);
        assert_eq!(coerce_float(""), 0.0);
        assert_eq!(coerce_float("inf"), 0.0);
        assert_eq!(coerce_float("dense"), 0.0);
    }

    #[test]
    fn numbers_keep_their_representation() {
        let parsed: Vec<Number> =
            serde_json::from_str(r#"[42, 27.5, "61", "3.5", null, {"x": 1}]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                Number::Int(42),
                Number::Float(27.5),
                Number::Int(61),
                Number::Float(3.5),
                Number::Int(0),
                Number::Int(0),
            ]
        );
        assert_eq!(Number::Int(58).offset(-10).unwrap().to_string(), "48");
        assert_eq!(Number::Float(62.5).offset(5).unwrap().to_string(), "67.5");
        assert_eq!(Number::Float(70.0).to_string(), "70.0");
    }

    #[test]
    fn unrepresentable_offsets() {
        assert_eq!(Number::Int(i64::MAX - 3).offset(10), None);
        assert_eq!(Number::Int(i64::MIN).offset(-1), None);
        assert_eq!(Number::Int(i64::MAX - 3).offset(3), Some(Number::Int(i64::MAX)));
        // The gap between floats this large is 16.
        assert_eq!(Number::Float(1e17).offset(5), None);
        assert_eq!(Number::Float(1e17).offset(10), Some(Number::Float(1e17 + 16.0)));
        assert_eq!(Number::Float(f64::MAX).offset(0), Some(Number::Float(f64::MAX)));
    }

    #[derive(Deserialize)]
    struct Lenient {
        #[serde(default, deserialize_with = "lenient_int")]
        points: i64,
        #[serde(default, deserialize_with = "lenient_string")]
        club: String,
    }

    #[test]
    fn lenient_fields() {
        let row: Lenient = serde_json::from_str(r#"{"points": "289", "club": null}"#).unwrap();
        assert_eq!(row.points, 289);
        assert_eq!(row.club, "");

        let row: Lenient = serde_json::from_str(r#"{"points": 12.9}"#).unwrap();
        assert_eq!(row.points, 12);
        assert_eq!(row.club, "");
    }
}
