//! Leaderboards persisted as a single human-readable JSON file each.
//!
//! The file holds the retained entries in rank order and is rewritten
//! wholesale on every submission.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use rocket::serde::json::serde_json;
use rocket::tokio::{fs, sync::Mutex};
use serde::{
    de::{DeserializeOwned, Error as _},
    Deserialize, Deserializer, Serialize,
};

use crate::error::{Error, Result};

/// Longest display name kept, in characters.
pub const MAX_NAME_CHARS: usize = 20;

/// An entry type that can be ranked on a leaderboard.
pub trait Ranking: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// File name within the leaderboard directory.
    const FILE_NAME: &'static str;
    /// Number of entries kept on disk.
    const MAX_RETAINED: usize;
    /// Number of entries shown by the leaderboard endpoint.
    const SHOWN: usize;

    /// `Less` if `self` ranks above `other`.
    fn ranking(&self, other: &Self) -> Ordering;
}

/// Where a submitted entry landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// 1-based rank of the new entry, or `None` if it did not make the cut.
    pub rank: Option<usize>,
    /// Number of entries retained after the submission.
    pub total: usize,
}

/// A leaderboard file holding entries of type `E`.
///
/// Submissions are serialised through an async mutex, so two concurrent
/// read-modify-write cycles cannot lose each other's entries.
pub struct Leaderboard<E> {
    path: PathBuf,
    lock: Mutex<()>,
    entries: PhantomData<fn() -> E>,
}

impl<E: Ranking> Leaderboard<E> {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(E::FILE_NAME),
            lock: Mutex::new(()),
            entries: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every retained entry, best first. An absent file is an empty board.
    pub async fn read_all(&self) -> Result<Vec<E>> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut entries: Vec<E> = serde_json::from_str(&contents)?;
        entries.sort_by(E::ranking);
        Ok(entries)
    }

    /// The entries shown to players.
    pub async fn top(&self) -> Result<Vec<E>> {
        let mut entries = self.read_all().await?;
        entries.truncate(E::SHOWN);
        Ok(entries)
    }

    /// Add an entry, keep the best [`Ranking::MAX_RETAINED`] and persist.
    pub async fn submit(&self, entry: E) -> Result<Placement> {
        let _guard = self.lock.lock().await;

        // Tag the new entry so its rank is found by identity, not by value.
        let mut tagged: Vec<(bool, E)> = self
            .read_all()
            .await?
            .into_iter()
            .map(|e| (false, e))
            .collect();
        tagged.push((true, entry));
        // Stable sort: on a tie the new entry stays below existing ones.
        tagged.sort_by(|(_, a), (_, b)| a.ranking(b));
        tagged.truncate(E::MAX_RETAINED);

        let rank = tagged.iter().position(|(new, _)| *new).map(|i| i + 1);
        let entries: Vec<E> = tagged.into_iter().map(|(_, e)| e).collect();
        self.write(&entries).await?;

        Ok(Placement {
            rank,
            total: entries.len(),
        })
    }

    /// Replace the file contents. The new contents go to a sibling file
    /// first so a failed write never leaves a truncated board behind.
    async fn write(&self, entries: &[E]) -> Result<()> {
        let contents = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Trim a submitted name and cap it at [`MAX_NAME_CHARS`].
fn display_name(name: Option<String>) -> Result<String> {
    let name = name.unwrap_or_default();
    let name = name.trim();
    if name.is_empty() {
        return Err(missing_fields());
    }
    Ok(name.chars().take(MAX_NAME_CHARS).collect())
}

fn missing_fields() -> Error {
    Error::bad_request("Missing required fields")
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// A finished flag game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagScore {
    pub name: String,
    pub score: f64,
    /// Seconds taken, if the client timed the game.
    #[serde(default)]
    pub time: Option<f64>,
    pub date: NaiveDateTime,
}

impl Ranking for FlagScore {
    const FILE_NAME: &'static str = "flag_leaderboard.json";
    const MAX_RETAINED: usize = 50;
    const SHOWN: usize = 10;

    /// Higher score first, then faster time. Untimed games go after timed
    /// ones on the same score.
    fn ranking(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| match (self.time, other.time) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    }
}

/// Body of a flag game score submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlagSubmission {
    pub name: Option<String>,
    pub score: Option<f64>,
    pub time: Option<f64>,
}

impl TryFrom<FlagSubmission> for FlagScore {
    type Error = Error;

    fn try_from(submission: FlagSubmission) -> Result<Self> {
        let score = submission.score.ok_or_else(missing_fields)?;
        Ok(Self {
            name: display_name(submission.name)?,
            score,
            time: submission.time,
            date: now(),
        })
    }
}

/// A finished pi game: how far the player got into the decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiScore {
    pub name: String,
    pub position: u32,
    pub date: NaiveDateTime,
}

impl Ranking for PiScore {
    const FILE_NAME: &'static str = "pi_leaderboard.json";
    const MAX_RETAINED: usize = 100;
    const SHOWN: usize = 20;

    fn ranking(&self, other: &Self) -> Ordering {
        other.position.cmp(&self.position)
    }
}

/// Body of a pi game score submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PiSubmission {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "position")]
    pub position: Option<u32>,
}

/// A position written as a number or as a string of digits.
fn position<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let invalid = || D::Error::custom("position must be a whole non-negative number");
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(invalid),
        Some(serde_json::Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

impl TryFrom<PiSubmission> for PiScore {
    type Error = Error;

    fn try_from(submission: PiSubmission) -> Result<Self> {
        let position = submission.position.ok_or_else(missing_fields)?;
        Ok(Self {
            name: display_name(submission.name)?,
            position,
            date: now(),
        })
    }
}
