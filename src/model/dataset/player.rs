use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Serialize, Serializer};

use super::{LoadError, LoadReport};

/// Folder holding one subfolder of photos per position.
pub const PLAYERS_FOLDER: &str = "stats/joueur_stade_toulousain";

/// Playing positions, one photo folder each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    FrontRow,
    SecondRow,
    BackRow,
    Wing,
    FullBack,
    Centre,
    FlyHalf,
}

impl Position {
    pub const ALL: [Position; 7] = [
        Self::FrontRow,
        Self::SecondRow,
        Self::BackRow,
        Self::Wing,
        Self::FullBack,
        Self::Centre,
        Self::FlyHalf,
    ];

    /// Name of the photo folder for this position.
    pub fn folder(self) -> &'static str {
        match self {
            Self::FrontRow => "1ere_ligne_png",
            Self::SecondRow => "2eme_ligne_png",
            Self::BackRow => "3eme_ligne_png",
            Self::Wing => "aillier_png",
            Self::FullBack => "arriere_png",
            Self::Centre => "centre_png",
            Self::FlyHalf => "demi_d_ouverture_png",
        }
    }

    /// Label shown to players.
    pub fn label(self) -> &'static str {
        match self {
            Self::FrontRow => "1ère ligne",
            Self::SecondRow => "2ème ligne",
            Self::BackRow => "3ème ligne",
            Self::Wing => "Ailier",
            Self::FullBack => "Arrière",
            Self::Centre => "Centre",
            Self::FlyHalf => "Demi d'ouverture",
        }
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A player photo and what it shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub name: String,
    pub position: Position,
    /// Path of the photo relative to the players folder.
    pub image_path: String,
    pub folder: String,
}

impl Player {
    /// Build a player from the file name of their photo.
    pub fn from_photo(position: Position, file_name: &str) -> Self {
        let stem = file_name.strip_suffix(".png").unwrap_or(file_name);
        Self {
            name: display_name(stem),
            position,
            image_path: format!("{}/{file_name}", position.folder()),
            folder: position.folder().to_string(),
        }
    }
}

/// The player game's snapshot.
pub struct Roster {
    players: Vec<Player>,
    photos_dir: PathBuf,
}

impl Roster {
    pub fn new(players: Vec<Player>, photos_dir: PathBuf) -> Self {
        Self {
            players,
            photos_dir,
        }
    }

    pub fn empty(game_dir: &Path) -> Self {
        Self::new(Vec::new(), game_dir.join(PLAYERS_FOLDER))
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Folder the photos are served from.
    pub fn photos_dir(&self) -> &Path {
        &self.photos_dir
    }

    /// Number of players at each position, in position order.
    pub fn position_counts(&self) -> Vec<(Position, usize)> {
        Position::ALL
            .iter()
            .map(|&position| {
                let count = self
                    .players
                    .iter()
                    .filter(|p| p.position == position)
                    .count();
                (position, count)
            })
            .collect()
    }

    /// Scan the photo folders under `game_dir`. Missing position folders are
    /// skipped with a warning; a missing players folder is an error.
    pub fn load(game_dir: &Path) -> Result<(Self, LoadReport), LoadError> {
        let photos_dir = game_dir.join(PLAYERS_FOLDER);
        if !photos_dir.is_dir() {
            return Err(LoadError::io(
                &photos_dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "players folder not found"),
            ));
        }

        let mut players = Vec::new();
        let mut report = LoadReport::default();
        for position in Position::ALL {
            let folder = photos_dir.join(position.folder());
            if !folder.is_dir() {
                warn!("Position folder {} does not exist", folder.display());
                continue;
            }

            let mut photos = Vec::new();
            for entry in std::fs::read_dir(&folder).map_err(|e| LoadError::io(&folder, e))? {
                let entry = entry.map_err(|e| LoadError::io(&folder, e))?;
                let file_name = entry.file_name();
                match file_name.to_str() {
                    Some(name) if name.ends_with(".png") => photos.push(name.to_string()),
                    Some(_) => {}
                    None => {
                        warn!("Skipping photo with a non UTF-8 name in {}", folder.display());
                        report.skipped += 1;
                    }
                }
            }
            // Directory order is unspecified.
            photos.sort();
            debug!("Found {} photos in {}", photos.len(), position.folder());

            report.loaded += photos.len();
            players.extend(photos.iter().map(|name| Player::from_photo(position, name)));
        }

        Ok((Self::new(players, photos_dir), report))
    }
}

/// Turn a photo stem such as `thomas_ramos` into `Thomas RAMOS`.
/// Stems without an underscore are title-cased.
pub fn display_name(stem: &str) -> String {
    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() >= 2 {
        let first_name = parts[0]
            .split_whitespace()
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ");
        let last_name = parts[1..].join(" ").to_uppercase();
        format!("{first_name} {last_name}")
    } else {
        title_case(stem)
    }
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Upper-case every letter that follows a non-letter, lower-case the others.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if previous_is_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_is_letter = c.is_alphabetic();
    }
    out
}
