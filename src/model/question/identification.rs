use rand::{seq::SliceRandom, Rng};
use serde::Serialize;

use super::{with_distractors, MAX_DISTRACTORS};
use crate::error::{Error, Result};
use crate::model::dataset::{Player, Position};

/// Fewest players the game needs before it can ask anything.
pub const MIN_PLAYERS: usize = 4;

/// Who is in this photo, and where do they play?
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentificationQuestion {
    /// Photo path relative to the players folder.
    pub image: String,
    pub name_options: Vec<String>,
    pub position_options: Vec<Position>,
    pub correct_name: String,
    pub correct_position: Position,
}

pub fn generate<R: Rng + ?Sized>(players: &[Player], rng: &mut R) -> Result<IdentificationQuestion> {
    if players.len() < MIN_PLAYERS {
        return Err(Error::unavailable("Not enough players loaded"));
    }
    let subject = players
        .choose(rng)
        .ok_or_else(|| Error::unavailable("Not enough players loaded"))?;

    let mut other_names: Vec<&str> = players
        .iter()
        .map(|p| p.name.as_str())
        .filter(|name| *name != subject.name)
        .collect();
    other_names.sort_unstable();
    other_names.dedup();
    let wrong_names: Vec<String> = other_names
        .choose_multiple(rng, MAX_DISTRACTORS)
        .map(|name| name.to_string())
        .collect();
    let name_options = with_distractors(subject.name.clone(), wrong_names, rng)?;

    let other_positions: Vec<Position> = Position::ALL
        .into_iter()
        .filter(|p| *p != subject.position)
        .collect();
    let wrong_positions: Vec<Position> = other_positions
        .choose_multiple(rng, MAX_DISTRACTORS)
        .copied()
        .collect();
    let position_options = with_distractors(subject.position, wrong_positions, rng)?;

    Ok(IdentificationQuestion {
        image: subject.image_path.clone(),
        name_options,
        position_options,
        correct_name: subject.name.clone(),
        correct_position: subject.position,
    })
}
