use rand::{seq::SliceRandom, Rng};
use serde::Serialize;

use super::{with_distractors, MAX_DISTRACTORS};
use crate::error::{Error, Result};
use crate::model::dataset::pi::{digit_at, digits_before};

/// How many preceding decimals are shown as a reminder.
pub const CONTEXT_DIGITS: usize = 10;

/// What is the next decimal of pi?
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigitQuestion {
    pub position: usize,
    pub previous_digits: String,
    pub options: Vec<u8>,
    pub correct: u8,
}

pub fn generate<R: Rng + ?Sized>(position: usize, rng: &mut R) -> Result<DigitQuestion> {
    let correct = digit_at(position).ok_or_else(|| Error::bad_request("Invalid position"))?;

    let others: Vec<u8> = (0..10).filter(|d| *d != correct).collect();
    let wrong: Vec<u8> = others.choose_multiple(rng, MAX_DISTRACTORS).copied().collect();
    let options = with_distractors(correct, wrong, rng)?;

    Ok(DigitQuestion {
        position,
        previous_digits: digits_before(position, CONTEXT_DIGITS).to_string(),
        options,
        correct,
    })
}
