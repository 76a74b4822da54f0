//! Question generation.
//!
//! Every generator is a pure function of a dataset snapshot and a random
//! source. When the snapshot is too small to build a full question the
//! generator returns [`Error::DataUnavailable`] instead of a partial one.

use rand::{seq::SliceRandom, Rng};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::dataset::Number;

pub mod comparison;
pub mod digits;
pub mod identification;
pub mod season;

pub use comparison::{ComparisonQuestion, Metric};
pub use digits::DigitQuestion;
pub use identification::IdentificationQuestion;
pub use season::SeasonTemplate;

/// Most distractors shown next to a correct answer.
pub const MAX_DISTRACTORS: usize = 3;

/// A question whose answers are plain labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct: String,
}

/// Shuffle the correct answer in with up to [`MAX_DISTRACTORS`] distractors,
/// taken in order. Distractors equal to the correct answer or to an earlier
/// distractor are dropped, so the correct answer appears exactly once.
pub fn with_distractors<T, R>(
    correct: T,
    distractors: impl IntoIterator<Item = T>,
    rng: &mut R,
) -> Result<Vec<T>>
where
    T: PartialEq,
    R: Rng + ?Sized,
{
    let mut options = vec![correct];
    for distractor in distractors {
        if options.len() > MAX_DISTRACTORS {
            break;
        }
        if !options.contains(&distractor) {
            options.push(distractor);
        }
    }
    if options.len() < 2 {
        return Err(Error::unavailable("Not enough distinct answers"));
    }
    options.shuffle(rng);
    Ok(options)
}

/// Most times a colliding offset distractor is stepped before it is dropped.
const MAX_NUDGES: usize = 8;

/// Wrong values at the given offsets from `value`. An offset that lands on
/// the correct value or an earlier distractor keeps stepping in the same
/// direction until it finds a free value. Offsets that cannot be
/// represented, or that find no free value within [`MAX_NUDGES`] steps, are
/// dropped.
pub fn offset_distractors(value: Number, offsets: &[i64]) -> Vec<Number> {
    let mut taken = vec![value];
    for &offset in offsets {
        let step = if offset < 0 { offset } else { offset.max(1) };
        let mut candidate = value.offset(offset);
        let mut nudges = 0;
        while let Some(current) = candidate.filter(|c| taken.contains(c)) {
            if nudges == MAX_NUDGES {
                candidate = None;
                break;
            }
            candidate = current.offset(step);
            nudges += 1;
        }
        if let Some(candidate) = candidate {
            taken.push(candidate);
        }
    }
    taken.split_off(1)
}
