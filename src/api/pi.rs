use rocket::{
    serde::json::{self, Json},
    Route, State,
};

use super::scores::{self, Standings, Submitted};
use crate::error::{Error, Result};
use crate::model::{
    leaderboard::{Leaderboard, PiScore, PiSubmission},
    question::{digits, DigitQuestion},
};

pub fn routes() -> Vec<Route> {
    routes![question, leaderboard, submit_score]
}

/// Ask for the decimal at `position`, counting from zero after the point.
/// A missing or unparseable position starts from the first decimal.
#[get("/api/question?<position>")]
fn question(position: Option<i64>) -> Result<Json<DigitQuestion>> {
    let position = usize::try_from(position.unwrap_or(0))
        .map_err(|_| Error::bad_request("Invalid position"))?;
    let question = digits::generate(position, &mut rand::thread_rng())?;
    Ok(Json(question))
}

#[get("/api/leaderboard")]
async fn leaderboard(board: &State<Leaderboard<PiScore>>) -> Result<Json<Standings<PiScore>>> {
    scores::standings(board.inner()).await
}

#[post("/api/submit-score", data = "<submission>")]
async fn submit_score(
    submission: std::result::Result<Json<PiSubmission>, json::Error<'_>>,
    board: &State<Leaderboard<PiScore>>,
) -> Result<Json<Submitted>> {
    scores::submit(submission, board.inner()).await
}
