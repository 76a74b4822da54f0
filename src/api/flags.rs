use std::path::PathBuf;

use rocket::{
    fs::NamedFile,
    serde::json::{self, Json},
    Route, State,
};
use serde::Serialize;

use super::{
    pages::serve,
    scores::{self, Standings, Submitted},
};
use crate::error::Result;
use crate::model::{
    dataset::{Countries, Country},
    leaderboard::{FlagScore, FlagSubmission, Leaderboard},
    question::{comparison, ComparisonQuestion},
};

pub fn routes() -> Vec<Route> {
    routes![question, all_countries, leaderboard, submit_score, flag]
}

#[get("/api/question")]
fn question(countries: &State<Countries>) -> Result<Json<ComparisonQuestion>> {
    let question = comparison::generate(countries.records(), &mut rand::thread_rng())?;
    Ok(Json(question))
}

#[derive(Serialize)]
struct AllCountries<'a> {
    countries: &'a [Country],
}

#[get("/api/all-countries")]
fn all_countries(countries: &State<Countries>) -> Json<AllCountries<'_>> {
    Json(AllCountries {
        countries: countries.records(),
    })
}

#[get("/api/leaderboard")]
async fn leaderboard(board: &State<Leaderboard<FlagScore>>) -> Result<Json<Standings<FlagScore>>> {
    scores::standings(board.inner()).await
}

#[post("/api/submit-score", data = "<submission>")]
async fn submit_score(
    submission: std::result::Result<Json<FlagSubmission>, json::Error<'_>>,
    board: &State<Leaderboard<FlagScore>>,
) -> Result<Json<Submitted>> {
    scores::submit(submission, board.inner()).await
}

#[get("/flags/<file..>")]
async fn flag(file: PathBuf, countries: &State<Countries>) -> Option<NamedFile> {
    serve(countries.flags_dir(), &file).await
}
