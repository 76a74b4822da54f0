use rocket::{serde::json::Json, Route, State};
use serde::Serialize;

use crate::error::Result;
use crate::model::{
    dataset::{season::SeasonDocuments, Season},
    question::{season as quiz, ChoiceQuestion},
};

pub fn routes() -> Vec<Route> {
    routes![question, all_questions, all_data]
}

#[get("/api/question")]
fn question(season: &State<Season>) -> Result<Json<ChoiceQuestion>> {
    let question = quiz::generate(season, &mut rand::thread_rng())?;
    Ok(Json(question))
}

#[derive(Serialize)]
struct AllQuestions {
    questions: Vec<ChoiceQuestion>,
}

/// A batch of questions for offline play.
#[get("/api/all-questions")]
fn all_questions(season: &State<Season>) -> Result<Json<AllQuestions>> {
    let questions =
        quiz::generate_many(season, quiz::OFFLINE_QUESTIONS, &mut rand::thread_rng())?;
    Ok(Json(AllQuestions { questions }))
}

#[get("/api/all-data")]
fn all_data(season: &State<Season>) -> Json<&SeasonDocuments> {
    Json(season.documents())
}
