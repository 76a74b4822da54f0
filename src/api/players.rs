use std::path::PathBuf;

use rocket::{fs::NamedFile, serde::json::Json, Route, State};
use serde::{ser::SerializeMap, Serialize, Serializer};

use super::pages::serve;
use crate::error::Result;
use crate::model::{
    dataset::{Player, Position, Roster},
    question::{identification, IdentificationQuestion},
};

pub fn routes() -> Vec<Route> {
    routes![question, all_players, stats, photo]
}

#[get("/api/question")]
fn question(roster: &State<Roster>) -> Result<Json<IdentificationQuestion>> {
    let question = identification::generate(roster.players(), &mut rand::thread_rng())?;
    Ok(Json(question))
}

#[derive(Serialize)]
struct AllPlayers<'a> {
    players: &'a [Player],
    positions: [Position; 7],
}

#[get("/api/all-players")]
fn all_players(roster: &State<Roster>) -> Json<AllPlayers<'_>> {
    Json(AllPlayers {
        players: roster.players(),
        positions: Position::ALL,
    })
}

/// Player count per position, serialised as a map in position order.
struct PositionCounts(Vec<(Position, usize)>);

impl Serialize for PositionCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (position, count) in &self.0 {
            map.serialize_entry(position.label(), count)?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct Stats {
    total_players: usize,
    positions: PositionCounts,
}

#[get("/api/stats")]
fn stats(roster: &State<Roster>) -> Json<Stats> {
    Json(Stats {
        total_players: roster.players().len(),
        positions: PositionCounts(roster.position_counts()),
    })
}

#[get("/players/<path..>")]
async fn photo(path: PathBuf, roster: &State<Roster>) -> Option<NamedFile> {
    serve(roster.photos_dir(), &path).await
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
        serde::json::Value,
    };

    use crate::fixtures;

    #[backend_test]
    async fn question_offers_names_and_positions(client: Client) {
        for _ in 0..20 {
            let response = client.get("/toulouse-game/api/question").dispatch().await;
            assert_eq!(Status::Ok, response.status());

            let body: Value = response.into_json().await.unwrap();
            let names = body["name_options"].as_array().unwrap();
            let positions = body["position_options"].as_array().unwrap();
            assert_eq!(names.len(), 4);
            assert_eq!(positions.len(), 4);
            assert_eq!(
                names.iter().filter(|n| **n == body["correct_name"]).count(),
                1
            );
            assert_eq!(
                positions
                    .iter()
                    .filter(|p| **p == body["correct_position"])
                    .count(),
                1
            );

            // The photo named in the question can be fetched.
            let image = body["image"].as_str().unwrap();
            let response = client
                .get(format!("/toulouse-game/players/{image}"))
                .dispatch()
                .await;
            assert_eq!(Status::Ok, response.status());
            assert_eq!(Some(ContentType::PNG), response.content_type());
        }
    }

    #[backend_test(empty)]
    async fn question_without_players_is_not_found(client: Client) {
        let response = client.get("/toulouse-game/api/question").dispatch().await;
        assert_eq!(Status::NotFound, response.status());

        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error"], "Not enough players loaded");
    }

    #[backend_test]
    async fn all_players_dump(client: Client) {
        let response = client.get("/toulouse-game/api/all-players").dispatch().await;
        assert_eq!(Status::Ok, response.status());

        let body: Value = response.into_json().await.unwrap();
        assert_eq!(
            body["players"].as_array().unwrap().len(),
            fixtures::PLAYER_PHOTOS.len()
        );
        assert_eq!(body["positions"].as_array().unwrap().len(), 7);
        assert_eq!(body["positions"][0], "1ère ligne");
        assert_eq!(body["positions"][6], "Demi d'ouverture");
    }

    #[backend_test]
    async fn stats_count_positions(client: Client) {
        let response = client.get("/toulouse-game/api/stats").dispatch().await;
        assert_eq!(Status::Ok, response.status());

        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["total_players"], fixtures::PLAYER_PHOTOS.len());

        let positions = body["positions"].as_object().unwrap();
        assert_eq!(positions.len(), 7);
        let total: u64 = positions.values().map(|n| n.as_u64().unwrap()).sum();
        assert_eq!(total as usize, fixtures::PLAYER_PHOTOS.len());

        let expected = fixtures::PLAYER_PHOTOS
            .iter()
            .filter(|(folder, _)| *folder == "demi_d_ouverture_png")
            .count();
        assert_eq!(body["positions"]["Demi d'ouverture"], expected);
    }
}
