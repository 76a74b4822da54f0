use rocket::serde::json::{self, Json};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::leaderboard::{Leaderboard, Placement, Ranking};

/// Body of a leaderboard response.
#[derive(Debug, Serialize)]
pub struct Standings<E> {
    pub leaderboard: Vec<E>,
}

/// Body of a successful score submission.
#[derive(Debug, Serialize)]
pub struct Submitted {
    pub success: bool,
    #[serde(flatten)]
    pub placement: Placement,
}

pub async fn standings<E: Ranking>(board: &Leaderboard<E>) -> Result<Json<Standings<E>>> {
    Ok(Json(Standings {
        leaderboard: board.top().await?,
    }))
}

/// Validate a submission body and add it to `board`.
pub async fn submit<S, E>(
    body: std::result::Result<Json<S>, json::Error<'_>>,
    board: &Leaderboard<E>,
) -> Result<Json<Submitted>>
where
    E: Ranking + TryFrom<S, Error = Error>,
{
    let submission = body
        .map_err(|e| Error::bad_request(format!("Malformed submission: {e}")))?
        .into_inner();
    let entry = E::try_from(submission)?;
    let placement = board.submit(entry).await?;
    Ok(Json(Submitted {
        success: true,
        placement,
    }))
}
