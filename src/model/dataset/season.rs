use std::path::Path;

use log::warn;
use rocket::serde::json::{serde_json, Value};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{lenient_int, lenient_string, LoadError, Number};

pub const STANDINGS_FILE: &str = "stats/classement_final_top_14_2025.json";
pub const SCORERS_FILE: &str = "stats/meilleur-buteur-2024-2025.json";
pub const STATS_FILE: &str = "stats/stats_globales_2024-2025.json";
pub const PLAYOFFS_FILE: &str = "stats/stats_phases_finales_2025.json";

/// A row of the final league table.
#[derive(Debug, Clone, Deserialize)]
pub struct Standing {
    #[serde(default, deserialize_with = "lenient_string")]
    pub club: String,
}

/// A row of the points scorers table.
#[derive(Debug, Clone, Deserialize)]
pub struct Scorer {
    #[serde(default, deserialize_with = "lenient_string")]
    pub nom: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub club: String,
    #[serde(default, deserialize_with = "lenient_int")]
    pub points: i64,
}

/// A club in one of the club rankings.
#[derive(Debug, Clone, Deserialize)]
pub struct RankedClub {
    #[serde(default, deserialize_with = "lenient_string")]
    pub club: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TryScorer {
    #[serde(default, deserialize_with = "lenient_string")]
    pub nom: String,
    #[serde(default, deserialize_with = "lenient_int")]
    pub essais: i64,
}

/// A player ranked by turnovers won at the breakdown.
#[derive(Debug, Clone, Deserialize)]
pub struct Jackal {
    #[serde(default, deserialize_with = "lenient_string")]
    pub nom: String,
    #[serde(default, deserialize_with = "lenient_int")]
    pub ballons_grattes: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClubRankings {
    #[serde(default)]
    pub meilleure_attaque: Vec<RankedClub>,
    #[serde(default)]
    pub meilleur_temps_possession: Vec<RankedClub>,
    #[serde(default)]
    pub meilleure_defense: Vec<RankedClub>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerRankings {
    #[serde(default)]
    pub meilleur_marqueur_essais: Vec<TryScorer>,
    #[serde(default)]
    pub meilleur_gratteur: Vec<Jackal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TryTotals {
    #[serde(default, deserialize_with = "lenient_int")]
    pub total: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardTotals {
    #[serde(default, deserialize_with = "lenient_int")]
    pub rouges: i64,
    #[serde(default, deserialize_with = "lenient_int")]
    pub jaunes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointsTotals {
    #[serde(default)]
    pub moyenne_par_match: Number,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HomeWins {
    #[serde(default)]
    pub pourcentage: Number,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchTotals {
    pub victoires_domicile: Option<HomeWins>,
}

/// Season-wide statistics. Every section is optional; questions that need a
/// missing section report insufficient data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeasonStats {
    #[serde(default)]
    pub statistiques_clubs: ClubRankings,
    #[serde(default)]
    pub meilleurs_joueurs: PlayerRankings,
    pub essais: Option<TryTotals>,
    pub cartons: Option<CardTotals>,
    pub points: Option<PointsTotals>,
    pub matches: Option<MatchTotals>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Final {
    #[serde(default, deserialize_with = "lenient_string")]
    pub champion: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub equipe_domicile: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub equipe_exterieur: String,
    #[serde(default, deserialize_with = "lenient_int")]
    pub score_domicile: i64,
    #[serde(default, deserialize_with = "lenient_int")]
    pub score_exterieur: i64,
}

impl Final {
    /// The finalist that is not the champion. When the home side is unknown
    /// the away side is taken as the loser.
    pub fn loser(&self) -> &str {
        if self.champion == self.equipe_exterieur && !self.equipe_domicile.is_empty() {
            &self.equipe_domicile
        } else {
            &self.equipe_exterieur
        }
    }
}

/// A play-off match between 3rd-6th placed clubs.
#[derive(Debug, Clone, Deserialize)]
pub struct Barrage {
    #[serde(default, deserialize_with = "lenient_string")]
    pub equipe_domicile: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub equipe_exterieur: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vainqueur: String,
}

impl Barrage {
    pub fn loser(&self) -> &str {
        if self.vainqueur == self.equipe_exterieur {
            &self.equipe_domicile
        } else {
            &self.equipe_exterieur
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinalPhase {
    pub finale: Option<Final>,
    #[serde(default)]
    pub barrages: Vec<Barrage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Playoffs {
    #[serde(default)]
    pub phase_finale: FinalPhase,
}

/// The four source documents as they were read, for the offline dump.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeasonDocuments {
    pub classement: Option<Value>,
    pub buteurs: Option<Value>,
    pub stats: Option<Value>,
    pub playoffs: Option<Value>,
}

/// The Top 14 quiz's snapshot.
#[derive(Debug, Clone, Default)]
pub struct Season {
    documents: SeasonDocuments,
    pub standings: Vec<Standing>,
    pub scorers: Vec<Scorer>,
    pub stats: Option<SeasonStats>,
    pub playoffs: Option<Playoffs>,
}

impl Season {
    /// Load the four documents from `game_dir`. Each one is optional: a
    /// missing or malformed document is logged and treated as absent.
    pub fn load(game_dir: &Path) -> Self {
        let read = |file: &str| match read_document(&game_dir.join(file)) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("{e}");
                None
            }
        };
        Self::from_documents(SeasonDocuments {
            classement: read(STANDINGS_FILE),
            buteurs: read(SCORERS_FILE),
            stats: read(STATS_FILE),
            playoffs: read(PLAYOFFS_FILE),
        })
    }

    /// Build the typed view of the given documents. A document whose shape
    /// is wrong is dropped from both views.
    pub fn from_documents(documents: SeasonDocuments) -> Self {
        let (classement, standings) = typed::<Vec<Standing>>("standings", documents.classement);
        let (buteurs, scorers) = typed::<Vec<Scorer>>("scorers", documents.buteurs);
        let (stats_doc, stats) = typed::<SeasonStats>("stats", documents.stats);
        let (playoffs_doc, playoffs) = typed::<Playoffs>("playoffs", documents.playoffs);
        Self {
            documents: SeasonDocuments {
                classement,
                buteurs,
                stats: stats_doc,
                playoffs: playoffs_doc,
            },
            standings: standings.unwrap_or_default(),
            scorers: scorers.unwrap_or_default(),
            stats,
            playoffs,
        }
    }

    pub fn documents(&self) -> &SeasonDocuments {
        &self.documents
    }

    pub fn final_match(&self) -> Option<&Final> {
        self.playoffs.as_ref()?.phase_finale.finale.as_ref()
    }

    pub fn barrages(&self) -> &[Barrage] {
        self.playoffs
            .as_ref()
            .map(|p| p.phase_finale.barrages.as_slice())
            .unwrap_or_default()
    }

    pub fn summary(&self) -> String {
        let present = |p: bool| if p { "present" } else { "missing" };
        format!(
            "{} teams, {} scorers, stats {}, playoffs {}",
            self.standings.len(),
            self.scorers.len(),
            present(self.stats.is_some()),
            present(self.playoffs.is_some()),
        )
    }
}

fn read_document(path: &Path) -> Result<Value, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|source| LoadError::Json {
        path: path.to_owned(),
        source,
    })
}

fn typed<T: DeserializeOwned>(what: &str, value: Option<Value>) -> (Option<Value>, Option<T>) {
    let Some(value) = value else {
        return (None, None);
    };
    match serde_json::from_value::<T>(value.clone()) {
        Ok(parsed) => (Some(value), Some(parsed)),
        Err(e) => {
            warn!("Ignoring Top 14 {what}: {e}");
            (None, None)
        }
    }
}

/// Example data for tests.
#[cfg(test)]
pub(crate) mod examples {
    use super::*;

    use crate::fixtures;

    impl Season {
        pub fn example() -> Self {
            let parse = |s: &str| Some(serde_json::from_str::<Value>(s).unwrap());
            Self::from_documents(SeasonDocuments {
                classement: parse(fixtures::STANDINGS_JSON),
                buteurs: parse(fixtures::SCORERS_JSON),
                stats: parse(fixtures::STATS_JSON),
                playoffs: parse(fixtures::PLAYOFFS_JSON),
            })
        }
    }
}
