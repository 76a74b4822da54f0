//! Questions about the 2024-2025 Top 14 season.
//!
//! Each [`SeasonTemplate`] first resolves against the [`Season`] into a
//! [`Fact`], which carries exactly what its category needs, and the fact is
//! then turned into a shuffled [`ChoiceQuestion`].

use log::debug;
use rand::{seq::SliceRandom, Rng};

use super::{offset_distractors, with_distractors, ChoiceQuestion};
use crate::error::{Error, Result};
use crate::model::dataset::{
    season::{RankedClub, SeasonStats},
    Number, Season,
};

/// Questions served by the offline endpoint.
pub const OFFLINE_QUESTIONS: usize = 50;

/// How a figure is written in the answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Count,
    OneDecimal,
    Percent,
}

impl Unit {
    fn render(self, value: Number) -> String {
        match self {
            Self::Count => value.to_string(),
            Self::OneDecimal => format!("{:.1}", value.as_f64()),
            Self::Percent => format!("{value}%"),
        }
    }
}

/// A template resolved against the season data.
#[derive(Debug, Clone, PartialEq)]
pub enum Fact {
    /// Pick the right name among others from the same table.
    Pick {
        prompt: String,
        correct: String,
        distractors: Vec<String>,
    },
    /// A figure, with wrong answers at fixed offsets from it.
    Figure {
        prompt: String,
        value: Number,
        offsets: [i64; 3],
        unit: Unit,
    },
    /// A match score, with wrong answers shifting either side's points.
    Scoreline {
        prompt: String,
        home: i64,
        away: i64,
    },
}

impl Fact {
    pub fn into_question<R: Rng + ?Sized>(self, rng: &mut R) -> Result<ChoiceQuestion> {
        match self {
            Self::Pick {
                prompt,
                correct,
                distractors,
            } => {
                let distractors = distractors.into_iter().filter(|d| !d.is_empty());
                let options = with_distractors(correct.clone(), distractors, rng)?;
                Ok(ChoiceQuestion {
                    question: prompt,
                    options,
                    correct,
                })
            }
            Self::Figure {
                prompt,
                value,
                offsets,
                unit,
            } => {
                let correct = unit.render(value);
                let wrong = offset_distractors(value, &offsets)
                    .into_iter()
                    .map(|v| unit.render(v));
                let options = with_distractors(correct.clone(), wrong, rng)?;
                Ok(ChoiceQuestion {
                    question: prompt,
                    options,
                    correct,
                })
            }
            Self::Scoreline { prompt, home, away } => {
                let score = |h: i64, a: i64| format!("{h} - {a}");
                let correct = score(home, away);
                // Shifts that overflow are left out.
                let wrong = [
                    home.checked_add(5).map(|h| (h, away)),
                    away.checked_add(7).map(|a| (home, a)),
                    home.checked_sub(3).zip(away.checked_add(3)),
                ]
                .into_iter()
                .flatten()
                .map(|(h, a)| score(h, a));
                let options = with_distractors(correct.clone(), wrong, rng)?;
                Ok(ChoiceQuestion {
                    question: prompt,
                    options,
                    correct,
                })
            }
        }
    }
}

/// Every kind of question the quiz can ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonTemplate {
    Champion,
    RunnerUp,
    LastPlace,
    BestAttack,
    TopScorer,
    ScorerClub,
    ScorerPoints,
    TopTryScorer,
    TryCount,
    FinalScore,
    FinalLoser,
    TotalTries,
    RedCards,
    YellowCards,
    TopJackal,
    JackalCount,
    Possession,
    Defence,
    PlayoffWinner,
    AveragePoints,
    HomeWinRate,
}

impl SeasonTemplate {
    pub const ALL: [SeasonTemplate; 21] = [
        Self::Champion,
        Self::RunnerUp,
        Self::LastPlace,
        Self::BestAttack,
        Self::TopScorer,
        Self::ScorerClub,
        Self::ScorerPoints,
        Self::TopTryScorer,
        Self::TryCount,
        Self::FinalScore,
        Self::FinalLoser,
        Self::TotalTries,
        Self::RedCards,
        Self::YellowCards,
        Self::TopJackal,
        Self::JackalCount,
        Self::Possession,
        Self::Defence,
        Self::PlayoffWinner,
        Self::AveragePoints,
        Self::HomeWinRate,
    ];

    /// Resolve this template against the season, or report which data is
    /// missing.
    pub fn resolve<R: Rng + ?Sized>(self, season: &Season, rng: &mut R) -> Result<Fact> {
        let fact = match self {
            Self::Champion => {
                let final_match = final_match(season)?;
                pick(
                    "Quelle équipe a remporté le Top 14 2024-2025 ?",
                    required(&final_match.champion, "champion")?,
                    season.standings.iter().take(4).map(|s| s.club.clone()),
                )
            }
            Self::RunnerUp => {
                let standings = at_least(&season.standings, 2, "standings")?;
                pick(
                    "Quelle équipe a terminé à la 2ème place du classement ?",
                    required(&standings[1].club, "standings")?,
                    standings.iter().skip(2).take(3).map(|s| s.club.clone()),
                )
            }
            Self::LastPlace => {
                let standings = at_least(&season.standings, 2, "standings")?;
                let last = &standings[standings.len() - 1];
                pick(
                    "Quelle équipe a terminé dernière du classement ?",
                    required(&last.club, "standings")?,
                    standings.iter().rev().skip(1).take(3).map(|s| s.club.clone()),
                )
            }
            Self::BestAttack => club_ranking(
                "Quelle équipe a marqué le plus de points en saison régulière ?",
                &stats(season)?.statistiques_clubs.meilleure_attaque,
                "best attack",
            )?,
            Self::TopScorer => {
                let scorers = at_least(&season.scorers, 2, "scorers")?;
                pick(
                    "Qui est le meilleur réalisateur de la saison 2024-2025 ?",
                    required(&scorers[0].nom, "scorers")?,
                    scorers.iter().skip(1).take(3).map(|s| s.nom.clone()),
                )
            }
            Self::ScorerClub => {
                let scorers = at_least(&season.scorers, 1, "scorers")?;
                let top = &scorers[..scorers.len().min(10)];
                let scorer = top
                    .choose(rng)
                    .ok_or_else(|| Error::unavailable("Not enough Top 14 scorers"))?;
                let clubs: Vec<&str> = season
                    .standings
                    .iter()
                    .take(8)
                    .map(|s| s.club.as_str())
                    .filter(|club| *club != scorer.club)
                    .collect();
                pick(
                    format!("Dans quel club joue {} ?", required(&scorer.nom, "scorers")?),
                    required(&scorer.club, "scorers")?,
                    clubs.choose_multiple(rng, 3).map(|c| c.to_string()),
                )
            }
            Self::ScorerPoints => {
                let scorer = &at_least(&season.scorers, 1, "scorers")?[0];
                Fact::Figure {
                    prompt: format!(
                        "Combien de points {} a-t-il marqué cette saison ?",
                        required(&scorer.nom, "scorers")?
                    ),
                    value: Number::Int(scorer.points),
                    offsets: [20, -30, 50],
                    unit: Unit::Count,
                }
            }
            Self::TopTryScorer => {
                let scorers = at_least(
                    &stats(season)?.meilleurs_joueurs.meilleur_marqueur_essais,
                    1,
                    "try scorers",
                )?;
                pick(
                    "Qui est le meilleur marqueur d'essais de la saison ?",
                    required(&scorers[0].nom, "try scorers")?,
                    scorers
                        .iter()
                        .skip(1)
                        .take(2)
                        .map(|s| s.nom.clone())
                        .chain(season.scorers.first().map(|s| s.nom.clone())),
                )
            }
            Self::TryCount => {
                let scorer = &at_least(
                    &stats(season)?.meilleurs_joueurs.meilleur_marqueur_essais,
                    1,
                    "try scorers",
                )?[0];
                Fact::Figure {
                    prompt: format!(
                        "Combien d'essais {} a-t-il marqué ?",
                        required(&scorer.nom, "try scorers")?
                    ),
                    value: Number::Int(scorer.essais),
                    offsets: [3, -2, 5],
                    unit: Unit::Count,
                }
            }
            Self::FinalScore => {
                let final_match = final_match(season)?;
                Fact::Scoreline {
                    prompt: "Quel était le score de la finale ?".to_string(),
                    home: final_match.score_domicile,
                    away: final_match.score_exterieur,
                }
            }
            Self::FinalLoser => {
                let final_match = final_match(season)?;
                pick(
                    "Quelle équipe a perdu en finale ?",
                    required(final_match.loser(), "final")?,
                    season
                        .standings
                        .iter()
                        .skip(1)
                        .take(4)
                        .map(|s| s.club.clone())
                        .filter(|club| *club != final_match.champion),
                )
            }
            Self::TotalTries => {
                let tries = stats(season)?
                    .essais
                    .as_ref()
                    .ok_or_else(|| missing("try totals"))?;
                Fact::Figure {
                    prompt: "Combien d'essais ont été marqués au total cette saison ?"
                        .to_string(),
                    value: Number::Int(tries.total),
                    offsets: [50, -100, 150],
                    unit: Unit::Count,
                }
            }
            Self::RedCards => {
                let red = cards(season)?.rouges;
                Fact::Figure {
                    prompt: "Combien de cartons rouges ont été distribués cette saison ?"
                        .to_string(),
                    value: Number::Int(red),
                    offsets: [5, 10, if red > 5 { -5 } else { 3 }],
                    unit: Unit::Count,
                }
            }
            Self::YellowCards => Fact::Figure {
                prompt: "Combien de cartons jaunes ont été distribués cette saison ?".to_string(),
                value: Number::Int(cards(season)?.jaunes),
                offsets: [30, -50, 80],
                unit: Unit::Count,
            },
            Self::TopJackal => {
                let jackals = at_least(
                    &stats(season)?.meilleurs_joueurs.meilleur_gratteur,
                    2,
                    "jackals",
                )?;
                pick(
                    "Qui est le meilleur gratteur de la saison ?",
                    required(&jackals[0].nom, "jackals")?,
                    jackals.iter().skip(1).take(3).map(|j| j.nom.clone()),
                )
            }
            Self::JackalCount => {
                let jackal = &at_least(
                    &stats(season)?.meilleurs_joueurs.meilleur_gratteur,
                    1,
                    "jackals",
                )?[0];
                Fact::Figure {
                    prompt: format!(
                        "Combien de ballons {} a-t-il gratté ?",
                        required(&jackal.nom, "jackals")?
                    ),
                    value: Number::Int(jackal.ballons_grattes),
                    offsets: [5, -3, 10],
                    unit: Unit::Count,
                }
            }
            Self::Possession => club_ranking(
                "Quelle équipe a eu le meilleur temps de possession ?",
                &stats(season)?.statistiques_clubs.meilleur_temps_possession,
                "possession",
            )?,
            Self::Defence => club_ranking(
                "Quelle équipe a la meilleure défense (moins de points encaissés) ?",
                &stats(season)?.statistiques_clubs.meilleure_defense,
                "defence",
            )?,
            Self::PlayoffWinner => {
                let barrages = at_least(season.barrages(), 1, "play-off matches")?;
                let barrage = barrages
                    .choose(rng)
                    .ok_or_else(|| missing("play-off matches"))?;
                // Only losers as distractors, so exactly one winner is offered.
                pick(
                    "Quelle équipe a gagné son match de barrage ?",
                    required(&barrage.vainqueur, "play-off matches")?,
                    barrages.iter().map(|b| b.loser().to_string()),
                )
            }
            Self::AveragePoints => {
                let points = stats(season)?
                    .points
                    .as_ref()
                    .ok_or_else(|| missing("points per match"))?;
                Fact::Figure {
                    prompt: "Quelle est la moyenne de points par match cette saison ?"
                        .to_string(),
                    value: points.moyenne_par_match,
                    offsets: [5, -3, 10],
                    unit: Unit::OneDecimal,
                }
            }
            Self::HomeWinRate => {
                let home_wins = stats(season)?
                    .matches
                    .as_ref()
                    .and_then(|m| m.victoires_domicile.as_ref())
                    .ok_or_else(|| missing("home wins"))?;
                Fact::Figure {
                    prompt: "Quel pourcentage de victoires à domicile cette saison ?".to_string(),
                    value: home_wins.pourcentage,
                    offsets: [5, -10, 15],
                    unit: Unit::Percent,
                }
            }
        };
        Ok(fact)
    }

    /// Resolve and build a question from this template.
    pub fn generate<R: Rng + ?Sized>(self, season: &Season, rng: &mut R) -> Result<ChoiceQuestion> {
        self.resolve(season, rng)?.into_question(rng)
    }
}

/// Generate a question from a random template. Templates whose data is
/// missing are passed over; only when none can be built is the season
/// reported as unavailable.
pub fn generate<R: Rng + ?Sized>(season: &Season, rng: &mut R) -> Result<ChoiceQuestion> {
    let mut templates = SeasonTemplate::ALL;
    templates.shuffle(rng);
    for template in templates {
        match template.generate(season, rng) {
            Ok(question) => return Ok(question),
            Err(e) => debug!("Skipping {template:?}: {e}"),
        }
    }
    Err(Error::unavailable("No Top 14 data available"))
}

/// Generate `count` questions for offline play.
pub fn generate_many<R: Rng + ?Sized>(
    season: &Season,
    count: usize,
    rng: &mut R,
) -> Result<Vec<ChoiceQuestion>> {
    (0..count).map(|_| generate(season, rng)).collect()
}

fn missing(what: &str) -> Error {
    Error::unavailable(format!("Not enough Top 14 {what}"))
}

fn at_least<'a, T>(items: &'a [T], n: usize, what: &str) -> Result<&'a [T]> {
    if items.len() < n {
        Err(missing(what))
    } else {
        Ok(items)
    }
}

fn required(value: &str, what: &str) -> Result<String> {
    if value.is_empty() {
        Err(missing(what))
    } else {
        Ok(value.to_string())
    }
}

fn stats(season: &Season) -> Result<&SeasonStats> {
    season.stats.as_ref().ok_or_else(|| missing("statistics"))
}

fn cards(season: &Season) -> Result<&crate::model::dataset::season::CardTotals> {
    stats(season)?
        .cartons
        .as_ref()
        .ok_or_else(|| missing("card totals"))
}

fn final_match(season: &Season) -> Result<&crate::model::dataset::season::Final> {
    season.final_match().ok_or_else(|| missing("final"))
}

fn pick(
    prompt: impl Into<String>,
    correct: String,
    distractors: impl IntoIterator<Item = String>,
) -> Fact {
    Fact::Pick {
        prompt: prompt.into(),
        correct,
        distractors: distractors.into_iter().collect(),
    }
}

/// The club topping `ranking`, against the next three.
fn club_ranking(prompt: &str, ranking: &[RankedClub], what: &str) -> Result<Fact> {
    let ranking = at_least(ranking, 2, what)?;
    Ok(pick(
        prompt,
        required(&ranking[0].club, what)?,
        ranking.iter().skip(1).take(3).map(|c| c.club.clone()),
    ))
}
