use std::fmt::{Display, Formatter};

use rand::{seq::SliceRandom, Rng};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::dataset::{Country, Number};

/// Countries shown per question.
pub const OPTIONS: usize = 4;

/// Square metres in a rugby pitch, the unit areas are shown in.
pub const RUGBY_PITCH_M2: i64 = 10_000;

/// A country statistic players compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Population,
    Area,
    Gdp,
    Density,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Self::Population, Self::Area, Self::Gdp, Self::Density];

    /// The raw value used for ranking.
    pub fn value(self, country: &Country) -> Number {
        match self {
            Self::Population => Number::Int(country.population),
            Self::Area => Number::Int(country.area),
            Self::Gdp => Number::Int(country.gdp),
            Self::Density => Number::Float(country.density),
        }
    }

    /// The value as shown to players. Areas are converted from km² to
    /// rugby pitches.
    pub fn display_value(self, country: &Country) -> Number {
        match self {
            Self::Area => {
                Number::Int(country.area.saturating_mul(1_000_000) / RUGBY_PITCH_M2)
            }
            _ => self.value(country),
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            Self::Population => "Allez ma loute, quel pays à la plus grande population ?",
            Self::Area => "Quel pays a la plus grande superficie ?",
            Self::Gdp => "Quel pays a le plus grand PIB ? (pas par habitant hein)",
            Self::Density => "Quel pays à la plus forte densité ?",
        }
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Population => "population",
            Self::Area => "area",
            Self::Gdp => "gdp",
            Self::Density => "density",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryOption {
    pub name: String,
    pub iso2: String,
    pub value: Number,
}

/// Which of these countries has the most of `metric`?
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonQuestion {
    pub question: String,
    pub metric: Metric,
    pub options: Vec<CountryOption>,
    pub correct_answer: String,
}

/// Generate a comparison question on a random metric.
pub fn generate<R: Rng + ?Sized>(countries: &[Country], rng: &mut R) -> Result<ComparisonQuestion> {
    if countries.len() < OPTIONS {
        return Err(Error::unavailable("Not enough countries loaded"));
    }
    let metric = *Metric::ALL
        .choose(rng)
        .expect("metric list is not empty");
    compare(countries, metric, rng)
}

/// Generate a comparison question on `metric`, drawn from the countries that
/// have a positive value for it.
pub fn compare<R: Rng + ?Sized>(
    countries: &[Country],
    metric: Metric,
    rng: &mut R,
) -> Result<ComparisonQuestion> {
    let valid: Vec<&Country> = countries
        .iter()
        .filter(|c| metric.value(c).as_f64() > 0.0)
        .collect();
    if valid.len() < OPTIONS {
        return Err(Error::unavailable(format!(
            "Not enough countries with {metric} data"
        )));
    }

    let selected: Vec<&Country> = valid.choose_multiple(rng, OPTIONS).copied().collect();

    // Ties go to the first country drawn.
    let mut correct = selected[0];
    for country in &selected[1..] {
        if metric.value(country).as_f64() > metric.value(correct).as_f64() {
            correct = country;
        }
    }

    let mut options: Vec<CountryOption> = selected
        .iter()
        .map(|country| CountryOption {
            name: country.name.clone(),
            iso2: country.iso2.clone(),
            value: metric.display_value(country),
        })
        .collect();
    options.shuffle(rng);

    Ok(ComparisonQuestion {
        question: metric.prompt().to_string(),
        metric,
        options,
        correct_answer: correct.name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{rngs::StdRng, SeedableRng};

    use crate::model::dataset::Countries;

    #[test]
    fn highest_population_wins_regardless_of_order() {
        let countries = Countries::example();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let question = compare(countries.records(), Metric::Population, &mut rng).unwrap();
            assert_eq!(question.correct_answer, "Danemark");
            assert_eq!(question.options.len(), OPTIONS);
            assert_eq!(question.metric, Metric::Population);
        }
    }

    #[test]
    fn correct_answer_has_the_largest_value() {
        let mut countries = Countries::example().records().to_vec();
        countries.push(Country::example("Estonie", "ee", 1_300_000));
        countries.push(Country::example("France", "fr", 68_000_000));
        for (i, country) in countries.iter_mut().enumerate() {
            country.area = 1_000 * (i as i64 + 1);
            country.density = 10.0 + i as f64;
            country.gdp = 7_000 - 1_000 * i as i64;
        }

        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let question = generate(&countries, &mut rng).unwrap();
            let best = question
                .options
                .iter()
                .map(|o| o.value.as_f64())
                .fold(f64::MIN, f64::max);
            let correct = question
                .options
                .iter()
                .filter(|o| o.name == question.correct_answer)
                .collect::<Vec<_>>();
            assert_eq!(correct.len(), 1);
            assert_eq!(correct[0].value.as_f64(), best);
        }
    }

    #[test]
    fn area_is_shown_in_rugby_pitches() {
        let mut country = Country::example("France", "fr", 68_000_000);
        country.area = 551_695;
        assert_eq!(Metric::Area.display_value(&country), Number::Int(55_169_500));
        assert_eq!(Metric::Area.value(&country), Number::Int(551_695));
    }

    #[test]
    fn prompts_match_the_game_client() {
        assert_eq!(
            Metric::Population.prompt(),
            "Allez ma loute, quel pays à la plus grande population ?"
        );
        assert_eq!(Metric::Area.prompt(), "Quel pays a la plus grande superficie ?");
        assert_eq!(
            Metric::Gdp.prompt(),
            "Quel pays a le plus grand PIB ? (pas par habitant hein)"
        );
        assert_eq!(Metric::Density.prompt(), "Quel pays à la plus forte densité ?");
    }

    #[test]
    fn too_few_qualifying_countries() {
        let mut countries = Countries::example().records().to_vec();
        for country in countries.iter_mut().skip(2) {
            country.gdp = 0;
        }
        let mut rng = StdRng::seed_from_u64(1);
        let result = compare(&countries, Metric::Gdp, &mut rng);
        match result {
            Err(Error::DataUnavailable(msg)) => {
                assert_eq!(msg, "Not enough countries with gdp data")
            }
            other => panic!("expected insufficient data, got {other:?}"),
        }
    }

    #[test]
    fn too_few_countries() {
        let countries = Countries::example();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            generate(&countries.records()[..2], &mut rng),
            Err(Error::DataUnavailable(_))
        ));
    }
}
