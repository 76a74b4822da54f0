//! A simple CLI tool for checking a data directory before deploying it.
//! This uses the server's own loaders and question generators, so a game that
//! passes here will be able to serve questions.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use clap::{Arg, ArgAction, ArgMatches, Command};
use rand::Rng;
use rocket::serde::json::serde_json;
use serde::Serialize;

use minigames_backend::{
    api::Game,
    error::Error as GenerationError,
    model::{
        dataset::{
            pi::PI_DECIMALS, Countries, Roster, Season, FLAG_GAME_DIR, PLAYER_GAME_DIR, SEASON_DIR,
        },
        question::{comparison, digits, identification, season},
    },
};

const PROGRAM_NAME: &str = "dataset-check";

const ABOUT_TEXT: &str = "Check that every mini-game can be served from a data directory.

EXIT CODES:
     0: Every game can generate questions.
   255: Ran successfully, but some game lacks data.
 Other: Error.";

const DATA_DIR: &str = "DATA_DIR";

const DATA_DIR_HELP: &str = "The data directory, holding one folder per game \
(the `data_dir` setting of the server)";

const SAMPLE: &str = "sample";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .arg(
            Arg::new(DATA_DIR)
                .help(DATA_DIR_HELP)
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("data"),
        )
        .arg(
            Arg::new(SAMPLE)
                .long(SAMPLE)
                .short('s')
                .help("Print a sample question for each game")
                .action(ArgAction::SetTrue),
        )
}

/// What was found for one game.
#[derive(Debug)]
struct GameReport {
    game: Game,
    /// What was loaded, in words.
    loaded: String,
    /// A sample question as JSON, or why none could be built.
    sample: Result<String, String>,
}

impl GameReport {
    fn new<Q: Serialize>(
        game: Game,
        loaded: String,
        question: Result<Q, GenerationError>,
    ) -> Self {
        let sample = question.map_err(|e| e.to_string()).and_then(|q| {
            serde_json::to_string_pretty(&q).map_err(|e| format!("Unserialisable question: {e}"))
        });
        Self {
            game,
            loaded,
            sample,
        }
    }

    fn is_playable(&self) -> bool {
        self.sample.is_ok()
    }
}

impl Display for GameReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let status = match &self.sample {
            Ok(_) => "ok".to_string(),
            Err(reason) => format!("UNPLAYABLE ({reason})"),
        };
        write!(f, "{}: {} [{status}]", self.game.name(), self.loaded)
    }
}

/// Load every dataset under `data_dir` and try to build a question for each
/// game.
fn check<R: Rng + ?Sized>(data_dir: &Path, rng: &mut R) -> Vec<GameReport> {
    let countries = match Countries::load(&data_dir.join(FLAG_GAME_DIR)) {
        Ok((countries, report)) => GameReport::new(
            Game::Flags,
            format!("countries {report}"),
            comparison::generate(countries.records(), rng),
        ),
        Err(e) => GameReport::new::<()>(Game::Flags, format!("no countries ({e})"), Err(
            GenerationError::unavailable("Not enough countries loaded"),
        )),
    };

    let players = match Roster::load(&data_dir.join(PLAYER_GAME_DIR)) {
        Ok((roster, report)) => GameReport::new(
            Game::Players,
            format!("players {report}"),
            identification::generate(roster.players(), rng),
        ),
        Err(e) => GameReport::new::<()>(Game::Players, format!("no players ({e})"), Err(
            GenerationError::unavailable("Not enough players loaded"),
        )),
    };

    let top14 = Season::load(&data_dir.join(SEASON_DIR));
    let top14 = GameReport::new(Game::Top14, top14.summary(), season::generate(&top14, rng));

    let pi = GameReport::new(
        Game::Pi,
        format!("{} decimals", PI_DECIMALS.len()),
        digits::generate(0, rng),
    );

    vec![countries, players, top14, pi]
}

/// Run the check, report the result, and return the exit code.
fn run(args: &ArgMatches) -> u8 {
    let data_dir: &PathBuf = args.get_one(DATA_DIR).unwrap(); // Defaulted argument is guaranteed to be present.
    if !data_dir.is_dir() {
        println!("IO error: {} is not a directory", data_dir.display());
        return 1;
    }

    let reports = check(data_dir, &mut rand::thread_rng());
    for report in &reports {
        println!("{report}");
        if args.get_flag(SAMPLE) {
            if let Ok(sample) = &report.sample {
                println!("{sample}");
            }
        }
    }

    if reports.iter().all(GameReport::is_playable) {
        println!("Every game is playable.");
        0
    } else {
        println!("Some games cannot be played.");
        255
    }
}

fn main() {
    let exit_code = match cli().try_get_matches() {
        Ok(args) => run(&args),
        Err(e) => {
            let _ = e.print();
            if e.use_stderr() {
                1
            } else {
                // `--help` and `--version`.
                0
            }
        }
    };
    std::process::exit(exit_code.into())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    /// Lay out a small but complete data directory.
    fn sample_data_dir() -> PathBuf {
        let random: u32 = rand::random();
        let dir = std::env::temp_dir().join(format!("dataset-check-test{random}"));

        let flags = dir.join(FLAG_GAME_DIR);
        fs::create_dir_all(flags.join("stats")).unwrap();
        fs::create_dir_all(flags.join("flags")).unwrap();
        let mut table = String::from("country,iso2,population,area,gdp,density\n");
        for (i, iso2) in ["fr", "de", "it", "es"].iter().enumerate() {
            table.push_str(&format!("Country {i},{iso2},{0},{0},{0},{0}.5\n", (i + 1) * 100));
            fs::write(flags.join("flags").join(format!("{iso2}.png")), b"png").unwrap();
        }
        fs::write(flags.join("stats/countries.csv"), table).unwrap();

        let players = dir
            .join(PLAYER_GAME_DIR)
            .join("stats/joueur_stade_toulousain/centre_png");
        fs::create_dir_all(&players).unwrap();
        for name in ["pita_ahki", "paul_costes", "santiago_chocobares", "dimitri_delibes"] {
            fs::write(players.join(format!("{name}.png")), b"png").unwrap();
        }

        let top14 = dir.join(SEASON_DIR).join("stats");
        fs::create_dir_all(&top14).unwrap();
        fs::write(
            top14.join("classement_final_top_14_2025.json"),
            r#"[{"club": "Stade Toulousain"}, {"club": "Union Bordeaux-Bègles"},
                {"club": "Stade Toulonnais"}, {"club": "Stade Français"}]"#,
        )
        .unwrap();

        dir
    }

    #[test]
    fn complete_data_is_playable() {
        // This test actually enters backend code, so enable logging.
        log4rs_test_utils::test_logging::init_logging_once_for(["minigames_backend"], None, None);

        let dir = sample_data_dir();
        let reports = check(&dir, &mut StdRng::seed_from_u64(3));
        assert_eq!(reports.len(), Game::ALL.len());
        for report in &reports {
            assert!(report.is_playable(), "{report}");
        }
        assert_eq!(reports[0].loaded, "countries 4 loaded, 0 skipped");
        assert_eq!(reports[1].loaded, "players 4 loaded, 0 skipped");
        assert_eq!(
            reports[2].loaded,
            "4 teams, 0 scorers, stats missing, playoffs missing"
        );
        assert_eq!(reports[3].loaded, "1000 decimals");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_data_is_reported() {
        let dir = sample_data_dir();
        fs::remove_dir_all(dir.join(PLAYER_GAME_DIR)).unwrap();
        fs::remove_file(dir.join(FLAG_GAME_DIR).join("flags/fr.png")).unwrap();

        let reports = check(&dir, &mut StdRng::seed_from_u64(3));
        assert!(!reports[0].is_playable());
        assert_eq!(reports[0].loaded, "countries 3 loaded, 1 skipped");
        assert!(!reports[1].is_playable());
        assert!(reports[2].is_playable());
        assert!(reports[3].is_playable());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn correct_cli_usage() {
        let dir = sample_data_dir();
        let dir_arg = dir.to_str().unwrap();

        let args = cli()
            .try_get_matches_from([PROGRAM_NAME, dir_arg, "--sample"])
            .unwrap();
        assert_eq!(run(&args), 0);

        fs::remove_file(dir.join(SEASON_DIR).join("stats/classement_final_top_14_2025.json"))
            .unwrap();
        let args = cli().try_get_matches_from([PROGRAM_NAME, dir_arg]).unwrap();
        assert_eq!(run(&args), 255);

        let args = cli()
            .try_get_matches_from([PROGRAM_NAME, "not a real directory"])
            .unwrap();
        assert_eq!(run(&args), 1);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn bad_cli_usage() {
        // Something very wrong.
        let command_line = [PROGRAM_NAME, "this", "invocation", "is", "incorrect"];
        cli().try_get_matches_from(command_line).unwrap_err();

        // Unknown flag.
        let command_line = [PROGRAM_NAME, "--frobnicate"];
        cli().try_get_matches_from(command_line).unwrap_err();
    }
}
