//! Datasets and pages laid down in a scratch directory for tests.

use std::fs;
use std::io;
use std::path::Path;

use crate::api::Game;
use crate::model::dataset::{
    country::{COUNTRIES_FILE, FLAGS_FOLDER},
    player::PLAYERS_FOLDER,
    season::{PLAYOFFS_FILE, SCORERS_FILE, STANDINGS_FILE, STATS_FILE},
    FLAG_GAME_DIR, PLAYER_GAME_DIR, SEASON_DIR,
};

/// Tab separated, with the code split over two columns. Japan's flag file
/// is upper case, the Vatican has no GDP, the sixth row has no code at all
/// and Atlantis has no flag.
const COUNTRIES_TSV: &str = "\
country\tiso2\tID\tpopulation\tarea\tgdp\tdensity
France\tfr\t\t68,170,228\t551695\t2,923,000,000,000\t123.5
Allemagne\tde\t\t84 482 267\t357588\t4,082,000,000,000\t236.3
Japon\t\tJP\t124516650\t377975\t4,231,000,000,000\t329.4
Brésil\tbr\t\t216422446\t8515767\t2,174,000,000,000\t25.4
\t\t\t1000\t10\t10\t100
Canada\tca\t\t38929902\t9984670\t2,140,000,000,000\t3.9
Vatican\tva\t\t764\t0.49\t\t1559.2
Atlantis\tat\t\t1\t1\t1\t1
";

/// Flag files present on disk.
const FLAG_FILES: [&str; 6] = ["fr.png", "de.png", "JP.png", "br.png", "ca.png", "va.png"];

/// Countries with both a code and a flag.
pub const FLAGGED_COUNTRIES: usize = 6;

/// Photos laid down, as (position folder, file name).
pub const PLAYER_PHOTOS: [(&str, &str); 10] = [
    ("1ere_ligne_png", "cyril_baille.png"),
    ("1ere_ligne_png", "julien_marchand.png"),
    ("2eme_ligne_png", "thibaud_flament.png"),
    ("3eme_ligne_png", "francois_cros.png"),
    ("3eme_ligne_png", "jack_willis.png"),
    ("aillier_png", "matthis_lebel.png"),
    ("arriere_png", "thomas_ramos.png"),
    ("centre_png", "pierre-louis_barassi.png"),
    ("demi_d_ouverture_png", "romain_ntamack.png"),
    ("demi_d_ouverture_png", "juan_cruz_mallia.png"),
];

pub const STANDINGS_JSON: &str = r#"[
    {"position": 1, "club": "Stade Toulousain", "points": 85},
    {"position": 2, "club": "Union Bordeaux-Bègles", "points": 80},
    {"position": 3, "club": "Stade Toulonnais", "points": 75},
    {"position": 4, "club": "Aviron Bayonnais", "points": 72},
    {"position": 5, "club": "Castres Olympique", "points": 63},
    {"position": 6, "club": "Section Paloise", "points": 62},
    {"position": 7, "club": "Racing 92", "points": 58},
    {"position": 8, "club": "Stade Rochelais", "points": 58},
    {"position": 9, "club": "ASM Clermont", "points": 57},
    {"position": 10, "club": "Stade Français", "points": 52},
    {"position": 11, "club": "Lyon OU", "points": 51},
    {"position": 12, "club": "USA Perpignan", "points": 49},
    {"position": 13, "club": "Montpellier HR", "points": 48},
    {"position": 14, "club": "Vannes", "points": "22"}
]"#;

pub const SCORERS_JSON: &str = r#"[
    {"nom": "Thomas Ramos", "club": "Stade Toulousain", "points": 289},
    {"nom": "Joris Segonds", "club": "Stade Français", "points": "262"},
    {"nom": "Matthieu Jalibert", "club": "Union Bordeaux-Bègles", "points": 231},
    {"nom": "Joe Hawkins", "club": "Section Paloise", "points": 209},
    {"nom": "Léo Berdeu", "club": "Lyon OU", "points": 188},
    {"nom": "Benjamin Urdapilleta", "club": "ASM Clermont", "points": 176},
    {"nom": "Camille Lopez", "club": "Aviron Bayonnais", "points": 171},
    {"nom": "Tom Raffy", "club": "USA Perpignan", "points": 160},
    {"nom": "Jack Maddocks", "club": "Castres Olympique", "points": 155},
    {"nom": "Nolann Le Garrec", "club": "Racing 92", "points": 149}
]"#;

pub const STATS_JSON: &str = r#"{
    "saison": "2024-2025",
    "statistiques_clubs": {
        "meilleure_attaque": [
            {"club": "Stade Toulousain", "points": 912},
            {"club": "Union Bordeaux-Bègles", "points": 804},
            {"club": "Stade Toulonnais", "points": 701},
            {"club": "Racing 92", "points": 688}
        ],
        "meilleur_temps_possession": [
            {"club": "Union Bordeaux-Bègles"},
            {"club": "Stade Toulousain"},
            {"club": "Stade Rochelais"},
            {"club": "ASM Clermont"}
        ],
        "meilleure_defense": [
            {"club": "Stade Toulonnais"},
            {"club": "Stade Toulousain"},
            {"club": "Aviron Bayonnais"},
            {"club": "Castres Olympique"}
        ]
    },
    "meilleurs_joueurs": {
        "meilleur_marqueur_essais": [
            {"nom": "Damian Penaud", "club": "Union Bordeaux-Bègles", "essais": 14},
            {"nom": "Matthis Lebel", "club": "Stade Toulousain", "essais": 12},
            {"nom": "Gabin Villière", "club": "Stade Toulonnais", "essais": "11"}
        ],
        "meilleur_gratteur": [
            {"nom": "Jack Willis", "ballons_grattes": 21},
            {"nom": "Alexandre Roumat", "ballons_grattes": 18},
            {"nom": "Charles Ollivon", "ballons_grattes": 16},
            {"nom": "Gregory Alldritt", "ballons_grattes": 15}
        ]
    },
    "essais": {"total": 612},
    "cartons": {"rouges": 12, "jaunes": 187},
    "points": {"total": 9537, "moyenne_par_match": 52.3},
    "matches": {"joues": 182, "victoires_domicile": {"nombre": 125, "pourcentage": 68.5}}
}"#;

pub const PLAYOFFS_JSON: &str = r#"{
    "phase_finale": {
        "barrages": [
            {
                "equipe_domicile": "Stade Toulonnais",
                "equipe_exterieur": "Castres Olympique",
                "score": "27 - 20",
                "vainqueur": "Stade Toulonnais"
            },
            {
                "equipe_domicile": "Aviron Bayonnais",
                "equipe_exterieur": "Section Paloise",
                "vainqueur": "Section Paloise"
            }
        ],
        "finale": {
            "equipe_domicile": "Stade Toulousain",
            "equipe_exterieur": "Union Bordeaux-Bègles",
            "score_domicile": 39,
            "score_exterieur": 33,
            "champion": "Stade Toulousain",
            "lieu": "Stade de France"
        }
    }
}"#;

pub const MENU_HTML: &str = "<!DOCTYPE html>\n<title>Menu</title>\n";

/// Contents of a game's page.
pub fn game_page(game: Game) -> String {
    format!("<!DOCTYPE html>\n<title>{}</title>\n", game.name())
}

/// Not a real image, but enough to be served with the right type.
const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Lay down the fixture tree under `root`: datasets in `data/`, pages in
/// `templates/`, assets in `static/`, and an empty `leaderboards/`.
pub fn populate(root: &Path) -> io::Result<()> {
    let data = root.join("data");

    let flag_game = data.join(FLAG_GAME_DIR);
    write(&flag_game.join(COUNTRIES_FILE), COUNTRIES_TSV)?;
    for file in FLAG_FILES {
        write(&flag_game.join(FLAGS_FOLDER).join(file), PNG)?;
    }

    let players = data.join(PLAYER_GAME_DIR).join(PLAYERS_FOLDER);
    for (folder, file) in PLAYER_PHOTOS {
        write(&players.join(folder).join(file), PNG)?;
    }
    write(&players.join("centre_png").join("notes.txt"), "not a photo")?;

    let season = data.join(SEASON_DIR);
    write(&season.join(STANDINGS_FILE), STANDINGS_JSON)?;
    write(&season.join(SCORERS_FILE), SCORERS_JSON)?;
    write(&season.join(STATS_FILE), STATS_JSON)?;
    write(&season.join(PLAYOFFS_FILE), PLAYOFFS_JSON)?;

    let templates = root.join("templates");
    write(&templates.join("menu.html"), MENU_HTML)?;
    for game in Game::ALL {
        write(&templates.join(game.page()), game_page(game))?;
    }

    write(&root.join("static/css/style.css"), "body { margin: 0; }\n")?;
    fs::create_dir_all(root.join("leaderboards"))
}

fn write(path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}
