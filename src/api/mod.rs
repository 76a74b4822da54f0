use rocket::Route;

mod flags;
mod pages;
mod pi;
mod players;
mod scores;
mod top14;

/// The games served, each mounted under its own prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Game {
    Flags,
    Players,
    Top14,
    Pi,
}

impl Game {
    pub const ALL: [Game; 4] = [Self::Flags, Self::Players, Self::Top14, Self::Pi];

    /// Mount point of the game's routes.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Flags => "/flag-game",
            Self::Players => "/toulouse-game",
            Self::Top14 => "/top14-quiz",
            Self::Pi => "/pi-game",
        }
    }

    /// Short name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Flags => "flags",
            Self::Players => "players",
            Self::Top14 => "top14",
            Self::Pi => "pi",
        }
    }

    /// The game's page in the templates folder.
    pub fn page(self) -> &'static str {
        match self {
            Self::Flags => "flag_game.html",
            Self::Players => "toulouse_game.html",
            Self::Top14 => "top14_quiz.html",
            Self::Pi => "pi_game.html",
        }
    }

    /// The game a request path belongs to, if any.
    pub fn from_path(path: &str) -> Option<Game> {
        Self::ALL.into_iter().find(|game| {
            path.strip_prefix(game.prefix())
                .map_or(false, |rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    /// Routes to mount under [`Game::prefix`].
    pub fn routes(self) -> Vec<Route> {
        let mut routes = pages::game_routes();
        routes.extend(match self {
            Self::Flags => flags::routes(),
            Self::Players => players::routes(),
            Self::Top14 => top14::routes(),
            Self::Pi => pi::routes(),
        });
        routes
    }
}

/// Routes mounted at the root.
pub fn routes() -> Vec<Route> {
    pages::routes()
}
