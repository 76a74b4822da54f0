use std::path::{Path, PathBuf};

use log::debug;
use rocket::{
    fs::NamedFile,
    request::{FromRequest, Outcome},
    Request, Route, State,
};

use super::Game;
use crate::config::Config;

pub fn routes() -> Vec<Route> {
    routes![menu, static_file]
}

/// Routes every game mounts under its own prefix.
pub fn game_routes() -> Vec<Route> {
    routes![game_page]
}

/// The game a request was routed to, from its path.
#[rocket::async_trait]
impl<'r> FromRequest<'r> for Game {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match Game::from_path(req.uri().path().as_str()) {
            Some(game) => Outcome::Success(game),
            None => Outcome::Forward(()),
        }
    }
}

#[get("/")]
async fn menu(config: &State<Config>) -> Option<NamedFile> {
    serve(config.templates_dir(), Path::new("menu.html")).await
}

/// The game's page, with or without a trailing slash. Anything deeper that
/// no other game route claims is not found.
#[get("/<rest..>", rank = 20)]
async fn game_page(game: Game, rest: PathBuf, config: &State<Config>) -> Option<NamedFile> {
    if rest.components().next().is_some() {
        return None;
    }
    serve(config.templates_dir(), Path::new(game.page())).await
}

#[get("/static/<path..>")]
async fn static_file(path: PathBuf, config: &State<Config>) -> Option<NamedFile> {
    serve(config.static_dir(), &path).await
}

/// Serve `path` from `dir`, or 404 if there is no such file. Segment guards
/// have already rejected `..` and hidden components.
pub(super) async fn serve(dir: &Path, path: &Path) -> Option<NamedFile> {
    let full = dir.join(path);
    match NamedFile::open(&full).await {
        Ok(file) => Some(file),
        Err(e) => {
            debug!("Cannot serve {}: {e}", full.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
    };

    use super::Game;
    use crate::fixtures;

    #[backend_test]
    async fn menu_is_served(client: Client) {
        let response = client.get("/").dispatch().await;

        assert_eq!(Status::Ok, response.status());
        assert_eq!(Some(ContentType::HTML), response.content_type());
        assert_eq!(
            fixtures::MENU_HTML,
            response.into_string().await.unwrap()
        );
    }

    #[backend_test]
    async fn static_assets_are_served(client: Client) {
        let response = client.get("/static/css/style.css").dispatch().await;
        assert_eq!(Status::Ok, response.status());
        assert_eq!(Some(ContentType::CSS), response.content_type());

        let response = client.get("/static/css/missing.css").dispatch().await;
        assert_eq!(Status::NotFound, response.status());
    }

    #[backend_test]
    async fn paths_cannot_escape_the_static_folder(client: Client) {
        let response = client.get("/static/../templates/menu.html").dispatch().await;
        assert_ne!(Status::Ok, response.status());
    }

    #[backend_test]
    async fn game_pages_are_served(client: Client) {
        for game in Game::ALL {
            let expected = fixtures::game_page(game);
            for uri in [game.prefix().to_string(), format!("{}/", game.prefix())] {
                let response = client.get(uri.clone()).dispatch().await;
                assert_eq!(Status::Ok, response.status(), "{uri}");
                assert_eq!(Some(ContentType::HTML), response.content_type(), "{uri}");
                assert_eq!(expected, response.into_string().await.unwrap(), "{uri}");
            }
        }
    }

    #[backend_test]
    async fn unknown_game_paths_are_not_found(client: Client) {
        let response = client.get("/flag-game/no-such-page").dispatch().await;
        assert_eq!(Status::NotFound, response.status());

        let response = client.get("/flag-gamez").dispatch().await;
        assert_eq!(Status::NotFound, response.status());
    }

    #[backend_test(empty)]
    async fn missing_pages_are_not_found(client: Client) {
        let response = client.get("/").dispatch().await;
        assert_eq!(Status::NotFound, response.status());
    }
}
