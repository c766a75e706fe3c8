mod config;
mod db;
mod error;
mod services;

use crate::config::Settings;
use crate::db::DbState;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::{error, info};
use mime_guess::from_path;
use std::io;
use std::thread;
use std::time::Duration;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

/// Serves the embedded editor; unknown paths fall back to `index.html`.
async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let settings = Settings::load().map_err(|e| {
        error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;
    let db = DbState::open(&settings.database_path).map_err(|e| {
        error!("Cannot open datastore {}: {}", settings.database_path, e);
        io::Error::other(e.to_string())
    })?;

    let url = settings.url();
    if settings.open_browser {
        let url = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            let _ = webbrowser::open(&url);
        });
    }

    info!("Server running at {}", url);

    let json_limit = settings.json_limit_bytes;
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| services::configure(cfg, db.clone(), json_limit))
            .default_service(web::route().to(serve_embedded))
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;

    #[actix_web::test]
    async fn unknown_paths_fall_back_to_the_editor() {
        let app = test::init_service(
            App::new()
                .configure(services::testing::app(services::testing::memory_db()))
                .default_service(web::route().to(serve_embedded)),
        )
        .await;
        let req = test::TestRequest::get().uri("/plans/2024").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
    }
}
