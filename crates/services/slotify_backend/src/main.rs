// File: crates/services/slotify_backend/src/main.rs
use slotify_backend::{build_app, init_backend};
use slotify_config::load_config;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    slotify_common::logging::init();

    let config = Arc::new(load_config().expect("Failed to load config"));
    let backend = init_backend(Arc::clone(&config))
        .await
        .expect("Failed to initialize backend");
    let app = build_app(&backend);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    println!("Starting server at http://{}", addr);
    println!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
