mod auth;
mod config;
mod db;
mod error;
mod judging;
mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weekdrop=info,tower_http=info".into()),
        )
        .init();

    let config = config::Config::from_env()?;
    let config = Arc::new(config);

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(pool.as_ref()).await?;

    let state = Arc::new(state::AppState {
        pool,
        config: config.clone(),
    });

    let app = Router::new()
        .route("/api/judge/next", get(routes::judge::next_submission))
        .route("/api/judge/reviews", post(routes::judge::create_review))
        .route(
            "/api/judge/reviews/:review_id/annotations",
            post(routes::judge::create_annotation),
        )
        .route("/api/judge/submission/:id", get(routes::judge::submission_detail))
        .route("/api/submissions/pending", get(routes::submissions::pending_submissions))
        .route("/api/submissions/mine", get(routes::submissions::my_submissions))
        .route(
            "/api/submissions/review/:id",
            get(routes::submissions::review_for_submission),
        )
        .route("/api/submissions/:id", get(routes::submissions::submission_detail))
        .route("/api/submissions/:id/comment", post(routes::submissions::post_comment))
        .route("/api/submissions/:id/applaud", post(routes::submissions::applaud))
        .route("/api/drop/current", get(routes::drop::current_drop))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Weekdrop listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
