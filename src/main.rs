use axum::{
    response::Redirect,
    routing::{get, get_service},
    Router,
};
use diesel::{
    r2d2::{ConnectionManager, Pool},
    SqliteConnection,
};
use std::sync::Arc;
use tera::Tera;
use time::Duration;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

mod config;
mod data;
mod features;
mod handlers;
mod schema;
mod utils;

use config::AppConfig;
use features::cache::RecordCache;

type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Shared handles every handler can reach.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub templates: Arc<Tera>,
    pub cache: Arc<RecordCache>,
    pub config: Arc<AppConfig>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;

    // Database configuration
    let manager = ConnectionManager::<SqliteConnection>::new(config.database_url.as_str());
    let pool = Pool::builder()
        .connection_customizer(Box::new(data::bootstrap::ForeignKeys))
        .build(manager)?;
    {
        let mut conn = pool.get()?;
        data::bootstrap::init_schema(&mut conn)?;
    }

    // Templates configuration
    let templates = Tera::new(&config.templates_glob).map_err(|e| {
        log::error!("Template parsing error: {}", e);
        e
    })?;

    let state = AppState {
        pool,
        templates: Arc::new(templates),
        cache: Arc::new(RecordCache::new(config.cache_ttl, config.cache_capacity)),
        config: Arc::new(config.clone()),
    };

    let app = build_app(state);

    // Start server
    let listener = TcpListener::bind(&config.bind_addr).await?;
    log::info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_app(state: AppState) -> Router {
    // Sessions configuration
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_expiry(Expiry::OnInactivity(Duration::days(state.config.session_idle_days)))
        .with_secure(false);

    let api_router = Router::new()
        .nest("/missions", handlers::missions::router())
        .nest("/syllabus", handlers::syllabus::router())
        .nest("/records", handlers::records::router())
        .route("/dashboard", get(handlers::dashboard::dashboard_api));

    Router::new()
        .route("/", get(home))
        .route("/dashboard", get(handlers::dashboard::dashboard_page))
        .nest("/auth", handlers::auth::router())
        .nest("/api", api_router)
        .nest_service("/static", get_service(ServeDir::new("static")))
        .layer(session_layer)
        .with_state(state)
}

async fn home(session: tower_sessions::Session) -> Redirect {
    if utils::is_logged_in(&session).await {
        Redirect::to("/dashboard")
    } else {
        Redirect::to("/auth/login")
    }
}
