use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use signdeck::config::{DeckSourceSettings, Settings};
use signdeck::loader::DeckLoader;
use signdeck::state::AppState;
use signdeck::{db, handlers};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "signdeck=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let settings = Settings::load();

  let pool = db::init_db(&settings.database_path).expect("Failed to initialize database");

  if settings.deck_source == DeckSourceSettings::Local {
    let conn = db::try_lock(&pool).expect("Database lock failed during startup");
    db::seed_sample_deck(&conn).expect("Failed to seed sample deck");
  }

  let loader = DeckLoader::from_settings(&settings, pool).expect("Failed to build deck loader");
  let state = AppState::new(loader, &settings);
  let app = handlers::router(state, &settings.media_dir);

  let bind_addr = settings.bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", settings.server_port);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
