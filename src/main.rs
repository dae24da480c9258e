use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use nearby_events::config::Config;
use nearby_events::db;
use nearby_events::routes::create_routes;
use nearby_events::state::AppState;

#[derive(Parser)]
#[command(name = "nearby-events", about = "Hypermedia API for nearby events")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create the database schema and exit
    InitDb,
    /// Insert sample data for local development
    Seed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("nearby_events=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let pool = db::connect(&config)
        .await
        .expect("Failed to connect to database");

    db::migrate(&pool).await.expect("Failed to run migrations");
    tracing::info!("Migrations run successfully");

    match cli.command.unwrap_or(Command::Serve) {
        Command::InitDb => {}
        Command::Seed => {
            db::seed::generate_test_database(&pool)
                .await
                .expect("Failed to insert sample data");
        }
        Command::Serve => {
            let state = AppState::new(pool).expect("Failed to compile resource schemas");
            let app = create_routes(state, &config.cors_allowed_origins);

            tracing::info!("Server running at http://{}", config.bind_addr);

            let listener = TcpListener::bind(config.bind_addr)
                .await
                .expect("Failed to bind address");

            axum::serve(listener, app).await.expect("Server failed");
        }
    }
}
