/// PureStream Server - music sharing API
use clap::{Parser, Subcommand};
use purestream_core::NewUser;
use purestream_server::{
    config::ServerConfig,
    create_router,
    services::{AuthService, FileStorage},
    state::AppState,
};
use sqlx::SqlitePool;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "purestream-server")]
#[command(about = "PureStream music sharing server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "PURESTREAM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user
    AddUser {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Email address used to log in
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "purestream_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ServerConfig::load_from(path)?,
        None => ServerConfig::load()?,
    };

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::AddUser {
            username,
            email,
            password,
        } => add_user(&config, &username, &email, &password).await?,
        Commands::ListUsers => list_users(&config).await?,
    }

    Ok(())
}

async fn open_database(config: &ServerConfig) -> anyhow::Result<SqlitePool> {
    let pool = purestream_storage::create_pool(&config.storage.database_url).await?;
    purestream_storage::run_migrations(&pool).await?;
    Ok(pool)
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting PureStream Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let pool = open_database(&config).await?;
    tracing::info!("Database connected");

    let file_storage = FileStorage::new(config.storage.uploads_path.clone());
    file_storage.initialize().await?;
    tracing::info!(path = %config.storage.uploads_path.display(), "File storage initialized");

    let auth_service = Arc::new(AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.token_expiration_days,
    ));

    let app_state = AppState::new(pool, auth_service, Arc::new(file_storage), config.uploads);
    let app = create_router(app_state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_user(
    config: &ServerConfig,
    username: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    let pool = open_database(config).await?;

    let auth_service = AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.token_expiration_days,
    );
    let password_hash = auth_service.hash_password(password)?;

    let user = purestream_storage::users::create(
        &pool,
        NewUser {
            username: username.trim().to_string(),
            email: email.trim().to_lowercase(),
            password_hash,
        },
    )
    .await?;

    println!("Created user {} ({})", user.username, user.id);
    Ok(())
}

async fn list_users(config: &ServerConfig) -> anyhow::Result<()> {
    let pool = open_database(config).await?;
    let users = purestream_storage::users::get_all(&pool).await?;

    println!("Users:");
    for user in users {
        println!("  {} - {} <{}>", user.id, user.username, user.email);
    }

    Ok(())
}
