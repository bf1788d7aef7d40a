use dotenvy::dotenv;
use std::sync::Arc;

use posts_server::application::{DataLoader, PostService, SeedSource};
use posts_server::data::PostgresPostRepository;
use posts_server::infrastructure::{
    config::AppConfig,
    database::{create_pool, run_migrations},
    logging::init_logging,
};
use posts_server::presentation::http_handlers;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let config = AppConfig::from_env()?;

    init_logging(config.log_format, &config.log_filter)?;
    let http_addr = config.http_addr();

    tracing::info!("Starting posts server...");
    tracing::info!("HTTP server will listen on {}", http_addr);

    tracing::info!("Connecting to database...");
    let pool = create_pool(&config.database_url, config.database_max_connections).await?;

    tracing::info!("Running database migrations...");
    run_migrations(&pool).await?;

    let post_repo = Arc::new(PostgresPostRepository::new(pool.clone()));

    // Seeding must finish before the server binds
    let loader = DataLoader::new(
        post_repo.clone(),
        SeedSource::from_path(config.seed_file.as_deref()),
    );
    loader.run().await?;

    let post_service = Arc::new(PostService::new(post_repo));

    run_http_server(http_addr, post_service, config.cors_allowed_origins).await?;

    tracing::info!("Shutting down...");
    Ok(())
}

/// Configure CORS for the HTTP server with allowed origins from .env
fn configure_cors(allowed_origins: &[String]) -> actix_cors::Cors {
    use actix_cors::Cors;
    use actix_web::http::header;

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600);

    for origin in allowed_origins {
        cors = cors.allowed_origin(origin);
        tracing::debug!("Added allowed CORS origin: {}", origin);
    }

    cors
}

async fn run_http_server(
    addr: String,
    post_service: Arc<PostService>,
    cors_allowed_origins: Vec<String>,
) -> anyhow::Result<()> {
    use actix_web::{middleware::Logger, web, App, HttpServer};

    tracing::info!(
        "Configuring HTTP server with CORS origins: {:?}",
        cors_allowed_origins
    );

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(configure_cors(&cors_allowed_origins))
            .app_data(web::Data::new(post_service.clone()))
            .configure(http_handlers::configure)
    })
    .bind(&addr)?
    .run();

    tracing::info!("HTTP server running on {}", addr);

    server.await?;

    Ok(())
}
