use actix_web::{web, App, HttpServer};
use anyhow::Context;
use sphere_service::{config::Config, handlers, logging, state::AppState};
use tracing_actix_web::TracingLogger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let config = Config::from_env().context("failed to load configuration")?;

    let db_config = db_pool::DbConfig::from_env("sphere-service")
        .map_err(anyhow::Error::msg)
        .context("failed to load database configuration")?;
    db_config.log_config();
    let pool = db_pool::create_pool(db_config)
        .await
        .context("failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let state = AppState::new(pool, &config);

    let bind_addr = (config.app.host.clone(), config.app.http_port);
    tracing::info!(host = %bind_addr.0, port = bind_addr.1, "starting sphere-service");

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
