use std::io;

use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;

use remote_work_hotels::config::Config;
use remote_work_hotels::tracking::EventTracker;
use remote_work_hotels::{db, routes};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize logger and environment
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(io::Error::other)?;

    log::info!("Connecting to database...");
    let pool = db::get_db_pool(&config).await.map_err(io::Error::other)?;

    log::info!("Running migrations...");
    db::run_migrations(&pool).await.map_err(io::Error::other)?;

    let (tracker, tracking_worker) = EventTracker::spawn(pool.clone(), config.tracking);

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let pool_data = web::Data::new(pool);
    let tracker_data = web::Data::new(tracker);

    HttpServer::new(move || {
        App::new()
            .app_data(pool_data.clone())
            .app_data(tracker_data.clone())
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    // The server held the last tracker handles, so the worker now drains and exits.
    if let Err(err) = tracking_worker.await {
        log::warn!("tracking worker ended abnormally: {err}");
    }
    Ok(())
}
