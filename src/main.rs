use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::info;

use fileshelf::api;
use fileshelf::app_state::AppState;
use fileshelf::config::AppConfig;

fn init_logging(config: &AppConfig) {
    if std::path::Path::new(&config.logging.config_file).exists() {
        log4rs::init_file(&config.logging.config_file, Default::default())
            .expect("failed to initialize log4rs");
    } else {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or("info"),
        )
        .init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::load().expect("Failed to load configuration");
    init_logging(&config);
    info!(
        "Starting fileshelf on {}:{}",
        config.server.host, config.server.port
    );

    let bind_addr = (config.server.host.clone(), config.server.port);
    let workers = config.server.workers;
    let max_upload_size = config.server.max_upload_size;
    let static_dir = config.server.static_dir.clone();
    let state = AppState::from_config(config);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::PayloadConfig::default().limit(max_upload_size))
            .app_data(web::Data::new(state.clone()))
            .service(api::upload)
            .service(api::list_files)
            .service(api::admin_list_files)
            .service(api::update_file)
            .service(api::delete_file)
            .service(api::download)
            .service(Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .workers(workers)
    .bind(bind_addr)?
    .run()
    .await
}
