use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use tera::Tera;

use localserve::db::establish_connection_pool;
use localserve::models::config::ServerConfig;
use localserve::repository::DieselRepository;
use localserve::routes;

fn load_config() -> Result<ServerConfig, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::with_name("config"))
        .add_source(config::Environment::with_prefix("LOCALSERVE").separator("__"))
        .build()?
        .try_deserialize()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let server_config = load_config().unwrap_or_else(|e| {
        log::error!("Failed to load configuration: {e}");
        std::process::exit(1);
    });

    let pool = establish_connection_pool(&server_config.database_url).unwrap_or_else(|e| {
        log::error!("Failed to establish database pool: {e}");
        std::process::exit(1);
    });
    let repo = DieselRepository::new(pool);

    let tera = Tera::new("templates/**/*.html").unwrap_or_else(|e| {
        log::error!("Failed to load templates: {e}");
        std::process::exit(1);
    });

    let secret_key = Key::derive_from(server_config.secret_key.as_bytes());
    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let bind_address = server_config.bind_address.clone();
    log::info!("Starting server at http://{bind_address}");

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(SessionMiddleware::new(
                CookieSessionStore::default(),
                secret_key.clone(),
            ))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .app_data(web::Data::new(tera.clone()))
            .service(routes::main::index)
            .service(routes::main::not_assigned)
            .service(routes::catalog::show_services)
            .service(routes::catalog::service_detail)
            .service(routes::catalog::add_category)
            .service(routes::catalog::update_category)
            .service(routes::catalog::provider_services)
            .service(routes::catalog::add_service)
            .service(routes::catalog::update_service)
            .service(routes::catalog::approve_service)
            .service(routes::catalog::reject_service)
            .service(routes::bookings::book_service)
            .service(routes::bookings::booking_confirmation)
            .service(routes::bookings::confirm_booking)
            .service(routes::bookings::start_booking)
            .service(routes::bookings::complete_booking)
            .service(routes::bookings::cancel_booking)
            .service(routes::bookings::provider_bookings)
            .service(routes::bookings::customer_bookings)
            .service(routes::payments::capture_payment)
            .service(routes::payments::recalculate_provider_amount)
            .service(routes::earnings::provider_earnings)
            .service(routes::earnings::reconcile_earnings)
            .service(routes::earnings::set_payout_status)
            .service(routes::providers::show_providers)
            .service(routes::providers::register_provider)
            .service(routes::providers::verify_provider)
            .service(routes::providers::reject_provider)
            .service(routes::providers::provider_dashboard)
            .service(routes::reviews::add_review)
            .service(routes::reviews::provider_reviews)
            .service(routes::api::api_v1_services)
            .service(Files::new("/static", "./static"))
    })
    .bind(bind_address)?
    .run()
    .await
}
