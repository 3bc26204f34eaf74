use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, render_template};
use crate::services::main::show_index as show_index_service;

#[get("/")]
pub async fn index(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_index_service(repo.get_ref()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                user.as_ref(),
                "index",
                &server_config.auth_service_url,
            );
            context.insert("categories", &data.categories);
            context.insert("total_services", &data.total_services);
            context.insert("total_providers", &data.total_providers);
            context.insert("total_bookings", &data.total_bookings);
            render_template(&tera, "main/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render index page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/na")]
pub async fn not_assigned(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        user.as_ref(),
        "na",
        &server_config.auth_service_url,
    );
    render_template(&tera, "main/na.html", &context)
}
