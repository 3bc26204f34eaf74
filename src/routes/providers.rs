use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::types::{ProviderId, VerificationStatus};
use crate::forms::providers::{RegisterProviderForm, RegisterProviderFormPayload};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::providers::{
    register_provider as register_provider_service,
    set_provider_verification as set_provider_verification_service,
    show_dashboard as show_dashboard_service, show_providers as show_providers_service,
};

#[get("/providers")]
pub async fn show_providers(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_providers_service(repo.get_ref()) {
        Ok(providers) => {
            let mut context = base_context(
                &flash_messages,
                user.as_ref(),
                "providers",
                &server_config.auth_service_url,
            );
            context.insert("providers", &providers);
            render_template(&tera, "providers/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render providers page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/providers/register")]
pub async fn register_provider(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<RegisterProviderForm>,
) -> impl Responder {
    let payload: RegisterProviderFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/providers");
        }
    };

    match register_provider_service(payload, &user, repo.get_ref()) {
        Ok(true) => {
            FlashMessage::success("Provider profile created. Verification is pending.").send()
        }
        Ok(false) => FlashMessage::error("Failed to create provider profile.").send(),
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(err) => {
            log::error!("Failed to register provider: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect("/dashboard")
}

#[post("/providers/{provider_id}/verify")]
pub async fn verify_provider(
    provider_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    set_verification(provider_id, VerificationStatus::Verified, &user, &repo)
}

#[post("/providers/{provider_id}/reject")]
pub async fn reject_provider(
    provider_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    set_verification(provider_id, VerificationStatus::Rejected, &user, &repo)
}

fn set_verification(
    provider_id: web::Path<i32>,
    status: VerificationStatus,
    user: &AuthenticatedUser,
    repo: &web::Data<DieselRepository>,
) -> HttpResponse {
    let provider_id: ProviderId = match provider_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/providers");
        }
    };

    match set_provider_verification_service(provider_id, status, user, repo.get_ref()) {
        Ok(()) => FlashMessage::success(format!("Provider marked as {status}.")).send(),
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => FlashMessage::error("Provider not found.").send(),
        Err(err) => {
            log::error!("Failed to update provider verification: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect("/providers")
}

#[get("/dashboard")]
pub async fn provider_dashboard(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_dashboard_service(&user, repo.get_ref()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                Some(&user),
                "dashboard",
                &server_config.auth_service_url,
            );
            context.insert("provider", &data.provider);
            context.insert("pending_count", &data.counts.pending);
            context.insert("confirmed_count", &data.counts.confirmed);
            context.insert("completed_count", &data.counts.completed);
            render_template(&tera, "providers/dashboard.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to render dashboard page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
