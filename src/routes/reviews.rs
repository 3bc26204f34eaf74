use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::types::{BookingId, ProviderId};
use crate::forms::reviews::{AddReviewForm, AddReviewFormPayload};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::reviews::{
    add_review as add_review_service, show_provider_reviews as show_provider_reviews_service,
};

#[post("/bookings/{booking_id}/review")]
pub async fn add_review(
    booking_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddReviewForm>,
) -> impl Responder {
    let booking_id: BookingId = match booking_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/account/bookings");
        }
    };

    let payload: AddReviewFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/account/bookings");
        }
    };

    match add_review_service(booking_id, payload, &user, repo.get_ref()) {
        Ok(_) => FlashMessage::success("Thanks for your review!").send(),
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => FlashMessage::error("Booking not found.").send(),
        Err(ServiceError::Form(message)) | Err(ServiceError::Duplicate(message)) => {
            FlashMessage::error(message).send()
        }
        Err(err) => {
            log::error!("Failed to add review for booking {booking_id}: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect("/account/bookings")
}

#[get("/providers/{provider_id}/reviews")]
pub async fn provider_reviews(
    provider_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let provider_id: ProviderId = match provider_id.into_inner().try_into() {
        Ok(id) => id,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    match show_provider_reviews_service(provider_id, repo.get_ref()) {
        Ok(reviews) => {
            let mut context = base_context(
                &flash_messages,
                user.as_ref(),
                "providers",
                &server_config.auth_service_url,
            );
            context.insert("reviews", &reviews);
            render_template(&tera, "providers/reviews.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render reviews page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
