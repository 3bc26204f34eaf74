use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::types::{BookingId, BookingStatus, PaymentMethod, ServiceId};
use crate::forms::bookings::{CreateBookingForm, CreateBookingFormPayload};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::bookings::{
    cancel_booking as cancel_booking_service, complete_booking as complete_booking_service,
    confirm_booking as confirm_booking_service, create_booking as create_booking_service,
    show_booking as show_booking_service,
    show_customer_bookings as show_customer_bookings_service,
    show_provider_bookings as show_provider_bookings_service,
    start_booking as start_booking_service,
};
use crate::services::earnings::DerivationOutcome;
use crate::services::payments::capture_payment as capture_payment_service;

fn flash_service_error(err: ServiceError) -> Option<HttpResponse> {
    match err {
        ServiceError::Unauthorized => Some(redirect("/na")),
        ServiceError::NotFound => {
            FlashMessage::error("Booking not found.").send();
            None
        }
        ServiceError::Form(message)
        | ServiceError::InvalidTransition(message)
        | ServiceError::Duplicate(message) => {
            FlashMessage::error(message).send();
            None
        }
        ServiceError::Internal => Some(HttpResponse::InternalServerError().finish()),
    }
}

#[post("/services/{service_id}/book")]
pub async fn book_service(
    service_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<CreateBookingForm>,
) -> impl Responder {
    let service_id: ServiceId = match service_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/services");
        }
    };

    let method = match form.payment_method.as_deref() {
        Some(raw) => match PaymentMethod::try_from(raw) {
            Ok(method) => method,
            Err(e) => {
                FlashMessage::error(e.to_string()).send();
                return redirect("/services");
            }
        },
        None => PaymentMethod::Card,
    };

    let payload: CreateBookingFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/services");
        }
    };

    let booking =
        match create_booking_service(payload, service_id, user.as_ref(), repo.get_ref()) {
            Ok(booking) => booking,
            Err(err) => {
                return flash_service_error(err).unwrap_or_else(|| redirect("/services"));
            }
        };

    let rate = match server_config.commission.payment_rate() {
        Ok(rate) => rate,
        Err(e) => {
            log::error!("Invalid configured payment commission: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    // The storefront records the payment in the same request; the booking
    // stands even if the capture fails and is repaired by reconciliation.
    match capture_payment_service(booking.id, method, rate, repo.get_ref()) {
        Ok(_) => {
            FlashMessage::success("Your booking request has been submitted successfully!").send();
        }
        Err(err) => {
            log::error!("Failed to capture payment for booking {}: {err}", booking.id);
            FlashMessage::warning(
                "Booking submitted, but the payment could not be recorded.",
            )
            .send();
        }
    }

    redirect(&format!("/bookings/{}", booking.id))
}

#[get("/bookings/{booking_id}")]
pub async fn booking_confirmation(
    booking_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let booking_id: BookingId = match booking_id.into_inner().try_into() {
        Ok(id) => id,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    match show_booking_service(booking_id, user.as_ref(), repo.get_ref()) {
        Ok(booking) => {
            let mut context = base_context(
                &flash_messages,
                user.as_ref(),
                "bookings",
                &server_config.auth_service_url,
            );
            context.insert("booking", &booking);
            render_template(&tera, "bookings/confirmation.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to render booking page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/bookings/{booking_id}/confirm")]
pub async fn confirm_booking(
    booking_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let booking_id: BookingId = match booking_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/dashboard/bookings");
        }
    };

    match confirm_booking_service(booking_id, &user, repo.get_ref()) {
        Ok(()) => FlashMessage::success(format!("Booking #{booking_id} confirmed.")).send(),
        Err(err) => {
            if let Some(response) = flash_service_error(err) {
                return response;
            }
        }
    }

    redirect("/dashboard/bookings")
}

#[post("/bookings/{booking_id}/start")]
pub async fn start_booking(
    booking_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let booking_id: BookingId = match booking_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/dashboard/bookings");
        }
    };

    match start_booking_service(booking_id, &user, repo.get_ref()) {
        Ok(()) => FlashMessage::success(format!("Booking #{booking_id} started.")).send(),
        Err(err) => {
            if let Some(response) = flash_service_error(err) {
                return response;
            }
        }
    }

    redirect("/dashboard/bookings")
}

#[post("/bookings/{booking_id}/complete")]
pub async fn complete_booking(
    booking_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let booking_id: BookingId = match booking_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/dashboard/bookings");
        }
    };

    let rate = match server_config.commission.earnings_rate() {
        Ok(rate) => rate,
        Err(e) => {
            log::error!("Invalid configured earnings commission: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    match complete_booking_service(booking_id, &user, rate, repo.get_ref()) {
        Ok(DerivationOutcome::Created(earnings)) => FlashMessage::success(format!(
            "Booking #{booking_id} marked as completed! Earnings of {} recorded.",
            earnings.net_amount
        ))
        .send(),
        Ok(DerivationOutcome::AlreadyDerived) => {
            FlashMessage::success(format!("Booking #{booking_id} marked as completed!")).send()
        }
        Ok(DerivationOutcome::NoPayment) => FlashMessage::warning(format!(
            "Booking #{booking_id} marked as completed! Note: no payment record found yet."
        ))
        .send(),
        Ok(DerivationOutcome::PaymentNotCompleted) => FlashMessage::warning(format!(
            "Booking #{booking_id} marked as completed! Note: its payment has not completed."
        ))
        .send(),
        Err(err) => {
            if let Some(response) = flash_service_error(err) {
                return response;
            }
        }
    }

    redirect("/dashboard/bookings")
}

#[post("/bookings/{booking_id}/cancel")]
pub async fn cancel_booking(
    booking_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let booking_id: BookingId = match booking_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/account/bookings");
        }
    };

    match cancel_booking_service(booking_id, &user, repo.get_ref()) {
        Ok(()) => FlashMessage::warning("Booking cancelled.").send(),
        Err(err) => {
            if let Some(response) = flash_service_error(err) {
                return response;
            }
        }
    }

    redirect("/account/bookings")
}

#[get("/dashboard/bookings")]
pub async fn provider_bookings(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    params: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let status = params
        .get("status")
        .and_then(|raw| BookingStatus::try_from(raw.as_str()).ok());

    match show_provider_bookings_service(&user, status, repo.get_ref()) {
        Ok((counts, bookings)) => {
            let mut context = base_context(
                &flash_messages,
                Some(&user),
                "provider_bookings",
                &server_config.auth_service_url,
            );
            context.insert("bookings", &bookings);
            context.insert("pending_count", &counts.pending);
            context.insert("confirmed_count", &counts.confirmed);
            context.insert("in_progress_count", &counts.in_progress);
            context.insert("completed_count", &counts.completed);
            context.insert("cancelled_count", &counts.cancelled);
            context.insert(
                "current_filter",
                &status.map(|s| s.as_str()).unwrap_or("all"),
            );
            render_template(&tera, "bookings/provider_index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to render provider bookings page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/account/bookings")]
pub async fn customer_bookings(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_customer_bookings_service(&user, repo.get_ref()) {
        Ok(bookings) => {
            let mut context = base_context(
                &flash_messages,
                Some(&user),
                "my_bookings",
                &server_config.auth_service_url,
            );
            context.insert("bookings", &bookings);
            render_template(&tera, "bookings/customer_index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to render customer bookings page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
