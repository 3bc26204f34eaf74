use actix_web::{HttpResponse, Responder, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::auth::AuthenticatedUser;
use crate::domain::types::{BookingId, PaymentId};
use crate::forms::payments::{CapturePaymentForm, CapturePaymentFormPayload};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::redirect;
use crate::services::ServiceError;
use crate::services::payments::{
    capture_missing_payment as capture_missing_payment_service,
    recalculate_provider_amount as recalculate_provider_amount_service,
};

#[post("/bookings/{booking_id}/pay")]
pub async fn capture_payment(
    booking_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<CapturePaymentForm>,
) -> impl Responder {
    let booking_id: BookingId = match booking_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/dashboard/bookings");
        }
    };

    let payload: CapturePaymentFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/dashboard/bookings");
        }
    };

    let rate = match server_config.commission.payment_rate() {
        Ok(rate) => rate,
        Err(e) => {
            log::error!("Invalid configured payment commission: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    match capture_missing_payment_service(
        booking_id,
        payload.payment_method,
        rate,
        &user,
        repo.get_ref(),
    ) {
        Ok(payment) => FlashMessage::success(format!(
            "Payment of {} recorded for booking #{booking_id}.",
            payment.amount
        ))
        .send(),
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => FlashMessage::error("Booking not found.").send(),
        Err(ServiceError::Duplicate(message)) => FlashMessage::error(message).send(),
        Err(err) => {
            log::error!("Failed to capture payment for booking {booking_id}: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect("/dashboard/bookings")
}

#[post("/payments/{payment_id}/recalculate")]
pub async fn recalculate_provider_amount(
    payment_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let payment_id: PaymentId = match payment_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/dashboard/bookings");
        }
    };

    match recalculate_provider_amount_service(payment_id, &user, repo.get_ref()) {
        Ok(()) => FlashMessage::success("Provider amount recalculated.").send(),
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => FlashMessage::error("Payment not found.").send(),
        Err(err) => {
            log::error!("Failed to recalculate payment {payment_id}: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect("/dashboard/bookings")
}
