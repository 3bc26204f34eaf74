use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::types::EarningsId;
use crate::forms::earnings::{PayoutStatusForm, PayoutStatusFormPayload};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::earnings::{
    reconcile_earnings as reconcile_earnings_service, set_payout_status as set_payout_status_service,
    show_provider_earnings as show_provider_earnings_service,
};

#[get("/dashboard/earnings")]
pub async fn provider_earnings(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_provider_earnings_service(&user, repo.get_ref()) {
        Ok(overview) => {
            let mut context = base_context(
                &flash_messages,
                Some(&user),
                "provider_earnings",
                &server_config.auth_service_url,
            );
            context.insert("earnings", &overview.items);
            context.insert("pending_total", &overview.pending_total);
            context.insert("paid_total", &overview.paid_total);
            render_template(&tera, "providers/earnings.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to render earnings page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/earnings/reconcile")]
pub async fn reconcile_earnings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let rate = match server_config.commission.earnings_rate() {
        Ok(rate) => rate,
        Err(e) => {
            log::error!("Invalid configured earnings commission: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    match reconcile_earnings_service(&user, rate, repo.get_ref()) {
        Ok(summary) => FlashMessage::success(format!(
            "Reconciliation finished: {} created, {} already present, {} missing payment, {} payment not completed.",
            summary.created,
            summary.already_present,
            summary.missing_payment,
            summary.payment_not_completed
        ))
        .send(),
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(err) => {
            log::error!("Failed to reconcile earnings: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect("/dashboard/earnings")
}

#[post("/earnings/{earnings_id}/payout")]
pub async fn set_payout_status(
    earnings_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<PayoutStatusForm>,
) -> impl Responder {
    let earnings_id: EarningsId = match earnings_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/dashboard/earnings");
        }
    };

    let payload: PayoutStatusFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/dashboard/earnings");
        }
    };

    match set_payout_status_service(earnings_id, payload.status, &user, repo.get_ref()) {
        Ok(()) => FlashMessage::success("Payout status updated.").send(),
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => FlashMessage::error("Earnings record not found.").send(),
        Err(err) => {
            log::error!("Failed to update payout status: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect("/dashboard/earnings")
}
