use actix_web::{HttpResponse, Responder, get, web};

use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::api::{ApiV1ServicesQueryParams, api_v1_services as api_v1_services_service};

#[get("/api/v1/services")]
pub async fn api_v1_services(
    params: web::Query<ApiV1ServicesQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match api_v1_services_service(params.into_inner(), repo.get_ref()) {
        Ok(services) => HttpResponse::Ok().json(services),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to list services over the API: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
