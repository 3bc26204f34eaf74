use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::domain::types::{ApprovalStatus, ServiceId};
use crate::forms::catalog::{
    AddCategoryForm, AddCategoryFormPayload, AddServiceForm, AddServiceFormPayload,
    RejectServiceForm, UpdateCategoryForm, UpdateCategoryFormPayload, UpdateServiceForm,
    UpdateServiceFormPayload,
};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::catalog::{
    CatalogQuery, add_category as add_category_service, add_service as add_service_service,
    moderate_service as moderate_service_service, show_catalog as show_catalog_service,
    show_provider_services as show_provider_services_service,
    show_service_detail as show_service_detail_service,
    update_category as update_category_service, update_service as update_service_service,
};

#[derive(Deserialize, Debug)]
pub struct CatalogPageParams {
    pub category_id: Option<i32>,
    pub query: Option<String>,
    pub page: Option<usize>,
}

#[get("/services")]
pub async fn show_services(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    params: web::Query<CatalogPageParams>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = CatalogQuery {
        category_id: params.category_id,
        search: params.query,
        page: params.page,
    };

    match show_catalog_service(query, repo.get_ref()) {
        Ok(page) => {
            let mut context = base_context(
                &flash_messages,
                user.as_ref(),
                "services",
                &server_config.auth_service_url,
            );
            context.insert("categories", &page.categories);
            context.insert("services", &page.services);
            context.insert("total", &page.total);
            render_template(&tera, "catalog/index.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render services page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/services/{service_id}")]
pub async fn service_detail(
    service_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let service_id: ServiceId = match service_id.into_inner().try_into() {
        Ok(id) => id,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    match show_service_detail_service(service_id, repo.get_ref()) {
        Ok(detail) => {
            let mut context = base_context(
                &flash_messages,
                user.as_ref(),
                "services",
                &server_config.auth_service_url,
            );
            context.insert("service", &detail.service);
            context.insert("provider", &detail.provider);
            render_template(&tera, "catalog/detail.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render service page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/categories")]
pub async fn add_category(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddCategoryForm>,
) -> impl Responder {
    let payload: AddCategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/services");
        }
    };

    match add_category_service(payload, &user, repo.get_ref()) {
        Ok(true) => FlashMessage::success("Category added.").send(),
        Ok(false) => FlashMessage::error("Failed to add category.").send(),
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(err) => {
            log::error!("Failed to add category: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect("/services")
}

#[post("/categories/{category_id}/update")]
pub async fn update_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<UpdateCategoryForm>,
) -> impl Responder {
    let mut payload: UpdateCategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/services");
        }
    };

    payload.category_id = match category_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/services");
        }
    };

    match update_category_service(payload, &user, repo.get_ref()) {
        Ok(true) => FlashMessage::success("Category updated.").send(),
        Ok(false) => FlashMessage::error("Failed to update category.").send(),
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => FlashMessage::error("Category not found.").send(),
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(err) => {
            log::error!("Failed to update category: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect("/services")
}

#[get("/dashboard/services")]
pub async fn provider_services(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_provider_services_service(&user, repo.get_ref()) {
        Ok(services) => {
            let mut context = base_context(
                &flash_messages,
                Some(&user),
                "provider_services",
                &server_config.auth_service_url,
            );
            context.insert("services", &services);
            render_template(&tera, "catalog/provider_services.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to render provider services page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/dashboard/services")]
pub async fn add_service(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddServiceForm>,
) -> impl Responder {
    let payload: AddServiceFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/dashboard/services");
        }
    };

    match add_service_service(payload, &user, repo.get_ref()) {
        Ok(true) => {
            FlashMessage::success("Service added. It will appear once approved.").send()
        }
        Ok(false) => FlashMessage::error("Failed to add service.").send(),
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => FlashMessage::error("Category not found.").send(),
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(err) => {
            log::error!("Failed to add service: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect("/dashboard/services")
}

#[post("/dashboard/services/{service_id}/update")]
pub async fn update_service(
    service_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<UpdateServiceForm>,
) -> impl Responder {
    let mut payload: UpdateServiceFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/dashboard/services");
        }
    };

    payload.service_id = match service_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/dashboard/services");
        }
    };

    match update_service_service(payload, &user, repo.get_ref()) {
        Ok(true) => FlashMessage::success("Service updated and resubmitted for approval.").send(),
        Ok(false) => FlashMessage::error("Failed to update service.").send(),
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => FlashMessage::error("Service not found.").send(),
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(err) => {
            log::error!("Failed to update service: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect("/dashboard/services")
}

#[post("/services/{service_id}/approve")]
pub async fn approve_service(
    service_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let service_id: ServiceId = match service_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/services");
        }
    };

    match moderate_service_service(
        service_id,
        ApprovalStatus::Approved,
        None,
        &user,
        repo.get_ref(),
    ) {
        Ok(()) => FlashMessage::success("Service approved.").send(),
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => FlashMessage::error("Service not found.").send(),
        Err(err) => {
            log::error!("Failed to approve service: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect("/services")
}

#[post("/services/{service_id}/reject")]
pub async fn reject_service(
    service_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<RejectServiceForm>,
) -> impl Responder {
    let service_id: ServiceId = match service_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/services");
        }
    };

    if let Err(e) = form.validate() {
        FlashMessage::error(e.to_string()).send();
        return redirect("/services");
    }

    match moderate_service_service(
        service_id,
        ApprovalStatus::Rejected,
        Some(form.reason.as_str()),
        &user,
        repo.get_ref(),
    ) {
        Ok(()) => FlashMessage::success("Service rejected.").send(),
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => FlashMessage::error("Service not found.").send(),
        Err(err) => {
            log::error!("Failed to reject service: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect("/services")
}
