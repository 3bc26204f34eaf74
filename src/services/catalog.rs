//! Catalog reference data: categories, service listings and admin moderation.

use crate::ADMIN_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::provider::Provider;
use crate::domain::service::Service;
use crate::domain::types::{ApprovalStatus, ServiceId};
use crate::dto::catalog::{CategoryDto, ServiceDto};
use crate::forms::catalog::{
    AddCategoryFormPayload, AddServiceFormPayload, UpdateCategoryFormPayload,
    UpdateServiceFormPayload,
};
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::{
    CategoryReader, CategoryWriter, ProviderReader, ServiceListQuery, ServiceReader, ServiceWriter,
};
use crate::services::providers::provider_for_user;

use super::{ServiceError, ServiceResult};

/// Parameters accepted by the public catalog page.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub category_id: Option<i32>,
    pub search: Option<String>,
    pub page: Option<usize>,
}

/// Data backing the public catalog page.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    pub categories: Vec<CategoryDto>,
    pub services: Vec<ServiceDto>,
    pub total: usize,
}

/// Public listing: active categories plus active+approved services.
pub fn show_catalog<R>(query: CatalogQuery, repo: &R) -> ServiceResult<CatalogPage>
where
    R: CategoryReader + ServiceReader,
{
    let categories = match repo.list_categories(true) {
        Ok(categories) => categories.into_iter().map(CategoryDto::from).collect(),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let mut list_query = ServiceListQuery::default()
        .listed_only()
        .paginate(query.page.unwrap_or(1), DEFAULT_ITEMS_PER_PAGE);
    if let Some(category_id) = query.category_id {
        match category_id.try_into() {
            Ok(category_id) => list_query = list_query.category(category_id),
            Err(_) => return Err(ServiceError::NotFound),
        }
    }
    if let Some(search) = &query.search {
        if !search.is_empty() {
            list_query = list_query.search(search);
        }
    }

    match repo.list_services(list_query) {
        Ok((total, services)) => Ok(CatalogPage {
            categories,
            services: services.into_iter().map(ServiceDto::from).collect(),
            total,
        }),
        Err(e) => {
            log::error!("Failed to list services: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// A listed service together with its provider, for the detail page.
#[derive(Debug, Clone)]
pub struct ServiceDetail {
    pub service: Service,
    pub provider: Provider,
}

/// Loads one publicly listed service and its provider.
pub fn show_service_detail<R>(service_id: ServiceId, repo: &R) -> ServiceResult<ServiceDetail>
where
    R: ServiceReader + ProviderReader,
{
    let service = match repo.get_service_by_id(service_id) {
        Ok(Some(service)) if service.is_listed() => service,
        Ok(_) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get service {service_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let provider = match repo.get_provider_by_id(service.provider_id) {
        Ok(Some(provider)) => provider,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get provider {}: {e}", service.provider_id);
            return Err(ServiceError::Internal);
        }
    };

    Ok(ServiceDetail { service, provider })
}

/// Admin action: create a category.
pub fn add_category<R>(
    payload: AddCategoryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: CategoryWriter,
{
    if !check_role(ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let category = payload.into_new_category();
    match repo.create_category(&category) {
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to create category: {e}");
            Ok(false)
        }
    }
}

/// Admin action: update a category's display fields.
pub fn update_category<R>(
    payload: UpdateCategoryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: CategoryReader + CategoryWriter,
{
    if !check_role(ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    match repo.get_category_by_id(payload.category_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.update_category(
        payload.category_id,
        &payload.name,
        &payload.description,
        payload.icon.as_deref(),
        payload.is_active,
    ) {
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to update category: {e}");
            Ok(false)
        }
    }
}

/// Provider action: list one's own services, whatever their approval state.
pub fn show_provider_services<R>(
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<Service>>
where
    R: ProviderReader + ServiceReader,
{
    let provider = provider_for_user(user, repo)?;

    match repo.list_services(ServiceListQuery::default().provider(provider.id)) {
        Ok((_total, services)) => Ok(services),
        Err(e) => {
            log::error!("Failed to list services for provider {}: {e}", provider.id);
            Err(ServiceError::Internal)
        }
    }
}

/// Provider action: create a service; it awaits admin approval.
pub fn add_service<R>(
    payload: AddServiceFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: ProviderReader + CategoryReader + ServiceWriter,
{
    let provider = provider_for_user(user, repo)?;

    match repo.get_category_by_id(payload.category_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let service = payload.into_new_service(provider.id);
    match repo.create_service(&service) {
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to create service: {e}");
            Ok(false)
        }
    }
}

/// Provider action: edit an owned service; it reverts to pending approval.
pub fn update_service<R>(
    payload: UpdateServiceFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: ProviderReader + ServiceReader + ServiceWriter,
{
    let provider = provider_for_user(user, repo)?;

    let service = match repo.get_service_by_id(payload.service_id) {
        Ok(Some(service)) => service,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get service {}: {e}", payload.service_id);
            return Err(ServiceError::Internal);
        }
    };

    if service.provider_id != provider.id {
        return Err(ServiceError::Unauthorized);
    }

    let service_id = payload.service_id;
    let changes = payload.into_new_service(provider.id);
    match repo.update_service(service_id, &changes) {
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to update service {service_id}: {e}");
            Ok(false)
        }
    }
}

/// Admin action: approve or reject a pending service.
pub fn moderate_service<R>(
    service_id: ServiceId,
    status: ApprovalStatus,
    rejection_reason: Option<&str>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: ServiceWriter,
{
    if !check_role(ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    match repo.set_approval_status(service_id, status, rejection_reason) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to moderate service {service_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}
