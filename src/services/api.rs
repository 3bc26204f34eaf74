use serde::Deserialize;

use crate::dto::catalog::ServiceDto;
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::{ServiceListQuery, ServiceReader};

use super::{ServiceError, ServiceResult};

/// Query parameters accepted by the `api_v1_services` endpoint.
#[derive(Deserialize, Debug)]
pub struct ApiV1ServicesQueryParams {
    pub category_id: Option<i32>,
    pub query: Option<String>,
    pub page: Option<usize>,
}

/// Core business logic for the `/api/v1/services` endpoint.
///
/// Returns publicly listed services with optional category filtering, text
/// search and pagination. All repository interactions are handled here so
/// that the HTTP route can remain a thin wrapper.
pub fn api_v1_services<R>(
    params: ApiV1ServicesQueryParams,
    repo: &R,
) -> ServiceResult<Vec<ServiceDto>>
where
    R: ServiceReader,
{
    let mut list_query = ServiceListQuery::default()
        .listed_only()
        .paginate(params.page.unwrap_or(1), DEFAULT_ITEMS_PER_PAGE);

    if let Some(category_id) = params.category_id {
        match category_id.try_into() {
            Ok(category_id) => list_query = list_query.category(category_id),
            Err(_) => return Err(ServiceError::NotFound),
        }
    }

    if let Some(query) = &params.query {
        if !query.is_empty() {
            list_query = list_query.search(query);
        }
    }

    match repo.list_services(list_query) {
        Ok((_total, services)) => Ok(services.into_iter().map(ServiceDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list services: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::service::Service;
    use crate::domain::types::{
        ApprovalStatus, CategoryId, DurationMinutes, Money, PricingType, ProviderId, ServiceId,
        ServiceTitle,
    };
    use crate::repository::test::TestRepository;
    use chrono::DateTime;
    use rust_decimal_macros::dec;

    fn sample_service(id: i32, title: &str, approved: bool) -> Service {
        let epoch = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        Service {
            id: ServiceId::new(id).unwrap(),
            provider_id: ProviderId::new(1).unwrap(),
            category_id: CategoryId::new(1).unwrap(),
            title: ServiceTitle::new(title).unwrap(),
            description: String::new(),
            pricing_type: PricingType::Fixed,
            price: Money::new(dec!(250.00)).unwrap(),
            duration_minutes: DurationMinutes::new(45).unwrap(),
            approval_status: if approved {
                ApprovalStatus::Approved
            } else {
                ApprovalStatus::Pending
            },
            rejection_reason: None,
            is_active: true,
            created_at: epoch,
            updated_at: epoch,
        }
    }

    #[test]
    fn returns_only_listed_services() {
        let repo = TestRepository::new().with_services(vec![
            sample_service(1, "Wall painting", true),
            sample_service(2, "Roof repair", false),
        ]);

        let params = ApiV1ServicesQueryParams {
            category_id: None,
            query: None,
            page: None,
        };

        let result = api_v1_services(params, &repo).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Wall painting");
    }

    #[test]
    fn search_filters_by_title() {
        let repo = TestRepository::new().with_services(vec![
            sample_service(1, "Wall painting", true),
            sample_service(2, "Sofa cleaning", true),
        ]);

        let params = ApiV1ServicesQueryParams {
            category_id: None,
            query: Some("clean".into()),
            page: None,
        };

        let result = api_v1_services(params, &repo).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Sofa cleaning");
    }
}
