use crate::dto::catalog::CategoryDto;
use crate::repository::{
    BookingListQuery, BookingReader, CategoryReader, ProviderReader, ServiceListQuery,
    ServiceReader,
};

use super::{ServiceError, ServiceResult};

/// Data backing the landing page.
#[derive(Debug, Clone)]
pub struct IndexData {
    pub categories: Vec<CategoryDto>,
    pub total_services: usize,
    pub total_providers: usize,
    pub total_bookings: usize,
}

/// Core business logic for rendering the landing page.
///
/// Counts only what the storefront actually shows: listed services and
/// verified providers.
pub fn show_index<R>(repo: &R) -> ServiceResult<IndexData>
where
    R: CategoryReader + ServiceReader + ProviderReader + BookingReader,
{
    let categories = match repo.list_categories(true) {
        Ok(categories) => categories.into_iter().map(CategoryDto::from).collect(),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let total_services = match repo.list_services(ServiceListQuery::default().listed_only()) {
        Ok((total, _)) => total,
        Err(e) => {
            log::error!("Failed to count services: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let total_providers = match repo.list_providers(true) {
        Ok(providers) => providers.len(),
        Err(e) => {
            log::error!("Failed to count providers: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let total_bookings = match repo.list_bookings(BookingListQuery::default()) {
        Ok((total, _)) => total,
        Err(e) => {
            log::error!("Failed to count bookings: {e}");
            return Err(ServiceError::Internal);
        }
    };

    Ok(IndexData {
        categories,
        total_services,
        total_providers,
        total_bookings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::NewCategory;
    use crate::domain::types::CategoryName;
    use crate::repository::CategoryWriter;
    use crate::repository::test::TestRepository;
    use chrono::DateTime;

    #[test]
    fn index_lists_active_categories() {
        let now = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        let repo = TestRepository::new();
        repo.create_category(&NewCategory {
            name: CategoryName::new("Plumbing").unwrap(),
            description: "Pipes and fittings".into(),
            icon: Some("wrench".into()),
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .unwrap();

        let data = show_index(&repo).unwrap();
        assert_eq!(data.categories.len(), 1);
        assert_eq!(data.categories[0].name, "Plumbing");
        assert_eq!(data.total_services, 0);
    }
}
