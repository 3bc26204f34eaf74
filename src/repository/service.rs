use diesel::prelude::*;

use crate::domain::service::{NewService, Service};
use crate::domain::types::{ApprovalStatus, ServiceId};
use crate::models::service::{NewService as DbNewService, Service as DbService};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ServiceListQuery, ServiceReader, ServiceWriter};

impl ServiceReader for DieselRepository {
    fn list_services(&self, query: ServiceListQuery) -> RepositoryResult<(usize, Vec<Service>)> {
        use crate::schema::services;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut q = services::table.into_boxed::<diesel::sqlite::Sqlite>();
            if let Some(category_id) = query.category_id {
                q = q.filter(services::category_id.eq(category_id.get()));
            }
            if let Some(provider_id) = query.provider_id {
                q = q.filter(services::provider_id.eq(provider_id.get()));
            }
            if query.listed_only {
                q = q
                    .filter(services::is_active.eq(true))
                    .filter(services::approval_status.eq(ApprovalStatus::Approved.as_str()));
            }
            if let Some(search) = &query.search {
                q = q.filter(services::title.like(format!("%{search}%")));
            }
            q
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset() as i64)
                .limit(pagination.per_page as i64);
        }

        let items = items
            .order(services::created_at.desc())
            .load::<DbService>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Service>, _>>()?;

        Ok((total, items))
    }

    fn get_service_by_id(&self, id: ServiceId) -> RepositoryResult<Option<Service>> {
        use crate::schema::services;

        let mut conn = self.conn()?;

        let service = services::table
            .filter(services::id.eq(id.get()))
            .first::<DbService>(&mut conn)
            .optional()?;

        Ok(service.map(TryInto::try_into).transpose()?)
    }
}

impl ServiceWriter for DieselRepository {
    fn create_service(&self, service: &NewService) -> RepositoryResult<usize> {
        use crate::schema::services;

        let mut conn = self.conn()?;
        let db_service: DbNewService = service.clone().into();

        let affected = diesel::insert_into(services::table)
            .values(db_service)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn update_service(&self, id: ServiceId, service: &NewService) -> RepositoryResult<usize> {
        use crate::schema::services;

        let mut conn = self.conn()?;

        // Edited listings go back through admin approval.
        let affected = diesel::update(services::table.filter(services::id.eq(id.get())))
            .set((
                services::category_id.eq(service.category_id.get()),
                services::title.eq(service.title.as_str()),
                services::description.eq(service.description.as_str()),
                services::pricing_type.eq(service.pricing_type.as_str()),
                services::price.eq(service.price.get().to_string()),
                services::duration_minutes.eq(service.duration_minutes.get()),
                services::approval_status.eq(ApprovalStatus::Pending.as_str()),
                services::rejection_reason.eq(None::<String>),
                services::is_active.eq(service.is_active),
                services::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn set_approval_status(
        &self,
        id: ServiceId,
        status: ApprovalStatus,
        rejection_reason: Option<&str>,
    ) -> RepositoryResult<usize> {
        use crate::schema::services;

        let mut conn = self.conn()?;

        let affected = diesel::update(services::table.filter(services::id.eq(id.get())))
            .set((
                services::approval_status.eq(status.as_str()),
                services::rejection_reason.eq(rejection_reason),
                services::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
