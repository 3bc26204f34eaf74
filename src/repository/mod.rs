use crate::db::{DbConnection, DbPool};
use crate::domain::booking::{Booking, BookingAction, NewBooking};
use crate::domain::category::{Category, NewCategory};
use crate::domain::earnings::{NewProviderEarnings, ProviderEarnings};
use crate::domain::payment::{NewPayment, Payment};
use crate::domain::provider::{NewProvider, Provider};
use crate::domain::review::{NewReview, Review};
use crate::domain::service::{NewService, Service};
use crate::domain::types::{
    ApprovalStatus, BookingId, BookingStatus, CategoryId, CategoryName, EarningsId, Money,
    PaymentId, PaymentStatus, PayoutStatus, ProviderId, ServiceId, UserId, VerificationStatus,
};
use crate::pagination::Pagination;
use crate::repository::errors::RepositoryResult;

pub mod booking;
pub mod category;
pub mod earnings;
pub mod errors;
pub mod payment;
pub mod provider;
pub mod review;
pub mod service;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters used when listing services.
#[derive(Debug, Clone, Default)]
pub struct ServiceListQuery {
    /// Filter by category identifier.
    pub category_id: Option<CategoryId>,
    /// Filter by owning provider.
    pub provider_id: Option<ProviderId>,
    /// Restrict to active AND approved services.
    pub listed_only: bool,
    /// Case-insensitive substring search over the title.
    pub search: Option<String>,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl ServiceListQuery {
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
    pub fn provider(mut self, provider_id: ProviderId) -> Self {
        self.provider_id = Some(provider_id);
        self
    }
    pub fn listed_only(mut self) -> Self {
        self.listed_only = true;
        self
    }
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Query parameters used when listing bookings.
#[derive(Debug, Clone, Default)]
pub struct BookingListQuery {
    /// Filter by the provider side.
    pub provider_id: Option<ProviderId>,
    /// Filter by the registered customer side.
    pub user_id: Option<UserId>,
    /// Filter by lifecycle status.
    pub status: Option<BookingStatus>,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl BookingListQuery {
    pub fn provider(mut self, provider_id: ProviderId) -> Self {
        self.provider_id = Some(provider_id);
        self
    }
    pub fn user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }
    pub fn status(mut self, status: BookingStatus) -> Self {
        self.status = Some(status);
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Per-status booking tallies shown on the provider dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingStatusCounts {
    pub pending: usize,
    pub confirmed: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List categories, optionally restricted to active ones.
    fn list_categories(&self, active_only: bool) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<usize>;
    /// Update a category's display fields.
    fn update_category(
        &self,
        id: CategoryId,
        name: &CategoryName,
        description: &str,
        icon: Option<&str>,
        is_active: bool,
    ) -> RepositoryResult<usize>;
}

/// Read-only operations for provider entities.
pub trait ProviderReader {
    /// Retrieve a provider by its identifier.
    fn get_provider_by_id(&self, id: ProviderId) -> RepositoryResult<Option<Provider>>;
    /// Retrieve the provider profile linked to a user account.
    fn get_provider_by_user_id(&self, user_id: UserId) -> RepositoryResult<Option<Provider>>;
    /// List providers, optionally restricted to verified ones.
    fn list_providers(&self, verified_only: bool) -> RepositoryResult<Vec<Provider>>;
}

/// Write operations for provider entities.
pub trait ProviderWriter {
    /// Persist a new provider profile.
    fn create_provider(&self, provider: &NewProvider) -> RepositoryResult<usize>;
    /// Set the verification state; stamps `verified_at` when verifying.
    fn set_verification_status(
        &self,
        id: ProviderId,
        status: VerificationStatus,
    ) -> RepositoryResult<usize>;
    /// Recompute the derived aggregates (average rating, review and completed
    /// booking tallies) from the child rows, in one transaction. Idempotent.
    fn refresh_provider_aggregates(&self, id: ProviderId) -> RepositoryResult<()>;
}

/// Read-only operations for service entities.
pub trait ServiceReader {
    /// List services matching the supplied query parameters.
    fn list_services(&self, query: ServiceListQuery) -> RepositoryResult<(usize, Vec<Service>)>;
    /// Retrieve a service by its identifier.
    fn get_service_by_id(&self, id: ServiceId) -> RepositoryResult<Option<Service>>;
}

/// Write operations for service entities.
pub trait ServiceWriter {
    /// Persist a new service; it starts out pending admin approval.
    fn create_service(&self, service: &NewService) -> RepositoryResult<usize>;
    /// Update listing fields; the service reverts to pending approval.
    fn update_service(&self, id: ServiceId, service: &NewService) -> RepositoryResult<usize>;
    /// Set the admin approval state, with an optional rejection reason.
    fn set_approval_status(
        &self,
        id: ServiceId,
        status: ApprovalStatus,
        rejection_reason: Option<&str>,
    ) -> RepositoryResult<usize>;
}

/// Read-only operations for booking entities.
pub trait BookingReader {
    /// List bookings matching the supplied query parameters.
    fn list_bookings(&self, query: BookingListQuery) -> RepositoryResult<(usize, Vec<Booking>)>;
    /// Retrieve a booking by its identifier.
    fn get_booking_by_id(&self, id: BookingId) -> RepositoryResult<Option<Booking>>;
    /// Per-status tallies for one provider's bookings.
    fn booking_status_counts(&self, provider_id: ProviderId)
    -> RepositoryResult<BookingStatusCounts>;
}

/// Write operations for booking entities.
pub trait BookingWriter {
    /// Persist a new booking and return it with its assigned identifier.
    fn create_booking(&self, booking: &NewBooking) -> RepositoryResult<Booking>;
    /// Apply a lifecycle action as a single optimistic guarded update:
    /// the row is only touched when its current status admits the action.
    /// Returns the number of affected rows; zero means the precondition
    /// failed and the caller decides between not-found and illegal-transition.
    fn transition_booking(&self, id: BookingId, action: BookingAction) -> RepositoryResult<usize>;
}

/// Read-only operations for payment entities.
pub trait PaymentReader {
    /// Retrieve the payment captured for a booking, if any.
    fn get_payment_by_booking(&self, booking_id: BookingId) -> RepositoryResult<Option<Payment>>;
    /// Retrieve a payment by its identifier.
    fn get_payment_by_id(&self, id: PaymentId) -> RepositoryResult<Option<Payment>>;
}

/// Write operations for payment entities.
pub trait PaymentWriter {
    /// Persist a new payment and return it with its assigned identifier.
    /// Fails with a duplicate error when the booking already has one.
    fn create_payment(&self, payment: &NewPayment) -> RepositoryResult<Payment>;
    /// Overwrite the derived provider share after an explicit recomputation.
    fn update_provider_amount(&self, id: PaymentId, amount: Money) -> RepositoryResult<usize>;
    /// Set the settlement status; stamps `paid_at` on completion.
    fn set_payment_status(&self, id: PaymentId, status: PaymentStatus) -> RepositoryResult<usize>;
}

/// Read-only operations for earnings records.
pub trait EarningsReader {
    /// Retrieve the earnings derived for a booking, if any.
    fn get_earnings_by_booking(
        &self,
        booking_id: BookingId,
    ) -> RepositoryResult<Option<ProviderEarnings>>;
    /// List all earnings recorded for a provider, newest first.
    fn list_earnings_by_provider(
        &self,
        provider_id: ProviderId,
    ) -> RepositoryResult<Vec<ProviderEarnings>>;
}

/// Write operations for earnings records.
pub trait EarningsWriter {
    /// Persist a new earnings row and return it with its assigned identifier.
    /// Fails with a duplicate error when the booking or payment already has one.
    fn create_earnings(&self, earnings: &NewProviderEarnings)
    -> RepositoryResult<ProviderEarnings>;
    /// Set the administrative payout state; stamps `paid_at` when paid.
    fn set_payout_status(&self, id: EarningsId, status: PayoutStatus) -> RepositoryResult<usize>;
}

/// Read-only operations for review entities.
pub trait ReviewReader {
    /// Retrieve the review left for a booking, if any.
    fn get_review_by_booking(&self, booking_id: BookingId) -> RepositoryResult<Option<Review>>;
    /// List all reviews for a provider, newest first.
    fn list_reviews_by_provider(&self, provider_id: ProviderId) -> RepositoryResult<Vec<Review>>;
}

/// Write operations for review entities.
pub trait ReviewWriter {
    /// Persist a new review. Fails with a duplicate error when the booking
    /// already has one.
    fn create_review(&self, review: &NewReview) -> RepositoryResult<Review>;
}
