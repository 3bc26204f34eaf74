//! Booking lifecycle orchestration: creation, provider/customer actions and
//! the completion side effects.

use crate::auth::AuthenticatedUser;
use crate::domain::booking::{Booking, BookingAction};
use crate::domain::types::{BookingId, BookingStatus, CommissionRate, ServiceId};
use crate::forms::bookings::CreateBookingFormPayload;
use crate::repository::{
    BookingListQuery, BookingReader, BookingStatusCounts, BookingWriter, EarningsReader,
    EarningsWriter, PaymentReader, ProviderReader, ProviderWriter, ServiceReader,
};
use crate::services::earnings::{DerivationOutcome, derive_earnings};
use crate::services::providers::provider_for_user;

use super::{ServiceError, ServiceResult};

/// Creates a booking for a listed service, snapshotting its current price.
///
/// Guests may book; a signed-in customer is linked via `user_id`. Users with
/// a provider profile are turned away, as in the storefront.
pub fn create_booking<R>(
    payload: CreateBookingFormPayload,
    service_id: ServiceId,
    user: Option<&AuthenticatedUser>,
    repo: &R,
) -> ServiceResult<Booking>
where
    R: ServiceReader + ProviderReader + BookingWriter,
{
    let user_id = match user {
        Some(user) => match user.user_id() {
            Ok(user_id) => Some(user_id),
            Err(e) => {
                log::error!("Invalid user id in claims: {e}");
                return Err(ServiceError::Internal);
            }
        },
        None => None,
    };

    if let Some(user_id) = user_id {
        match repo.get_provider_by_user_id(user_id) {
            Ok(Some(_)) => {
                return Err(ServiceError::Form(
                    "Providers cannot book services. Please use a customer account.".to_string(),
                ));
            }
            Ok(None) => {}
            Err(e) => {
                log::error!("Failed to look up provider for user {user_id}: {e}");
                return Err(ServiceError::Internal);
            }
        }
    }

    let service = match repo.get_service_by_id(service_id) {
        Ok(Some(service)) if service.is_listed() => service,
        Ok(_) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get service {service_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let new_booking = payload.into_new_booking(&service, user_id);
    match repo.create_booking(&new_booking) {
        Ok(booking) => Ok(booking),
        Err(e) => {
            log::error!("Failed to create booking: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Applies a lifecycle action through the optimistic status guard and maps a
/// rejected precondition to the user-facing error taxonomy.
fn apply_transition<R>(booking: &Booking, action: BookingAction, repo: &R) -> ServiceResult<()>
where
    R: BookingReader + BookingWriter,
{
    match repo.transition_booking(booking.id, action) {
        Ok(0) => match repo.get_booking_by_id(booking.id) {
            Ok(Some(current)) => match current.status.apply(action) {
                Err(rejected) => Err(ServiceError::InvalidTransition(rejected.to_string())),
                // The guard missed but the state allows the action: a
                // concurrent transition slipped in between the two reads.
                Ok(_) => Err(ServiceError::Internal),
            },
            Ok(None) => Err(ServiceError::NotFound),
            Err(e) => {
                log::error!("Failed to re-read booking {}: {e}", booking.id);
                Err(ServiceError::Internal)
            }
        },
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to {action} booking {}: {e}", booking.id);
            Err(ServiceError::Internal)
        }
    }
}

fn booking_for_provider<R>(
    booking_id: BookingId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Booking>
where
    R: BookingReader + ProviderReader,
{
    let provider = provider_for_user(user, repo)?;

    let booking = match repo.get_booking_by_id(booking_id) {
        Ok(Some(booking)) => booking,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get booking {booking_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if booking.provider_id != provider.id {
        return Err(ServiceError::Unauthorized);
    }

    Ok(booking)
}

/// Provider action: `pending` -> `confirmed`.
pub fn confirm_booking<R>(
    booking_id: BookingId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: BookingReader + BookingWriter + ProviderReader,
{
    let booking = booking_for_provider(booking_id, user, repo)?;
    apply_transition(&booking, BookingAction::Confirm, repo)
}

/// Provider action: `confirmed` -> `in_progress`.
pub fn start_booking<R>(
    booking_id: BookingId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: BookingReader + BookingWriter + ProviderReader,
{
    let booking = booking_for_provider(booking_id, user, repo)?;
    apply_transition(&booking, BookingAction::Start, repo)
}

/// Provider action: `confirmed`|`in_progress` -> `completed`.
///
/// Completion succeeds even when no payment exists yet; earnings derivation
/// then reports the gap and reconciliation repairs it later. The provider's
/// completed-booking tally is refreshed as part of the same request.
pub fn complete_booking<R>(
    booking_id: BookingId,
    user: &AuthenticatedUser,
    earnings_rate: CommissionRate,
    repo: &R,
) -> ServiceResult<DerivationOutcome>
where
    R: BookingReader
        + BookingWriter
        + ProviderReader
        + ProviderWriter
        + PaymentReader
        + EarningsReader
        + EarningsWriter,
{
    let booking = booking_for_provider(booking_id, user, repo)?;
    apply_transition(&booking, BookingAction::Complete, repo)?;

    let outcome = derive_earnings(&booking, earnings_rate, repo)?;

    if let Err(e) = repo.refresh_provider_aggregates(booking.provider_id) {
        // The aggregates are recomputable; don't fail the completed request.
        log::error!(
            "Failed to refresh aggregates for provider {}: {e}",
            booking.provider_id
        );
    }

    Ok(outcome)
}

/// Customer (owner) or provider action: `pending`|`confirmed` -> `cancelled`.
pub fn cancel_booking<R>(
    booking_id: BookingId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: BookingReader + BookingWriter + ProviderReader,
{
    let booking = match repo.get_booking_by_id(booking_id) {
        Ok(Some(booking)) => booking,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get booking {booking_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if !is_cancel_authorized(&booking, user, repo)? {
        return Err(ServiceError::Unauthorized);
    }

    apply_transition(&booking, BookingAction::Cancel, repo)
}

fn is_cancel_authorized<R>(
    booking: &Booking,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: ProviderReader,
{
    let user_id = match user.user_id() {
        Ok(user_id) => user_id,
        Err(e) => {
            log::error!("Invalid user id in claims: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if booking.user_id == Some(user_id) {
        return Ok(true);
    }

    match repo.get_provider_by_user_id(user_id) {
        Ok(Some(provider)) => Ok(provider.id == booking.provider_id),
        Ok(None) => Ok(false),
        Err(e) => {
            log::error!("Failed to look up provider for user {user_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Bookings for the provider dashboard, with per-status tallies.
pub fn show_provider_bookings<R>(
    user: &AuthenticatedUser,
    status: Option<BookingStatus>,
    repo: &R,
) -> ServiceResult<(BookingStatusCounts, Vec<Booking>)>
where
    R: BookingReader + ProviderReader,
{
    let provider = provider_for_user(user, repo)?;

    let counts = match repo.booking_status_counts(provider.id) {
        Ok(counts) => counts,
        Err(e) => {
            log::error!("Failed to tally bookings for provider {}: {e}", provider.id);
            return Err(ServiceError::Internal);
        }
    };

    let mut query = BookingListQuery::default().provider(provider.id);
    if let Some(status) = status {
        query = query.status(status);
    }

    match repo.list_bookings(query) {
        Ok((_total, bookings)) => Ok((counts, bookings)),
        Err(e) => {
            log::error!("Failed to list bookings for provider {}: {e}", provider.id);
            Err(ServiceError::Internal)
        }
    }
}

/// The signed-in customer's own bookings.
pub fn show_customer_bookings<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<Booking>>
where
    R: BookingReader,
{
    let user_id = match user.user_id() {
        Ok(user_id) => user_id,
        Err(e) => {
            log::error!("Invalid user id in claims: {e}");
            return Err(ServiceError::Internal);
        }
    };

    match repo.list_bookings(BookingListQuery::default().user(user_id)) {
        Ok((_total, bookings)) => Ok(bookings),
        Err(e) => {
            log::error!("Failed to list bookings for user {user_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Loads one booking for its confirmation page; visible to the booking's
/// customer, its provider, or anyone holding a guest booking's identifier.
pub fn show_booking<R>(
    booking_id: BookingId,
    user: Option<&AuthenticatedUser>,
    repo: &R,
) -> ServiceResult<Booking>
where
    R: BookingReader + ProviderReader,
{
    let booking = match repo.get_booking_by_id(booking_id) {
        Ok(Some(booking)) => booking,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get booking {booking_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    match (user, booking.user_id) {
        // Guest bookings are reachable by identifier alone.
        (_, None) => Ok(booking),
        (Some(user), Some(_)) => {
            if is_cancel_authorized(&booking, user, repo)? {
                Ok(booking)
            } else {
                Err(ServiceError::Unauthorized)
            }
        }
        (None, Some(_)) => Err(ServiceError::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PROVIDER_ROLE;
    use crate::domain::payment::Payment;
    use crate::domain::provider::Provider;
    use crate::domain::service::Service;
    use crate::domain::types::{
        ApprovalStatus, BookingCount, BusinessName, CommissionRate, CustomerName, DurationMinutes,
        EmailAddress, Money, PaymentId, PaymentMethod, PaymentStatus, PhoneNumber, PostalAddress,
        PricingType, ProviderId, ReviewCount, ServiceTitle, UserId, VerificationStatus,
    };
    use crate::repository::test::TestRepository;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn epoch() -> NaiveDateTime {
        DateTime::from_timestamp(0, 0).unwrap().naive_utc()
    }

    fn provider_user(sub: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: sub.into(),
            email: "pro@example.com".into(),
            name: "Pro".into(),
            roles: vec![PROVIDER_ROLE.into()],
            exp: i64::MAX,
        }
    }

    fn customer_user(sub: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: sub.into(),
            email: "customer@example.com".into(),
            name: "Customer".into(),
            roles: vec!["customer".into()],
            exp: i64::MAX,
        }
    }

    fn sample_provider(id: i32, user_id: i32) -> Provider {
        Provider {
            id: ProviderId::new(id).unwrap(),
            user_id: UserId::new(user_id).unwrap(),
            business_name: BusinessName::new("Brightpipe Plumbing").unwrap(),
            contact_phone: PhoneNumber::new("555-0102").unwrap(),
            email: EmailAddress::new("pro@example.com").unwrap(),
            address: PostalAddress::new("8 Drain Street").unwrap(),
            city: "Pune".into(),
            experience_years: 4,
            bio: String::new(),
            verification_status: VerificationStatus::Verified,
            verified_at: None,
            average_rating: Decimal::ZERO,
            total_reviews: ReviewCount::new(0).unwrap(),
            total_bookings: BookingCount::new(0).unwrap(),
            is_available: true,
            created_at: epoch(),
            updated_at: epoch(),
        }
    }

    fn sample_service(id: i32, provider_id: i32) -> Service {
        Service {
            id: ServiceId::new(id).unwrap(),
            provider_id: ProviderId::new(provider_id).unwrap(),
            category_id: crate::domain::types::CategoryId::new(1).unwrap(),
            title: ServiceTitle::new("Tap replacement").unwrap(),
            description: String::new(),
            pricing_type: PricingType::Fixed,
            price: Money::new(dec!(800.00)).unwrap(),
            duration_minutes: DurationMinutes::new(60).unwrap(),
            approval_status: ApprovalStatus::Approved,
            rejection_reason: None,
            is_active: true,
            created_at: epoch(),
            updated_at: epoch(),
        }
    }

    fn sample_booking(id: i32, provider_id: i32, status: BookingStatus) -> Booking {
        Booking {
            id: BookingId::new(id).unwrap(),
            service_id: ServiceId::new(1).unwrap(),
            provider_id: ProviderId::new(provider_id).unwrap(),
            user_id: Some(UserId::new(3).unwrap()),
            customer_name: CustomerName::new("Asha").unwrap(),
            customer_email: EmailAddress::new("asha@example.com").unwrap(),
            customer_phone: PhoneNumber::new("555-0100").unwrap(),
            customer_address: PostalAddress::new("12 Canal Road").unwrap(),
            booking_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            booking_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            notes: None,
            is_emergency: false,
            status,
            total_amount: Money::new(dec!(800.00)).unwrap(),
            created_at: epoch(),
            updated_at: epoch(),
            confirmed_at: None,
            completed_at: None,
        }
    }

    fn sample_payment(booking_id: i32, status: PaymentStatus) -> Payment {
        Payment {
            id: PaymentId::new(1).unwrap(),
            booking_id: BookingId::new(booking_id).unwrap(),
            user_id: None,
            amount: Money::new(dec!(800.00)).unwrap(),
            payment_method: PaymentMethod::Card,
            status,
            transaction_id: Some("TXN1".into()),
            platform_commission: CommissionRate::new(dec!(15.00)).unwrap(),
            provider_amount: Money::new(dec!(680.00)).unwrap(),
            created_at: epoch(),
            updated_at: epoch(),
            paid_at: None,
        }
    }

    fn sample_payload() -> CreateBookingFormPayload {
        CreateBookingFormPayload {
            customer_name: CustomerName::new("Asha").unwrap(),
            customer_email: EmailAddress::new("asha@example.com").unwrap(),
            customer_phone: PhoneNumber::new("555-0100").unwrap(),
            customer_address: PostalAddress::new("12 Canal Road").unwrap(),
            booking_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            booking_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            notes: None,
            is_emergency: false,
        }
    }

    fn earnings_rate() -> CommissionRate {
        CommissionRate::new(dec!(10.00)).unwrap()
    }

    #[test]
    fn guest_booking_snapshots_the_service_price() {
        let repo = TestRepository::new()
            .with_providers(vec![sample_provider(1, 7)])
            .with_services(vec![sample_service(1, 1)]);

        let booking =
            create_booking(sample_payload(), ServiceId::new(1).unwrap(), None, &repo).unwrap();

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.total_amount, dec!(800.00));
        assert_eq!(booking.user_id, None);
        assert_eq!(booking.provider_id, 1);
    }

    #[test]
    fn unlisted_services_cannot_be_booked() {
        let mut service = sample_service(1, 1);
        service.is_active = false;
        let repo = TestRepository::new().with_services(vec![service]);

        let err = create_booking(sample_payload(), ServiceId::new(1).unwrap(), None, &repo)
            .unwrap_err();
        assert_eq!(err, ServiceError::NotFound);
    }

    #[test]
    fn providers_cannot_book_their_own_marketplace() {
        let repo = TestRepository::new()
            .with_providers(vec![sample_provider(1, 7)])
            .with_services(vec![sample_service(1, 1)]);

        let err = create_booking(
            sample_payload(),
            ServiceId::new(1).unwrap(),
            Some(&provider_user("7")),
            &repo,
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::Form(_)));
    }

    #[test]
    fn only_the_bookings_provider_may_confirm() {
        let repo = TestRepository::new()
            .with_providers(vec![sample_provider(1, 7), sample_provider(2, 8)])
            .with_bookings(vec![sample_booking(1, 1, BookingStatus::Pending)]);

        let err = confirm_booking(BookingId::new(1).unwrap(), &provider_user("8"), &repo)
            .unwrap_err();
        assert_eq!(err, ServiceError::Unauthorized);

        confirm_booking(BookingId::new(1).unwrap(), &provider_user("7"), &repo).unwrap();
        let booking = &repo.bookings()[0];
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert!(booking.confirmed_at.is_some());
    }

    #[test]
    fn confirming_twice_reports_an_invalid_transition() {
        let repo = TestRepository::new()
            .with_providers(vec![sample_provider(1, 7)])
            .with_bookings(vec![sample_booking(1, 1, BookingStatus::Confirmed)]);

        let err = confirm_booking(BookingId::new(1).unwrap(), &provider_user("7"), &repo)
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));
        // The no-op left the original (absent) confirmation stamp untouched.
        assert_eq!(repo.bookings()[0].confirmed_at, None);
    }

    #[test]
    fn completion_with_a_completed_payment_records_earnings() {
        let repo = TestRepository::new()
            .with_providers(vec![sample_provider(1, 7)])
            .with_bookings(vec![sample_booking(1, 1, BookingStatus::Confirmed)])
            .with_payments(vec![sample_payment(1, PaymentStatus::Completed)]);

        let outcome = complete_booking(
            BookingId::new(1).unwrap(),
            &provider_user("7"),
            earnings_rate(),
            &repo,
        )
        .unwrap();

        match outcome {
            DerivationOutcome::Created(earnings) => {
                assert_eq!(earnings.gross_amount, dec!(800.00));
                assert_eq!(earnings.commission_amount, dec!(80.00));
                assert_eq!(earnings.net_amount, dec!(720.00));
            }
            other => panic!("expected Created, got {other:?}"),
        }

        let booking = &repo.bookings()[0];
        assert_eq!(booking.status, BookingStatus::Completed);
        assert!(booking.completed_at.is_some());
        // The derived aggregate follows the completed bookings.
        assert_eq!(repo.providers()[0].total_bookings, 1);
    }

    #[test]
    fn completion_without_a_payment_still_succeeds() {
        let repo = TestRepository::new()
            .with_providers(vec![sample_provider(1, 7)])
            .with_bookings(vec![sample_booking(1, 1, BookingStatus::InProgress)]);

        let outcome = complete_booking(
            BookingId::new(1).unwrap(),
            &provider_user("7"),
            earnings_rate(),
            &repo,
        )
        .unwrap();

        assert_eq!(outcome, DerivationOutcome::NoPayment);
        assert_eq!(repo.bookings()[0].status, BookingStatus::Completed);
        assert!(repo.earnings().is_empty());
    }

    #[test]
    fn customers_may_cancel_their_own_pending_bookings() {
        let repo = TestRepository::new()
            .with_providers(vec![sample_provider(1, 7)])
            .with_bookings(vec![sample_booking(1, 1, BookingStatus::Pending)]);

        cancel_booking(BookingId::new(1).unwrap(), &customer_user("3"), &repo).unwrap();
        assert_eq!(repo.bookings()[0].status, BookingStatus::Cancelled);
    }

    #[test]
    fn strangers_may_not_cancel() {
        let repo = TestRepository::new()
            .with_providers(vec![sample_provider(1, 7)])
            .with_bookings(vec![sample_booking(1, 1, BookingStatus::Pending)]);

        let err = cancel_booking(BookingId::new(1).unwrap(), &customer_user("99"), &repo)
            .unwrap_err();
        assert_eq!(err, ServiceError::Unauthorized);
    }

    #[test]
    fn completed_bookings_cannot_be_cancelled() {
        let repo = TestRepository::new()
            .with_providers(vec![sample_provider(1, 7)])
            .with_bookings(vec![sample_booking(1, 1, BookingStatus::Completed)]);

        let err = cancel_booking(BookingId::new(1).unwrap(), &customer_user("3"), &repo)
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));
        assert_eq!(repo.bookings()[0].status, BookingStatus::Completed);
    }
}
