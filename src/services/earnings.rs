//! Earnings derivation and reconciliation.
//!
//! Derivation runs synchronously inside the "complete booking" request; the
//! reconciliation operation exists because payments routinely arrive late and
//! completed bookings drift out of sync with their earnings rows.

use chrono::Utc;
use rust_decimal::Decimal;

use crate::ADMIN_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::booking::Booking;
use crate::domain::commission::compute_split;
use crate::domain::earnings::{NewProviderEarnings, ProviderEarnings};
use crate::domain::types::{
    BookingStatus, CommissionRate, EarningsId, PaymentStatus, PayoutStatus,
};
use crate::repository::errors::RepositoryError;
use crate::repository::{
    BookingListQuery, BookingReader, EarningsReader, EarningsWriter, PaymentReader, ProviderReader,
};
use crate::services::providers::provider_for_user;

use super::{ServiceError, ServiceResult};

/// What happened when earnings derivation was attempted for a booking.
#[derive(Debug, Clone, PartialEq)]
pub enum DerivationOutcome {
    /// A new earnings row was recorded.
    Created(ProviderEarnings),
    /// The booking already has an earnings row; nothing was written.
    AlreadyDerived,
    /// No payment has been captured for the booking yet.
    NoPayment,
    /// A payment exists but has not completed.
    PaymentNotCompleted,
}

/// Derives the provider payout for one booking, if its preconditions hold.
///
/// Never creates a second earnings row: the existence check short-circuits
/// and the unique constraints turn a racing insert into `AlreadyDerived`.
pub fn derive_earnings<R>(
    booking: &Booking,
    rate: CommissionRate,
    repo: &R,
) -> ServiceResult<DerivationOutcome>
where
    R: PaymentReader + EarningsReader + EarningsWriter,
{
    let payment = match repo.get_payment_by_booking(booking.id) {
        Ok(Some(payment)) => payment,
        Ok(None) => return Ok(DerivationOutcome::NoPayment),
        Err(e) => {
            log::error!("Failed to look up payment for booking {}: {e}", booking.id);
            return Err(ServiceError::Internal);
        }
    };

    if payment.status != PaymentStatus::Completed {
        return Ok(DerivationOutcome::PaymentNotCompleted);
    }

    match repo.get_earnings_by_booking(booking.id) {
        Ok(Some(_)) => return Ok(DerivationOutcome::AlreadyDerived),
        Ok(None) => {}
        Err(e) => {
            log::error!("Failed to look up earnings for booking {}: {e}", booking.id);
            return Err(ServiceError::Internal);
        }
    }

    let split = match compute_split(payment.amount, rate) {
        Ok(split) => split,
        Err(e) => {
            log::error!("Failed to split payment {} amount: {e}", payment.id);
            return Err(ServiceError::Internal);
        }
    };

    let now = Utc::now().naive_utc();
    let new_earnings = NewProviderEarnings {
        provider_id: booking.provider_id,
        booking_id: booking.id,
        payment_id: payment.id,
        gross_amount: split.gross_amount,
        commission_percentage: rate,
        commission_amount: split.commission_amount,
        net_amount: split.net_amount,
        payout_status: PayoutStatus::Pending,
        created_at: now,
    };

    match repo.create_earnings(&new_earnings) {
        Ok(earnings) => Ok(DerivationOutcome::Created(earnings)),
        // A concurrent derivation won the insert; treat ours as a no-op.
        Err(RepositoryError::Duplicate(_)) => Ok(DerivationOutcome::AlreadyDerived),
        Err(e) => {
            log::error!("Failed to create earnings for booking {}: {e}", booking.id);
            Err(ServiceError::Internal)
        }
    }
}

/// Tallies produced by one reconciliation sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ReconciliationSummary {
    pub created: usize,
    pub already_present: usize,
    pub missing_payment: usize,
    pub payment_not_completed: usize,
}

/// Sweeps all completed bookings and backfills any earnings rows whose
/// derivation preconditions hold. Admin-only; idempotent and safe to re-run.
pub fn reconcile_earnings<R>(
    user: &AuthenticatedUser,
    rate: CommissionRate,
    repo: &R,
) -> ServiceResult<ReconciliationSummary>
where
    R: BookingReader + PaymentReader + EarningsReader + EarningsWriter,
{
    if !check_role(ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let (_total, completed) = match repo
        .list_bookings(BookingListQuery::default().status(BookingStatus::Completed))
    {
        Ok(result) => result,
        Err(e) => {
            log::error!("Failed to list completed bookings: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let mut summary = ReconciliationSummary::default();
    for booking in &completed {
        match derive_earnings(booking, rate, repo)? {
            DerivationOutcome::Created(_) => summary.created += 1,
            DerivationOutcome::AlreadyDerived => summary.already_present += 1,
            DerivationOutcome::NoPayment => summary.missing_payment += 1,
            DerivationOutcome::PaymentNotCompleted => summary.payment_not_completed += 1,
        }
    }

    Ok(summary)
}

/// Earnings rows plus payout totals for the provider dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct EarningsOverview {
    pub items: Vec<ProviderEarnings>,
    pub pending_total: Decimal,
    pub paid_total: Decimal,
}

/// Lists the signed-in provider's earnings with pending/paid totals.
pub fn show_provider_earnings<R>(
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<EarningsOverview>
where
    R: ProviderReader + EarningsReader,
{
    let provider = provider_for_user(user, repo)?;

    let items = match repo.list_earnings_by_provider(provider.id) {
        Ok(items) => items,
        Err(e) => {
            log::error!("Failed to list earnings for provider {}: {e}", provider.id);
            return Err(ServiceError::Internal);
        }
    };

    let mut pending_total = Decimal::ZERO;
    let mut paid_total = Decimal::ZERO;
    for earnings in &items {
        match earnings.payout_status {
            PayoutStatus::Pending => pending_total += earnings.net_amount.get(),
            PayoutStatus::Paid => paid_total += earnings.net_amount.get(),
            PayoutStatus::Processing | PayoutStatus::Hold => {}
        }
    }

    Ok(EarningsOverview {
        items,
        pending_total,
        paid_total,
    })
}

/// Administrative payout status update; no business rules beyond existence.
pub fn set_payout_status<R>(
    earnings_id: EarningsId,
    status: PayoutStatus,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: EarningsWriter,
{
    if !check_role(ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    match repo.set_payout_status(earnings_id, status) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to update payout status for earnings {earnings_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::Payment;
    use crate::domain::types::{
        BookingId, CustomerName, EmailAddress, Money, PaymentId, PaymentMethod, PhoneNumber,
        PostalAddress, ProviderId, ServiceId,
    };
    use crate::repository::test::TestRepository;
    use chrono::{DateTime, NaiveDate, NaiveTime};
    use rust_decimal_macros::dec;

    fn admin_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "9".into(),
            email: "admin@example.com".into(),
            name: "Admin".into(),
            roles: vec![ADMIN_ROLE.into()],
            exp: i64::MAX,
        }
    }

    fn epoch() -> chrono::NaiveDateTime {
        DateTime::from_timestamp(0, 0).unwrap().naive_utc()
    }

    fn sample_booking(id: i32, status: BookingStatus) -> Booking {
        Booking {
            id: BookingId::new(id).unwrap(),
            service_id: ServiceId::new(1).unwrap(),
            provider_id: ProviderId::new(1).unwrap(),
            user_id: None,
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

    fn earnings_rate() -> CommissionRate {
        CommissionRate::new(dec!(10.00)).unwrap()
    }

    #[test]
    fn derives_earnings_at_the_independent_rate() {
        let booking = sample_booking(1, BookingStatus::Completed);
        let repo = TestRepository::new()
            .with_payments(vec![sample_payment(1, PaymentStatus::Completed)]);

        let outcome = derive_earnings(&booking, earnings_rate(), &repo).unwrap();

        // The payment carried 15% but earnings use their own 10% rate.
        match outcome {
            DerivationOutcome::Created(earnings) => {
                assert_eq!(earnings.gross_amount, dec!(800.00));
                assert_eq!(earnings.commission_amount, dec!(80.00));
                assert_eq!(earnings.net_amount, dec!(720.00));
                assert_eq!(earnings.payout_status, PayoutStatus::Pending);
            }
            other => panic!("expected Created, got {other:?}"),
        }
    }

    #[test]
    fn skips_derivation_without_a_payment() {
        let booking = sample_booking(1, BookingStatus::Completed);
        let repo = TestRepository::new();

        let outcome = derive_earnings(&booking, earnings_rate(), &repo).unwrap();
        assert_eq!(outcome, DerivationOutcome::NoPayment);
        assert!(repo.earnings().is_empty());
    }

    #[test]
    fn skips_derivation_when_payment_is_not_completed() {
        let booking = sample_booking(1, BookingStatus::Completed);
        let repo =
            TestRepository::new().with_payments(vec![sample_payment(1, PaymentStatus::Pending)]);

        let outcome = derive_earnings(&booking, earnings_rate(), &repo).unwrap();
        assert_eq!(outcome, DerivationOutcome::PaymentNotCompleted);
    }

    #[test]
    fn second_derivation_is_a_rejected_no_op() {
        let booking = sample_booking(1, BookingStatus::Completed);
        let repo = TestRepository::new()
            .with_payments(vec![sample_payment(1, PaymentStatus::Completed)]);

        assert!(matches!(
            derive_earnings(&booking, earnings_rate(), &repo).unwrap(),
            DerivationOutcome::Created(_)
        ));
        assert_eq!(
            derive_earnings(&booking, earnings_rate(), &repo).unwrap(),
            DerivationOutcome::AlreadyDerived
        );
        assert_eq!(repo.earnings().len(), 1);
    }

    #[test]
    fn reconciliation_backfills_only_the_missing_rows() {
        // Booking 1 is paid but has no earnings; booking 2 has no payment.
        let repo = TestRepository::new()
            .with_bookings(vec![
                sample_booking(1, BookingStatus::Completed),
                sample_booking(2, BookingStatus::Completed),
            ])
            .with_payments(vec![sample_payment(1, PaymentStatus::Completed)]);

        let summary = reconcile_earnings(&admin_user(), earnings_rate(), &repo).unwrap();
        assert_eq!(summary.created, 1);
        assert_eq!(summary.missing_payment, 1);
        assert_eq!(repo.earnings().len(), 1);

        // Running the sweep again changes nothing.
        let summary = reconcile_earnings(&admin_user(), earnings_rate(), &repo).unwrap();
        assert_eq!(summary.created, 0);
        assert_eq!(summary.already_present, 1);
        assert_eq!(repo.earnings().len(), 1);
    }

    #[test]
    fn reconciliation_requires_the_admin_role() {
        let mut user = admin_user();
        user.roles = vec!["provider".into()];
        let repo = TestRepository::new();

        let err = reconcile_earnings(&user, earnings_rate(), &repo).unwrap_err();
        assert_eq!(err, ServiceError::Unauthorized);
    }
}
