//! Payment capture and the explicit provider-amount recomputation.

use chrono::Utc;

use crate::ADMIN_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::commission::compute_split;
use crate::domain::payment::{NewPayment, Payment};
use crate::domain::types::{
    BookingId, CommissionRate, PaymentId, PaymentMethod, PaymentStatus,
};
use crate::repository::errors::RepositoryError;
use crate::repository::{BookingReader, PaymentReader, PaymentWriter};

use super::{ServiceError, ServiceResult};

/// Records the payment for a booking: a captured intent, not a verified
/// charge, so it defaults straight to `completed`.
///
/// One-to-one with the booking; a second capture is rejected. The provider's
/// share is computed immediately from the payment-side commission rate.
pub fn capture_payment<R>(
    booking_id: BookingId,
    method: PaymentMethod,
    rate: CommissionRate,
    repo: &R,
) -> ServiceResult<Payment>
where
    R: BookingReader + PaymentReader + PaymentWriter,
{
    let booking = match repo.get_booking_by_id(booking_id) {
        Ok(Some(booking)) => booking,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get booking {booking_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    match repo.get_payment_by_booking(booking_id) {
        Ok(Some(_)) => {
            return Err(ServiceError::Duplicate(format!(
                "booking {booking_id} already has a payment"
            )));
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("Failed to look up payment for booking {booking_id}: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let split = match compute_split(booking.total_amount, rate) {
        Ok(split) => split,
        Err(e) => {
            log::error!("Failed to split booking {booking_id} amount: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let now = Utc::now().naive_utc();
    let new_payment = NewPayment {
        booking_id,
        user_id: booking.user_id,
        amount: booking.total_amount,
        payment_method: method,
        status: PaymentStatus::Completed,
        transaction_id: Some(format!("TXN{booking_id}")),
        platform_commission: rate,
        provider_amount: split.net_amount,
        created_at: now,
        updated_at: now,
        paid_at: Some(now),
    };

    match repo.create_payment(&new_payment) {
        Ok(payment) => Ok(payment),
        Err(RepositoryError::Duplicate(message)) => Err(ServiceError::Duplicate(message)),
        Err(e) => {
            log::error!("Failed to create payment for booking {booking_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Admin action: capture the payment for a booking that slipped through the
/// storefront flow without one, so earnings can be derived afterwards.
pub fn capture_missing_payment<R>(
    booking_id: BookingId,
    method: PaymentMethod,
    rate: CommissionRate,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Payment>
where
    R: BookingReader + PaymentReader + PaymentWriter,
{
    if !check_role(ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    capture_payment(booking_id, method, rate, repo)
}

/// Admin action: resynchronize `provider_amount` from the payment's stored
/// amount and commission. Never invoked implicitly on save.
pub fn recalculate_provider_amount<R>(
    payment_id: PaymentId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: PaymentReader + PaymentWriter,
{
    if !check_role(ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payment = match repo.get_payment_by_id(payment_id) {
        Ok(Some(payment)) => payment,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get payment {payment_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let split = match compute_split(payment.amount, payment.platform_commission) {
        Ok(split) => split,
        Err(e) => {
            log::error!("Failed to split payment {payment_id} amount: {e}");
            return Err(ServiceError::Internal);
        }
    };

    match repo.update_provider_amount(payment_id, split.net_amount) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to update provider amount for payment {payment_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::Booking;
    use crate::domain::types::{
        BookingStatus, CustomerName, EmailAddress, Money, PhoneNumber, PostalAddress, ProviderId,
        ServiceId,
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

    fn sample_booking(id: i32) -> Booking {
        let epoch = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
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
            status: BookingStatus::Pending,
            total_amount: Money::new(dec!(800.00)).unwrap(),
            created_at: epoch,
            updated_at: epoch,
            confirmed_at: None,
            completed_at: None,
        }
    }

    fn payment_rate() -> CommissionRate {
        CommissionRate::new(dec!(15.00)).unwrap()
    }

    #[test]
    fn capture_splits_the_amount_at_the_payment_rate() {
        let repo = TestRepository::new().with_bookings(vec![sample_booking(1)]);

        let payment = capture_payment(
            BookingId::new(1).unwrap(),
            PaymentMethod::Card,
            payment_rate(),
            &repo,
        )
        .unwrap();

        assert_eq!(payment.amount, dec!(800.00));
        assert_eq!(payment.provider_amount, dec!(680.00));
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.transaction_id.as_deref(), Some("TXN1"));
    }

    #[test]
    fn a_second_capture_is_rejected() {
        let repo = TestRepository::new().with_bookings(vec![sample_booking(1)]);

        capture_payment(
            BookingId::new(1).unwrap(),
            PaymentMethod::Card,
            payment_rate(),
            &repo,
        )
        .unwrap();

        let err = capture_payment(
            BookingId::new(1).unwrap(),
            PaymentMethod::Cash,
            payment_rate(),
            &repo,
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::Duplicate(_)));
        assert_eq!(repo.payments().len(), 1);
    }

    #[test]
    fn recalculation_restores_the_derived_share() {
        let repo = TestRepository::new().with_bookings(vec![sample_booking(1)]);
        let payment = capture_payment(
            BookingId::new(1).unwrap(),
            PaymentMethod::Card,
            payment_rate(),
            &repo,
        )
        .unwrap();

        // Drift the stored share, then resynchronize it.
        repo.update_provider_amount(payment.id, Money::new(dec!(1.00)).unwrap())
            .unwrap();
        recalculate_provider_amount(payment.id, &admin_user(), &repo).unwrap();

        assert_eq!(repo.payments()[0].provider_amount, dec!(680.00));
    }
}
