//! Customer reviews and the provider aggregate refresh they trigger.

use chrono::Utc;

use crate::auth::AuthenticatedUser;
use crate::domain::review::{NewReview, Review};
use crate::domain::types::{BookingId, BookingStatus, ProviderId};
use crate::forms::reviews::AddReviewFormPayload;
use crate::repository::errors::RepositoryError;
use crate::repository::{BookingReader, ProviderWriter, ReviewReader, ReviewWriter};

use super::{ServiceError, ServiceResult};

/// Creates the review for a completed booking and recomputes the provider's
/// rating aggregates in the same request.
pub fn add_review<R>(
    booking_id: BookingId,
    payload: AddReviewFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Review>
where
    R: BookingReader + ReviewWriter + ProviderWriter,
{
    let user_id = match user.user_id() {
        Ok(user_id) => user_id,
        Err(e) => {
            log::error!("Invalid user id in claims: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let booking = match repo.get_booking_by_id(booking_id) {
        Ok(Some(booking)) => booking,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get booking {booking_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if booking.user_id != Some(user_id) {
        return Err(ServiceError::Unauthorized);
    }

    if booking.status != BookingStatus::Completed {
        return Err(ServiceError::Form(
            "Only completed bookings can be reviewed.".to_string(),
        ));
    }

    let now = Utc::now().naive_utc();
    let new_review = NewReview {
        booking_id,
        provider_id: booking.provider_id,
        user_id,
        rating: payload.rating,
        comment: payload.comment,
        created_at: now,
        updated_at: now,
    };

    let review = match repo.create_review(&new_review) {
        Ok(review) => review,
        Err(RepositoryError::Duplicate(message)) => {
            return Err(ServiceError::Duplicate(message));
        }
        Err(e) => {
            log::error!("Failed to create review for booking {booking_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if let Err(e) = repo.refresh_provider_aggregates(booking.provider_id) {
        log::error!(
            "Failed to refresh aggregates for provider {}: {e}",
            booking.provider_id
        );
    }

    Ok(review)
}

/// Public listing of a provider's reviews.
pub fn show_provider_reviews<R>(provider_id: ProviderId, repo: &R) -> ServiceResult<Vec<Review>>
where
    R: ReviewReader,
{
    match repo.list_reviews_by_provider(provider_id) {
        Ok(reviews) => Ok(reviews),
        Err(e) => {
            log::error!("Failed to list reviews for provider {provider_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::Booking;
    use crate::domain::provider::NewProvider;
    use crate::domain::types::{
        BusinessName, CustomerName, EmailAddress, Money, PhoneNumber, PostalAddress, Rating,
        ServiceId, UserId,
    };
    use crate::repository::test::TestRepository;
    use chrono::{DateTime, NaiveDate, NaiveTime};
    use rust_decimal_macros::dec;

    fn customer_user(sub: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: sub.into(),
            email: "asha@example.com".into(),
            name: "Asha".into(),
            roles: vec!["customer".into()],
            exp: i64::MAX,
        }
    }

    fn seeded_repo(status: BookingStatus) -> TestRepository {
        let epoch = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        let repo = TestRepository::new();
        repo.create_provider(&NewProvider {
            user_id: UserId::new(7).unwrap(),
            business_name: BusinessName::new("Brightpipe Plumbing").unwrap(),
            contact_phone: PhoneNumber::new("555-0102").unwrap(),
            email: EmailAddress::new("pro@example.com").unwrap(),
            address: PostalAddress::new("8 Drain Street").unwrap(),
            city: "Pune".into(),
            experience_years: 4,
            bio: String::new(),
            created_at: epoch,
            updated_at: epoch,
        })
        .unwrap();

        repo.with_bookings(vec![Booking {
            id: BookingId::new(1).unwrap(),
            service_id: ServiceId::new(1).unwrap(),
            provider_id: ProviderId::new(1).unwrap(),
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
            created_at: epoch,
            updated_at: epoch,
            confirmed_at: None,
            completed_at: None,
        }])
    }

    fn payload(rating: i32) -> AddReviewFormPayload {
        AddReviewFormPayload {
            rating: Rating::new(rating).unwrap(),
            comment: "Great work".to_string(),
        }
    }

    #[test]
    fn review_refreshes_the_provider_aggregates() {
        let repo = seeded_repo(BookingStatus::Completed);

        add_review(BookingId::new(1).unwrap(), payload(4), &customer_user("3"), &repo).unwrap();

        let provider = &repo.providers()[0];
        assert_eq!(provider.total_reviews, 1);
        assert_eq!(provider.average_rating, dec!(4.00));
    }

    #[test]
    fn only_completed_bookings_can_be_reviewed() {
        let repo = seeded_repo(BookingStatus::Confirmed);

        let err = add_review(BookingId::new(1).unwrap(), payload(4), &customer_user("3"), &repo)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Form(_)));
    }

    #[test]
    fn only_the_booking_customer_may_review() {
        let repo = seeded_repo(BookingStatus::Completed);

        let err = add_review(BookingId::new(1).unwrap(), payload(4), &customer_user("99"), &repo)
            .unwrap_err();
        assert_eq!(err, ServiceError::Unauthorized);
    }

    #[test]
    fn a_second_review_for_one_booking_is_rejected() {
        let repo = seeded_repo(BookingStatus::Completed);

        add_review(BookingId::new(1).unwrap(), payload(5), &customer_user("3"), &repo).unwrap();
        let err = add_review(BookingId::new(1).unwrap(), payload(1), &customer_user("3"), &repo)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Duplicate(_)));
    }
}
