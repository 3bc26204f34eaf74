use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    BookingCount, BusinessName, EmailAddress, PhoneNumber, PostalAddress, ProviderId, Rating,
    ReviewCount, UserId, VerificationStatus,
};

/// Canonical provider record.
///
/// `average_rating`, `total_reviews` and `total_bookings` are derived
/// aggregates; they are recomputed from the child rows and carry no
/// independent source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub user_id: UserId,
    pub business_name: BusinessName,
    pub contact_phone: PhoneNumber,
    pub email: EmailAddress,
    pub address: PostalAddress,
    pub city: String,
    pub experience_years: i32,
    pub bio: String,
    pub verification_status: VerificationStatus,
    pub verified_at: Option<NaiveDateTime>,
    pub average_rating: Decimal,
    pub total_reviews: ReviewCount,
    pub total_bookings: BookingCount,
    pub is_available: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`Provider`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProvider {
    pub user_id: UserId,
    pub business_name: BusinessName,
    pub contact_phone: PhoneNumber,
    pub email: EmailAddress,
    pub address: PostalAddress,
    pub city: String,
    pub experience_years: i32,
    pub bio: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Average of review ratings rounded to 2 dp; zero when there are no reviews.
pub fn rating_average(ratings: &[Rating]) -> Decimal {
    if ratings.is_empty() {
        return Decimal::ZERO;
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(r.get())).sum();
    (Decimal::from(sum) / Decimal::from(ratings.len()))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rating_average_of_no_reviews_is_zero() {
        assert_eq!(rating_average(&[]), Decimal::ZERO);
    }

    #[test]
    fn rating_average_rounds_to_two_places() {
        let ratings = [
            Rating::new(5).unwrap(),
            Rating::new(4).unwrap(),
            Rating::new(4).unwrap(),
        ];
        assert_eq!(rating_average(&ratings), dec!(4.33));
    }
}
