//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so that
//! identifiers, text values and monetary constraints are enforced at the
//! boundary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A monetary value was negative.
    #[error("{0} must be zero or greater")]
    NegativeAmount(&'static str),
    /// A numeric value required to be non-negative was negative.
    #[error("{0} must be zero or greater")]
    NegativeNumber(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// Email validation failed.
    #[error("{0} must be a valid email address")]
    InvalidEmail(&'static str),
    /// Commission percentage must be in [0, 100].
    #[error("commission percentage must be between 0 and 100")]
    InvalidCommissionRate,
    /// Review rating must be in [1, 5].
    #[error("rating must be between 1 and 5")]
    InvalidRating,
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        Self::new_for_field(value, "value")
    }

    /// Same as [`Self::new`] but with field-specific error context.
    pub fn new_for_field<S: Into<String>>(
        value: S,
        field: &'static str,
    ) -> Result<Self, TypeConstraintError> {
        trim_and_require_non_empty(value, field).map(Self)
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for NonEmptyString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NonEmptyString {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new_for_field(value, $field)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.as_str()
            }
        }
    };
}

macro_rules! non_negative_i32_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Constructs a value that must be zero or greater.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value >= 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NegativeNumber($field))
                }
            }

            /// Returns the raw `i32` value.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

/// Macro to generate closed string-backed status enumerations.
///
/// Persistence stores the lowercase string form; parsing rejects anything
/// outside the closed set.
macro_rules! status_enum {
    ($name:ident, $doc:expr, $label:expr, { $($variant:ident => $text:expr),+ $(,)? }) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// String representation used in persistence.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                match value.trim() {
                    $($text => Ok(Self::$variant),)+
                    other => Err(TypeConstraintError::InvalidValue(format!(
                        "{}: {}",
                        $label, other
                    ))),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::try_from(value.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }
    };
}

id_newtype!(UserId, "Unique identifier for a user account.", "user_id");
id_newtype!(
    CategoryId,
    "Unique identifier for a service category.",
    "category_id"
);
id_newtype!(
    ProviderId,
    "Unique identifier for a service provider.",
    "provider_id"
);
id_newtype!(ServiceId, "Unique identifier for a service.", "service_id");
id_newtype!(BookingId, "Unique identifier for a booking.", "booking_id");
id_newtype!(PaymentId, "Unique identifier for a payment.", "payment_id");
id_newtype!(
    EarningsId,
    "Unique identifier for an earnings record.",
    "earnings_id"
);
id_newtype!(ReviewId, "Unique identifier for a review.", "review_id");

non_empty_string_newtype!(
    CategoryName,
    "Category display name enforcing non-empty values.",
    "category name"
);
non_empty_string_newtype!(
    BusinessName,
    "Provider business name enforcing non-empty values.",
    "business name"
);
non_empty_string_newtype!(
    ServiceTitle,
    "Service title enforcing non-empty values.",
    "service title"
);
non_empty_string_newtype!(
    CustomerName,
    "Customer display name enforcing non-empty values.",
    "customer name"
);
non_empty_string_newtype!(
    PhoneNumber,
    "Contact phone number enforcing non-empty values.",
    "phone number"
);
non_empty_string_newtype!(
    PostalAddress,
    "Postal address enforcing non-empty values.",
    "address"
);

non_negative_i32_newtype!(
    ReviewCount,
    "Number of reviews recorded against a provider.",
    "review count"
);
non_negative_i32_newtype!(
    BookingCount,
    "Number of completed bookings recorded against a provider.",
    "booking count"
);
non_negative_i32_newtype!(
    DurationMinutes,
    "Estimated service duration in minutes.",
    "duration"
);

/// Validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Constructs a trimmed email address and validates its format.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "email")?;
        if !trimmed.as_str().validate_email() {
            return Err(TypeConstraintError::InvalidEmail("email"));
        }
        Ok(Self(trimmed))
    }

    /// Borrow the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the owned address.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for EmailAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for EmailAddress {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Non-negative monetary amount in standard currency units.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Constructs a monetary amount that must be zero or greater.
    pub fn new(value: Decimal) -> Result<Self, TypeConstraintError> {
        if value.is_sign_negative() && !value.is_zero() {
            Err(TypeConstraintError::NegativeAmount("amount"))
        } else {
            Ok(Self(value))
        }
    }

    /// Returns the raw [`Decimal`] value.
    pub const fn get(self) -> Decimal {
        self.0
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = TypeConstraintError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl PartialEq<Decimal> for Money {
    fn eq(&self, other: &Decimal) -> bool {
        self.0 == *other
    }
}

impl PartialEq<Money> for Decimal {
    fn eq(&self, other: &Money) -> bool {
        *self == other.0
    }
}

/// Platform commission percentage in the inclusive range [0, 100].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CommissionRate(Decimal);

impl CommissionRate {
    /// Constructs a validated commission percentage.
    pub fn new(value: Decimal) -> Result<Self, TypeConstraintError> {
        if value >= Decimal::ZERO && value <= Decimal::ONE_HUNDRED {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::InvalidCommissionRate)
        }
    }

    /// Returns the raw percentage value.
    pub const fn get(self) -> Decimal {
        self.0
    }
}

impl Display for CommissionRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for CommissionRate {
    type Error = TypeConstraintError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CommissionRate> for Decimal {
    fn from(value: CommissionRate) -> Self {
        value.0
    }
}

/// Customer review rating in the inclusive range [1, 5].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Rating(i32);

impl Rating {
    /// Constructs a validated rating.
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::InvalidRating)
        }
    }

    /// Returns the raw `i32` value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for Rating {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for i32 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

status_enum!(
    VerificationStatus,
    "Verification state of a provider profile.",
    "verification status",
    {
        Pending => "pending",
        Verified => "verified",
        Rejected => "rejected",
    }
);

status_enum!(
    PricingType,
    "How a service price is quoted.",
    "pricing type",
    {
        Fixed => "fixed",
        Hourly => "hourly",
        Negotiable => "negotiable",
    }
);

status_enum!(
    ApprovalStatus,
    "Admin approval state of a listed service.",
    "approval status",
    {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
);

status_enum!(
    BookingStatus,
    "Lifecycle state of a booking.",
    "booking status",
    {
        Pending => "pending",
        Confirmed => "confirmed",
        InProgress => "in_progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
);

status_enum!(
    PaymentStatus,
    "Settlement state of a payment record.",
    "payment status",
    {
        Pending => "pending",
        Processing => "processing",
        Completed => "completed",
        Failed => "failed",
        Refunded => "refunded",
    }
);

status_enum!(
    PaymentMethod,
    "Payment instrument recorded on capture.",
    "payment method",
    {
        Card => "card",
        Upi => "upi",
        Netbanking => "netbanking",
        Wallet => "wallet",
        Cash => "cash",
    }
);

status_enum!(
    PayoutStatus,
    "Administrative disbursement state of an earnings record.",
    "payout status",
    {
        Pending => "pending",
        Processing => "processing",
        Paid => "paid",
        Hold => "hold",
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn trims_non_empty_strings() {
        let value = NonEmptyString::new("  plumbing  ").unwrap();
        assert_eq!(value.as_str(), "plumbing");
    }

    #[test]
    fn rejects_non_positive_ids() {
        let err = BookingId::new(0).unwrap_err();
        assert_eq!(err, TypeConstraintError::NonPositiveId("booking_id"));
    }

    #[test]
    fn validates_email_addresses() {
        assert!(EmailAddress::new("user@example.com").is_ok());
        let err = EmailAddress::new("not-an-email").unwrap_err();
        assert_eq!(err, TypeConstraintError::InvalidEmail("email"));
    }

    #[test]
    fn money_allows_zero() {
        assert_eq!(Money::new(Decimal::ZERO).unwrap().get(), Decimal::ZERO);
    }

    #[test]
    fn money_rejects_negative_amounts() {
        assert_eq!(
            Money::new(dec!(-0.01)).unwrap_err(),
            TypeConstraintError::NegativeAmount("amount")
        );
    }

    #[test]
    fn commission_rate_bounds_are_inclusive() {
        assert!(CommissionRate::new(Decimal::ZERO).is_ok());
        assert!(CommissionRate::new(Decimal::ONE_HUNDRED).is_ok());
        assert_eq!(
            CommissionRate::new(dec!(100.01)).unwrap_err(),
            TypeConstraintError::InvalidCommissionRate
        );
    }

    #[test]
    fn rating_rejects_out_of_range_values() {
        assert!(Rating::new(1).is_ok());
        assert!(Rating::new(5).is_ok());
        assert_eq!(Rating::new(6).unwrap_err(), TypeConstraintError::InvalidRating);
    }

    #[test]
    fn status_enums_round_trip_through_strings() {
        assert_eq!(PaymentStatus::Completed.as_str(), "completed");
        assert_eq!(
            PayoutStatus::try_from("hold").unwrap(),
            PayoutStatus::Hold
        );
        assert!(VerificationStatus::try_from("unknown").is_err());
    }
}
