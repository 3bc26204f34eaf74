//! Booking entity and its lifecycle state machine.
//!
//! Transition legality is encoded as a closed (state, action, state) table so
//! that illegal moves are rejected structurally instead of by ad-hoc string
//! comparisons scattered over request handlers.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

use crate::domain::types::{
    BookingId, BookingStatus, CustomerName, EmailAddress, Money, PhoneNumber, PostalAddress,
    ProviderId, ServiceId, UserId,
};

/// Actions that drive a booking through its lifecycle.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BookingAction {
    Confirm,
    Start,
    Complete,
    Cancel,
}

impl BookingAction {
    /// String representation used in messages and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Cancel => "cancel",
        }
    }
}

impl Display for BookingAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attempted status change violates the booking state machine.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cannot {action} a booking in status '{from}'")]
pub struct InvalidTransition {
    pub from: BookingStatus,
    pub action: BookingAction,
}

/// The complete legal transition table: (from, action) -> to.
const TRANSITIONS: &[(BookingStatus, BookingAction, BookingStatus)] = &[
    (
        BookingStatus::Pending,
        BookingAction::Confirm,
        BookingStatus::Confirmed,
    ),
    (
        BookingStatus::Confirmed,
        BookingAction::Start,
        BookingStatus::InProgress,
    ),
    (
        BookingStatus::Confirmed,
        BookingAction::Complete,
        BookingStatus::Completed,
    ),
    (
        BookingStatus::InProgress,
        BookingAction::Complete,
        BookingStatus::Completed,
    ),
    (
        BookingStatus::Pending,
        BookingAction::Cancel,
        BookingStatus::Cancelled,
    ),
    (
        BookingStatus::Confirmed,
        BookingAction::Cancel,
        BookingStatus::Cancelled,
    ),
];

impl BookingStatus {
    /// Resolves the target state for `action`, rejecting illegal moves.
    pub fn apply(self, action: BookingAction) -> Result<BookingStatus, InvalidTransition> {
        TRANSITIONS
            .iter()
            .find(|(from, a, _)| *from == self && *a == action)
            .map(|(_, _, to)| *to)
            .ok_or(InvalidTransition { from: self, action })
    }

    /// All states from which `action` is legal. Used by the repository to
    /// build the optimistic status guard on the update statement.
    pub fn sources(action: BookingAction) -> Vec<BookingStatus> {
        TRANSITIONS
            .iter()
            .filter(|(_, a, _)| *a == action)
            .map(|(from, _, _)| *from)
            .collect()
    }

    /// Target state shared by every legal occurrence of `action`.
    pub fn target(action: BookingAction) -> BookingStatus {
        match action {
            BookingAction::Confirm => BookingStatus::Confirmed,
            BookingAction::Start => BookingStatus::InProgress,
            BookingAction::Complete => BookingStatus::Completed,
            BookingAction::Cancel => BookingStatus::Cancelled,
        }
    }

    /// Terminal states admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

/// Canonical booking record.
///
/// Customer contact fields are snapshots captured at booking time; they are
/// owned by the booking and never follow later profile edits. `total_amount`
/// is the service price at creation and is immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub service_id: ServiceId,
    pub provider_id: ProviderId,
    pub user_id: Option<UserId>,
    pub customer_name: CustomerName,
    pub customer_email: EmailAddress,
    pub customer_phone: PhoneNumber,
    pub customer_address: PostalAddress,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub notes: Option<String>,
    pub is_emergency: bool,
    pub status: BookingStatus,
    pub total_amount: Money,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub confirmed_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
}

/// Data required to insert a new [`Booking`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewBooking {
    pub service_id: ServiceId,
    pub provider_id: ProviderId,
    pub user_id: Option<UserId>,
    pub customer_name: CustomerName,
    pub customer_email: EmailAddress,
    pub customer_phone: PhoneNumber,
    pub customer_address: PostalAddress,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub notes: Option<String>,
    pub is_emergency: bool,
    pub total_amount: Money,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_confirms_to_confirmed() {
        assert_eq!(
            BookingStatus::Pending.apply(BookingAction::Confirm).unwrap(),
            BookingStatus::Confirmed
        );
    }

    #[test]
    fn complete_is_legal_from_confirmed_and_in_progress() {
        assert_eq!(
            BookingStatus::Confirmed
                .apply(BookingAction::Complete)
                .unwrap(),
            BookingStatus::Completed
        );
        assert_eq!(
            BookingStatus::InProgress
                .apply(BookingAction::Complete)
                .unwrap(),
            BookingStatus::Completed
        );
    }

    #[test]
    fn confirming_twice_is_rejected() {
        let err = BookingStatus::Confirmed
            .apply(BookingAction::Confirm)
            .unwrap_err();
        assert_eq!(err.from, BookingStatus::Confirmed);
        assert_eq!(err.action, BookingAction::Confirm);
    }

    #[test]
    fn terminal_states_admit_no_transitions() {
        for terminal in [BookingStatus::Completed, BookingStatus::Cancelled] {
            assert!(terminal.is_terminal());
            for action in [
                BookingAction::Confirm,
                BookingAction::Start,
                BookingAction::Complete,
                BookingAction::Cancel,
            ] {
                assert!(terminal.apply(action).is_err());
            }
        }
    }

    #[test]
    fn in_progress_cannot_be_cancelled() {
        assert!(
            BookingStatus::InProgress
                .apply(BookingAction::Cancel)
                .is_err()
        );
    }

    #[test]
    fn sources_match_the_transition_table() {
        let sources = BookingStatus::sources(BookingAction::Complete);
        assert_eq!(
            sources,
            vec![BookingStatus::Confirmed, BookingStatus::InProgress]
        );
        assert_eq!(
            BookingStatus::target(BookingAction::Complete),
            BookingStatus::Completed
        );
    }
}
