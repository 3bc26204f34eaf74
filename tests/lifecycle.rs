//! End-to-end booking -> payment -> earnings flow against a real SQLite
//! database, exercising the service layer the way the request handlers do.

use chrono::Utc;
use rust_decimal_macros::dec;

use localserve::auth::AuthenticatedUser;
use localserve::domain::category::NewCategory;
use localserve::domain::earnings::NewProviderEarnings;
use localserve::domain::provider::NewProvider;
use localserve::domain::service::NewService;
use localserve::domain::types::{
    ApprovalStatus, BookingStatus, BusinessName, CategoryName, CommissionRate, CustomerName,
    DurationMinutes, EmailAddress, Money, PaymentMethod, PaymentStatus, PayoutStatus, PhoneNumber,
    PostalAddress, PricingType, ServiceTitle, UserId,
};
use localserve::repository::errors::RepositoryError;
use localserve::repository::{
    BookingReader, CategoryReader, CategoryWriter, DieselRepository, EarningsReader,
    EarningsWriter, ProviderReader, ProviderWriter, ServiceReader, ServiceWriter,
};
use localserve::services::ServiceError;
use localserve::services::bookings::{complete_booking, confirm_booking, create_booking};
use localserve::services::earnings::{DerivationOutcome, derive_earnings, reconcile_earnings};
use localserve::services::payments::capture_payment;
use localserve::services::reviews::add_review;
use localserve::forms::bookings::CreateBookingFormPayload;
use localserve::forms::reviews::AddReviewFormPayload;
use localserve::{ADMIN_ROLE, PROVIDER_ROLE};

mod common;

const PROVIDER_USER_ID: i32 = 7;
const CUSTOMER_USER_ID: i32 = 3;

fn provider_user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: PROVIDER_USER_ID.to_string(),
        email: "pro@example.com".into(),
        name: "Pro".into(),
        roles: vec![PROVIDER_ROLE.into()],
        exp: i64::MAX,
    }
}

fn customer_user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: CUSTOMER_USER_ID.to_string(),
        email: "asha@example.com".into(),
        name: "Asha".into(),
        roles: vec!["customer".into()],
        exp: i64::MAX,
    }
}

fn admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "1".into(),
        email: "admin@example.com".into(),
        name: "Admin".into(),
        roles: vec![ADMIN_ROLE.into()],
        exp: i64::MAX,
    }
}

fn payment_rate() -> CommissionRate {
    CommissionRate::new(dec!(15.00)).expect("valid rate")
}

fn earnings_rate() -> CommissionRate {
    CommissionRate::new(dec!(10.00)).expect("valid rate")
}

fn seed_listed_service(repo: &DieselRepository) -> localserve::domain::service::Service {
    let now = Utc::now().naive_utc();

    repo.create_category(&NewCategory {
        name: CategoryName::new("Plumbing").expect("valid name"),
        description: String::new(),
        icon: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    })
    .expect("should create category");
    let category = repo
        .list_categories(true)
        .expect("should list categories")
        .pop()
        .expect("category should exist");

    repo.create_provider(&NewProvider {
        user_id: UserId::new(PROVIDER_USER_ID).expect("valid user id"),
        business_name: BusinessName::new("Brightpipe Plumbing").expect("valid name"),
        contact_phone: PhoneNumber::new("555-0102").expect("valid phone"),
        email: EmailAddress::new("pro@example.com").expect("valid email"),
        address: PostalAddress::new("8 Drain Street").expect("valid address"),
        city: "Pune".into(),
        experience_years: 4,
        bio: String::new(),
        created_at: now,
        updated_at: now,
    })
    .expect("should create provider");
    let provider = repo
        .get_provider_by_user_id(UserId::new(PROVIDER_USER_ID).expect("valid user id"))
        .expect("should look up provider")
        .expect("provider should exist");

    repo.create_service(&NewService {
        provider_id: provider.id,
        category_id: category.id,
        title: ServiceTitle::new("Tap replacement").expect("valid title"),
        description: String::new(),
        pricing_type: PricingType::Fixed,
        price: Money::new(dec!(800.00)).expect("valid price"),
        duration_minutes: DurationMinutes::new(60).expect("valid duration"),
        is_active: true,
        created_at: now,
        updated_at: now,
    })
    .expect("should create service");
    let (_total, services) = repo
        .list_services(Default::default())
        .expect("should list services");
    let service = services.into_iter().next().expect("service should exist");
    repo.set_approval_status(service.id, ApprovalStatus::Approved, None)
        .expect("should approve service");

    repo.get_service_by_id(service.id)
        .expect("should re-read service")
        .expect("service should exist")
}

fn booking_payload() -> CreateBookingFormPayload {
    CreateBookingFormPayload {
        customer_name: CustomerName::new("Asha").expect("valid name"),
        customer_email: EmailAddress::new("asha@example.com").expect("valid email"),
        customer_phone: PhoneNumber::new("555-0100").expect("valid phone"),
        customer_address: PostalAddress::new("12 Canal Road").expect("valid address"),
        booking_date: chrono::NaiveDate::from_ymd_opt(2026, 7, 1).expect("valid date"),
        booking_time: chrono::NaiveTime::from_hms_opt(10, 0, 0).expect("valid time"),
        notes: None,
        is_emergency: false,
    }
}

#[test]
fn full_lifecycle_derives_earnings_with_independent_rates() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let service = seed_listed_service(&repo);

    let customer = customer_user();
    let booking = create_booking(booking_payload(), service.id, Some(&customer), &repo)
        .expect("booking should be created");
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.total_amount, dec!(800.00));

    // Payment capture at the 15% platform commission.
    let payment = capture_payment(booking.id, PaymentMethod::Card, payment_rate(), &repo)
        .expect("payment should be captured");
    assert_eq!(payment.amount, dec!(800.00));
    assert_eq!(payment.provider_amount, dec!(680.00));
    assert_eq!(payment.status, PaymentStatus::Completed);

    // A second capture violates the one-to-one constraint.
    let err = capture_payment(booking.id, PaymentMethod::Cash, payment_rate(), &repo)
        .expect_err("second capture must fail");
    assert!(matches!(err, ServiceError::Duplicate(_)));

    let provider = provider_user();
    confirm_booking(booking.id, &provider, &repo).expect("confirm should succeed");

    // Confirming twice is surfaced as an invalid transition, not a panic,
    // and leaves the original confirmation timestamp untouched.
    let confirmed_at = repo
        .get_booking_by_id(booking.id)
        .expect("should re-read booking")
        .expect("booking should exist")
        .confirmed_at;
    let err = confirm_booking(booking.id, &provider, &repo)
        .expect_err("second confirm must be rejected");
    assert!(matches!(err, ServiceError::InvalidTransition(_)));
    assert_eq!(
        repo.get_booking_by_id(booking.id)
            .expect("should re-read booking")
            .expect("booking should exist")
            .confirmed_at,
        confirmed_at
    );

    // Completion derives earnings at the independent 10% rate: the payment's
    // 15% is not consulted.
    let outcome = complete_booking(booking.id, &provider, earnings_rate(), &repo)
        .expect("complete should succeed");
    let earnings = match outcome {
        DerivationOutcome::Created(earnings) => earnings,
        other => panic!("expected Created, got {other:?}"),
    };
    assert_eq!(earnings.gross_amount, dec!(800.00));
    assert_eq!(earnings.commission_amount, dec!(80.00));
    assert_eq!(earnings.net_amount, dec!(720.00));
    assert_eq!(earnings.payout_status, PayoutStatus::Pending);

    // Derivation is idempotent at the system level.
    let booking = repo
        .get_booking_by_id(booking.id)
        .expect("should re-read booking")
        .expect("booking should exist");
    assert_eq!(booking.status, BookingStatus::Completed);
    assert!(booking.completed_at.is_some());
    assert_eq!(
        derive_earnings(&booking, earnings_rate(), &repo).expect("derivation should run"),
        DerivationOutcome::AlreadyDerived
    );

    // And the unique constraint backs the check even for a direct insert.
    let err = repo
        .create_earnings(&NewProviderEarnings {
            provider_id: earnings.provider_id,
            booking_id: earnings.booking_id,
            payment_id: earnings.payment_id,
            gross_amount: earnings.gross_amount,
            commission_percentage: earnings.commission_percentage,
            commission_amount: earnings.commission_amount,
            net_amount: earnings.net_amount,
            payout_status: PayoutStatus::Pending,
            created_at: Utc::now().naive_utc(),
        })
        .expect_err("duplicate earnings insert must fail");
    assert!(matches!(err, RepositoryError::Duplicate(_)));

    // Completion refreshed the provider aggregates.
    let provider_row = repo
        .get_provider_by_user_id(UserId::new(PROVIDER_USER_ID).expect("valid user id"))
        .expect("should look up provider")
        .expect("provider should exist");
    assert_eq!(provider_row.total_bookings, 1);

    // The customer reviews the completed booking, which feeds the rating.
    add_review(
        booking.id,
        AddReviewFormPayload {
            rating: localserve::domain::types::Rating::new(4).expect("valid rating"),
            comment: "Quick and tidy".into(),
        },
        &customer,
        &repo,
    )
    .expect("review should be created");
    let provider_row = repo
        .get_provider_by_user_id(UserId::new(PROVIDER_USER_ID).expect("valid user id"))
        .expect("should look up provider")
        .expect("provider should exist");
    assert_eq!(provider_row.total_reviews, 1);
    assert_eq!(provider_row.average_rating, dec!(4.00));
}

#[test]
fn completion_without_payment_defers_to_reconciliation() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let service = seed_listed_service(&repo);
    let provider = provider_user();

    let booking = create_booking(booking_payload(), service.id, None, &repo)
        .expect("booking should be created");
    confirm_booking(booking.id, &provider, &repo).expect("confirm should succeed");

    // No payment was captured: completion still succeeds, earnings stay absent.
    let outcome = complete_booking(booking.id, &provider, earnings_rate(), &repo)
        .expect("complete should succeed");
    assert_eq!(outcome, DerivationOutcome::NoPayment);
    assert_eq!(
        repo.get_booking_by_id(booking.id)
            .expect("should re-read booking")
            .expect("booking should exist")
            .status,
        BookingStatus::Completed
    );
    assert!(
        repo.get_earnings_by_booking(booking.id)
            .expect("should look up earnings")
            .is_none()
    );

    // A reconciliation sweep reports the gap without inventing a payment.
    let summary = reconcile_earnings(&admin_user(), earnings_rate(), &repo)
        .expect("reconciliation should run");
    assert_eq!(summary.created, 0);
    assert_eq!(summary.missing_payment, 1);

    // Once the payment lands, the next sweep backfills the earnings row.
    capture_payment(booking.id, PaymentMethod::Cash, payment_rate(), &repo)
        .expect("payment should be captured");
    let summary = reconcile_earnings(&admin_user(), earnings_rate(), &repo)
        .expect("reconciliation should run");
    assert_eq!(summary.created, 1);
    assert_eq!(summary.missing_payment, 0);

    let earnings = repo
        .get_earnings_by_booking(booking.id)
        .expect("should look up earnings")
        .expect("earnings should exist");
    assert_eq!(earnings.net_amount, dec!(720.00));

    // Re-running the sweep is a no-op.
    let summary = reconcile_earnings(&admin_user(), earnings_rate(), &repo)
        .expect("reconciliation should run");
    assert_eq!(summary.created, 0);
    assert_eq!(summary.already_present, 1);
}
