//! Integration tests for slot claims, cancellation, quota and the
//! availability / reservation-type deletion guards.

use assert_matches::assert_matches;
use chrono::{NaiveDate, TimeZone, Utc};
use mentora_core::error::CoreError;
use mentora_core::types::{DbId, Timestamp};
use mentora_db::models::booking::NewBooking;
use mentora_db::models::reservation_type::CreateReservationType;
use mentora_db::models::user::CreateUser;
use mentora_db::repositories::{
    AvailabilityRepo, BookingRepo, ReservationTypeRepo, SettingRepo, UserRepo,
};
use mentora_db::RepoError;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn student(pool: &PgPool, name: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            role: "student".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn at(day: u32, hour: u32, minute: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2025, 6, day, hour, minute, 0).unwrap()
}

/// A "now" before every slot used here, so all bookings count as upcoming.
fn early_now() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
}

fn request(user_id: DbId, date_time: Timestamp) -> NewBooking {
    NewBooking {
        user_id,
        date_time,
        reservation_type_id: None,
    }
}

async fn claim(pool: &PgPool, user_id: DbId, date_time: Timestamp) -> Result<DbId, RepoError> {
    BookingRepo::claim_slot(pool, &request(user_id, date_time), early_now())
        .await
        .map(|b| b.id)
}

// ---------------------------------------------------------------------------
// Overlap
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn overlapping_claim_is_rejected_and_adjacent_accepted(pool: PgPool) {
    let ada = student(&pool, "Ada").await;

    let first = claim(&pool, ada, at(10, 9, 0)).await.unwrap();
    assert_matches!(
        claim(&pool, ada, at(10, 9, 30)).await,
        Err(RepoError::Domain(CoreError::SlotConflict))
    );
    claim(&pool, ada, at(10, 10, 0)).await.unwrap();

    let cancelled = BookingRepo::cancel(&pool, first).await.unwrap().unwrap();
    assert!(cancelled.was_booked);
    assert_eq!(cancelled.booking.status, "cancelled");

    claim(&pool, ada, at(10, 9, 0)).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn containing_claim_is_rejected(pool: PgPool) {
    let ada = student(&pool, "Ada").await;
    let long = ReservationTypeRepo::create(
        &pool,
        &CreateReservationType {
            name: "Workshop".to_string(),
            duration_minutes: 180,
            description: None,
        },
    )
    .await
    .unwrap();

    claim(&pool, ada, at(10, 10, 0)).await.unwrap();

    let result = BookingRepo::claim_slot(
        &pool,
        &NewBooking {
            user_id: ada,
            date_time: at(10, 9, 0),
            reservation_type_id: Some(long.id),
        },
        early_now(),
    )
    .await;
    assert_matches!(result, Err(RepoError::Domain(CoreError::SlotConflict)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reservation_type_sets_end_time(pool: PgPool) {
    let ada = student(&pool, "Ada").await;
    let short = ReservationTypeRepo::create(
        &pool,
        &CreateReservationType {
            name: "Quick check".to_string(),
            duration_minutes: 30,
            description: Some("Short consultation".to_string()),
        },
    )
    .await
    .unwrap();

    let booking = BookingRepo::claim_slot(
        &pool,
        &NewBooking {
            user_id: ada,
            date_time: at(10, 9, 0),
            reservation_type_id: Some(short.id),
        },
        early_now(),
    )
    .await
    .unwrap();

    assert_eq!(booking.end_time, at(10, 9, 30));
    assert_eq!(booking.status, "booked");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_reservation_type_is_not_found(pool: PgPool) {
    let ada = student(&pool, "Ada").await;
    let result = BookingRepo::claim_slot(
        &pool,
        &NewBooking {
            user_id: ada,
            date_time: at(10, 9, 0),
            reservation_type_id: Some(9999),
        },
        early_now(),
    )
    .await;
    assert_matches!(
        result,
        Err(RepoError::Domain(CoreError::NotFound {
            entity: "ReservationType",
            ..
        }))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_claims_for_same_slot_admit_exactly_one(pool: PgPool) {
    let ada = student(&pool, "Ada").await;
    let bob = student(&pool, "Bob").await;

    let (a, b) = tokio::join!(claim(&pool, ada, at(12, 14, 0)), claim(&pool, bob, at(12, 14, 30)));

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one overlapping claim must commit");
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancel_is_idempotent(pool: PgPool) {
    let ada = student(&pool, "Ada").await;
    let id = claim(&pool, ada, at(10, 9, 0)).await.unwrap();

    assert!(BookingRepo::cancel(&pool, id).await.unwrap().unwrap().was_booked);
    let again = BookingRepo::cancel(&pool, id).await.unwrap().unwrap();
    assert!(!again.was_booked);
    assert_eq!(again.booking.status, "cancelled");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancel_unknown_booking_returns_none(pool: PgPool) {
    assert!(BookingRepo::cancel(&pool, 424242).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Quota
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn quota_of_one_blocks_second_booking_until_cancel(pool: PgPool) {
    let ada = student(&pool, "Ada").await;
    SettingRepo::set_max_bookings_per_user(&pool, 1).await.unwrap();

    let a = claim(&pool, ada, at(10, 9, 0)).await.unwrap();
    assert_matches!(
        claim(&pool, ada, at(11, 9, 0)).await,
        Err(RepoError::Domain(CoreError::QuotaExceeded { limit: 1 }))
    );

    BookingRepo::cancel(&pool, a).await.unwrap();
    claim(&pool, ada, at(11, 9, 0)).await.unwrap();
    assert_eq!(
        BookingRepo::count_active_for_user(&pool, ada, early_now())
            .await
            .unwrap(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn past_bookings_do_not_count_toward_quota(pool: PgPool) {
    let ada = student(&pool, "Ada").await;
    SettingRepo::set_max_bookings_per_user(&pool, 1).await.unwrap();

    claim(&pool, ada, at(10, 9, 0)).await.unwrap();

    // Evaluated from a "now" after the first booking started.
    let later = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
    BookingRepo::claim_slot(&pool, &request(ada, at(11, 9, 0)), later)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn start_before_now_is_rejected(pool: PgPool) {
    let ada = student(&pool, "Ada").await;
    let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();

    let result = BookingRepo::claim_slot(&pool, &request(ada, at(10, 9, 0)), now).await;
    assert_matches!(result, Err(RepoError::Domain(CoreError::Validation(_))));
    assert!(BookingRepo::list_details(&pool, Some(ada))
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn quota_is_per_user(pool: PgPool) {
    let ada = student(&pool, "Ada").await;
    let bob = student(&pool, "Bob").await;
    SettingRepo::set_max_bookings_per_user(&pool, 1).await.unwrap();

    claim(&pool, ada, at(10, 9, 0)).await.unwrap();
    claim(&pool, bob, at(10, 11, 0)).await.unwrap();
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_details_is_scoped_and_embeds_user(pool: PgPool) {
    let ada = student(&pool, "Ada").await;
    let bob = student(&pool, "Bob").await;
    claim(&pool, ada, at(10, 9, 0)).await.unwrap();
    claim(&pool, bob, at(10, 11, 0)).await.unwrap();

    let all = BookingRepo::list_details(&pool, None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].date_time < all[1].date_time);

    let own = BookingRepo::list_details(&pool, Some(ada)).await.unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].user.name, "Ada");
    assert!(own[0].reservation_type.is_none());
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn availability_creation_skips_existing_days(pool: PgPool) {
    let owner = student(&pool, "Owner").await;

    let created = AvailabilityRepo::create_for_days(&pool, owner, &[day(10), day(11)], 9, 15)
        .await
        .unwrap();
    assert_eq!(created, 2);

    let created = AvailabilityRepo::create_for_days(&pool, owner, &[day(11), day(12)], 9, 15)
        .await
        .unwrap();
    assert_eq!(created, 1);

    let windows = AvailabilityRepo::list(&pool, None).await.unwrap();
    assert_eq!(windows.len(), 3);

    let from_12 = AvailabilityRepo::list(&pool, Some(day(12))).await.unwrap();
    assert_eq!(from_12.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn availability_with_booking_cannot_be_deleted(pool: PgPool) {
    let owner = student(&pool, "Owner").await;
    let ada = student(&pool, "Ada").await;
    AvailabilityRepo::create_for_days(&pool, owner, &[day(10)], 9, 15)
        .await
        .unwrap();
    let window = AvailabilityRepo::list(&pool, None).await.unwrap().remove(0);

    let booking = claim(&pool, ada, at(10, 9, 0)).await.unwrap();
    assert_matches!(
        AvailabilityRepo::delete_unbooked(&pool, window.id).await,
        Err(RepoError::Domain(CoreError::Conflict(_)))
    );

    BookingRepo::cancel(&pool, booking).await.unwrap();
    AvailabilityRepo::delete_unbooked(&pool, window.id).await.unwrap();
    assert!(AvailabilityRepo::find_by_id(&pool, window.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_unknown_availability_is_not_found(pool: PgPool) {
    assert_matches!(
        AvailabilityRepo::delete_unbooked(&pool, 77).await,
        Err(RepoError::Domain(CoreError::NotFound { id: 77, .. }))
    );
}

// ---------------------------------------------------------------------------
// Reservation types
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn referenced_reservation_type_cannot_be_deleted(pool: PgPool) {
    let ada = student(&pool, "Ada").await;
    let consult = ReservationTypeRepo::create(
        &pool,
        &CreateReservationType {
            name: "Consultation".to_string(),
            duration_minutes: 45,
            description: None,
        },
    )
    .await
    .unwrap();

    let booking = BookingRepo::claim_slot(
        &pool,
        &NewBooking {
            user_id: ada,
            date_time: at(10, 9, 0),
            reservation_type_id: Some(consult.id),
        },
        early_now(),
    )
    .await
    .unwrap();

    assert_matches!(
        ReservationTypeRepo::delete_unreferenced(&pool, consult.id).await,
        Err(RepoError::Domain(CoreError::Conflict(_)))
    );

    BookingRepo::cancel(&pool, booking.id).await.unwrap();
    ReservationTypeRepo::delete_unreferenced(&pool, consult.id)
        .await
        .unwrap();

    let kept = BookingRepo::find_by_id(&pool, booking.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept.reservation_type_id, None);
    assert_eq!(kept.end_time, at(10, 9, 45));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_reservation_type_name_violates_unique(pool: PgPool) {
    let input = CreateReservationType {
        name: "Consultation".to_string(),
        duration_minutes: 45,
        description: None,
    };
    ReservationTypeRepo::create(&pool, &input).await.unwrap();
    let err = ReservationTypeRepo::create(&pool, &input).await.unwrap_err();
    let db_err = err.as_database_error().unwrap();
    assert_eq!(db_err.constraint(), Some("uq_reservation_types_name"));
}
