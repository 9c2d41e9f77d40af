//! Integration tests for notification persistence.

use mentora_core::types::DbId;
use mentora_db::models::user::CreateUser;
use mentora_db::repositories::{NotificationRepo, UserRepo};
use sqlx::PgPool;

async fn user(pool: &PgPool, name: &str, role: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            role: role.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_increments_unread_count(pool: PgPool) {
    let ada = user(&pool, "Ada", "student").await;

    let n = NotificationRepo::create(&pool, ada, "Hello", "general", None)
        .await
        .unwrap();
    assert!(!n.is_read);
    assert!(!n.archived);
    assert_eq!(NotificationRepo::unread_count(&pool, ada).await.unwrap(), 1);

    NotificationRepo::mark_read(&pool, n.id).await.unwrap().unwrap();
    assert_eq!(NotificationRepo::unread_count(&pool, ada).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn archived_notifications_leave_inbox_and_unread_count(pool: PgPool) {
    let ada = user(&pool, "Ada", "student").await;
    let n = NotificationRepo::create(&pool, ada, "Hello", "booking", None)
        .await
        .unwrap();

    NotificationRepo::set_archived(&pool, n.id, true).await.unwrap().unwrap();
    assert!(NotificationRepo::list_for_user(&pool, ada, false).await.unwrap().is_empty());
    assert_eq!(NotificationRepo::list_for_user(&pool, ada, true).await.unwrap().len(), 1);
    assert_eq!(NotificationRepo::unread_count(&pool, ada).await.unwrap(), 0);

    NotificationRepo::set_archived(&pool, n.id, false).await.unwrap().unwrap();
    assert_eq!(NotificationRepo::unread_count(&pool, ada).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_all_read_only_touches_own_rows(pool: PgPool) {
    let ada = user(&pool, "Ada", "student").await;
    let bob = user(&pool, "Bob", "student").await;
    for _ in 0..3 {
        NotificationRepo::create(&pool, ada, "x", "general", None).await.unwrap();
    }
    NotificationRepo::create(&pool, bob, "y", "general", None).await.unwrap();

    assert_eq!(NotificationRepo::mark_all_read(&pool, ada).await.unwrap(), 3);
    assert_eq!(NotificationRepo::unread_count(&pool, bob).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn archive_many_and_owners(pool: PgPool) {
    let ada = user(&pool, "Ada", "student").await;
    let a = NotificationRepo::create(&pool, ada, "a", "general", None).await.unwrap();
    let b = NotificationRepo::create(&pool, ada, "b", "urgent", None).await.unwrap();

    let mut owners = NotificationRepo::owners(&pool, &[a.id, b.id]).await.unwrap();
    owners.sort();
    assert_eq!(owners, vec![(a.id, ada), (b.id, ada)]);

    assert_eq!(
        NotificationRepo::archive_many(&pool, &[a.id, b.id], ada).await.unwrap(),
        2
    );
    assert!(NotificationRepo::list_for_user(&pool, ada, false).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_row(pool: PgPool) {
    let ada = user(&pool, "Ada", "student").await;
    let n = NotificationRepo::create(&pool, ada, "a", "general", None).await.unwrap();

    assert!(NotificationRepo::delete(&pool, n.id).await.unwrap());
    assert!(!NotificationRepo::delete(&pool, n.id).await.unwrap());
    assert!(NotificationRepo::find_by_id(&pool, n.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_kind_is_rejected(pool: PgPool) {
    let ada = user(&pool, "Ada", "student").await;
    assert!(NotificationRepo::create(&pool, ada, "a", "spam", None).await.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn active_admins_are_listed(pool: PgPool) {
    let admin = user(&pool, "Grace", "admin").await;
    let retired = user(&pool, "Alan", "admin").await;
    user(&pool, "Ada", "student").await;
    sqlx::query("UPDATE users SET is_active = false WHERE id = $1")
        .bind(retired)
        .execute(&pool)
        .await
        .unwrap();

    assert_eq!(UserRepo::list_active_admin_ids(&pool).await.unwrap(), vec![admin]);
}
