use linfy::domain::entities::{MAX_API_KEYS_PER_USER, NewUser};
use linfy::domain::repositories::{ApiKeyRepository, UserRepository};
use linfy::error::AppError;
use linfy::infrastructure::persistence::{PgApiKeyRepository, PgUserRepository};
use sqlx::PgPool;
use std::sync::Arc;

async fn setup(pool: PgPool) -> (PgApiKeyRepository, i64) {
    let pool = Arc::new(pool);
    let user = PgUserRepository::new(pool.clone())
        .create(NewUser {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "hash".to_string(),
        })
        .await
        .unwrap();

    (PgApiKeyRepository::new(pool), user.id)
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_create_and_authenticate(pool: PgPool) {
    let (repo, user_id) = setup(pool).await;

    let key = repo
        .create(user_id, "key-one", MAX_API_KEYS_PER_USER)
        .await
        .unwrap();
    assert_eq!(key.user_id, user_id);
    assert!(key.last_used.is_none());

    assert_eq!(repo.authenticate("key-one").await.unwrap(), Some(user_id));
    assert_eq!(repo.authenticate("unknown").await.unwrap(), None);

    let keys = repo.list_for_user(user_id).await.unwrap();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].last_used.is_some());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_key_cap(pool: PgPool) {
    let (repo, user_id) = setup(pool).await;

    for i in 0..MAX_API_KEYS_PER_USER {
        repo.create(user_id, &format!("key-{i}"), MAX_API_KEYS_PER_USER)
            .await
            .unwrap();
    }

    let result = repo
        .create(user_id, "one-too-many", MAX_API_KEYS_PER_USER)
        .await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
    assert_eq!(
        repo.list_for_user(user_id).await.unwrap().len(),
        MAX_API_KEYS_PER_USER
    );
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_delete_checks_owner(pool: PgPool) {
    let (repo, user_id) = setup(pool).await;
    let key = repo
        .create(user_id, "key-one", MAX_API_KEYS_PER_USER)
        .await
        .unwrap();

    assert!(!repo.delete(user_id + 100, key.id).await.unwrap());
    assert!(repo.delete(user_id, key.id).await.unwrap());
    assert!(!repo.delete(user_id, key.id).await.unwrap());

    assert_eq!(repo.authenticate("key-one").await.unwrap(), None);
}
