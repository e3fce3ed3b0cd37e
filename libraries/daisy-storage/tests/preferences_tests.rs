
use daisy_storage::{preferences, StorageError};
use test_helpers::TestDb;

#[tokio::test]
async fn test_background_color_defaults() {
    let db = TestDb::new().await;

    let color = preferences::background_color(db.pool()).await.unwrap();
    assert_eq!(color, "#0A0E26");
    assert_eq!(color, preferences::DEFAULT_BACKGROUND_COLOR);
}

#[tokio::test]
async fn test_background_color_persists_across_restart() {
    let mut db = TestDb::new().await;

    preferences::set_background_color(db.pool(), "#1DB954")
        .await
        .unwrap();
    db.reopen().await;

    let color = preferences::background_color(db.pool()).await.unwrap();
    assert_eq!(color, "#1DB954");
}

#[tokio::test]
async fn test_background_color_overwrites() {
    let db = TestDb::new().await;

    preferences::set_background_color(db.pool(), "#111111")
        .await
        .unwrap();
    preferences::set_background_color(db.pool(), "#222222")
        .await
        .unwrap();

    let stored = preferences::get_preference(db.pool(), preferences::KEY_BACKGROUND_COLOR)
        .await
        .unwrap();
    assert_eq!(stored.as_deref(), Some("#222222"));
}

#[tokio::test]
async fn test_invalid_color_rejected_and_not_stored() {
    let db = TestDb::new().await;

    let result = preferences::set_background_color(db.pool(), "purple").await;
    assert!(matches!(result, Err(StorageError::InvalidColor(_))));

    let stored = preferences::get_preference(db.pool(), preferences::KEY_BACKGROUND_COLOR)
        .await
        .unwrap();
    assert_eq!(stored, None);
}

#[tokio::test]
async fn test_delete_preference() {
    let db = TestDb::new().await;

    preferences::set_preference(db.pool(), "volume", "80")
        .await
        .unwrap();
    preferences::delete_preference(db.pool(), "volume")
        .await
        .unwrap();

    let stored = preferences::get_preference(db.pool(), "volume").await.unwrap();
    assert_eq!(stored, None);
}
