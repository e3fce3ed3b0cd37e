
use daisy_core::TrackId;
use daisy_library::{PlaylistMembership, PlaylistName};
use daisy_storage::playlists;
use test_helpers::{track, TestDb};

#[tokio::test]
async fn test_playlists_start_empty() {
    let db = TestDb::new().await;

    let membership = playlists::load(db.pool()).await.unwrap();
    assert_eq!(membership, PlaylistMembership::new());
}

#[tokio::test]
async fn test_add_is_per_playlist() {
    let db = TestDb::new().await;
    let mutt = track("3", "Mutt", "Leon Thomas");

    playlists::add(db.pool(), PlaylistName::Gym, &mutt).await.unwrap();
    playlists::add(db.pool(), PlaylistName::Gym, &mutt).await.unwrap();

    let membership = playlists::load(db.pool()).await.unwrap();
    assert!(membership.contains(PlaylistName::Gym, &mutt.id));
    assert!(!membership.contains(PlaylistName::MondayMood, &mutt.id));
    assert_eq!(membership.playlist(PlaylistName::Gym).unwrap().len(), 1);
}

#[tokio::test]
async fn test_order_and_removal() {
    let db = TestDb::new().await;
    for (id, title) in [("1", "Crazy Tings"), ("2", "The Dress"), ("3", "Mutt")] {
        playlists::add(db.pool(), PlaylistName::MondayMood, &track(id, title, "Artist"))
            .await
            .unwrap();
    }
    playlists::remove(db.pool(), PlaylistName::MondayMood, &TrackId::new("2"))
        .await
        .unwrap();

    let set = playlists::load_playlist(db.pool(), PlaylistName::MondayMood)
        .await
        .unwrap();
    let ids: Vec<_> = set.iter().map(|t| t.id.to_string()).collect();
    assert_eq!(ids, vec!["1", "3"]);
}

#[tokio::test]
async fn test_save_round_trips_through_restart() {
    let mut db = TestDb::new().await;

    let mut membership = PlaylistMembership::new();
    membership.add(PlaylistName::Gym, track("3", "Mutt", "Leon Thomas"));
    membership.add(PlaylistName::MondayMood, track("2", "The Dress", "Dijon"));
    membership.add(PlaylistName::MondayMood, track("1", "Crazy Tings", "Tems"));
    playlists::save(db.pool(), &membership).await.unwrap();

    db.reopen().await;
    assert_eq!(playlists::load(db.pool()).await.unwrap(), membership);
}

#[tokio::test]
async fn test_unknown_playlist_row_is_corrupt() {
    let db = TestDb::new().await;
    sqlx::query(
        "INSERT INTO playlist_members (playlist, track_id, position, track_json, added_at)
         VALUES ('chill', 'x', 0, '{}', 0)",
    )
    .execute(db.pool())
    .await
    .unwrap();

    let result = playlists::load(db.pool()).await;
    assert!(matches!(
        result,
        Err(daisy_storage::StorageError::Corrupt { .. })
    ));
}
