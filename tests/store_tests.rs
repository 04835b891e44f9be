//! Store-level tests for the listing transaction semantics that the HTTP
//! layer cannot observe directly.

use abode::db::{InsertUser, NewUser, PropertyFields, Store};
use abode::entities::images;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

async fn spawn_store() -> Store {
    let db_path =
        std::env::temp_dir().join(format!("abode-store-test-{}.db", uuid::Uuid::new_v4()));

    Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("Failed to create store")
}

async fn seed_owner(store: &Store, username: &str) -> i32 {
    let inserted = store
        .create_user(NewUser {
            name: "Test Owner".to_string(),
            email: format!("{username}@example.com"),
            username: username.to_string(),
            password_hash: "digest-placeholder".to_string(),
        })
        .await
        .expect("Failed to create user");

    let InsertUser::Created(user) = inserted else {
        panic!("expected a created user, got {inserted:?}");
    };
    user.id
}

fn cabin() -> PropertyFields {
    PropertyFields {
        title: "Lakeside cabin".to_string(),
        description: "Two bedrooms, lake view".to_string(),
        price: 185_000.0,
        latitude: 61.2176,
        longitude: -149.8997,
    }
}

#[tokio::test]
async fn test_create_property_persists_images_in_order() {
    let store = spawn_store().await;
    let owner = seed_owner(&store, "owner").await;

    let urls = vec![
        "https://cdn.example.com/cabin-front.jpg".to_string(),
        "https://cdn.example.com/cabin-lake.jpg".to_string(),
    ];
    let (property, image_rows) = store
        .create_property(owner, cabin(), &urls)
        .await
        .unwrap()
        .expect("owner exists");

    assert_eq!(property.user_id, owner);
    assert_eq!(image_rows.len(), 2);
    assert_eq!(image_rows[0].url, urls[0]);
    assert_eq!(image_rows[1].url, urls[1]);
    assert!(image_rows.iter().all(|i| i.property_id == property.id));

    let (_, fetched_images) = store
        .get_property(property.id)
        .await
        .unwrap()
        .expect("listing exists");
    assert_eq!(fetched_images.len(), 2);
}

#[tokio::test]
async fn test_create_property_unknown_owner_leaves_nothing_behind() {
    let store = spawn_store().await;

    let urls = vec!["https://cdn.example.com/cabin.jpg".to_string()];
    let created = store.create_property(9999, cabin(), &urls).await.unwrap();
    assert!(created.is_none());

    assert!(store.list_properties().await.unwrap().is_empty());

    let orphaned = images::Entity::find().all(&store.conn).await.unwrap();
    assert!(orphaned.is_empty());
}

#[tokio::test]
async fn test_update_rolls_back_image_replacement_on_failure() {
    let store = spawn_store().await;
    let owner = seed_owner(&store, "owner").await;

    let original_url = vec!["https://cdn.example.com/cabin-front.jpg".to_string()];
    let (property, _) = store
        .create_property(owner, cabin(), &original_url)
        .await
        .unwrap()
        .expect("owner exists");

    // SQLite stores NaN as NULL, so the NOT NULL price column rejects the
    // scalar update after the new image rows are already in the transaction.
    let mut poisoned = cabin();
    poisoned.price = f64::NAN;
    let replacement = vec!["https://cdn.example.com/cabin-new.jpg".to_string()];
    let result = store
        .update_property(property.id, poisoned, &replacement)
        .await;
    assert!(result.is_err());

    let (fetched, fetched_images) = store
        .get_property(property.id)
        .await
        .unwrap()
        .expect("listing survives the failed update");
    assert_eq!(fetched.price, 185_000.0);
    assert_eq!(fetched_images.len(), 1);
    assert_eq!(fetched_images[0].url, original_url[0]);
}

#[tokio::test]
async fn test_update_after_removal_reports_missing() {
    let store = spawn_store().await;
    let owner = seed_owner(&store, "owner").await;

    let urls = vec!["https://cdn.example.com/cabin.jpg".to_string()];
    let (property, _) = store
        .create_property(owner, cabin(), &urls)
        .await
        .unwrap()
        .expect("owner exists");

    assert!(store.remove_property(property.id).await.unwrap());

    // A replacement image set on a vanished listing must surface as
    // missing, not as an error, and must insert nothing.
    let updated = store
        .update_property(property.id, cabin(), &urls)
        .await
        .unwrap();
    assert!(updated.is_none());

    let orphaned = images::Entity::find().all(&store.conn).await.unwrap();
    assert!(orphaned.is_empty());
}

#[tokio::test]
async fn test_remove_property_deletes_image_rows() {
    let store = spawn_store().await;
    let owner = seed_owner(&store, "owner").await;

    let urls = vec![
        "https://cdn.example.com/cabin-front.jpg".to_string(),
        "https://cdn.example.com/cabin-lake.jpg".to_string(),
    ];
    let (property, _) = store
        .create_property(owner, cabin(), &urls)
        .await
        .unwrap()
        .expect("owner exists");

    assert!(store.remove_property(property.id).await.unwrap());
    assert!(store.get_property(property.id).await.unwrap().is_none());

    let remaining = images::Entity::find()
        .filter(images::Column::PropertyId.eq(property.id))
        .all(&store.conn)
        .await
        .unwrap();
    assert!(remaining.is_empty());

    // Removing it again reports nothing to remove.
    assert!(!store.remove_property(property.id).await.unwrap());
}

#[tokio::test]
async fn test_duplicate_user_insert_reports_which_field() {
    let store = spawn_store().await;
    seed_owner(&store, "ada").await;

    let same_email = store
        .create_user(NewUser {
            name: "Other".to_string(),
            email: "ada@example.com".to_string(),
            username: "grace".to_string(),
            password_hash: "digest-placeholder".to_string(),
        })
        .await
        .unwrap();
    assert!(matches!(same_email, InsertUser::DuplicateEmail));

    let same_username = store
        .create_user(NewUser {
            name: "Other".to_string(),
            email: "grace@example.com".to_string(),
            username: "ada".to_string(),
            password_hash: "digest-placeholder".to_string(),
        })
        .await
        .unwrap();
    assert!(matches!(same_username, InsertUser::DuplicateUsername));
}

#[tokio::test]
async fn test_upsert_user_by_email_keeps_existing_account() {
    let store = spawn_store().await;

    let first = store
        .upsert_user_by_email("pat@example.com", "Pat", None)
        .await
        .unwrap();
    assert_eq!(first.username, "pat@example.com");
    assert!(first.profile_pic.is_none());

    // A later login fills in the missing picture but changes nothing else.
    let second = store
        .upsert_user_by_email(
            "pat@example.com",
            "Patricia",
            Some("https://lh3.example.com/pat.png"),
        )
        .await
        .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.name, "Pat");
    assert_eq!(
        second.profile_pic.as_deref(),
        Some("https://lh3.example.com/pat.png")
    );

    // Once set, the stored picture wins.
    let third = store
        .upsert_user_by_email("pat@example.com", "Pat", Some("https://elsewhere.example"))
        .await
        .unwrap();
    assert_eq!(
        third.profile_pic.as_deref(),
        Some("https://lh3.example.com/pat.png")
    );
}
