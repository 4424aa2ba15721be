//! Behaviour of the in-memory repositories.

use pagination::PageRequest;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    BlockRepository, CommentRepository, CoordinateRepository, ItemRepository, LikeRepository,
    NotificationRepository, RelationshipRepository, UserRepository,
};
use crate::domain::{
    Color, CommentBody, CoordinateId, EmailAddress, ItemId, NewComment, NewCoordinate, NewItem,
    NewNotification, NewUser, Season, SizeInfo, Tpo, UserId, UserName, UserUpdate,
};

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::default()
}

async fn signup(store: &InMemoryStore, name: &str) -> UserId {
    let user = NewUser {
        name: UserName::new(name).expect("valid name"),
        email: EmailAddress::new(format!("{name}@example.com")).expect("valid email"),
        password_digest: "digest".into(),
        activated_at: None,
    };
    UserRepository::create(store, &user)
        .await
        .expect("user stored")
        .id
}

async fn add_item(store: &InMemoryStore, owner: UserId, color: Color) -> ItemId {
    let item = NewItem {
        user_id: owner,
        super_item: "tops".into(),
        season: Season::Summer,
        tpo: Tpo::Casual,
        color,
        content: String::new(),
        memo: String::new(),
        picture: None,
        rating: 3.5,
    };
    ItemRepository::create(store, &item)
        .await
        .expect("item stored")
        .id
}

async fn add_coordinate(store: &InMemoryStore, owner: UserId, items: &[ItemId]) -> CoordinateId {
    let coordinate = NewCoordinate {
        user_id: owner,
        season: Season::Summer,
        tpo: Tpo::Casual,
        picture: None,
        memo: "beach day".into(),
        rating: 4.0,
        sizes: SizeInfo::default(),
    };
    store
        .create_with_items(&coordinate, items)
        .await
        .expect("coordinate stored")
        .id
}

#[rstest]
#[tokio::test]
async fn duplicate_emails_are_rejected(store: InMemoryStore) {
    signup(&store, "alice").await;
    let again = NewUser {
        name: UserName::new("alice two").expect("valid name"),
        email: EmailAddress::new("ALICE@example.com").expect("valid email"),
        password_digest: "digest".into(),
        activated_at: None,
    };

    let error = UserRepository::create(&store, &again)
        .await
        .expect_err("email taken");

    assert!(matches!(error, RepositoryError::Duplicate { .. }));
}

#[rstest]
#[tokio::test]
async fn profile_update_keeps_own_email(store: InMemoryStore) {
    let alice = signup(&store, "alice").await;
    let update = UserUpdate {
        name: Some(UserName::new("alice b").expect("valid name")),
        email: Some(EmailAddress::new("alice@example.com").expect("valid email")),
        picture: None,
    };

    let updated = store
        .update_profile(alice, &update)
        .await
        .expect("update runs")
        .expect("user exists");

    assert_eq!(updated.name, "alice b");
}

#[rstest]
#[tokio::test]
async fn coordinate_links_follow_updates_and_deletes(store: InMemoryStore) {
    let alice = signup(&store, "alice").await;
    let shirt = add_item(&store, alice, Color::White).await;
    let skirt = add_item(&store, alice, Color::Black).await;
    let outfit = add_coordinate(&store, alice, &[shirt]).await;

    let linked = store.find_by_coordinate(outfit).await.expect("query runs");
    assert_eq!(linked.iter().map(|item| item.id).collect::<Vec<_>>(), vec![shirt]);

    store
        .update_with_items(outfit, &Default::default(), Some(vec![skirt]))
        .await
        .expect("update runs")
        .expect("coordinate exists");
    let relinked = store.find_by_coordinate(outfit).await.expect("query runs");
    assert_eq!(relinked.iter().map(|item| item.id).collect::<Vec<_>>(), vec![skirt]);
    let released = ItemRepository::find_by_id(&store, shirt)
        .await
        .expect("query runs")
        .expect("item kept");
    assert_eq!(released.coordinate_id, None);

    assert!(CoordinateRepository::delete(&store, outfit).await.expect("delete runs"));
    let orphan = ItemRepository::find_by_id(&store, skirt)
        .await
        .expect("query runs")
        .expect("item kept");
    assert_eq!(orphan.coordinate_id, None);
}

#[rstest]
#[tokio::test]
async fn item_search_pages_newest_first(store: InMemoryStore) {
    let alice = signup(&store, "alice").await;
    let first = add_item(&store, alice, Color::Blue).await;
    add_item(&store, alice, Color::Red).await;
    let third = add_item(&store, alice, Color::Blue).await;

    let filter = crate::domain::ItemFilter {
        color: Some(Color::Blue),
        ..crate::domain::ItemFilter::for_user(alice)
    };
    let page = ItemRepository::search(&store, &filter, PageRequest::new(1, 1).expect("valid page"))
        .await
        .expect("search runs");

    assert_eq!(page.total_count(), 2);
    assert_eq!(page.items().first().map(|item| item.id), Some(third));
    let rest = ItemRepository::search(&store, &filter, PageRequest::new(2, 1).expect("valid page"))
        .await
        .expect("search runs");
    assert_eq!(rest.items().first().map(|item| item.id), Some(first));
}

#[rstest]
#[tokio::test]
async fn delete_many_skips_missing_ids(store: InMemoryStore) {
    let alice = signup(&store, "alice").await;
    let shirt = add_item(&store, alice, Color::White).await;

    let removed = store
        .delete_many(&[shirt, ItemId::new(999)])
        .await
        .expect("delete runs");

    assert_eq!(removed, 1);
}

#[rstest]
#[tokio::test]
async fn second_like_is_a_duplicate(store: InMemoryStore) {
    let alice = signup(&store, "alice").await;
    let bob = signup(&store, "bob").await;
    let outfit = add_coordinate(&store, alice, &[]).await;

    LikeRepository::create(&store, bob, outfit)
        .await
        .expect("first like");
    let error = LikeRepository::create(&store, bob, outfit)
        .await
        .expect_err("second like");

    assert!(matches!(error, RepositoryError::Duplicate { .. }));
    assert_eq!(
        LikeRepository::count_by_coordinate(&store, outfit)
            .await
            .expect("count runs"),
        1
    );
}

#[rstest]
#[tokio::test]
async fn follow_listings_resolve_users(store: InMemoryStore) {
    let alice = signup(&store, "alice").await;
    let bob = signup(&store, "bob").await;
    let carol = signup(&store, "carol").await;
    RelationshipRepository::create(&store, bob, alice)
        .await
        .expect("bob follows");
    RelationshipRepository::create(&store, carol, alice)
        .await
        .expect("carol follows");

    let followers = store
        .followers(alice, PageRequest::default())
        .await
        .expect("listing runs");

    assert_eq!(followers.total_count(), 2);
    assert_eq!(
        followers.items().iter().map(|user| user.id).collect::<Vec<_>>(),
        vec![carol, bob]
    );
    let duplicate = RelationshipRepository::create(&store, bob, alice)
        .await
        .expect_err("edge exists");
    assert!(matches!(duplicate, RepositoryError::Duplicate { .. }));
}

#[rstest]
#[tokio::test]
async fn blocks_are_directional(store: InMemoryStore) {
    let alice = signup(&store, "alice").await;
    let bob = signup(&store, "bob").await;

    BlockRepository::create(&store, alice, bob)
        .await
        .expect("block stored");

    assert!(BlockRepository::exists(&store, alice, bob).await.expect("query runs"));
    assert!(!BlockRepository::exists(&store, bob, alice).await.expect("query runs"));
    let blocked = store.blocked_users(alice).await.expect("listing runs");
    assert_eq!(blocked.iter().map(|user| user.id).collect::<Vec<_>>(), vec![bob]);
}

#[rstest]
#[tokio::test]
async fn mark_all_read_only_touches_receiver(store: InMemoryStore) {
    let alice = signup(&store, "alice").await;
    let bob = signup(&store, "bob").await;
    NotificationRepository::create(&store, &NewNotification::follow(bob, alice))
        .await
        .expect("stored");
    NotificationRepository::create(&store, &NewNotification::follow(alice, bob))
        .await
        .expect("stored");

    let changed = store.mark_all_read(alice).await.expect("update runs");

    assert_eq!(changed, 1);
    assert_eq!(store.count_unread(alice).await.expect("count runs"), 0);
    assert_eq!(store.count_unread(bob).await.expect("count runs"), 1);
}

#[rstest]
#[tokio::test]
async fn deleting_a_user_cascades(store: InMemoryStore) {
    let alice = signup(&store, "alice").await;
    let bob = signup(&store, "bob").await;
    let shirt = add_item(&store, alice, Color::White).await;
    let outfit = add_coordinate(&store, alice, &[shirt]).await;
    let body = CommentBody::new("nice").expect("valid body");
    let comment = CommentRepository::create(
        &store,
        &NewComment {
            user_id: bob,
            coordinate_id: outfit,
            body,
        },
    )
    .await
    .expect("comment stored");
    NotificationRepository::create(&store, &NewNotification::comment(&comment, alice))
        .await
        .expect("notification stored");
    RelationshipRepository::create(&store, bob, alice)
        .await
        .expect("follow stored");

    assert!(UserRepository::delete(&store, alice).await.expect("delete runs"));

    assert!(
        CoordinateRepository::find_by_id(&store, outfit)
            .await
            .expect("query runs")
            .is_none()
    );
    assert!(
        CommentRepository::find_by_id(&store, comment.id)
            .await
            .expect("query runs")
            .is_none()
    );
    assert!(
        store
            .all_following(bob)
            .await
            .expect("listing runs")
            .is_empty()
    );
    assert_eq!(store.count_unread(alice).await.expect("count runs"), 0);
}

#[rstest]
#[tokio::test]
async fn retracting_a_like_withdraws_its_notification(store: InMemoryStore) {
    let alice = signup(&store, "alice").await;
    let bob = signup(&store, "bob").await;
    let outfit = add_coordinate(&store, alice, &[]).await;
    NotificationRepository::create(&store, &NewNotification::follow(bob, alice))
        .await
        .expect("stored");
    let like = LikeRepository::create(&store, bob, outfit)
        .await
        .expect("like stored");
    NotificationRepository::create(&store, &NewNotification::like(&like, alice))
        .await
        .expect("stored");
    assert_eq!(store.count_unread(alice).await.expect("count runs"), 2);

    assert!(LikeRepository::delete(&store, bob, outfit).await.expect("delete runs"));

    let inbox = store
        .list_by_receiver(alice, PageRequest::default())
        .await
        .expect("listing runs");
    assert_eq!(inbox.total_count(), 1);
    assert_eq!(inbox.items()[0].like_coordinate_id, None);
}
