use memobank_core::db::open_db_in_memory;
use memobank_core::{
    MemoCreate, MemoFilter, MemoLocation, MemoOrganizer, MemoPayload, MemoProperty,
    MemoRepository, MemoUpdate, OrganizerRepository, RepoError, RowStatus,
    SqliteMemoRepository, SqliteOrganizerRepository, Visibility,
};

fn memo_create(uid: &str, creator_id: i64, content: &str) -> MemoCreate {
    MemoCreate {
        uid: uid.to_string(),
        creator_id,
        content: content.to_string(),
        visibility: Visibility::Private,
        parent_id: None,
        payload: None,
    }
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::new(&conn);

    let payload = MemoPayload {
        tags: vec!["x".to_string(), "y".to_string()],
        property: Some(MemoProperty {
            has_link: true,
            ..MemoProperty::default()
        }),
        location: Some(MemoLocation {
            placeholder: "office".to_string(),
            latitude: 52.52,
            longitude: 13.405,
        }),
    };
    let created = repo
        .create_memo(&MemoCreate {
            uid: "memo-uid-1".to_string(),
            creator_id: 7,
            content: "first memo".to_string(),
            visibility: Visibility::Public,
            parent_id: None,
            payload: Some(payload.clone()),
        })
        .unwrap();

    assert!(created.id > 0);
    assert_eq!(created.uid, "memo-uid-1");
    assert_eq!(created.creator_id, 7);
    assert_eq!(created.row_status, RowStatus::Normal);
    assert_eq!(created.visibility, Visibility::Public);
    assert_eq!(created.content, "first memo");
    assert!(!created.pinned);
    assert_eq!(created.parent_id, None);
    assert!(created.created_ts > 0);
    assert!(created.updated_ts >= created.created_ts);

    let loaded = repo.get_memo(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.payload, Some(payload));
}

#[test]
fn get_missing_memo_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::new(&conn);

    assert!(repo.get_memo(12345).unwrap().is_none());
}

#[test]
fn uid_uniqueness_is_enforced() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::new(&conn);

    repo.create_memo(&memo_create("same-uid", 1, "a")).unwrap();
    let err = repo
        .create_memo(&memo_create("same-uid", 1, "b"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn parent_reference_must_point_at_existing_memo() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::new(&conn);

    let mut create = memo_create("child", 1, "orphan comment");
    create.parent_id = Some(999);
    let err = repo.create_memo(&create).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));

    let parent = repo.create_memo(&memo_create("parent", 1, "root")).unwrap();
    let mut create = memo_create("child", 1, "attached comment");
    create.parent_id = Some(parent.id);
    let child = repo.create_memo(&create).unwrap();
    assert_eq!(child.parent_id, Some(parent.id));
}

#[test]
fn list_filters_by_creator_visibility_and_status() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::new(&conn);

    let mine = repo
        .create_memo(&MemoCreate {
            visibility: Visibility::Public,
            ..memo_create("mine", 1, "mine")
        })
        .unwrap();
    let theirs = repo.create_memo(&memo_create("theirs", 2, "theirs")).unwrap();
    repo.update_memo(
        theirs.id,
        &MemoUpdate {
            row_status: Some(RowStatus::Archived),
            ..MemoUpdate::default()
        },
    )
    .unwrap();

    let by_creator = repo
        .list_memos(&MemoFilter {
            creator_id: Some(1),
            ..MemoFilter::default()
        })
        .unwrap();
    assert_eq!(by_creator.len(), 1);
    assert_eq!(by_creator[0].id, mine.id);

    let by_visibility = repo
        .list_memos(&MemoFilter {
            visibility: Some(Visibility::Public),
            ..MemoFilter::default()
        })
        .unwrap();
    assert_eq!(by_visibility.len(), 1);
    assert_eq!(by_visibility[0].id, mine.id);

    let archived = repo
        .list_memos(&MemoFilter {
            row_status: Some(RowStatus::Archived),
            ..MemoFilter::default()
        })
        .unwrap();
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].id, theirs.id);

    let by_uid = repo
        .list_memos(&MemoFilter {
            uid: Some("theirs".to_string()),
            ..MemoFilter::default()
        })
        .unwrap();
    assert_eq!(by_uid.len(), 1);
    assert_eq!(by_uid[0].id, theirs.id);
}

#[test]
fn pinned_is_derived_from_creator_organizer_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::new(&conn);
    let organizers = SqliteOrganizerRepository::new(&conn);

    let memo = repo.create_memo(&memo_create("pin-me", 7, "pin target")).unwrap();
    assert!(!memo.pinned);

    // Another user's pin does not mark the memo itself as pinned.
    organizers
        .upsert_organizer(&MemoOrganizer {
            memo_id: memo.id,
            user_id: 8,
            pinned: true,
        })
        .unwrap();
    assert!(!repo.get_memo(memo.id).unwrap().unwrap().pinned);

    organizers
        .upsert_organizer(&MemoOrganizer {
            memo_id: memo.id,
            user_id: 7,
            pinned: true,
        })
        .unwrap();
    assert!(repo.get_memo(memo.id).unwrap().unwrap().pinned);

    let pinned_only = repo
        .list_memos(&MemoFilter {
            pinned_only: true,
            ..MemoFilter::default()
        })
        .unwrap();
    assert_eq!(pinned_only.len(), 1);
    assert_eq!(pinned_only[0].id, memo.id);
}

#[test]
fn update_patches_only_present_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::new(&conn);

    let memo = repo.create_memo(&memo_create("patch", 1, "draft")).unwrap();
    repo.update_memo(
        memo.id,
        &MemoUpdate {
            content: Some("updated".to_string()),
            visibility: Some(Visibility::Protected),
            ..MemoUpdate::default()
        },
    )
    .unwrap();

    let loaded = repo.get_memo(memo.id).unwrap().unwrap();
    assert_eq!(loaded.content, "updated");
    assert_eq!(loaded.visibility, Visibility::Protected);
    assert_eq!(loaded.row_status, RowStatus::Normal);
    assert_eq!(loaded.uid, "patch");
}

#[test]
fn update_with_empty_payload_clears_the_column() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::new(&conn);

    let memo = repo
        .create_memo(&MemoCreate {
            payload: Some(MemoPayload {
                tags: vec!["x".to_string()],
                ..MemoPayload::default()
            }),
            ..memo_create("payload", 1, "tagged")
        })
        .unwrap();
    assert!(memo.payload.is_some());

    repo.update_memo(
        memo.id,
        &MemoUpdate {
            payload: Some(MemoPayload::default()),
            ..MemoUpdate::default()
        },
    )
    .unwrap();

    assert_eq!(repo.get_memo(memo.id).unwrap().unwrap().payload, None);
}

#[test]
fn update_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::new(&conn);

    let err = repo
        .update_memo(
            404,
            &MemoUpdate {
                content: Some("ghost".to_string()),
                ..MemoUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::MemoNotFound(404)));
}

#[test]
fn delete_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::new(&conn);

    let err = repo.delete_memo(404).unwrap_err();
    assert!(matches!(err, RepoError::MemoNotFound(404)));
}

#[test]
fn list_pagination_is_stable() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::new(&conn);

    let a = repo.create_memo(&memo_create("a", 1, "a")).unwrap();
    let b = repo.create_memo(&memo_create("b", 1, "b")).unwrap();
    repo.create_memo(&memo_create("c", 1, "c")).unwrap();

    // Pin creation times so ordering falls back to id DESC.
    conn.execute("UPDATE memo SET created_ts = 1234567890;", [])
        .unwrap();

    let page = repo
        .list_memos(&MemoFilter {
            limit: Some(2),
            offset: 1,
            ..MemoFilter::default()
        })
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].id, b.id);
    assert_eq!(page[1].id, a.id);

    let offset_only = repo
        .list_memos(&MemoFilter {
            offset: 2,
            ..MemoFilter::default()
        })
        .unwrap();
    assert_eq!(offset_only.len(), 1);
    assert_eq!(offset_only[0].id, a.id);
}
