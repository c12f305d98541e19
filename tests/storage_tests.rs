use blog_manager::storage::models::{Condition, Fields, Order, Row};
use blog_manager::storage::{
    Database, DatabaseError, MetadataStore, BLOG_CONTENT, BLOG_DRAFT, COL_CATEGORY, COL_ID,
    COL_PUBLISHED_AT, COL_TITLE,
};

fn test_db() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("data")).unwrap();
    (dir, db)
}

async fn insert_post(db: &Database, id: &str, title: &str, published_at: &str) {
    db.insert(
        BLOG_CONTENT,
        &[COL_ID, COL_TITLE, COL_CATEGORY, COL_PUBLISHED_AT],
        &[
            Some(id.to_string()),
            Some(title.to_string()),
            Some("rust,notes".to_string()),
            Some(published_at.to_string()),
        ],
    )
    .await
    .unwrap();
}

#[test]
fn test_put_and_get_row() {
    let (_dir, db) = test_db();
    let row: Row = [
        (COL_ID, Some("draft-1".to_string())),
        (COL_TITLE, None),
    ]
    .into_iter()
    .collect();

    db.put_row(BLOG_DRAFT, &row).unwrap();

    let retrieved = db.get_row(BLOG_DRAFT, "draft-1").unwrap().expect("row should exist");
    assert_eq!(retrieved.id(), Some("draft-1"));
    assert_eq!(retrieved.get(COL_TITLE), None);
    assert_eq!(retrieved.columns().collect::<Vec<_>>(), vec![COL_ID, COL_TITLE]);
}

#[test]
fn test_get_row_not_found() {
    let (_dir, db) = test_db();
    assert!(db.get_row(BLOG_DRAFT, "nonexistent").unwrap().is_none());
}

#[test]
fn test_put_row_requires_id() {
    let (_dir, db) = test_db();
    let row: Row = [(COL_TITLE, Some("no id".to_string()))].into_iter().collect();

    let err = db.put_row(BLOG_DRAFT, &row).unwrap_err();
    assert!(matches!(err, DatabaseError::MissingPrimaryKey(_)));
}

#[tokio::test]
async fn test_insert_and_query_by_id() {
    let (_dir, db) = test_db();
    insert_post(&db, "a", "First", "1000").await;
    insert_post(&db, "b", "Second", "2000").await;

    let rows = db
        .query(BLOG_CONTENT, Fields::All, Some(&Condition::id("b")), None)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(COL_TITLE), Some("Second"));
    assert_eq!(rows[0].get(COL_CATEGORY), Some("rust,notes"));
}

#[tokio::test]
async fn test_insert_same_id_overwrites() {
    let (_dir, db) = test_db();
    insert_post(&db, "a", "First", "1000").await;
    insert_post(&db, "a", "Replaced", "1000").await;

    let rows = db.query(BLOG_CONTENT, Fields::All, None, None).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(COL_TITLE), Some("Replaced"));
}

#[tokio::test]
async fn test_query_projection_and_order() {
    let (_dir, db) = test_db();
    insert_post(&db, "late", "Late", "3000").await;
    insert_post(&db, "early", "Early", "1000").await;
    insert_post(&db, "middle", "Middle", "2000").await;

    let fields = [COL_ID, COL_PUBLISHED_AT];
    let rows = db
        .query(
            BLOG_CONTENT,
            Fields::Only(&fields),
            None,
            Some(&Order::asc(COL_PUBLISHED_AT)),
        )
        .await
        .unwrap();
    let ids: Vec<_> = rows.iter().filter_map(|r| r.id()).collect();
    assert_eq!(ids, vec!["early", "middle", "late"]);
    assert_eq!(rows[0].get(COL_TITLE), None);
    assert_eq!(rows[0].columns().count(), 2);

    let rows = db
        .query(
            BLOG_CONTENT,
            Fields::All,
            None,
            Some(&Order::desc(COL_PUBLISHED_AT)),
        )
        .await
        .unwrap();
    assert_eq!(rows[0].id(), Some("late"));
}

#[tokio::test]
async fn test_order_compares_integers_numerically() {
    let (_dir, db) = test_db();
    insert_post(&db, "wide", "Wide", "1000").await;
    insert_post(&db, "narrow", "Narrow", "999").await;
    insert_post(&db, "widest", "Widest", "10000").await;

    let rows = db
        .query(
            BLOG_CONTENT,
            Fields::All,
            None,
            Some(&Order::asc(COL_PUBLISHED_AT)),
        )
        .await
        .unwrap();
    let ids: Vec<_> = rows.iter().filter_map(|r| r.id()).collect();
    assert_eq!(ids, vec!["narrow", "wide", "widest"]);
}

#[tokio::test]
async fn test_query_by_non_key_column() {
    let (_dir, db) = test_db();
    insert_post(&db, "a", "Same", "1000").await;
    insert_post(&db, "b", "Same", "2000").await;
    insert_post(&db, "c", "Other", "3000").await;

    let rows = db
        .query(
            BLOG_CONTENT,
            Fields::All,
            Some(&Condition::eq(COL_TITLE, "Same")),
            None,
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_update_matching_rows() {
    let (_dir, db) = test_db();
    insert_post(&db, "a", "Old", "1000").await;
    insert_post(&db, "b", "Untouched", "2000").await;

    db.update(
        BLOG_CONTENT,
        &[COL_TITLE, COL_CATEGORY],
        &[Some("New".to_string()), Some("life".to_string())],
        &Condition::id("a"),
    )
    .await
    .unwrap();

    let a = db.get_row(BLOG_CONTENT, "a").unwrap().unwrap();
    assert_eq!(a.get(COL_TITLE), Some("New"));
    assert_eq!(a.get(COL_CATEGORY), Some("life"));
    assert_eq!(a.get(COL_PUBLISHED_AT), Some("1000"));

    let b = db.get_row(BLOG_CONTENT, "b").unwrap().unwrap();
    assert_eq!(b.get(COL_TITLE), Some("Untouched"));
}

#[tokio::test]
async fn test_update_missing_row_is_noop() {
    let (_dir, db) = test_db();

    db.update(
        BLOG_DRAFT,
        &[COL_TITLE],
        &[Some("x".to_string())],
        &Condition::id("ghost"),
    )
    .await
    .unwrap();

    assert!(db.get_row(BLOG_DRAFT, "ghost").unwrap().is_none());
}

#[test]
fn test_update_rows_rejects_id_assignment() {
    let (_dir, db) = test_db();
    let row: Row = [(COL_ID, Some("a".to_string()))].into_iter().collect();
    db.put_row(BLOG_DRAFT, &row).unwrap();

    let err = db
        .update_rows(
            BLOG_DRAFT,
            &[(COL_ID, Some("b".to_string()))],
            &Condition::id("a"),
        )
        .unwrap_err();
    assert!(matches!(err, DatabaseError::ImmutableKey(_)));
}

#[tokio::test]
async fn test_delete_rows() {
    let (_dir, db) = test_db();
    insert_post(&db, "a", "A", "1000").await;
    insert_post(&db, "b", "B", "2000").await;

    db.delete(BLOG_CONTENT, &Condition::id("a")).await.unwrap();
    // Deleting again is not an error
    db.delete(BLOG_CONTENT, &Condition::id("a")).await.unwrap();

    let rows = db.query(BLOG_CONTENT, Fields::All, None, None).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id(), Some("b"));
}

#[tokio::test]
async fn test_unknown_table_rejected() {
    let (_dir, db) = test_db();

    let err = db
        .query("blog_comments", Fields::All, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::UnknownTable(_)));
}

#[tokio::test]
async fn test_field_value_arity_mismatch() {
    let (_dir, db) = test_db();

    let err = db
        .insert(BLOG_DRAFT, &[COL_ID, COL_TITLE], &[Some("a".to_string())])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::FieldMismatch {
            fields: 2,
            values: 1
        }
    ));
}

#[tokio::test]
async fn test_rows_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let db = Database::open(dir.path().join("data")).unwrap();
        insert_post(&db, "kept", "Kept", "1000").await;
    }

    let db = Database::open(dir.path().join("data")).unwrap();
    let row = db.get_row(BLOG_CONTENT, "kept").unwrap().unwrap();
    assert_eq!(row.get(COL_TITLE), Some("Kept"));
}
