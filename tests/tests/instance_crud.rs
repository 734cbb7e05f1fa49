use keel::driver::Operation;
use keel::stmt::{Row, Value};
use pretty_assertions::assert_eq;
use tests::{fixtures, MemoryDriver};

#[tokio::test]
async fn insert_assigns_the_serial_key_and_applies_defaults() {
    let (db, driver) = fixtures::open(fixtures::blog());

    let mut article = db.instance("Article").unwrap();
    article.set("title", "Hello").unwrap();
    assert!(article.is_new());
    assert_eq!(article.key(), vec![Value::Null]);

    article.save(&db).await.unwrap();

    assert!(!article.is_new());
    assert_eq!(article.key(), vec![Value::from(1i64)]);

    let Some(Operation::Insert(op)) = driver.log().pop() else {
        panic!("expected an insert");
    };

    assert_eq!(op.table, "articles");
    assert_eq!(op.serial.as_deref(), Some("id"));
    // unset properties without a default are left to storage
    assert_eq!(
        op.values.keys().collect::<Vec<_>>(),
        ["title", "published", "views"]
    );
    assert_eq!(op.values["published"], Value::from(false));
    assert_eq!(op.values["views"], Value::from(0i64));

    assert_eq!(driver.rows("articles")[0]["id"], Value::from(1i64));
    assert_eq!(
        article.get(&db, "published").await.unwrap(),
        Value::from(false)
    );
    assert!(article.attributes().dirty().next().is_none());
}

#[tokio::test]
async fn serial_keys_increase() {
    let (db, driver) = fixtures::seeded_blog();

    let mut author = db.instance("Author").unwrap();
    author.set("name", "Barbara").unwrap();
    author.save(&db).await.unwrap();

    assert_eq!(author.key(), vec![Value::from(3i64)]);
    assert_eq!(driver.rows("authors").len(), 3);
}

#[tokio::test]
async fn get_loads_eager_fields_only() {
    let (db, driver) = fixtures::seeded_blog();

    let mut article = db.get("Article", 1i64).await.unwrap().unwrap();

    let Some(Operation::GetByKey(op)) = driver.log().pop() else {
        panic!("expected a get");
    };
    assert_eq!(op.table, "articles");
    assert_eq!(op.key_fields, ["id"]);
    assert_eq!(
        op.select,
        ["id", "title", "published", "views", "token", "author_id"]
    );

    assert!(!article.is_new());
    assert!(!article.attributes().is_loaded("body"));
    assert_eq!(
        article.get(&db, "title").await.unwrap(),
        Value::from("Engines")
    );
}

#[tokio::test]
async fn get_of_a_missing_record_is_none() {
    let (db, _driver) = fixtures::seeded_blog();

    assert!(db.get("Article", 99i64).await.unwrap().is_none());
}

#[tokio::test]
async fn unknown_models_and_malformed_keys() {
    let (db, driver) = fixtures::seeded_blog();

    let err = db.instance("Comment").unwrap_err();
    assert!(err.is_invalid_argument_kind());

    let err = db
        .get_by_key("Article", vec![Value::from(1i64), Value::from(2i64)])
        .await
        .unwrap_err();
    assert!(err.is_invalid_argument_kind());
    assert!(driver.log().is_empty());
}

#[tokio::test]
async fn update_writes_only_dirty_fields() {
    let (db, driver) = fixtures::seeded_blog();
    let log = driver.log();

    let mut article = db.get("Article", 1i64).await.unwrap().unwrap();
    article.set("title", "Engines, revised").unwrap();
    log.clear();

    db.save(&mut article).await.unwrap();

    let Some(Operation::UpdateByKey(op)) = log.pop() else {
        panic!("expected an update");
    };
    assert_eq!(op.key, vec![Value::from(1i64)]);
    assert_eq!(
        op.assignments,
        Row::from_iter([("title".to_string(), Value::from("Engines, revised"))])
    );
    assert_eq!(
        driver.rows("articles")[0]["title"],
        Value::from("Engines, revised")
    );

    // nothing left to write
    article.save(&db).await.unwrap();
    assert!(log.is_empty());
}

#[tokio::test]
async fn update_of_a_vanished_record_is_not_found() {
    let (db, _driver) = fixtures::seeded_blog();
    let mut article = db.get("Article", 2i64).await.unwrap().unwrap();
    article.set("title", "Elsewhere").unwrap();

    let empty = keel::Db::builder()
        .driver(MemoryDriver::new())
        .build(fixtures::blog())
        .unwrap();

    let err = article.save(&empty).await.unwrap_err();
    assert!(err.is_record_not_found());
    assert!(article.attributes().is_dirty("title"));
}
