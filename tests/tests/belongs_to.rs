use keel::driver::Operation;
use keel::schema::app::{PropertyOptions, RelationshipOptions};
use keel::stmt::Value;
use keel::{Db, Entity, Schema};
use pretty_assertions::assert_eq;
use tests::fixtures;

async fn name_of(entity: &mut (dyn Entity + '_), db: &Db) -> Value {
    entity.get(db, "name").await.unwrap()
}

#[tokio::test]
async fn parent_is_loaded_on_first_access_and_cached() {
    let (db, driver) = fixtures::seeded_blog();
    let log = driver.log();

    let mut article = db.get("Article", 1i64).await.unwrap().unwrap();
    log.clear();

    let author = article.association(&db, "author").await.unwrap().unwrap();
    assert_eq!(name_of(&mut *author, &db).await, Value::from("Ada"));

    let Some(Operation::GetByKey(op)) = log.pop() else {
        panic!("expected a parent lookup");
    };
    assert_eq!(op.table, "authors");
    assert_eq!(op.key_fields, ["id"]);
    assert_eq!(op.key, vec![Value::from(1i64)]);

    article.association(&db, "author").await.unwrap().unwrap();
    assert!(log.is_empty());
}

#[tokio::test]
async fn reload_queries_storage_again_exactly_once() {
    let (db, driver) = fixtures::seeded_blog();
    let log = driver.log();

    let mut article = db.get("Article", 2i64).await.unwrap().unwrap();
    let author = article.association(&db, "author").await.unwrap().unwrap();
    log.clear();

    author.reload();
    assert!(!author.is_resolved());

    assert_eq!(
        author.get(&db, "name").await.unwrap(),
        Value::from("Grace")
    );
    assert_eq!(
        author.get(&db, "email").await.unwrap(),
        Value::from("grace@example.com")
    );
    assert_eq!(log.count_get_by_key(), 1);
    assert_eq!(log.len(), 1);
}

#[tokio::test]
async fn unset_association_is_none_without_a_query() {
    let (db, driver) = fixtures::seeded_blog();
    let log = driver.log();

    let mut article = db.get("Article", 3i64).await.unwrap().unwrap();
    log.clear();

    assert!(article.association(&db, "author").await.unwrap().is_none());
    assert!(log.is_empty());
}

#[tokio::test]
async fn delegating_without_a_parent_is_not_found() {
    let (db, _driver) = fixtures::seeded_blog();
    let mut article = db.get("Article", 3i64).await.unwrap().unwrap();

    let proxy = article.belongs_to("author").unwrap();
    let err = proxy.get(&db, "name").await.unwrap_err();

    assert!(err.is_record_not_found());
    assert_eq!(
        err.to_string(),
        "Article::author: record not found: Author key=[Null]"
    );
    assert!(proxy.is_resolved());
}

#[tokio::test]
async fn proxy_forwards_to_the_parent() {
    let (db, driver) = fixtures::seeded_blog();
    let mut article = db.get("Article", 1i64).await.unwrap().unwrap();

    let author = article.association(&db, "author").await.unwrap().unwrap();
    assert_eq!(author.model_name(&db).await.unwrap(), "Author");
    assert_eq!(author.key(&db).await.unwrap(), vec![Value::from(1i64)]);
    assert!(!author.is_new(&db).await.unwrap());

    author
        .set(&db, "name", Value::from("Ada L."))
        .await
        .unwrap();
    assert_eq!(name_of(&mut *author, &db).await, Value::from("Ada L."));

    // undefined accessors stay undefined through the proxy
    assert!(author
        .get(&db, "nope")
        .await
        .unwrap_err()
        .is_undefined_accessor());

    author.parent_mut().unwrap().save(&db).await.unwrap();
    assert_eq!(driver.rows("authors")[0]["name"], Value::from("Ada L."));
}

#[tokio::test]
async fn saved_parent_is_attached_immediately() {
    let (db, driver) = fixtures::seeded_blog();
    let log = driver.log();

    let mut article = db.get("Article", 3i64).await.unwrap().unwrap();
    let grace = db.get("Author", 2i64).await.unwrap().unwrap();
    log.clear();

    article.set_association("author", Some(grace)).unwrap();
    assert_eq!(
        article.get(&db, "author_id").await.unwrap(),
        Value::from(2i64)
    );

    // the assigned parent is served without a lookup
    let author = article.association(&db, "author").await.unwrap().unwrap();
    assert_eq!(author.parent().unwrap().key(), vec![Value::from(2i64)]);
    assert!(log.is_empty());

    article.save(&db).await.unwrap();

    let Some(Operation::UpdateByKey(op)) = log.pop() else {
        panic!("expected an update");
    };
    assert_eq!(op.table, "articles");
    assert_eq!(op.assignments["author_id"], Value::from(2i64));
    assert!(log.is_empty());
}

#[tokio::test]
async fn pending_parent_is_saved_first_then_attached() {
    let (db, driver) = fixtures::open(fixtures::blog());

    let mut article = db.instance("Article").unwrap();
    article.set("title", "Fresh").unwrap();
    assert!(article.association(&db, "author").await.unwrap().is_none());

    let mut author = db.instance("Author").unwrap();
    author.set("name", "Linus").unwrap();

    article.set_association("author", Some(author)).unwrap();
    assert_eq!(article.get(&db, "author_id").await.unwrap(), Value::Null);
    assert!(driver.log().is_empty());

    article.save(&db).await.unwrap();

    assert_eq!(driver.log().tables(), ["authors", "articles"]);
    assert_eq!(driver.rows("authors")[0]["id"], Value::from(1i64));
    assert_eq!(driver.rows("articles")[0]["author_id"], Value::from(1i64));
    assert_eq!(
        article.get(&db, "author_id").await.unwrap(),
        Value::from(1i64)
    );

    let author = article.association(&db, "author").await.unwrap().unwrap();
    assert!(!author.is_new(&db).await.unwrap());
    assert_eq!(driver.log().len(), 2);
}

#[tokio::test]
async fn clearing_the_association_nulls_the_child_key() {
    let (db, driver) = fixtures::seeded_blog();
    let log = driver.log();

    let mut article = db.get("Article", 1i64).await.unwrap().unwrap();
    log.clear();

    article.set_association("author", None).unwrap();
    assert_eq!(article.get(&db, "author_id").await.unwrap(), Value::Null);
    assert!(article.association(&db, "author").await.unwrap().is_none());
    assert!(log.is_empty());
}

#[tokio::test]
async fn changing_the_child_key_resolves_the_new_parent() {
    let (db, driver) = fixtures::seeded_blog();
    let log = driver.log();

    let mut article = db.get("Article", 1i64).await.unwrap().unwrap();
    article.association(&db, "author").await.unwrap().unwrap();
    log.clear();

    article.set("author_id", 2i64).unwrap();
    let author = article.association(&db, "author").await.unwrap().unwrap();

    assert_eq!(name_of(&mut *author, &db).await, Value::from("Grace"));
    assert_eq!(log.count_get_by_key(), 1);
}

#[tokio::test]
async fn assigning_another_model_is_a_type_mismatch() {
    let (db, _driver) = fixtures::seeded_blog();

    let mut article = db.get("Article", 1i64).await.unwrap().unwrap();
    let other = db.get("Article", 2i64).await.unwrap().unwrap();

    let err = article.set_association("author", Some(other)).unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(
        article.get(&db, "author_id").await.unwrap(),
        Value::from(1i64)
    );

    let err = article.set_association("editor", None).unwrap_err();
    assert!(err.is_undefined_accessor());
}

#[tokio::test]
async fn failed_attach_leaves_the_parent_saved() {
    let mut builder = Schema::builder();
    builder
        .model("Venue", |m| {
            m.property("code", "String", PropertyOptions::new().key(true))?;
            Ok(())
        })
        .unwrap();
    builder
        .model("Event", |m| {
            m.property("id", "Integer", PropertyOptions::new().serial(true))?;
            m.property("venue_on", "Date", PropertyOptions::new())?;
            m.belongs_to("venue", RelationshipOptions::new().child_key(["venue_on"]))?;
            Ok(())
        })
        .unwrap();

    let (db, driver) = fixtures::open(builder.build().unwrap());

    let mut venue = db.instance("Venue").unwrap();
    venue.set("code", "hall-a").unwrap();

    let mut event = db.instance("Event").unwrap();
    event.set_association("venue", Some(venue)).unwrap();

    let err = event.save(&db).await.unwrap_err();
    assert!(err.is_type_coercion());

    assert_eq!(driver.rows("venues").len(), 1);
    assert!(driver.rows("events").is_empty());
    assert!(event.is_new());

    let proxy = event.belongs_to("venue").unwrap();
    assert!(!proxy.parent().unwrap().is_new());
}
