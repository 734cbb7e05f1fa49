use keel::driver::Operation;
use keel::schema::app::PropertyOptions;
use keel::schema::NamingConvention;
use keel::stmt::Value;
use keel::{Db, Schema};
use pretty_assertions::assert_eq;
use tests::{fixtures, MemoryDriver};

fn archive_db(schema: Schema) -> (Db, MemoryDriver, MemoryDriver) {
    tests::init_logging();

    let main = MemoryDriver::new();
    let archive = MemoryDriver::with_naming(NamingConvention::Identity);

    let db = Db::builder()
        .driver(main.clone())
        .repository("archive", archive.clone())
        .build(schema)
        .unwrap();

    (db, main, archive)
}

#[tokio::test]
async fn contexts_route_to_their_own_driver() {
    let (db, main, archive) = archive_db(fixtures::blog());
    let archived = db.repository("archive").unwrap();
    assert_eq!(archived.repository_name().as_str(), "archive");

    let mut article = archived.instance("Article").unwrap();
    article.set("title", "Old news").unwrap();
    article.save(&archived).await.unwrap();

    assert_eq!(article.repository().as_str(), "archive");
    assert!(main.log().is_empty());

    // identity naming keeps declared names
    let rows = archive.rows("Article");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title"], Value::from("Old news"));
}

#[tokio::test]
async fn unknown_repositories_are_rejected() {
    let (db, _main, _archive) = archive_db(fixtures::blog());

    let err = db.repository("cold-storage").unwrap_err();
    assert!(err.is_invalid_argument_kind());
}

#[tokio::test]
async fn a_default_driver_is_required() {
    let err = Db::builder()
        .repository("archive", MemoryDriver::new())
        .build(fixtures::blog())
        .unwrap_err();

    assert!(err.to_string().contains("default"));
}

#[tokio::test]
async fn parents_are_looked_up_where_the_relationship_was_declared() {
    let (db, main, archive) = archive_db(fixtures::blog());

    main.insert_row(
        "authors",
        [("id", Value::from(1i64)), ("name", Value::from("Ada"))],
    );
    archive.insert_row(
        "Article",
        [
            ("id", Value::from(7i64)),
            ("title", Value::from("Archived")),
            ("author_id", Value::from(1i64)),
        ],
    );

    let archived = db.repository("archive").unwrap();
    let mut article = archived.get("Article", 7i64).await.unwrap().unwrap();

    let author = article
        .association(&archived, "author")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(author.parent().unwrap().repository().as_str(), "default");

    let Some(Operation::GetByKey(op)) = main.log().pop() else {
        panic!("expected the parent lookup in the default repository");
    };
    assert_eq!(op.table, "authors");
    assert_eq!(archive.log().len(), 1);
}

#[tokio::test]
async fn repository_specific_properties() {
    let mut builder = Schema::builder();
    builder
        .model("Report", |m| {
            m.property("id", "Integer", PropertyOptions::new().serial(true))?;
            m.property("title", "String", PropertyOptions::new())?;
            m.repository("archive");
            m.property("archived_on", "Date", PropertyOptions::new())?;
            Ok(())
        })
        .unwrap();

    let (db, main, archive) = archive_db(builder.build().unwrap());
    let archived = db.repository("archive").unwrap();

    let mut current = db.instance("Report").unwrap();
    assert!(current
        .attribute_set("archived_on", "2024-03-01")
        .unwrap_err()
        .is_undefined_accessor());
    current.set("title", "Q1").unwrap();
    current.save(&db).await.unwrap();

    let mut old = archived.instance("Report").unwrap();
    old.set("title", "Q4").unwrap();
    old.attribute_set("archived_on", "2024-03-01").unwrap();
    old.save(&archived).await.unwrap();

    assert_eq!(
        main.rows("reports")[0].keys().collect::<Vec<_>>(),
        ["title", "id"]
    );
    assert_eq!(
        archive.rows("Report")[0]["archived_on"],
        Value::from(jiff::civil::date(2024, 3, 1))
    );
}

#[tokio::test]
async fn public_accessors_follow_the_repository() {
    let mut builder = Schema::builder();
    builder
        .model("Report", |m| {
            m.property("id", "Integer", PropertyOptions::new().serial(true))?;
            m.property("title", "String", PropertyOptions::new().default("current"))?;
            m.repository("archive");
            m.property("title", "String", PropertyOptions::new().default("archived"))?;
            m.property("archived_on", "Date", PropertyOptions::new())?;
            Ok(())
        })
        .unwrap();

    let (db, _main, archive) = archive_db(builder.build().unwrap());
    let archived = db.repository("archive").unwrap();

    let mut current = db.instance("Report").unwrap();
    assert_eq!(current.get(&db, "title").await.unwrap(), Value::from("current"));
    assert!(current
        .set("archived_on", "2024-03-01")
        .unwrap_err()
        .is_undefined_accessor());
    assert!(current.attributes().get("archived_on").is_none());

    let mut old = archived.instance("Report").unwrap();
    assert_eq!(old.get(&archived, "title").await.unwrap(), Value::from("archived"));
    old.set("archived_on", "2024-03-01").unwrap();
    old.save(&archived).await.unwrap();

    let rows = archive.rows("Report");
    assert_eq!(rows[0]["title"], Value::from("archived"));
    assert_eq!(rows[0]["archived_on"], Value::from(jiff::civil::date(2024, 3, 1)));
}
