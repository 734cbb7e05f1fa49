use keel::driver::Operation;
use keel::stmt::Value;
use pretty_assertions::assert_eq;
use tests::fixtures;

#[tokio::test]
async fn lazy_group_loads_once_for_the_result_set() {
    let (db, driver) = fixtures::seeded_blog();
    let log = driver.log();

    let mut articles = db
        .all(
            "Article",
            vec![vec![Value::from(1i64)], vec![Value::from(2i64)]],
        )
        .await
        .unwrap();
    assert_eq!(articles.len(), 2);
    log.clear();

    assert_eq!(
        articles[0].get(&db, "body").await.unwrap(),
        Value::from("Engines body")
    );

    let Some(Operation::LoadFields(op)) = log.pop() else {
        panic!("expected a lazy load");
    };
    assert_eq!(op.table, "articles");
    assert_eq!(
        op.keys,
        vec![vec![Value::from(1i64)], vec![Value::from(2i64)]]
    );
    assert_eq!(op.fields, ["body", "summary"]);

    // the rest of the group, and the sibling, come from the first load
    assert_eq!(
        articles[0].get(&db, "summary").await.unwrap(),
        Value::from("Engines summary")
    );
    assert_eq!(
        articles[1].get(&db, "body").await.unwrap(),
        Value::from("Compilers body")
    );
    assert_eq!(
        articles[1].get(&db, "summary").await.unwrap(),
        Value::from("Compilers summary")
    );
    assert!(log.is_empty());

    // another group is another batch
    assert_eq!(
        articles[1].get(&db, "notes").await.unwrap(),
        Value::from("Compilers notes")
    );
    assert_eq!(
        articles[0].get(&db, "notes").await.unwrap(),
        Value::from("Engines notes")
    );
    assert_eq!(log.count_load_fields(), 1);
}

#[tokio::test]
async fn a_single_record_loads_alone() {
    let (db, driver) = fixtures::seeded_blog();
    let log = driver.log();

    let mut article = db.get("Article", 3i64).await.unwrap().unwrap();
    log.clear();

    assert_eq!(
        article.get(&db, "summary").await.unwrap(),
        Value::from("Drafts summary")
    );

    let Some(Operation::LoadFields(op)) = log.pop() else {
        panic!("expected a lazy load");
    };
    assert_eq!(op.keys, vec![vec![Value::from(3i64)]]);
}

#[tokio::test]
async fn local_assignments_survive_a_lazy_load() {
    let (db, _driver) = fixtures::seeded_blog();

    let mut article = db.get("Article", 1i64).await.unwrap().unwrap();
    article.set("summary", "Edited").unwrap();

    assert_eq!(
        article.get(&db, "body").await.unwrap(),
        Value::from("Engines body")
    );
    assert_eq!(
        article.get(&db, "summary").await.unwrap(),
        Value::from("Edited")
    );
    assert!(article.attributes().is_dirty("summary"));
}

#[tokio::test]
async fn new_instances_never_load() {
    let (db, driver) = fixtures::seeded_blog();
    let log = driver.log();
    log.clear();

    let mut article = db.instance("Article").unwrap();
    assert_eq!(article.get(&db, "body").await.unwrap(), Value::Null);
    assert!(log.is_empty());
}
