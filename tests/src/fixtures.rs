//! Schemas and seeded databases shared by the scenario tests.

use crate::MemoryDriver;

use keel::schema::app::{PropertyOptions, RelationshipOptions, Visibility};
use keel::stmt::Value;
use keel::{Db, Schema};

/// Authors and the articles they write.
///
/// `Article::body` and `Article::summary` are lazy in the default group;
/// `Article::notes` is lazy in its own `editorial` group.
pub fn blog() -> Schema {
    let mut builder = Schema::builder();

    builder
        .model("Author", |m| {
            m.property("id", "Integer", PropertyOptions::new().serial(true))?;
            m.property("name", "String", PropertyOptions::new())?;
            m.property("email", "String", PropertyOptions::new().unique_index(true))?;
            Ok(())
        })
        .unwrap();

    builder
        .model("Article", |m| {
            m.property("id", "Integer", PropertyOptions::new().serial(true))?;
            m.property("title", "String", PropertyOptions::new())?;
            m.property("body", "Text", PropertyOptions::new())?;
            m.property("summary", "Text", PropertyOptions::new())?;
            m.property("notes", "Text", PropertyOptions::new().lazy_group("editorial"))?;
            m.property("published", "Boolean", PropertyOptions::new().default(false))?;
            m.property(
                "views",
                "Integer",
                PropertyOptions::new().default(0i64).writer(Visibility::Private),
            )?;
            m.property(
                "token",
                "String",
                PropertyOptions::new().accessor(Visibility::Protected),
            )?;
            m.belongs_to("author", RelationshipOptions::new())?;
            Ok(())
        })
        .unwrap();

    builder.build().unwrap()
}

/// Opens `schema` over a fresh memory driver in the default repository.
pub fn open(schema: Schema) -> (Db, MemoryDriver) {
    crate::init_logging();

    let driver = MemoryDriver::new();
    let db = Db::builder().driver(driver.clone()).build(schema).unwrap();
    (db, driver)
}

/// The blog schema with two authors and three articles stored.
pub fn seeded_blog() -> (Db, MemoryDriver) {
    let (db, driver) = open(blog());

    for (id, name) in [(1i64, "Ada"), (2, "Grace")] {
        driver.insert_row(
            "authors",
            [
                ("id", Value::from(id)),
                ("name", Value::from(name)),
                ("email", Value::from(format!("{}@example.com", name.to_lowercase()))),
            ],
        );
    }

    let articles = [
        (1i64, "Engines", Some(1i64)),
        (2, "Compilers", Some(2)),
        (3, "Drafts", None),
    ];

    for (id, title, author) in articles {
        driver.insert_row(
            "articles",
            [
                ("id", Value::from(id)),
                ("title", Value::from(title)),
                ("body", Value::from(format!("{title} body"))),
                ("summary", Value::from(format!("{title} summary"))),
                ("notes", Value::from(format!("{title} notes"))),
                ("published", Value::from(true)),
                ("views", Value::from(10)),
                ("token", Value::from(format!("t{id}"))),
                ("author_id", Value::from(author)),
            ],
        );
    }

    (db, driver)
}
