use crate::instance::Record;
use crate::{Db, Instance, Result};

use keel_core::schema::app::{ManyToOne, Resource};
use keel_core::stmt::{Key, Row};
use keel_core::{err, Error};

use async_recursion::async_recursion;
use std::{fmt, sync::Arc};

/// Stands in for the parent of a many-to-one relationship. The parent is
/// fetched the first time it is needed and cached until [`reload`].
///
/// [`reload`]: BelongsTo::reload
pub struct BelongsTo {
    relationship: Arc<ManyToOne>,

    /// Child key the cached state was resolved for
    child_key: Key,

    state: State,
}

enum State {
    Unresolved,
    Empty,

    /// Either loaded from storage or assigned. An assigned parent may not
    /// have been saved yet.
    Present(Box<Instance>),
}

impl BelongsTo {
    pub(crate) fn new(relationship: Arc<ManyToOne>) -> Self {
        Self {
            relationship,
            child_key: vec![],
            state: State::Unresolved,
        }
    }

    pub fn relationship(&self) -> &Arc<ManyToOne> {
        &self.relationship
    }

    pub fn name(&self) -> &str {
        &self.relationship.name
    }

    pub fn child_key(&self) -> &Key {
        &self.child_key
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self.state, State::Unresolved)
    }

    /// The cached parent, without touching storage.
    pub fn parent(&self) -> Option<&Instance> {
        match &self.state {
            State::Present(parent) => Some(parent),
            _ => None,
        }
    }

    pub fn parent_mut(&mut self) -> Option<&mut Instance> {
        match &mut self.state {
            State::Present(parent) => Some(parent),
            _ => None,
        }
    }

    /// Drops the cached parent. The next access queries storage again.
    pub fn reload(&mut self) -> &mut Self {
        self.state = State::Unresolved;
        self
    }

    /// Loads the parent for the last known child key unless it is cached.
    pub async fn resolve(&mut self, db: &Db) -> Result<Option<&mut Instance>> {
        if let State::Unresolved = self.state {
            let db = db.repository(&self.relationship.repository)?;
            let row = self
                .relationship
                .lookup(db.schema(), db.mapping(), db.driver(), self.child_key.clone())
                .await?;

            self.state = self.resolved(&db, row);
        }

        Ok(self.parent_mut())
    }

    /// Loads the parent of `child` unless it is cached.
    pub(crate) async fn resolve_for(
        &mut self,
        db: &Db,
        child: &Record,
    ) -> Result<Option<&mut Instance>> {
        if let State::Unresolved = self.state {
            let db = db.repository(&self.relationship.repository)?;
            let row = self
                .relationship
                .get_parent(db.schema(), db.mapping(), db.driver(), child)
                .await?;

            self.state = self.resolved(&db, row);
        }

        Ok(self.parent_mut())
    }

    /// The parent, or a `RecordNotFound` error when there is none.
    pub async fn target(&mut self, db: &Db) -> Result<&mut Instance> {
        self.resolve(db).await?;

        let BelongsTo {
            relationship,
            child_key,
            state,
        } = self;

        match state {
            State::Present(parent) => Ok(parent),
            _ => Err(Error::record_not_found(format!(
                "{} key={child_key:?}",
                relationship.target_name
            ))
            .context(err!(
                "{}::{}",
                db.schema().model_name(relationship.source),
                relationship.name
            ))),
        }
    }

    /// Forgets the cached state if the child key changed since it was
    /// resolved.
    pub(crate) fn sync_child_key(&mut self, child: &Record) {
        let key = self.relationship.child_key(child);

        if key != self.child_key {
            self.child_key = key;
            self.state = State::Unresolved;
        }
    }

    /// Assigns `parent` to `child`. A saved parent, or no parent, is attached
    /// right away; an unsaved parent waits for [`BelongsTo::save`].
    pub(crate) fn replace(&mut self, child: &mut Record, parent: Option<Instance>) -> Result<()> {
        match parent {
            None => {
                self.relationship.attach_parent(child, None)?;
                self.state = State::Empty;
            }
            Some(parent) => {
                if parent.model_id() != self.relationship.target {
                    return Err(Error::type_mismatch(
                        child.schema.model_name(self.relationship.target),
                        parent.model_name(),
                    ));
                }

                if !parent.is_new() {
                    self.relationship
                        .attach_parent(child, Some(&parent.record as &dyn Resource))?;
                }

                self.state = State::Present(Box::new(parent));
            }
        }

        self.child_key = self.relationship.child_key(child);
        Ok(())
    }

    /// Saves an assigned parent that is still new, in the relationship's
    /// repository, then attaches it to `child`.
    ///
    /// The two steps are not atomic: if attaching fails the parent stays
    /// saved.
    #[async_recursion]
    pub(crate) async fn save(&mut self, db: &Db, child: &mut Record) -> Result<()> {
        let State::Present(parent) = &mut self.state else {
            return Ok(());
        };

        if !parent.is_new() {
            return Ok(());
        }

        let db = db.repository(&self.relationship.repository)?;
        parent.save(&db).await?;

        self.relationship
            .attach_parent(child, Some(&parent.record as &dyn Resource))?;
        self.child_key = self.relationship.child_key(child);
        Ok(())
    }

    fn resolved(&self, db: &Db, row: Option<Row>) -> State {
        match row {
            Some(row) => State::Present(Box::new(db.hydrate(self.relationship.target, row))),
            None => State::Empty,
        }
    }
}

impl fmt::Debug for BelongsTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fmt = f.debug_struct("BelongsTo");
        fmt.field("name", &self.relationship.name);
        fmt.field("child_key", &self.child_key);

        match &self.state {
            State::Unresolved => fmt.field("parent", &"<not loaded>"),
            State::Empty => fmt.field("parent", &"None"),
            State::Present(parent) => fmt.field("parent", parent),
        };

        fmt.finish()
    }
}
