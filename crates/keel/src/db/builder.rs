use super::{Db, Repository, Shared};
use crate::Result;

use keel_core::schema::{Mapping, RepositoryName};
use keel_core::{err, Driver, Schema};

use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    drivers: IndexMap<RepositoryName, Arc<dyn Driver>>,
}

impl Builder {
    /// Backs the default repository with `driver`.
    pub fn driver(&mut self, driver: impl Driver) -> &mut Self {
        self.repository(RepositoryName::DEFAULT, driver)
    }

    /// Backs the named repository with `driver`.
    pub fn repository(&mut self, name: impl Into<RepositoryName>, driver: impl Driver) -> &mut Self {
        self.drivers.insert(name.into(), Arc::new(driver));
        self
    }

    pub fn build(&mut self, schema: Schema) -> Result<Db> {
        if !self.drivers.contains_key(&RepositoryName::DEFAULT) {
            return Err(err!("no driver registered for the `default` repository"));
        }

        let schema = Arc::new(schema);

        let repositories = self
            .drivers
            .iter()
            .map(|(name, driver)| {
                let mapping = Mapping::new(&schema, name.clone(), driver.naming_convention());
                let repository = Repository {
                    driver: driver.clone(),
                    mapping,
                };
                (name.clone(), repository)
            })
            .collect::<IndexMap<_, _>>();

        log::debug!(
            "opened db with {} models over {} repositories",
            schema.models.len(),
            repositories.len()
        );

        Ok(Db {
            shared: Arc::new(Shared {
                schema,
                repositories,
            }),
            repository: RepositoryName::DEFAULT,
        })
    }
}
