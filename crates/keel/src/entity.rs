use crate::{BelongsTo, Db, Instance, Result};

use async_trait::async_trait;
use keel_core::stmt::{Key, Value};

/// Operations shared by instances and the proxies standing in for them.
///
/// A [`BelongsTo`] forwards each call to its parent, loading it first. When
/// there is no parent the call fails with `RecordNotFound`.
#[async_trait]
pub trait Entity: Send {
    async fn model_name(&mut self, db: &Db) -> Result<String>;

    async fn get(&mut self, db: &Db, name: &str) -> Result<Value>;

    async fn set(&mut self, db: &Db, name: &str, value: Value) -> Result<()>;

    async fn key(&mut self, db: &Db) -> Result<Key>;

    async fn is_new(&mut self, db: &Db) -> Result<bool>;

    async fn association<'a>(
        &'a mut self,
        db: &Db,
        name: &str,
    ) -> Result<Option<&'a mut BelongsTo>>;
}

#[async_trait]
impl Entity for Instance {
    async fn model_name(&mut self, _db: &Db) -> Result<String> {
        Ok(Instance::model_name(self))
    }

    async fn get(&mut self, db: &Db, name: &str) -> Result<Value> {
        Instance::get(self, db, name).await
    }

    async fn set(&mut self, _db: &Db, name: &str, value: Value) -> Result<()> {
        Instance::set(self, name, value)
    }

    async fn key(&mut self, _db: &Db) -> Result<Key> {
        Ok(Instance::key(self))
    }

    async fn is_new(&mut self, _db: &Db) -> Result<bool> {
        Ok(Instance::is_new(self))
    }

    async fn association<'a>(
        &'a mut self,
        db: &Db,
        name: &str,
    ) -> Result<Option<&'a mut BelongsTo>> {
        Instance::association(self, db, name).await
    }
}

#[async_trait]
impl Entity for BelongsTo {
    async fn model_name(&mut self, db: &Db) -> Result<String> {
        Ok(Instance::model_name(self.target(db).await?))
    }

    async fn get(&mut self, db: &Db, name: &str) -> Result<Value> {
        Instance::get(self.target(db).await?, db, name).await
    }

    async fn set(&mut self, db: &Db, name: &str, value: Value) -> Result<()> {
        Instance::set(self.target(db).await?, name, value)
    }

    async fn key(&mut self, db: &Db) -> Result<Key> {
        Ok(Instance::key(self.target(db).await?))
    }

    async fn is_new(&mut self, db: &Db) -> Result<bool> {
        Ok(Instance::is_new(self.target(db).await?))
    }

    async fn association<'a>(
        &'a mut self,
        db: &Db,
        name: &str,
    ) -> Result<Option<&'a mut BelongsTo>> {
        Instance::association(self.target(db).await?, db, name).await
    }
}
