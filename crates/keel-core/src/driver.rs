mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::{async_trait, schema::NamingConvention};

use std::fmt::Debug;

/// A storage adapter. Each repository context is backed by one driver.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// How storage names are derived for this driver.
    fn naming_convention(&self) -> NamingConvention {
        NamingConvention::default()
    }

    /// Execute a storage operation
    async fn exec(&self, op: Operation) -> crate::Result<Response>;
}
