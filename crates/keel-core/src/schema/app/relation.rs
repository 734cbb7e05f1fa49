mod many_to_one;
pub use many_to_one::{ManyToOne, RelationshipOptions};
