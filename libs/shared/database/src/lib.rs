pub mod schema;
pub mod sqlite;

pub use sqlite::{is_unique_violation, Database};
