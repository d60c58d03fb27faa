pub mod db;
pub mod document;
pub mod memory;
pub mod queries;
pub mod schema;
pub mod store;

mod error;

pub use document::{
	Document, Expr, Filter, INTERNAL_ID_FIELD, InsertAck, SortKey, SortOrder, Stage, WriteAck,
	filter_eq,
};
pub use error::Error;
pub use store::{BoxFuture, DocumentStore};

pub type Result<T, E = Error> = std::result::Result<T, E>;
