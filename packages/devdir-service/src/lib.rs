pub mod counters;
pub mod delete;
pub mod filter;
pub mod get;
pub mod ranking;
pub mod save;
pub mod update;

mod error;

pub use error::{Error, Result};
pub use ranking::{Criteria, ExecutableQuery, Strategy, build_query};
pub use save::SaveResponse;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use devdir_config::{Config, Identity};
use devdir_domain::Profile;
use devdir_providers::github::{self, IdentityLookup};
use devdir_storage::{Document, DocumentStore};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait IdentityProvider
where
	Self: Send + Sync,
{
	fn lookup<'a>(
		&'a self,
		cfg: &'a Identity,
		username: &'a str,
	) -> BoxFuture<'a, devdir_providers::Result<IdentityLookup>>;
}

/// Profile data access: writes, point reads, and ranked listings over one collection.
pub struct ProfileRepository {
	pub cfg: Config,
	store: Arc<dyn DocumentStore>,
	identity: Arc<dyn IdentityProvider>,
}
impl ProfileRepository {
	pub fn new(cfg: Config, store: Arc<dyn DocumentStore>) -> Self {
		Self::with_identity(cfg, store, Arc::new(GitHubIdentity))
	}

	pub fn with_identity(
		cfg: Config,
		store: Arc<dyn DocumentStore>,
		identity: Arc<dyn IdentityProvider>,
	) -> Self {
		Self { cfg, store, identity }
	}

	pub fn collection(&self) -> &str {
		&self.cfg.storage.collection
	}
}

struct GitHubIdentity;
impl IdentityProvider for GitHubIdentity {
	fn lookup<'a>(
		&'a self,
		cfg: &'a Identity,
		username: &'a str,
	) -> BoxFuture<'a, devdir_providers::Result<IdentityLookup>> {
		Box::pin(github::lookup(cfg, username))
	}
}

pub(crate) fn to_document<T>(value: &T) -> Result<Document>
where
	T: serde::Serialize,
{
	match serde_json::to_value(value) {
		Ok(Value::Object(map)) => Ok(map),
		Ok(other) => Err(Error::Internal { message: format!("Expected an object, got {other}.") }),
		Err(err) => Err(Error::Internal { message: err.to_string() }),
	}
}

pub(crate) fn to_profile(document: Document) -> Result<Profile> {
	serde_json::from_value(Value::Object(document))
		.map_err(|err| Error::Internal { message: format!("Stored profile is malformed: {err}") })
}
