use std::sync::Arc;

use color_eyre::eyre;

use devdir_config::{BACKEND_MEMORY, BACKEND_POSTGRES, Config};
use devdir_domain::FIELD_GITHUB_USERNAME;
use devdir_service::ProfileRepository;
use devdir_storage::{DocumentStore, db::Db, memory::MemoryStore};

#[derive(Clone)]
pub struct AppState {
	pub repository: Arc<ProfileRepository>,
}
impl AppState {
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let collection = config.storage.collection.clone();
		let store: Arc<dyn DocumentStore> = match config.storage.backend.as_str() {
			BACKEND_POSTGRES => {
				let postgres = config.storage.postgres.as_ref().ok_or_else(|| {
					eyre::eyre!("storage.postgres is required when storage.backend is postgres.")
				})?;
				let db = Db::connect(postgres).await?;

				db.ensure_schema().await?;
				db.ensure_unique_key(&collection, FIELD_GITHUB_USERNAME).await?;

				Arc::new(db)
			},
			BACKEND_MEMORY =>
				Arc::new(MemoryStore::new().with_unique_key(&collection, FIELD_GITHUB_USERNAME)),
			other => return Err(eyre::eyre!("Unsupported storage backend {other:?}.")),
		};

		tracing::info!(backend = %config.storage.backend, %collection, "Profile store ready.");

		Ok(Self::from_repository(ProfileRepository::new(config, store)))
	}

	pub fn from_repository(repository: ProfileRepository) -> Self {
		Self { repository: Arc::new(repository) }
	}
}
