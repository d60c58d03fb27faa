use crate::{Error, ProfileRepository, Result};
use devdir_domain::{FIELD_GITHUB_USERNAME, Profile};
use devdir_storage::filter_eq;

impl ProfileRepository {
	/// Point lookup by `github_username`. Absence is not an error.
	pub async fn get_by_identity(&self, github_username: &str) -> Result<Option<Profile>> {
		let filter = filter_eq(FIELD_GITHUB_USERNAME, github_username);
		let document = self.store.find_one(self.collection(), &filter).await.map_err(|err| {
			Error::storage(
				"find_one",
				self.collection(),
				format!("{FIELD_GITHUB_USERNAME}={github_username}"),
				err,
			)
		})?;

		document.map(crate::to_profile).transpose()
	}

	/// Every profile in native store order. No paging.
	pub async fn get_all(&self) -> Result<Vec<Profile>> {
		let documents = self
			.store
			.find_all(self.collection())
			.await
			.map_err(|err| Error::storage("find_all", self.collection(), "*", err))?;

		documents.into_iter().map(crate::to_profile).collect()
	}
}
