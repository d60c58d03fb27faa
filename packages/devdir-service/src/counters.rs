use crate::{Error, ProfileRepository, Result};
use devdir_domain::{FIELD_GITHUB_USERNAME, FIELD_PROFILE_LIKES, FIELD_PROFILE_VIEWS};
use devdir_storage::{WriteAck, filter_eq};

impl ProfileRepository {
	pub async fn record_view(&self, github_username: &str) -> Result<WriteAck> {
		self.bump(github_username, FIELD_PROFILE_VIEWS).await
	}

	pub async fn record_like(&self, github_username: &str) -> Result<WriteAck> {
		self.bump(github_username, FIELD_PROFILE_LIKES).await
	}

	async fn bump(&self, github_username: &str, field: &'static str) -> Result<WriteAck> {
		let filter = filter_eq(FIELD_GITHUB_USERNAME, github_username);
		let key = format!("{FIELD_GITHUB_USERNAME}={github_username}");
		let ack = self
			.store
			.increment(self.collection(), &filter, field, 1)
			.await
			.map_err(|err| Error::storage("increment", self.collection(), key, err))?;

		if ack.matched == 0 {
			return Err(Error::NotFound {
				message: format!("Profile {github_username:?} not found."),
			});
		}

		Ok(ack)
	}
}
