use uuid::Uuid;

use crate::{Error, ProfileRepository, Result};
use devdir_domain::FIELD_ID;
use devdir_storage::{WriteAck, filter_eq};

impl ProfileRepository {
	/// Removes the profile with `id`. A missing profile reports `matched == 0`.
	pub async fn delete(&self, id: Uuid) -> Result<WriteAck> {
		let filter = filter_eq(FIELD_ID, id.to_string());
		let ack = self
			.store
			.delete(self.collection(), &filter)
			.await
			.map_err(|err| Error::storage("delete", self.collection(), format!("id={id}"), err))?;

		tracing::info!(profile_id = %id, matched = ack.matched, "Profile delete applied.");

		Ok(ack)
	}
}
