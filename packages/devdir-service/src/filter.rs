use crate::{
	Error, ProfileRepository, Result,
	ranking::{self, Criteria, ExecutableQuery},
};
use devdir_storage::Document;

impl ProfileRepository {
	/// Runs `criteria` and returns the documents in the order the store produced them.
	pub async fn filter(&self, criteria: &Criteria) -> Result<Vec<Document>> {
		let collection = self.collection();

		match ranking::build_query(criteria) {
			ExecutableQuery::Pipeline(stages) => {
				let key = match criteria {
					Criteria::Named(strategy) => format!("strategy={strategy}"),
					Criteria::RawEqual(_) => "pipeline".to_string(),
				};

				tracing::debug!(
					collection,
					%key,
					stages = stages.len(),
					"Running ranking pipeline."
				);

				self.store
					.aggregate(collection, &stages)
					.await
					.map_err(|err| Error::storage("aggregate", collection, key, err))
			},
			ExecutableQuery::Match(filter) => {
				let key = filter.keys().cloned().collect::<Vec<_>>().join(",");

				tracing::debug!(collection, %key, "Running raw equality filter.");

				self.store
					.find_many(collection, &filter)
					.await
					.map_err(|err| Error::storage("find_many", collection, key, err))
			},
		}
	}

	pub async fn filter_token(&self, token: &str) -> Result<Vec<Document>> {
		let criteria = Criteria::parse_token(token)?;

		self.filter(&criteria).await
	}
}
