//! Turns a ranking intent into something a [`devdir_storage::DocumentStore`] can execute.
//!
//! Named strategies become an aggregation pipeline: optional computed fields, one descending
//! sort, then the redaction stage. A raw equality mapping passes through untouched, without
//! ordering or redaction.

use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use serde_json::Value;

use crate::{Error, Result};
use devdir_domain::{
	FIELD_COMBINED_SCORE, FIELD_CREATED_AT, FIELD_PROFILE_LIKES, FIELD_PROFILE_VIEWS,
	REDACTED_FIELDS,
};
use devdir_storage::{Expr, Filter, INTERNAL_ID_FIELD, SortKey, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
	Latest,
	Trending,
	Popular,
	/// Currently ranks exactly like [`Strategy::Popular`].
	Creative,
	Hot,
}
impl Strategy {
	pub const ALL: [Self; 5] =
		[Self::Latest, Self::Trending, Self::Popular, Self::Creative, Self::Hot];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Latest => "latest",
			Self::Trending => "trending",
			Self::Popular => "popular",
			Self::Creative => "creative",
			Self::Hot => "hot",
		}
	}

	/// Field the strategy sorts on, descending.
	pub fn sort_field(self) -> &'static str {
		match self {
			Self::Latest => FIELD_CREATED_AT,
			Self::Trending => FIELD_PROFILE_VIEWS,
			Self::Popular | Self::Creative => FIELD_PROFILE_LIKES,
			Self::Hot => FIELD_COMBINED_SCORE,
		}
	}
}
impl FromStr for Strategy {
	type Err = Error;

	fn from_str(token: &str) -> Result<Self> {
		Self::ALL
			.into_iter()
			.find(|strategy| strategy.as_str() == token)
			.ok_or_else(|| Error::UnknownStrategy { token: token.to_string() })
	}
}
impl Display for Strategy {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Criteria {
	Named(Strategy),
	/// Field-equality match returned as stored, email included.
	RawEqual(Filter),
}
impl Criteria {
	pub fn parse_token(token: &str) -> Result<Self> {
		token.trim().parse().map(Self::Named)
	}

	/// A JSON string is a strategy token and a JSON object is a raw equality filter.
	pub fn from_value(value: Value) -> Result<Self> {
		match value {
			Value::String(token) => Self::parse_token(&token),
			Value::Object(filter) => Ok(Self::RawEqual(filter)),
			other => Err(Error::InvalidRequest {
				message: format!("Criteria must be a strategy name or an object, got {other}."),
			}),
		}
	}
}
impl From<Strategy> for Criteria {
	fn from(strategy: Strategy) -> Self {
		Self::Named(strategy)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutableQuery {
	Pipeline(Vec<Stage>),
	Match(Filter),
}

pub fn build_query(criteria: &Criteria) -> ExecutableQuery {
	match criteria {
		Criteria::Named(strategy) => ExecutableQuery::Pipeline(strategy_pipeline(*strategy)),
		Criteria::RawEqual(filter) => ExecutableQuery::Match(filter.clone()),
	}
}

/// Drops the store identifier and every sensitive field.
pub fn redaction_stage() -> Stage {
	let mut fields = vec![INTERNAL_ID_FIELD.to_string()];

	fields.extend(REDACTED_FIELDS.iter().map(|field| field.to_string()));

	Stage::Project(fields)
}

fn strategy_pipeline(strategy: Strategy) -> Vec<Stage> {
	let mut stages = Vec::with_capacity(3);

	if strategy == Strategy::Hot {
		stages.push(Stage::AddFields(vec![(
			FIELD_COMBINED_SCORE.to_string(),
			Expr::Sqrt(Box::new(Expr::Multiply(vec![
				Expr::field(FIELD_PROFILE_LIKES),
				Expr::field(FIELD_PROFILE_VIEWS),
			]))),
		)]));
	}

	stages.push(Stage::Sort(vec![SortKey::descending(strategy.sort_field())]));
	stages.push(redaction_stage());

	stages
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tokens_round_trip() {
		for strategy in Strategy::ALL {
			assert_eq!(strategy.as_str().parse::<Strategy>().expect("parse failed"), strategy);
		}
	}

	#[test]
	fn tokens_are_exact() {
		assert!(matches!("Latest".parse::<Strategy>(), Err(Error::UnknownStrategy { .. })));
		assert!(matches!("bogus".parse::<Strategy>(), Err(Error::UnknownStrategy { .. })));
		assert_eq!(Criteria::parse_token(" hot ").expect("parse failed"), Strategy::Hot.into());
	}

	#[test]
	fn every_named_pipeline_ends_with_redaction() {
		for strategy in Strategy::ALL {
			let ExecutableQuery::Pipeline(stages) = build_query(&strategy.into()) else {
				panic!("Named strategies must build a pipeline.");
			};

			assert_eq!(stages.last(), Some(&redaction_stage()));
			let sort = Stage::Sort(vec![SortKey::descending(strategy.sort_field())]);

			assert!(stages.contains(&sort));
		}
	}

	#[test]
	fn hot_computes_score_before_sorting() {
		let ExecutableQuery::Pipeline(stages) = build_query(&Strategy::Hot.into()) else {
			panic!("Hot must build a pipeline.");
		};

		assert!(matches!(&stages[0], Stage::AddFields(fields) if fields[0].0 == "combined_score"));
		assert_eq!(stages[1], Stage::Sort(vec![SortKey::descending("combined_score")]));
	}

	#[test]
	fn creative_matches_popular() {
		assert_eq!(
			build_query(&Strategy::Creative.into()),
			build_query(&Strategy::Popular.into())
		);
	}

	#[test]
	fn raw_criteria_pass_through() {
		let value = serde_json::json!({ "github_username": "alice" });
		let criteria = Criteria::from_value(value.clone()).expect("parse failed");
		let Value::Object(filter) = value else { unreachable!() };

		assert_eq!(build_query(&criteria), ExecutableQuery::Match(filter));
	}

	#[test]
	fn criteria_reject_other_json() {
		assert!(matches!(
			Criteria::from_value(serde_json::json!(3)),
			Err(Error::InvalidRequest { .. })
		));
		assert!(matches!(
			Criteria::from_value(serde_json::json!("bogus")),
			Err(Error::UnknownStrategy { .. })
		));
	}
}
