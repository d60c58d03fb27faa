pub mod password;
pub mod profile;
pub mod score;
pub mod time_serde;
pub mod validate;

pub use profile::{NewProfile, Profile, ProfilePatch, ProfileRecord};
pub use score::combined_score;
pub use validate::ValidationError;

pub const FIELD_ID: &str = "id";
pub const FIELD_FULL_NAME: &str = "full_name";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_GITHUB_USERNAME: &str = "github_username";
pub const FIELD_GITHUB_AVATAR: &str = "github_avatar";
pub const FIELD_TAGS: &str = "tags";
pub const FIELD_PROFILE_VIEWS: &str = "profile_views";
pub const FIELD_PROFILE_LIKES: &str = "profile_likes";
pub const FIELD_PASSWORD: &str = "password";
pub const FIELD_CREATED_AT: &str = "created_at";
pub const FIELD_UPDATED_AT: &str = "updated_at";
pub const FIELD_COMBINED_SCORE: &str = "combined_score";

/// Fields that never leave a ranked listing.
pub const REDACTED_FIELDS: [&str; 2] = [FIELD_EMAIL, FIELD_PASSWORD];
