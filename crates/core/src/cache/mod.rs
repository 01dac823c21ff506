mod error;
mod json;
mod keys;
mod traits;

pub use error::{CacheError, Result};
pub use json::{get_json, invalidate_prefix, set_json};
pub use keys::{
    decision_key, decision_key_prefix, decisions_by_project_key, decisions_by_project_prefix,
    owned_projects_key, owned_projects_prefix, project_key, project_key_prefix,
    public_projects_key, public_projects_prefix, reset_marker_key, verification_marker_key,
    CacheKey,
};
pub use traits::Cache;
