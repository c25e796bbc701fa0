use serde::{Deserialize, Serialize};

/// Public view of a user. Password hashes never leave the store through this
/// type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
}
