use passvault_types::models::UserSummary;

// Database row types. These map directly to SQLite rows and stay separate
// from the passvault-types wire models.

pub type UserId = i64;
pub type EntryId = i64;

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub created_at: String,
}

impl From<UserRow> for UserSummary {
    fn from(row: UserRow) -> Self {
        UserSummary {
            id: row.id,
            username: row.username,
        }
    }
}
