use rusqlite::Connection;
use tracing::debug;

use crate::models::{EntryId, UserId, UserRow};
use crate::{Database, Result, StoreError};
use passvault_types::models::UserSummary;

impl Database {
    // -- Users --

    /// Fails with `DuplicateUsername` if the name is taken.
    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<UserId> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
                (username, password_hash),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn find_user(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn get_user_by_id(&self, id: UserId) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    /// Replace the login hash of an existing user.
    pub fn update_password(&self, id: UserId, password_hash: &str) -> Result<()> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET password_hash = ?1 WHERE id = ?2",
                rusqlite::params![password_hash, id],
            )?;
            if changed == 0 {
                return Err(StoreError::UnknownUser);
            }
            Ok(())
        })
    }

    /// Delete a user. Their history goes with them (ON DELETE CASCADE).
    pub fn delete_user(&self, id: UserId) -> Result<()> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            if changed == 0 {
                return Err(StoreError::UnknownUser);
            }
            Ok(())
        })
    }

    /// All users, optionally narrowed to names containing `filter`
    /// (case-insensitive). Ordered by id.
    pub fn list_users(&self, filter: Option<&str>) -> Result<Vec<UserSummary>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, username FROM users
                 WHERE ?1 IS NULL OR instr(lower(username), lower(?1)) > 0
                 ORDER BY id",
            )?;

            let rows = stmt
                .query_map([filter], |row| {
                    Ok(UserSummary {
                        id: row.get(0)?,
                        username: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Password history --

    /// Fails with `UnknownUser` if `user_id` references no user.
    pub fn append_history(&self, user_id: UserId, password_hash: &str) -> Result<EntryId> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO passwords (user_id, password_hash) VALUES (?1, ?2)",
                rusqlite::params![user_id, password_hash],
            )?;
            let id = conn.last_insert_rowid();
            debug!("History entry {} appended for user {}", id, user_id);
            Ok(id)
        })
    }

    /// Most recent first, at most `limit` hashes.
    pub fn recent_history(&self, user_id: UserId, limit: u32) -> Result<Vec<String>> {
        self.with_conn(|conn| query_history(conn, user_id, limit))
    }

    pub fn latest_history(&self, user_id: UserId) -> Result<Option<String>> {
        Ok(self.recent_history(user_id, 1)?.into_iter().next())
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, password_hash, created_at FROM users WHERE username = ?1",
    )?;

    let row = stmt.query_row([username], map_user).optional()?;
    Ok(row)
}

fn query_user_by_id(conn: &Connection, id: UserId) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, password_hash, created_at FROM users WHERE id = ?1")?;

    let row = stmt.query_row([id], map_user).optional()?;
    Ok(row)
}

fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn query_history(conn: &Connection, user_id: UserId, limit: u32) -> Result<Vec<String>> {
    // id is monotonic, so it doubles as insertion order
    let mut stmt = conn.prepare(
        "SELECT password_hash FROM passwords
         WHERE user_id = ?1
         ORDER BY id DESC
         LIMIT ?2",
    )?;

    let rows = stmt
        .query_map(rusqlite::params![user_id, limit], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;

    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn create_and_find_user() {
        let db = db();
        let id = db.create_user("alice", "hash-a").unwrap();

        let user = db.find_user("alice").unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username, "alice");
        assert_eq!(user.password_hash, "hash-a");
        assert!(!user.created_at.is_empty());

        assert!(db.find_user("bob").unwrap().is_none());
        assert_eq!(db.get_user_by_id(id).unwrap().unwrap().username, "alice");
        assert!(db.get_user_by_id(id + 100).unwrap().is_none());
    }

    #[test]
    fn duplicate_username_rejected() {
        let db = db();
        db.create_user("alice", "h1").unwrap();

        let err = db.create_user("alice", "h2").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername));

        // A distinct name still works after the failure
        db.create_user("carol", "h3").unwrap();
        assert_eq!(db.find_user("alice").unwrap().unwrap().password_hash, "h1");
    }

    #[test]
    fn history_is_most_recent_first_and_bounded() {
        let db = db();
        let uid = db.create_user("alice", "h").unwrap();

        for i in 0..5 {
            db.append_history(uid, &format!("p{}", i)).unwrap();
        }

        assert_eq!(db.recent_history(uid, 3).unwrap(), vec!["p4", "p3", "p2"]);
        assert_eq!(db.recent_history(uid, 10).unwrap().len(), 5);
        assert_eq!(db.latest_history(uid).unwrap().as_deref(), Some("p4"));
    }

    #[test]
    fn history_is_per_user() {
        let db = db();
        let a = db.create_user("alice", "h").unwrap();
        let b = db.create_user("bob", "h").unwrap();

        db.append_history(a, "a1").unwrap();
        db.append_history(b, "b1").unwrap();
        db.append_history(a, "a2").unwrap();

        assert_eq!(db.recent_history(a, 10).unwrap(), vec!["a2", "a1"]);
        assert_eq!(db.recent_history(b, 10).unwrap(), vec!["b1"]);
    }

    #[test]
    fn empty_history() {
        let db = db();
        let uid = db.create_user("alice", "h").unwrap();
        assert!(db.recent_history(uid, 10).unwrap().is_empty());
        assert!(db.latest_history(uid).unwrap().is_none());
    }

    #[test]
    fn append_history_for_unknown_user() {
        let db = db();
        let err = db.append_history(42, "h").unwrap_err();
        assert!(matches!(err, StoreError::UnknownUser));
    }

    #[test]
    fn update_password_replaces_hash() {
        let db = db();
        let uid = db.create_user("alice", "old").unwrap();

        db.update_password(uid, "new").unwrap();
        assert_eq!(db.find_user("alice").unwrap().unwrap().password_hash, "new");

        let err = db.update_password(uid + 1, "x").unwrap_err();
        assert!(matches!(err, StoreError::UnknownUser));
    }

    #[test]
    fn delete_user_cascades_history() {
        let db = db();
        let uid = db.create_user("alice", "h").unwrap();
        db.append_history(uid, "p1").unwrap();

        db.delete_user(uid).unwrap();
        assert!(db.find_user("alice").unwrap().is_none());

        let orphans: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM passwords", [], |r| r.get(0))?)
            })
            .unwrap();
        assert_eq!(orphans, 0);

        let err = db.delete_user(uid).unwrap_err();
        assert!(matches!(err, StoreError::UnknownUser));
    }

    #[test]
    fn list_users_with_filter() {
        let db = db();
        db.create_user("alice", "h").unwrap();
        db.create_user("Malice", "h").unwrap();
        db.create_user("bob", "h").unwrap();

        let all = db.list_users(None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].username, "alice");

        let names: Vec<String> = db
            .list_users(Some("ALI"))
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["alice", "Malice"]);

        // Wildcards are literal
        assert!(db.list_users(Some("%")).unwrap().is_empty());
    }

    #[test]
    fn reopen_keeps_data() {
        let dir = std::env::temp_dir().join(format!("passvault_db_test_{}", std::process::id()));
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("reopen.db");
        let _ = std::fs::remove_file(&path);

        {
            let db = Database::open(&path).unwrap();
            let uid = db.create_user("alice", "h").unwrap();
            db.append_history(uid, "p1").unwrap();
        }

        let db = Database::open(&path).unwrap();
        let user = db.find_user("alice").unwrap().unwrap();
        assert_eq!(db.recent_history(user.id, 10).unwrap(), vec!["p1"]);
        assert_eq!(
            db.with_conn(crate::migrations::current_version).unwrap(),
            1
        );

        drop(db);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
