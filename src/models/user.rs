use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub initials: String,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a new user; the hash is produced by the auth layer.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub initials: String,
}

/// Derive display initials from a full name, e.g. "Jane Doe" -> "JD".
pub fn initials_of(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .collect();
    letters.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_from_two_names() {
        assert_eq!(initials_of("Jane Doe"), "JD");
    }

    #[test]
    fn initials_from_single_name() {
        assert_eq!(initials_of("cher"), "C");
    }

    #[test]
    fn initials_ignore_extra_names() {
        assert_eq!(initials_of("Liam James Ottley"), "LJ");
    }

    #[test]
    fn initials_of_blank_name() {
        assert_eq!(initials_of("   "), "");
    }
}
