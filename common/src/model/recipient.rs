use serde::{Deserialize, Serialize};

/// One entry of a template's recipient specification.
///
/// Stored as a JSON list, where a bare string is a role name:
///
/// ```json
/// ["admin", {"user_id": 7}, {"email": "ada@example.com", "name": "Ada"}]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipientSelector {
    /// Every directory user holding this role.
    Role(String),
    /// A single directory user.
    User { user_id: i64 },
    /// An explicit address outside role groups.
    Address {
        email: String,
        #[serde(default)]
        name: Option<String>,
    },
}

/// A user record as supplied by the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// A concrete, resolved recipient of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<User> for Recipient {
    fn from(user: User) -> Self {
        Recipient {
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}
