//! Expansion of a template's recipient selectors into concrete addresses.

use crate::error::{DirectoryError, DispatchError};
use async_trait::async_trait;
use common::model::recipient::{Recipient, RecipientSelector, User};
use std::collections::{HashMap, HashSet};

/// Role given to explicit addresses that do not come from the directory.
pub const EXTERNAL_ROLE: &str = "external";

/// Source of user identities. Only users with an email address are returned.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn users_by_roles(&self, roles: &[String]) -> Result<Vec<User>, DirectoryError>;

    async fn users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, DirectoryError>;
}

/// Resolves `selectors` to a deduplicated recipient list.
///
/// Role members come first in directory order, then explicit users and addresses in
/// selector order. Addresses are compared case-insensitively and the first occurrence
/// wins. An empty result is [`DispatchError::NoValidRecipients`].
pub async fn resolve_recipients(
    directory: &dyn UserDirectory,
    selectors: &[RecipientSelector],
) -> Result<Vec<Recipient>, DispatchError> {
    let roles: Vec<String> = selectors
        .iter()
        .filter_map(|s| match s {
            RecipientSelector::Role(role) => Some(role.clone()),
            _ => None,
        })
        .collect();
    let ids: Vec<i64> = selectors
        .iter()
        .filter_map(|s| match s {
            RecipientSelector::User { user_id } => Some(*user_id),
            _ => None,
        })
        .collect();

    let mut resolved = RecipientList::default();

    if !roles.is_empty() {
        for user in directory.users_by_roles(&roles).await? {
            resolved.push(user.into());
        }
    }

    let users: HashMap<i64, User> = if ids.is_empty() {
        HashMap::new()
    } else {
        directory
            .users_by_ids(&ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect()
    };

    for selector in selectors {
        match selector {
            RecipientSelector::Role(_) => {}
            RecipientSelector::User { user_id } => match users.get(user_id) {
                Some(user) => resolved.push(user.clone().into()),
                None => log::warn!("Recipient user {} not found or has no email", user_id),
            },
            RecipientSelector::Address { email, name } => {
                let email = email.trim().to_string();
                let name = name
                    .clone()
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| local_part(&email).to_string());
                resolved.push(Recipient {
                    name,
                    email,
                    role: EXTERNAL_ROLE.to_string(),
                });
            }
        }
    }

    if resolved.items.is_empty() {
        return Err(DispatchError::NoValidRecipients);
    }
    Ok(resolved.items)
}

#[derive(Default)]
struct RecipientList {
    items: Vec<Recipient>,
    seen: HashSet<String>,
}

impl RecipientList {
    fn push(&mut self, recipient: Recipient) {
        let key = recipient.email.trim().to_lowercase();
        if key.is_empty() || !self.seen.insert(key) {
            return;
        }
        self.items.push(recipient);
    }
}

fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Fixed in-memory user list.
    pub struct StaticDirectory {
        pub users: Vec<User>,
    }

    impl StaticDirectory {
        pub fn new(users: &[(i64, &str, &str, &str)]) -> Self {
            Self {
                users: users
                    .iter()
                    .map(|(id, name, email, role)| User {
                        id: *id,
                        name: name.to_string(),
                        email: email.to_string(),
                        role: role.to_string(),
                    })
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl UserDirectory for StaticDirectory {
        async fn users_by_roles(&self, roles: &[String]) -> Result<Vec<User>, DirectoryError> {
            Ok(self
                .users
                .iter()
                .filter(|u| roles.contains(&u.role))
                .cloned()
                .collect())
        }

        async fn users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, DirectoryError> {
            Ok(self
                .users
                .iter()
                .filter(|u| ids.contains(&u.id))
                .cloned()
                .collect())
        }
    }
}
