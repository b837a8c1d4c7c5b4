//! Operator list used for every privileged command.

use std::collections::BTreeSet;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info};

use super::Authorizer;

#[derive(Debug, Default)]
pub struct Operators {
    users: RwLock<BTreeSet<String>>,
}

impl Operators {
    pub fn new<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            users: RwLock::new(users.into_iter().map(Into::into).collect()),
        }
    }

    /// Grants operator status. Returns false if `user` already had it.
    pub fn add(&self, user: &str) -> bool {
        let added = self
            .users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user.to_string());
        if added {
            info!("{} is now an operator", user);
        }
        added
    }

    /// Revokes operator status. The last operator cannot be removed.
    pub fn remove(&self, user: &str) -> bool {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        if users.len() <= 1 || !users.remove(user) {
            return false;
        }
        info!("{} is no longer an operator", user);
        true
    }

    pub fn list(&self) -> Vec<String> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

impl Authorizer for Operators {
    fn is_operator(&self, user: &str) -> bool {
        let allowed = self
            .users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(user);
        if !allowed {
            debug!("{} is not an operator", user);
        }
        allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_check() {
        let ops = Operators::new(["@admin:example.org"]);
        assert!(ops.is_operator("@admin:example.org"));
        assert!(!ops.is_operator("@bob:example.org"));

        assert!(ops.add("@bob:example.org"));
        assert!(!ops.add("@bob:example.org"));
        assert!(ops.is_operator("@bob:example.org"));
        assert_eq!(ops.list(), vec!["@admin:example.org", "@bob:example.org"]);
    }

    #[test]
    fn test_last_operator_stays() {
        let ops = Operators::new(["@admin:example.org", "@bob:example.org"]);
        assert!(ops.remove("@bob:example.org"));
        assert!(!ops.remove("@bob:example.org"));
        assert!(!ops.remove("@admin:example.org"));
        assert!(ops.is_operator("@admin:example.org"));
    }
}
