//! In-memory room membership and identity lookup.

use std::sync::{PoisonError, RwLock};
use tracing::debug;

use super::{IdentityResolver, Roster};

#[derive(Debug, Clone)]
struct Member {
    id: String,
    display_name: Option<String>,
}

impl Member {
    /// `@bob:example.org` → `bob`; plain ids are returned unchanged.
    fn local_part(&self) -> &str {
        let bare = self.id.trim_start_matches('@');
        bare.split(':').next().unwrap_or(bare)
    }
}

/// Membership of a single room, in join order.
#[derive(Debug, Default)]
pub struct ChatRoom {
    name: String,
    members: RwLock<Vec<Member>>,
}

impl ChatRoom {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds `id` to the room. Returns false if it was already present.
    pub fn join(&self, id: &str, display_name: Option<&str>) -> bool {
        let mut members = self.members.write().unwrap_or_else(PoisonError::into_inner);
        if members.iter().any(|m| m.id == id) {
            return false;
        }
        debug!("{} joined room {}", id, self.name);
        members.push(Member {
            id: id.to_string(),
            display_name: display_name.map(str::to_string),
        });
        true
    }

    pub fn member_count(&self) -> usize {
        self.members.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Roster for ChatRoom {
    fn present_users(&self) -> Vec<String> {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|m| m.id.clone())
            .collect()
    }
}

impl IdentityResolver for ChatRoom {
    fn resolve(&self, token: &str) -> Option<String> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        let members = self.members.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(member) = members.iter().find(|m| m.id == token) {
            return Some(member.id.clone());
        }

        // Mentions usually arrive as `@bob` or `bob:`
        let bare = token.trim_start_matches('@').trim_end_matches([':', ',']);
        let mut matches = members.iter().filter(|m| {
            m.local_part().eq_ignore_ascii_case(bare)
                || m.display_name
                    .as_deref()
                    .is_some_and(|name| name.eq_ignore_ascii_case(bare))
        });

        match (matches.next(), matches.next()) {
            (Some(member), None) => Some(member.id.clone()),
            (Some(_), Some(_)) => {
                debug!("Ambiguous user reference '{}'", token);
                None
            }
            _ => None,
        }
    }
}
