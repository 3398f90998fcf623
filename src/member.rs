//! Member names and group rosters.
//!
//! Names are bare strings, so they are normalized before they become map
//! keys: surrounding whitespace is trimmed, inner runs of whitespace collapse
//! to a single space, and comparison ignores case. The roster remembers the
//! first spelling it saw and uses it for display.

use std::collections::HashMap;

use crate::error::EngineError;
use crate::schemas::MemberName;

/// Trim and collapse whitespace, keeping the original case.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The key two names must share to refer to the same member.
pub fn canonical_key(name: &str) -> String {
    normalize_name(name).to_lowercase()
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Roster {
    members: Vec<MemberName>,
    index: HashMap<String, usize>,
}

impl Roster {
    /// Build a roster, rejecting blank names and names that collide once
    /// normalized.
    pub fn new<I, S>(names: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Roster::default();
        for name in names {
            let display = normalize_name(name.as_ref());
            if display.is_empty() {
                return Err(EngineError::InvalidRoster {
                    reason: "member names must not be blank".to_string(),
                });
            }
            let key = display.to_lowercase();
            if roster.index.contains_key(&key) {
                return Err(EngineError::InvalidRoster {
                    reason: format!("member `{display}` is listed more than once"),
                });
            }
            roster.index.insert(key, roster.members.len());
            roster.members.push(display);
        }
        Ok(roster)
    }

    /// Position of `name` in the roster, or `UnknownMember`.
    pub fn position(&self, name: &str) -> Result<usize, EngineError> {
        self.index
            .get(&canonical_key(name))
            .copied()
            .ok_or_else(|| EngineError::UnknownMember {
                name: name.to_string(),
            })
    }

    /// Display name for `name`, or `UnknownMember`.
    pub fn resolve(&self, name: &str) -> Result<&str, EngineError> {
        let position = self.position(name)?;
        Ok(self.members[position].as_str())
    }

    pub fn name(&self, position: usize) -> Option<&str> {
        self.members.get(position).map(String::as_str)
    }

    pub fn names(&self) -> &[MemberName] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
