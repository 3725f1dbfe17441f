//! Identifier types for channels and views

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A channel name.
///
/// Channel names compare case-insensitively (ASCII folding), matching the way
/// servers treat them; the original spelling is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelName(String);

impl ChannelName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `target` looks like a channel rather than a nickname, for
    /// the given set of channel prefix characters.
    pub fn is_channel_target(target: &str, prefixes: &str) -> bool {
        target.chars().next().map_or(false, |c| prefixes.contains(c))
    }
}

impl PartialEq for ChannelName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for ChannelName {}

impl Hash for ChannelName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ChannelName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Compare two nicknames the way the server does
pub fn same_nick(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Identifies one row of the channel switcher, and the view behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewId(u64);

impl ViewId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Hands out sequential [`ViewId`]s
#[derive(Debug, Default)]
pub struct ViewIdGenerator {
    last: u64,
}

impl ViewIdGenerator {
    pub fn new() -> Self {
        Self { last: 0 }
    }

    pub fn next(&mut self) -> ViewId {
        self.last += 1;
        ViewId(self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn channel_names_fold_case() {
        let mut set = HashSet::new();
        set.insert(ChannelName::from("#Rust"));

        assert!(set.contains(&ChannelName::from("#rust")));
        assert_eq!(ChannelName::from("#Rust").to_string(), "#Rust");
    }

    #[test]
    fn channel_targets() {
        assert!(ChannelName::is_channel_target("#general", "&#"));
        assert!(ChannelName::is_channel_target("&local", "&#"));
        assert!(!ChannelName::is_channel_target("eve", "&#"));
        assert!(!ChannelName::is_channel_target("", "&#"));
    }

    #[test]
    fn view_ids_are_sequential() {
        let mut ids = ViewIdGenerator::new();
        let a = ids.next();
        let b = ids.next();
        assert!(a < b);
        assert_ne!(a, b);
    }
}
