//! Sorted channel member lists

use itertools::Itertools;
use std::collections::{HashMap, HashSet};

/// A channel's member list as reported by the server: nick to mode prefixes
/// (`"@"`, `"+"`, `""`, ...)
pub type RosterSnapshot = HashMap<String, String>;

/// One channel member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntry {
    pub nick: String,
    pub is_operator: bool,
    pub is_voice: bool,
}

impl UserEntry {
    pub fn new(nick: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            is_operator: false,
            is_voice: false,
        }
    }

    /// Build an entry from a nick and its mode prefix string
    pub fn from_prefixes(nick: impl Into<String>, prefixes: &str) -> Self {
        Self {
            nick: nick.into(),
            is_operator: prefixes.contains('@'),
            is_voice: prefixes.contains('+'),
        }
    }

    /// Tag names for the entry's privileges, for presentation
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags = Vec::new();
        if self.is_operator {
            tags.push("user_op");
        }
        if self.is_voice {
            tags.push("user_voice");
        }
        tags
    }
}

/// The members that differ between two successive snapshots of a channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterDiff {
    /// New members, with their mode prefixes, in name order
    pub added: Vec<(String, String)>,
    /// Departed members, in name order
    pub removed: Vec<String>,
}

impl RosterDiff {
    /// Compare an old list of nicks against a new snapshot
    pub fn between<'a>(old: impl IntoIterator<Item = &'a str>, new: &RosterSnapshot) -> Self {
        let old: HashSet<&str> = old.into_iter().collect();

        let added = new
            .iter()
            .filter(|(nick, _)| !old.contains(nick.as_str()))
            .map(|(nick, modes)| (nick.clone(), modes.clone()))
            .sorted()
            .collect();
        let removed = old
            .iter()
            .filter(|nick| !new.contains_key(**nick))
            .map(|nick| nick.to_string())
            .sorted()
            .collect();

        Self { added, removed }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// A channel's members, kept sorted by nick with no duplicates
#[derive(Debug, Clone, Default)]
pub struct UserRoster {
    entries: Vec<UserEntry>,
}

impl UserRoster {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn entries(&self) -> &[UserEntry] {
        &self.entries
    }

    pub fn nicks(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.nick.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, nick: &str) -> bool {
        self.entries.iter().any(|e| e.nick == nick)
    }

    /// The roster heading shown above the member list
    pub fn header_text(&self) -> String {
        format!("{} people", self.entries.len())
    }

    /// Replace the whole roster with a snapshot
    pub fn replace(&mut self, snapshot: &RosterSnapshot) {
        self.entries = snapshot
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(nick, modes)| UserEntry::from_prefixes(nick.clone(), modes))
            .collect();
    }

    /// Insert an entry before the first entry that sorts after it, or at the
    /// end if there is none. Returns the position it went in, or `None` if the
    /// nick was already present.
    pub fn insert(&mut self, entry: UserEntry) -> Option<usize> {
        let mut position = self.entries.len();
        for (i, existing) in self.entries.iter().enumerate() {
            if existing.nick == entry.nick {
                return None;
            }
            if existing.nick > entry.nick {
                position = i;
                break;
            }
        }
        self.entries.insert(position, entry);
        Some(position)
    }

    /// Remove the entry for `nick`, if present
    pub fn remove(&mut self, nick: &str) -> Option<UserEntry> {
        let position = self.entries.iter().position(|e| e.nick == nick)?;
        Some(self.entries.remove(position))
    }

    /// Work out what changed between this roster and a newer snapshot
    pub fn diff(&self, snapshot: &RosterSnapshot) -> RosterDiff {
        RosterDiff::between(self.nicks(), snapshot)
    }
}
