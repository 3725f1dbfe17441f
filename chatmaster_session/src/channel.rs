use crate::message_stream::{MessageLine, MessageStream};
use crate::names::{ChannelName, ViewId};
use crate::nick_color::NickColorAssigner;
use crate::roster::{RosterDiff, RosterSnapshot, UserEntry, UserRoster};
use crate::view::{MessageView, RosterView};

/// Everything tracked for one joined channel on one connection
pub struct ChannelContext {
    name: ChannelName,
    view_id: ViewId,
    stream: MessageStream,
    roster: UserRoster,
    roster_view: Box<dyn RosterView>,
    unread_count: u32,
}

impl ChannelContext {
    pub fn new(
        name: ChannelName,
        view_id: ViewId,
        message_view: Box<dyn MessageView>,
        roster_view: Box<dyn RosterView>,
    ) -> Self {
        Self {
            name,
            view_id,
            stream: MessageStream::new(message_view),
            roster: UserRoster::new(),
            roster_view,
            unread_count: 0,
        }
    }

    pub fn name(&self) -> &ChannelName {
        &self.name
    }

    pub fn view_id(&self) -> ViewId {
        self.view_id
    }

    pub fn stream(&self) -> &MessageStream {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut MessageStream {
        &mut self.stream
    }

    pub fn roster(&self) -> &UserRoster {
        &self.roster
    }

    pub fn unread_count(&self) -> u32 {
        self.unread_count
    }

    /// Append a line to the channel's stream. User messages arriving while the
    /// channel isn't focused bump the unread badge.
    pub fn push_line(&mut self, line: MessageLine, focused: bool) {
        let counts_as_unread = line.is_user_message() && !focused;

        self.stream.push(line, focused);

        if counts_as_unread {
            self.unread_count += 1;
            let badge = format!(" ({})", self.unread_count);
            self.stream.view_mut().set_badge(&badge);
        }
    }

    /// The channel has become the focused view
    pub fn on_focus(&mut self) {
        self.unread_count = 0;
        self.stream.view_mut().set_badge("");
        self.stream.on_focus();
    }

    /// Replace the member list wholesale
    pub fn replace_roster(&mut self, snapshot: &RosterSnapshot, colors: &mut NickColorAssigner) {
        self.roster.replace(snapshot);

        self.roster_view.clear();
        for (position, entry) in self.roster.entries().iter().enumerate() {
            self.roster_view.insert_sorted(position, entry, &colors.get(&entry.nick));
        }
        self.roster_view.set_header(&self.roster.header_text());
    }

    /// Add one member. Returns false if they were already listed.
    pub fn add_user(&mut self, entry: UserEntry, colors: &mut NickColorAssigner) -> bool {
        let color = colors.get(&entry.nick);
        let Some(position) = self.roster.insert(entry) else {
            return false;
        };

        let entry = &self.roster.entries()[position];
        self.roster_view.insert_sorted(position, entry, &color);
        self.roster_view.set_header(&self.roster.header_text());
        true
    }

    /// Remove one member. Returns false if they weren't listed.
    pub fn remove_user(&mut self, nick: &str) -> bool {
        if self.roster.remove(nick).is_none() {
            return false;
        }

        self.roster_view.remove(nick);
        self.roster_view.set_header(&self.roster.header_text());
        true
    }

    /// Bring the roster in line with a newer snapshot by applying only the
    /// difference
    pub fn sync_roster(&mut self, snapshot: &RosterSnapshot, colors: &mut NickColorAssigner) -> RosterDiff {
        let diff = self.roster.diff(snapshot);

        for nick in &diff.removed {
            self.remove_user(nick);
        }
        for (nick, modes) in &diff.added {
            self.add_user(UserEntry::from_prefixes(nick.clone(), modes), colors);
        }

        diff
    }
}

impl std::fmt::Debug for ChannelContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelContext")
            .field("name", &self.name)
            .field("view_id", &self.view_id)
            .field("stream", &self.stream)
            .field("roster", &self.roster)
            .field("unread_count", &self.unread_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message_stream::MessageFlags;
    use crate::tests::fixtures::*;
    use pretty_assertions::assert_eq;

    fn channel(log: &ViewLog) -> ChannelContext {
        let id = ViewId::new(7);
        ChannelContext::new("#rust".into(), id, log.message_view(id), log.roster_view(id))
    }

    fn user_message(from: &str) -> MessageLine {
        MessageLine::new(MessageFlags::USER_MSG, Some(from), "hello")
    }

    #[test]
    fn unread_counts_only_unfocused_user_messages() {
        let log = ViewLog::new();
        let mut chan = channel(&log);

        chan.push_line(user_message("eve"), false);
        chan.push_line(user_message("eve"), false);
        chan.push_line(MessageLine::new(MessageFlags::INFO | MessageFlags::JOIN, None, "bob joined #rust"), false);
        chan.push_line(MessageLine::new(MessageFlags::SELF, Some("me"), "hi"), false);
        assert_eq!(chan.unread_count(), 2);

        chan.push_line(user_message("eve"), true);
        assert_eq!(chan.unread_count(), 2);
        assert_eq!(log.badge(ViewId::new(7)), " (2)");
    }

    #[test]
    fn focus_clears_unread() {
        let log = ViewLog::new();
        let mut chan = channel(&log);

        chan.push_line(user_message("eve"), false);
        chan.on_focus();

        assert_eq!(chan.unread_count(), 0);
        assert_eq!(log.badge(ViewId::new(7)), "");

        chan.push_line(user_message("eve"), false);
        assert_eq!(chan.unread_count(), 1);
        assert_eq!(log.badge(ViewId::new(7)), " (1)");
    }

    #[test]
    fn roster_changes_reach_the_view() {
        let log = ViewLog::new();
        let mut colors = NickColorAssigner::with_salt("");
        let mut chan = channel(&log);

        let snapshot = [("Charlie", ""), ("Alice", "@")]
            .iter()
            .map(|(n, m)| (n.to_string(), m.to_string()))
            .collect();
        chan.replace_roster(&snapshot, &mut colors);
        assert!(chan.add_user(UserEntry::new("Bob"), &mut colors));
        assert!(!chan.add_user(UserEntry::new("Bob"), &mut colors));
        assert!(chan.remove_user("Charlie"));
        assert!(!chan.remove_user("Charlie"));

        assert_eq!(
            log.roster_calls(ViewId::new(7)),
            vec![
                "clear",
                "insert 0 Alice",
                "insert 1 Charlie",
                "header 2 people",
                "insert 1 Bob",
                "header 3 people",
                "remove Charlie",
                "header 2 people",
            ]
        );
    }

    #[test]
    fn sync_applies_only_the_difference() {
        let log = ViewLog::new();
        let mut colors = NickColorAssigner::with_salt("");
        let mut chan = channel(&log);

        let first = [("Alice", ""), ("Bob", "")].iter().map(|(n, m)| (n.to_string(), m.to_string())).collect();
        let second = [("Alice", ""), ("Carol", "+")].iter().map(|(n, m)| (n.to_string(), m.to_string())).collect();
        chan.replace_roster(&first, &mut colors);
        let diff = chan.sync_roster(&second, &mut colors);

        assert_eq!(diff.removed, vec!["Bob".to_string()]);
        assert_eq!(chan.roster().nicks().collect::<Vec<_>>(), vec!["Alice", "Carol"]);
        assert!(chan.roster().entries()[1].is_voice);
        assert_eq!(
            log.roster_calls(ViewId::new(7))[4..].to_vec(),
            vec!["remove Bob", "header 1 people", "insert 1 Carol", "header 2 people"]
        );
    }
}
