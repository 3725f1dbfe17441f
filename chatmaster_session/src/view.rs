//! The presentation side of a session.
//!
//! Session state never builds UI itself. Instead, each message stream, roster
//! and the channel switcher are backed by a view object supplied by the host,
//! which decides how (and whether) to draw them.

use crate::message_stream::MessageLine;
use crate::names::ViewId;
use crate::nick_color::Color;
use crate::roster::UserEntry;

/// The display for one message stream
pub trait MessageView {
    /// Append a line to the display
    fn insert(&mut self, line: &MessageLine);

    /// Scroll so that the newest line is visible
    fn scroll_to_bottom(&mut self);

    /// Whether the display is currently scrolled to its newest line
    fn is_scrolled_to_bottom(&self) -> bool;

    /// Update the unread indicator; an empty string clears it
    fn set_badge(&mut self, text: &str);
}

/// The display for one channel's member list
pub trait RosterView {
    fn clear(&mut self);

    /// Insert an entry at `position` in the sorted list
    fn insert_sorted(&mut self, position: usize, entry: &UserEntry, color: &Color);

    fn remove(&mut self, nick: &str);

    fn set_header(&mut self, text: &str);
}

/// The tree of connections and channels that the user picks the focused view from.
///
/// When the user picks a row, the host reports it back through
/// [`ConnectionRegistry::change_view`](crate::registry::ConnectionRegistry::change_view).
pub trait ChannelSwitcher {
    fn add_row(&mut self, id: ViewId, parent: Option<ViewId>, label: &str);

    fn set_current(&mut self, id: ViewId);
}

/// Creates views as connections and channels come into existence
pub trait ViewFactory {
    fn message_view(&mut self, id: ViewId, label: &str) -> Box<dyn MessageView>;

    fn roster_view(&mut self, id: ViewId) -> Box<dyn RosterView>;

    fn switcher(&mut self) -> &mut dyn ChannelSwitcher;
}
