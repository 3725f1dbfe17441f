//! Append-only message logs with scroll-stick tracking

use crate::nick_color::Color;
use crate::utils::format_clock;
use crate::view::MessageView;
use bitflags::bitflags;
use chrono::{DateTime, Local};

bitflags! {
    /// Tags describing what kind of line a [`MessageLine`] is
    pub struct MessageFlags: u32 {
        const INFO        = 0x001;
        const CONNECTED   = 0x002;
        const JOIN        = 0x004;
        const PART        = 0x008;
        const TOPIC       = 0x010;
        const SELF        = 0x020;
        const USER_MSG    = 0x040;
        const NOTICE      = 0x080;
        const ACTION      = 0x100;
        const SERVER_INFO = 0x200;
        const ERROR       = 0x400;
    }
}

const FLAG_TAGS: &[(MessageFlags, &str)] = &[
    (MessageFlags::INFO, "info"),
    (MessageFlags::CONNECTED, "connected"),
    (MessageFlags::JOIN, "join"),
    (MessageFlags::PART, "part"),
    (MessageFlags::TOPIC, "topic"),
    (MessageFlags::SELF, "self"),
    (MessageFlags::USER_MSG, "user_msg"),
    (MessageFlags::NOTICE, "notice"),
    (MessageFlags::ACTION, "action"),
    (MessageFlags::SERVER_INFO, "server_info"),
    (MessageFlags::ERROR, "error"),
];

impl MessageFlags {
    /// Tag names for the set flags. Every line is also a `message`.
    pub fn tags(&self) -> Vec<&'static str> {
        FLAG_TAGS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, tag)| *tag)
            .chain(std::iter::once("message"))
            .collect()
    }
}

/// A single line in a message stream
#[derive(Debug, Clone)]
pub struct MessageLine {
    pub timestamp: DateTime<Local>,
    pub flags: MessageFlags,
    pub from: Option<String>,
    /// The sender's nick color, if there is a sender
    pub color: Option<Color>,
    pub body: String,
}

impl MessageLine {
    /// Create a line stamped with the current time
    pub fn new(flags: MessageFlags, from: Option<&str>, body: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            flags,
            from: from.filter(|f| !f.is_empty()).map(str::to_string),
            color: None,
            body: body.into(),
        }
    }

    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    /// Whether this line counts towards a channel's unread badge
    pub fn is_user_message(&self) -> bool {
        self.flags.contains(MessageFlags::USER_MSG) && self.from.is_some()
    }

    /// The timestamp as shown next to the line
    pub fn clock(&self) -> String {
        format_clock(&self.timestamp)
    }
}

/// An ordered log of lines for a connection or channel, plus whether its
/// view is pinned to the newest line.
pub struct MessageStream {
    lines: Vec<MessageLine>,
    is_at_bottom: bool,
    view: Box<dyn MessageView>,
}

impl MessageStream {
    pub fn new(view: Box<dyn MessageView>) -> Self {
        Self {
            lines: Vec::new(),
            is_at_bottom: true,
            view,
        }
    }

    pub fn lines(&self) -> &[MessageLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_at_bottom(&self) -> bool {
        self.is_at_bottom
    }

    pub fn view_mut(&mut self) -> &mut dyn MessageView {
        self.view.as_mut()
    }

    /// Record whether the view is scrolled to the bottom. Only meaningful
    /// while the view is on screen; hidden views keep their last known state.
    pub fn record_scroll_state(&mut self) {
        self.is_at_bottom = self.view.is_scrolled_to_bottom();
    }

    /// Append a line. If the stream was pinned to the bottom beforehand, the
    /// view is scrolled to show the new line.
    pub fn push(&mut self, line: MessageLine, visible: bool) {
        if visible {
            self.record_scroll_state();
        }
        let was_at_bottom = self.is_at_bottom;

        self.view.insert(&line);
        self.lines.push(line);

        if was_at_bottom {
            self.view.scroll_to_bottom();
        }
    }

    /// The stream's view has come on screen
    pub fn on_focus(&mut self) {
        if self.is_at_bottom {
            self.view.scroll_to_bottom();
        }
    }
}

impl std::fmt::Debug for MessageStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageStream")
            .field("lines", &self.lines.len())
            .field("is_at_bottom", &self.is_at_bottom)
            .finish()
    }
}
