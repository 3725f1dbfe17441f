//! Plain-text views that write every stream to a single output

use chatmaster_session::prelude::*;

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

type SharedWriter = Rc<RefCell<Box<dyn Write>>>;

/// Render a line the way it's shown in a text view, without its timestamp
pub fn render_line(line: &MessageLine) -> String {
    match &line.from {
        Some(from) if line.flags.contains(MessageFlags::ACTION) => format!("* {} {}", from, line.body),
        Some(from) if line.flags.contains(MessageFlags::NOTICE) => format!("-{}- {}", from, line.body),
        Some(from) => format!("<{}> {}", from, line.body),
        None if line.flags.contains(MessageFlags::ERROR) => format!("!! {}", line.body),
        None => format!("-- {}", line.body),
    }
}

fn write_out(out: &SharedWriter, text: &str) {
    let mut out = out.borrow_mut();
    writeln!(out, "{}", text).or_log("writing to text view");
}

struct TextMessageView {
    label: String,
    out: SharedWriter,
}

impl MessageView for TextMessageView {
    fn insert(&mut self, line: &MessageLine) {
        write_out(&self.out, &format!("{} [{}] {}", line.clock(), self.label, render_line(line)));
    }

    fn scroll_to_bottom(&mut self) {}

    fn is_scrolled_to_bottom(&self) -> bool {
        true
    }

    fn set_badge(&mut self, text: &str) {
        tracing::trace!(label = %self.label, badge = text, "Badge changed");
    }
}

struct TextRosterView {
    label: String,
    nicks: Vec<String>,
    out: SharedWriter,
}

impl RosterView for TextRosterView {
    fn clear(&mut self) {
        self.nicks.clear();
    }

    fn insert_sorted(&mut self, position: usize, entry: &UserEntry, _color: &Color) {
        let prefix = if entry.is_operator {
            "@"
        } else if entry.is_voice {
            "+"
        } else {
            ""
        };
        self.nicks.insert(position, format!("{}{}", prefix, entry.nick));
    }

    fn remove(&mut self, nick: &str) {
        self.nicks.retain(|n| n.trim_start_matches(|c| c == '@' || c == '+') != nick);
    }

    fn set_header(&mut self, text: &str) {
        write_out(&self.out, &format!("[{}] {}: {}", self.label, text, self.nicks.join(" ")));
    }
}

/// Creates views that print to one writer, prefixed with the stream's label
pub struct TextViewFactory {
    out: SharedWriter,
    labels: HashMap<ViewId, String>,
}

impl TextViewFactory {
    pub fn new(out: impl Write + 'static) -> Self {
        let out: Box<dyn Write> = Box::new(out);
        Self {
            out: Rc::new(RefCell::new(out)),
            labels: HashMap::new(),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl ChannelSwitcher for TextViewFactory {
    fn add_row(&mut self, id: ViewId, parent: Option<ViewId>, label: &str) {
        let label = match parent.and_then(|p| self.labels.get(&p)) {
            Some(parent) => format!("{}/{}", parent, label),
            None => label.to_string(),
        };
        tracing::debug!(?id, %label, "New view");
        self.labels.insert(id, label);
    }

    fn set_current(&mut self, id: ViewId) {
        if let Some(label) = self.labels.get(&id) {
            write_out(&self.out, &format!("== now viewing {}", label));
        }
    }
}

impl ViewFactory for TextViewFactory {
    fn message_view(&mut self, id: ViewId, label: &str) -> Box<dyn MessageView> {
        Box::new(TextMessageView {
            label: self.labels.get(&id).cloned().unwrap_or_else(|| label.to_string()),
            out: self.out.clone(),
        })
    }

    fn roster_view(&mut self, id: ViewId) -> Box<dyn RosterView> {
        let label = self.labels.get(&id).cloned().unwrap_or_else(|| format!("{:?}", id));
        Box::new(TextRosterView {
            label,
            nicks: Vec::new(),
            out: self.out.clone(),
        })
    }

    fn switcher(&mut self) -> &mut dyn ChannelSwitcher {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lines_render_by_kind() {
        let says = MessageLine::new(MessageFlags::USER_MSG, Some("eve"), "hi");
        let acts = MessageLine::new(MessageFlags::USER_MSG | MessageFlags::ACTION, Some("eve"), "waves");
        let notice = MessageLine::new(MessageFlags::USER_MSG | MessageFlags::NOTICE, Some("ChanServ"), "welcome");
        let info = MessageLine::new(MessageFlags::INFO, None, "bob joined #rust");
        let error = MessageLine::new(MessageFlags::ERROR, None, "foo Unknown command");

        assert_eq!(render_line(&says), "<eve> hi");
        assert_eq!(render_line(&acts), "* eve waves");
        assert_eq!(render_line(&notice), "-ChanServ- welcome");
        assert_eq!(render_line(&info), "-- bob joined #rust");
        assert_eq!(render_line(&error), "!! foo Unknown command");
    }
}
