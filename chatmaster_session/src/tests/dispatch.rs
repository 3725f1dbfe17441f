use super::fixtures::*;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

#[test]
fn connect_creates_one_client_per_config() {
    let session = TestSession::connected(&[("oftc", "you"), ("libera", "me")]);

    let options = session.clients.options();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].server, "irc.libera.test");
    assert_eq!(options[0].nick, "me");
    assert_eq!(options[0].port, 6667);
    assert_eq!(options[1].server, "irc.oftc.test");

    assert_eq!(session.clients.commands(), vec!["libera connect", "oftc connect"]);

    let rows = session.views.rows();
    assert_eq!(
        rows.iter().map(|(_, parent, label)| (*parent, label.as_str())).collect::<Vec<_>>(),
        vec![(None, "libera"), (None, "oftc")]
    );
}

#[test]
fn first_connection_becomes_current() {
    let session = TestSession::connected(&[("oftc", "you"), ("libera", "me")]);

    let libera = session.notice_view("libera");
    assert_eq!(session.views.current(), Some(libera));
    assert_eq!(session.registry.current_view(), Some(libera));
}

#[test]
fn selecting_a_view_highlights_its_row() {
    let mut session = TestSession::connected(&[("libera", "me")]);
    let channel_view = session.join("libera", "#rust");

    session.registry.change_view(channel_view).unwrap();
    assert_eq!(session.views.current(), Some(session.notice_view("libera")));

    session.registry.select_view(channel_view).unwrap();
    assert_eq!(session.views.current(), Some(channel_view));
    assert_eq!(session.registry.current_view(), Some(channel_view));
}

#[test]
fn selecting_an_unknown_view_fails() {
    let mut session = TestSession::connected(&[("libera", "me")]);
    let libera = session.notice_view("libera");

    assert_eq!(
        session.registry.select_view(ViewId::new(99)),
        Err(LookupError::NoSuchView(ViewId::new(99)))
    );
    assert_eq!(session.views.current(), Some(libera));
}

#[test]
fn connect_with_nothing_configured() {
    let mut session = TestSession::connected(&[]);

    assert_eq!(session.registry.current_view(), None);
    assert_eq!(session.registry.handle_input("hello"), Err(LookupError::NoCurrentView));
    assert!(session.clients.commands().is_empty());
}

#[test]
fn connect_only_happens_once() {
    let mut session = TestSession::connected(&[("libera", "me")]);

    let mut more = BTreeMap::new();
    more.insert("oftc".to_string(), server_config("irc.oftc.test", "me"));
    session.registry.connect(&more);

    assert_eq!(session.clients.options().len(), 1);
    assert!(session.registry.connection("oftc").is_err());
}

#[test]
fn resolve_maps_views_back() {
    let mut session = TestSession::connected(&[("libera", "me")]);
    let channel_view = session.join("libera", "#rust");
    let notice_view = session.notice_view("libera");

    let (conn, channel) = session.registry.resolve(notice_view).unwrap();
    assert_eq!(conn.name(), "libera");
    assert!(channel.is_none());

    let (conn, channel) = session.registry.resolve(channel_view).unwrap();
    assert_eq!(conn.name(), "libera");
    assert_eq!(channel.unwrap().name().as_str(), "#rust");

    assert_eq!(
        session.registry.resolve(ViewId::new(999)).unwrap_err(),
        LookupError::NoSuchView(ViewId::new(999))
    );
}

#[test]
fn say_needs_a_channel() {
    let mut session = TestSession::connected(&[("libera", "me")]);
    let channel_view = session.join("libera", "#rust");

    session.registry.dispatch_command("say", "into the void").unwrap();
    session.registry.dispatch_command("action", "shrugs").unwrap();
    assert_eq!(session.clients.commands(), vec!["libera connect"]);

    session.registry.change_view(channel_view).unwrap();
    session.registry.dispatch_command("say", "hi all").unwrap();
    session.registry.dispatch_command("action", "waves").unwrap();

    assert_eq!(
        session.clients.commands(),
        vec!["libera connect", "libera say #rust hi all", "libera action #rust waves"]
    );
}

#[test]
fn join_works_from_any_view() {
    let mut session = TestSession::connected(&[("libera", "me"), ("oftc", "me")]);
    let oftc = session.notice_view("oftc");

    session.registry.change_view(oftc).unwrap();
    session.registry.dispatch_command("join", "#rust").unwrap();

    assert_eq!(session.clients.commands().last().unwrap(), "oftc join #rust");
}

#[test]
fn unknown_commands_are_ignored() {
    let mut session = TestSession::connected(&[("libera", "me")]);

    session.registry.dispatch_command("part", "#rust").unwrap();

    assert_eq!(session.clients.commands(), vec!["libera connect"]);
}

#[test]
fn input_lines_become_commands() {
    let mut session = TestSession::connected(&[("libera", "me")]);
    let channel_view = session.join("libera", "#rust");
    session.registry.change_view(channel_view).unwrap();

    for line in ["/join #offtopic", "/action waves", "hello there", "/bogus x", ""] {
        session.registry.handle_input(line).unwrap();
    }

    assert_eq!(
        session.clients.commands(),
        vec![
            "libera connect",
            "libera join #offtopic",
            "libera action #rust waves",
            "libera say #rust hello there",
        ]
    );
}

#[test]
fn changing_view_clears_unread() {
    let mut session = TestSession::connected(&[("libera", "me")]);
    let channel_view = session.join("libera", "#rust");

    session.route(
        "libera",
        ProtocolEvent::Message {
            from: "eve".to_string(),
            to: "#rust".to_string(),
            text: "ping".to_string(),
        },
    );
    assert_eq!(session.views.badge(channel_view), " (1)");

    session.registry.change_view(channel_view).unwrap();

    assert_eq!(session.views.badge(channel_view), "");
    let (_, channel) = session.registry.resolve_current().unwrap();
    assert_eq!(channel.unwrap().unread_count(), 0);
}

#[test]
fn scroll_position_survives_switching_away() {
    let mut session = TestSession::connected(&[("libera", "me")]);
    let channel_view = session.join("libera", "#rust");
    let notice_view = session.notice_view("libera");

    session.registry.change_view(channel_view).unwrap();
    assert_eq!(session.views.calls(channel_view), vec!["scroll"]);

    // The user scrolls up, then looks elsewhere
    session.views.set_scrolled_to_bottom(channel_view, false);
    session.registry.change_view(notice_view).unwrap();

    session.route(
        "libera",
        ProtocolEvent::Message {
            from: "eve".to_string(),
            to: "#rust".to_string(),
            text: "while you were away".to_string(),
        },
    );
    session.registry.change_view(channel_view).unwrap();

    assert_eq!(session.views.calls(channel_view), vec!["scroll", "insert while you were away"]);

    // Back at the bottom, new lines keep it there
    session.views.set_scrolled_to_bottom(channel_view, true);
    session.route(
        "libera",
        ProtocolEvent::Message {
            from: "eve".to_string(),
            to: "#rust".to_string(),
            text: "welcome back".to_string(),
        },
    );
    assert_eq!(
        session.views.calls(channel_view)[2..].to_vec(),
        vec!["insert welcome back", "scroll"]
    );
}

#[test]
fn change_to_unknown_view_fails() {
    let mut session = TestSession::connected(&[("libera", "me")]);
    let before = session.registry.current_view();

    assert_eq!(
        session.registry.change_view(ViewId::new(42)),
        Err(LookupError::NoSuchView(ViewId::new(42)))
    );
    assert_eq!(session.registry.current_view(), before);
}
