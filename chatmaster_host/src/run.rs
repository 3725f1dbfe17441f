//! The session event loop

use chatmaster_session::prelude::*;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

/// Something the user did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    /// A line typed into the input box
    Line(String),
    /// A different switcher row was picked
    ChangeView(ViewId),
}

/// Create a registry, and the receiving end of the channel its clients will
/// report events on
pub fn new_session(
    settings: ChatSettings,
    views: Box<dyn ViewFactory>,
    clients: Box<dyn ClientFactory>,
) -> (ConnectionRegistry, UnboundedReceiver<ConnectionEvent>) {
    let (event_send, event_recv) = unbounded_channel();
    let registry = ConnectionRegistry::new(settings, NickColorAssigner::new(), views, clients, event_send);
    (registry, event_recv)
}

pub fn apply_input(registry: &mut ConnectionRegistry, input: SessionInput) {
    tracing::trace!(?input, "Applying input");

    let result = match &input {
        SessionInput::Line(line) => registry.handle_input(line),
        SessionInput::ChangeView(view) => registry.change_view(*view),
    };

    if let Err(e) = result {
        tracing::warn!("Couldn't apply input {:?}: {}", input, e);
    }
}

/// Route everything already queued on `events`
pub fn drain_events(registry: &mut ConnectionRegistry, router: &EventRouter, events: &mut UnboundedReceiver<ConnectionEvent>) {
    while let Ok(event) = events.try_recv() {
        router.route(registry, event);
    }
}

/// Drive a session until its input channel closes.
///
/// Protocol events are handled ahead of input, so anything a client has
/// reported is on screen before the next input is applied. Events still
/// queued when input closes are routed before returning.
pub async fn run_session(
    registry: &mut ConnectionRegistry,
    router: &EventRouter,
    events: &mut UnboundedReceiver<ConnectionEvent>,
    mut input: UnboundedReceiver<SessionInput>,
) {
    loop {
        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                router.route(registry, event);
            }
            next = input.recv() => {
                match next {
                    Some(next) => apply_input(registry, next),
                    None => break,
                }
            }
        }
    }

    drain_events(registry, router, events);
    tracing::debug!("Session input closed");
}
