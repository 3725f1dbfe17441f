//! Scripted protocol clients, and replaying recorded sessions through them

use crate::config::ConfigError;
use crate::run::{apply_input, drain_events, SessionInput};
use chatmaster_session::prelude::*;
use serde::Deserialize;
use tokio::sync::mpsc::UnboundedReceiver;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// Outbound commands issued to scripted clients, as `"<connection> <command> <args>"`
pub type CommandLog = Rc<RefCell<Vec<String>>>;

/// A protocol client with no server behind it.
///
/// Connecting succeeds at once, and anything sent is echoed back the way a
/// server would confirm it.
struct ScriptedClient {
    nick: String,
    events: EventSender,
    log: CommandLog,
}

impl ScriptedClient {
    fn record(&self, command: String) {
        self.log.borrow_mut().push(format!("{} {}", self.events.connection(), command));
    }

    fn echo(&self, event: ProtocolEvent) {
        self.events.send(event).or_log("echoing scripted command");
    }
}

impl ProtocolClient for ScriptedClient {
    fn nick(&self) -> &str {
        &self.nick
    }

    fn connect(&mut self) {
        self.record("connect".to_string());
        self.echo(ProtocolEvent::Registered);
    }

    fn say(&mut self, target: &str, text: &str) {
        self.record(format!("say {} {}", target, text));
        self.echo(ProtocolEvent::SelfMessage {
            to: target.to_string(),
            text: text.to_string(),
        });
    }

    fn join(&mut self, channel: &str) {
        self.record(format!("join {}", channel));
        self.echo(ProtocolEvent::Join {
            channel: channel.into(),
            nick: self.nick.clone(),
        });
    }

    fn action(&mut self, target: &str, text: &str) {
        self.record(format!("action {} {}", target, text));
        self.echo(ProtocolEvent::Action {
            from: self.nick.clone(),
            to: target.to_string(),
            text: text.to_string(),
        });
    }
}

/// Creates [`ScriptedClient`]s that all record into one [`CommandLog`]
#[derive(Default)]
pub struct ScriptedClientFactory {
    log: CommandLog,
}

impl ScriptedClientFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> CommandLog {
        self.log.clone()
    }
}

impl ClientFactory for ScriptedClientFactory {
    fn create(&mut self, options: ClientOptions, events: EventSender) -> Box<dyn ProtocolClient> {
        tracing::debug!(connection = events.connection(), server = %options.server, "Creating scripted client");

        Box::new(ScriptedClient {
            nick: options.nick,
            events,
            log: self.log.clone(),
        })
    }
}

/// One step of a replay script
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayStep {
    /// An event as a protocol client would report it
    Event(ConnectionEvent),
    /// A line of user input
    Input(String),
    /// Switch to a connection's view, or one of its channels
    Focus {
        connection: String,
        #[serde(default)]
        channel: Option<ChannelName>,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplayScript {
    pub steps: Vec<ReplayStep>,
}

impl ReplayScript {
    pub fn load_file<P: AsRef<Path>>(filename: P) -> Result<Self, ConfigError> {
        let filename = filename.as_ref();
        let script = std::fs::read_to_string(filename).map_err(|e| ConfigError::IoError(e, filename.to_owned()))?;
        json5::from_str(&script).map_err(|e| ConfigError::JsonError(e, filename.to_owned()))
    }

    /// Apply every step in order. Events raised by the clients in response
    /// to a step are routed before the next step runs.
    pub fn run(
        &self,
        registry: &mut ConnectionRegistry,
        router: &EventRouter,
        events: &mut UnboundedReceiver<ConnectionEvent>,
    ) -> LookupResult<()> {
        drain_events(registry, router, events);

        for step in &self.steps {
            match step {
                ReplayStep::Event(event) => router.route(registry, event.clone()),
                ReplayStep::Input(line) => apply_input(registry, SessionInput::Line(line.clone())),
                ReplayStep::Focus { connection, channel } => {
                    let conn = registry.connection(connection)?;
                    let view = match channel {
                        Some(channel) => conn.channel(channel)?.view_id(),
                        None => conn.view_id(),
                    };
                    registry.select_view(view)?;
                }
            }
            drain_events(registry, router, events);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn script_steps_read_from_json5() {
        let script: ReplayScript = json5::from_str(
            r##"{
                steps: [
                    { event: { connection: "libera", type: "registered" } },
                    { input: "/join #rust" },
                    { focus: { connection: "libera", channel: "#rust" } },
                    { focus: { connection: "libera" } },
                ],
            }"##,
        )
        .unwrap();

        assert_eq!(
            script.steps,
            vec![
                ReplayStep::Event(ConnectionEvent::new("libera", ProtocolEvent::Registered)),
                ReplayStep::Input("/join #rust".to_string()),
                ReplayStep::Focus {
                    connection: "libera".to_string(),
                    channel: Some("#rust".into()),
                },
                ReplayStep::Focus {
                    connection: "libera".to_string(),
                    channel: None,
                },
            ]
        );
    }
}
