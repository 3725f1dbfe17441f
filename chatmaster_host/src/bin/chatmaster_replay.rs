use chatmaster_host::{
    config::HostConfig,
    replay::{ReplayScript, ScriptedClientFactory},
    run::{new_session, run_session, SessionInput},
    text_view::TextViewFactory,
};
use chatmaster_session::router::EventRouter;

use std::path::PathBuf;
use structopt::StructOpt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, StructOpt)]
#[structopt(rename_all = "kebab")]
struct Opts {
    /// Host config file location
    #[structopt(short, long)]
    config: PathBuf,

    /// Replay script to run; without this, input lines are read from stdin
    #[structopt(short, long)]
    script: Option<PathBuf>,

    /// Connect every enabled server config, rather than just the first
    #[structopt(short, long)]
    all: bool,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let opts = Opts::from_args();

    let config = HostConfig::load_file(&opts.config)?;
    let script = opts.script.as_ref().map(ReplayScript::load_file).transpose()?;

    chatmaster_host::tracing_config::build_subscriber(config.log.clone())?.init();

    let configs = if opts.all {
        config.record.enabled_configs()
    } else {
        let first = config
            .record
            .configs
            .keys()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No server configs in {}", opts.config.display()))?;
        config.record.single(first)?
    };

    let clients = ScriptedClientFactory::new();
    let commands = clients.commands();

    let (mut registry, mut events) = new_session(
        config.settings.clone(),
        Box::new(TextViewFactory::stdout()),
        Box::new(clients),
    );
    let router = EventRouter::new();

    registry.connect(&configs);

    match script {
        Some(script) => script.run(&mut registry, &router, &mut events)?,
        None => {
            let (input_send, input_recv) = tokio::sync::mpsc::unbounded_channel();

            tokio::spawn(async move {
                let mut lines = BufReader::new(tokio::io::stdin()).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if input_send.send(SessionInput::Line(line)).is_err() {
                        break;
                    }
                }
            });

            run_session(&mut registry, &router, &mut events, input_recv).await;
        }
    }

    for command in commands.borrow().iter() {
        tracing::info!(%command, "Sent");
    }

    Ok(())
}
