use crate::config::*;
use std::io::Error as IoError;
use std::path::Path;
use tracing::Subscriber;
use tracing_core::LevelFilter;
use tracing_subscriber::{filter::filter_fn, prelude::*, registry::LookupSpan, Layer};

fn build_target<S>(conf: LogEntry, dir: impl AsRef<Path>) -> Result<Box<dyn Layer<S> + Send + Sync + 'static>, IoError>
where
    S: Subscriber + Send + Sync,
    for<'span> S: LookupSpan<'span>,
{
    let layer = match &conf.target {
        LogTarget::File { filename } => {
            std::fs::create_dir_all(dir.as_ref())?;
            tracing_subscriber::fmt::layer()
                .with_writer(tracing_appender::rolling::daily(dir, filename))
                .with_ansi(false)
                .boxed()
        }
        LogTarget::Builtin(BuiltinLogTarget::Stdout) => tracing_subscriber::fmt::layer().with_writer(std::io::stdout).boxed(),
        LogTarget::Builtin(BuiltinLogTarget::Stderr) => tracing_subscriber::fmt::layer().with_writer(std::io::stderr).boxed(),
    };

    let level: LevelFilter = conf.level.map_or(LevelFilter::TRACE, Into::into);
    let modules = conf.modules;

    let filter = filter_fn(move |metadata| {
        metadata.level() <= &level
            && (modules.is_empty()
                || metadata
                    .module_path()
                    .map_or(true, |module| modules.iter().any(|m| module.starts_with(m))))
    });

    Ok(layer.with_filter(filter).boxed())
}

/// Build a subscriber with one layer per configured log target
pub fn build_subscriber(conf: LoggingConfig) -> Result<impl Subscriber, IoError> {
    let mut layers = Vec::new();

    for target in conf.targets {
        layers.push(build_target(target, &conf.dir)?);
    }

    // Individual targets do their own filtering, so this one only needs to cut
    // down noise from other crates
    let filter = tracing_subscriber::filter::Targets::new()
        .with_default(conf.default_level.unwrap_or(LogLevel::Trace))
        .with_targets(conf.module_levels);

    Ok(tracing_subscriber::registry().with(filter).with(layers))
}
