use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::errors::Result;

/// Initializes the tracing subscriber used by the ReplyLine binaries.
///
/// `RUST_LOG` wins over the provided level so operators can raise verbosity
/// for a single crate without touching configuration.
pub fn init_tracing(level: Option<&str>) -> Result<()> {
    let default_level = level.unwrap_or("info");
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .try_init()
        .map_err(|err| crate::errors::ReplyLineError::General(err.to_string()))?;

    Ok(())
}
