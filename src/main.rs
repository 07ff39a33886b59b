//! joystick - fetch Joystick config content from the command line
//!
//! Usage: `joystick [--full] [--serialized] [--refresh] <CONTENT_IDS>...`
//!
//! Settings come from `JOYSTICK_*` environment variables, see
//! [`ClientConfig::from_env`]. The JSON text of the result goes to stdout.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use joystick_sdk::{ClientConfig, JoystickClient, ResponseType};

#[derive(Parser, Debug)]
#[command(name = "joystick", version, about = "Fetch Joystick config content", long_about = None)]
struct Args {
    /// Return the whole document with hash and meta
    #[arg(long)]
    full: bool,

    /// Ask for the content as serialized JSON text
    #[arg(long)]
    serialized: bool,

    /// Skip the cache and fetch from the API
    #[arg(long)]
    refresh: bool,

    /// Content ids to fetch
    #[arg(required = true)]
    content_ids: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" for this crate, can be overridden with RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "joystick_sdk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = ClientConfig::from_env().context("Invalid Joystick configuration")?;
    info!(?config, "Configuration loaded");

    let client = JoystickClient::new(config)?;
    let response_type = args.serialized.then_some(ResponseType::Serialized);
    let contents = client
        .get_contents_as_string(&args.content_ids, response_type, args.full, args.refresh)
        .await
        .with_context(|| format!("Unable to fetch {}", args.content_ids.join(", ")))?;

    println!("{}", contents);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_parse_flags_and_ids() {
        let args =
            Args::try_parse_from(["joystick", "--full", "pricing", "--refresh", "layout"]).unwrap();
        assert_eq!(args.content_ids, vec!["pricing", "layout"]);
        assert!(args.full);
        assert!(args.refresh);
        assert!(!args.serialized);
    }

    #[test]
    fn test_parse_requires_content_id() {
        let err = Args::try_parse_from(["joystick", "--serialized"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_parse_rejects_unknown_flag() {
        let err = Args::try_parse_from(["joystick", "--verbose", "pricing"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_flags_take_no_value() {
        assert!(Args::try_parse_from(["joystick", "--full=true", "pricing"]).is_err());
    }

    #[test]
    fn test_args_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
