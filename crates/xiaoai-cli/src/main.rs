//! XiaoAi speaker CLI
//!
//! Sends status, text-to-speech, playback and volume calls to a speaker
//! running the hook service, printing the device's result as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use secrecy::Secret;
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use xiaoai_rpc::{
    ClientError, Config, DeviceResult, Params, PlaybackCommand, RpcClient, VolumeChange,
};

/// XiaoAi speaker CLI
#[derive(Parser)]
#[command(name = "xiaoai")]
#[command(about = "Control a XiaoAi speaker through its JSON-RPC hook")]
#[command(version)]
#[command(after_help = "\
Examples:
  xiaoai --host 192.168.1.20 status      Query device state
  xiaoai speak \"dinner is ready\"          Speak a message
  xiaoai control pause                   Pause playback
  xiaoai volume up                       Raise the volume one step
  xiaoai volume 40                       Set the volume to 40
  xiaoai call status                     Raw call by operation name
  xiaoai call speak msg=hello            Raw call with params
  xiaoai config                          Show effective configuration
")]
struct Cli {
    /// Config file (defaults to ~/.config/xiaoai/config.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Speaker host, overrides the config file
    #[arg(long)]
    host: Option<String>,

    /// Hook service port, overrides the config file
    #[arg(long)]
    port: Option<u16>,

    /// Access token, overrides the config file
    #[arg(long, env = "XIAOAI_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in seconds, overrides the config file
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Device(DeviceCommand),

    /// Print the effective configuration
    Config,
}

/// Commands that send a call to the speaker
#[derive(Subcommand)]
enum DeviceCommand {
    /// Query device state
    Status,

    /// Speak a message
    Speak {
        /// Text to speak
        msg: String,
    },

    /// Send a playback command
    Control {
        /// One of ch, prev, next, play, pause, toggle, resume
        command: PlaybackCommand,
    },

    /// Change the volume
    Volume {
        /// `up`, `down` or a level from 0 to 100
        change: VolumeChange,
    },

    /// Call an operation by name with KEY=VALUE params
    Call {
        /// Operation name (status, speak, control, volume)
        operation: String,

        /// Params; values are parsed as JSON when possible, else sent as strings
        params: Vec<String>,
    },
}

/// Set up logging to stderr. `RUST_LOG` overrides the default level.
fn setup_logging() {
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("xiaoai={default_level},xiaoai_rpc={default_level}"))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

/// Load the config file and apply command line overrides
fn effective_config(cli: &Cli) -> Result<Config> {
    let path = cli.config.clone().or_else(Config::default_path);

    let mut config = match &path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(host) = &cli.host {
        config.host.clone_from(host);
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(token) = &cli.token {
        config.token = (!token.is_empty()).then(|| Secret::new(token.clone()));
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Parse `KEY=VALUE` pairs into request params
fn parse_params(pairs: &[String]) -> Result<Params> {
    let mut params = Params::new();
    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            bail!("Invalid param '{pair}', expected KEY=VALUE");
        };
        if key.is_empty() {
            bail!("Invalid param '{pair}', key is empty");
        }
        let value =
            serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        params.insert(key.to_string(), value);
    }
    Ok(params)
}

fn print_result(result: DeviceResult) -> Result<()> {
    let json = serde_json::to_string_pretty(&Value::from(result))?;
    println!("{json}");
    Ok(())
}

async fn call_device(config: &Config, command: DeviceCommand) -> Result<()> {
    let client = RpcClient::from_config(config).context("Failed to create RPC client")?;
    debug!(
        "Using {} (timeout {:?}, token: {})",
        client.base_url(),
        client.timeout(),
        client.has_token()
    );

    let outcome = match command {
        DeviceCommand::Status => client.status().await,
        DeviceCommand::Speak { msg } => client.speak_text(&msg).await,
        DeviceCommand::Control { command } => client.control_command(command).await,
        DeviceCommand::Volume { change } => client.set_volume(change).await,
        DeviceCommand::Call { operation, params } => {
            let params = parse_params(&params)?;
            client.invoke_named(&operation, params).await
        }
    };

    match outcome {
        Ok(result) => print_result(result),
        Err(ClientError::Auth) => bail!("Device rejected the token (check --token or config)"),
        Err(e @ ClientError::Transport(_)) => Err(anyhow::Error::new(e).context(format!(
            "No valid response from {} within {:?}",
            client.base_url(),
            config.timeout()
        ))),
        Err(e) => Err(e.into()),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = effective_config(&cli)?;

    match cli.command {
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config.redacted())?);
            Ok(())
        }
        Commands::Device(command) => call_device(&config, command).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging();

    run(cli).await
}
