//! Aerogarden CLI - control a garden's grow light from the terminal.
//!
//! This is the entry point for the `aerogarden` binary. Every invocation
//! starts one device actor against the cloud API, runs a single command and
//! shuts the actor down.

mod commands;

use std::sync::Arc;

use aerogarden_control::{ControlConfig, DeviceActor};
use aerogarden_core::{DeviceId, UserId};
use aerogarden_remote::{HttpRemoteGateway, RemoteConfig};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Aerogarden CLI - control a garden's grow light.
#[derive(Parser, Debug)]
#[command(name = "aerogarden")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Garden device identifier (`airGuid`, usually the MAC address).
    #[arg(long, env = "AEROGARDEN_DEVICE_ID")]
    device_id: DeviceId,

    /// Account user identifier.
    #[arg(long, env = "AEROGARDEN_USER_ID", hide_env_values = true)]
    user_id: UserId,

    /// Base URL of the Aerogarden API.
    #[arg(long, env = "AEROGARDEN_BASE_URL")]
    base_url: Option<String>,

    /// Acknowledgment window for set-power, in milliseconds.
    #[arg(
        long,
        env = "AEROGARDEN_ACK_WINDOW_MS",
        default_value_t = 30_000,
        value_parser = clap::value_parser!(u64).range(1_000..)
    )]
    ack_window_ms: u64,

    /// Enable debug logging.
    #[arg(long, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print accessory information.
    Info {
        /// Display name of the light.
        #[arg(long, default_value = "Aerogarden Light")]
        name: String,
    },
    /// Ask the device whether the light is on.
    GetPower,
    /// Switch the light and wait for the acknowledgment.
    SetPower {
        /// Requested power state.
        #[arg(value_enum)]
        power: Power,
    },
    /// Request a brightness (accepted, but the device cannot dim).
    SetBrightness {
        /// Brightness percentage.
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        value: u8,
    },
    /// Poll the device and print state changes until interrupted.
    Watch {
        /// Seconds between polls.
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
        interval_secs: u64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Power {
    On,
    Off,
}

impl Power {
    const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Log filter used when `RUST_LOG` is not set.
const fn default_filter(debug: bool) -> &'static str {
    if debug {
        "warn,aerogarden=debug"
    } else {
        "warn,aerogarden_control=info"
    }
}

fn init_tracing(debug: bool) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(debug).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let remote_config = match &args.base_url {
        Some(url) => RemoteConfig::with_base_url(url),
        None => RemoteConfig::default(),
    };
    tracing::debug!(base_url = %remote_config.base_url, "Using Aerogarden API");

    let mut control_config = ControlConfig::new(args.device_id, args.user_id);
    control_config.ack_window_ms = args.ack_window_ms;

    let gateway = Arc::new(HttpRemoteGateway::new(remote_config));
    let light = DeviceActor::spawn(control_config, gateway)?;

    let result = commands::run(&light, args.command).await;

    // The actor may already be gone if the command failed because of it.
    let _ = light.shutdown().await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Result<Args, clap::Error> {
        let mut argv = vec!["aerogarden", "--device-id", "garden-1", "--user-id", "42"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv)
    }

    #[test]
    fn parses_set_power() {
        let args = parse(&["set-power", "off"]).unwrap();
        assert_eq!(args.command, Command::SetPower { power: Power::Off });
        assert_eq!(args.device_id.as_str(), "garden-1");
        assert_eq!(args.ack_window_ms, 30_000);
    }

    #[test]
    fn rejects_out_of_range_brightness() {
        assert!(parse(&["set-brightness", "101"]).is_err());
        let args = parse(&["set-brightness", "40"]).unwrap();
        assert_eq!(args.command, Command::SetBrightness { value: 40 });
    }

    #[test]
    fn rejects_blank_device_id() {
        let result = Args::try_parse_from([
            "aerogarden",
            "--device-id",
            " ",
            "--user-id",
            "42",
            "get-power",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_tiny_ack_window() {
        assert!(parse(&["--ack-window-ms", "10", "get-power"]).is_err());
    }

    #[test]
    fn default_filters_parse() {
        for debug in [false, true] {
            let filter = tracing_subscriber::EnvFilter::try_new(default_filter(debug)).unwrap();
            assert!(filter.to_string().contains("aerogarden"));
        }
        assert_eq!(default_filter(false), "warn,aerogarden_control=info");
        assert_eq!(default_filter(true), "warn,aerogarden=debug");
    }

    #[test]
    fn watch_defaults() {
        let args = parse(&["watch"]).unwrap();
        assert_eq!(args.command, Command::Watch { interval_secs: 60 });
    }
}
