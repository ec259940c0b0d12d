//! # iotctl
//!
//! A command-line client for an IoT platform's management API.
//!
//! ## Overview
//!
//! iotctl is built on top of iotctllib. Each command fetches resources and
//! either shows a single item as a label/value table or lists all of them in
//! a numbered table. JSON and YAML output are available for scripting.
//!
//! ## Usage
//!
//! ```bash
//! # List apps, including their target URL or lambda ARN
//! iotctl --data snapshot.json apps --verbose
//!
//! # Show one app
//! iotctl --data snapshot.json apps 5f8e3e3a-...
//!
//! # List webhook apps as JSON
//! iotctl --data snapshot.json -j apps --type WEBHOOK_SMART_APP
//!
//! # Show a device preference as YAML
//! iotctl --data snapshot.json -y devicepreferences motionSensitivity
//! ```
//!
//! Table grouping and the default output format come from the selected
//! profile in `config.yaml` (see `--config` and `--profile`).

mod render;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use console::Style;
use iotctllib::resources::{AppListOptions, ChannelListOptions};
use iotctllib::{CliConfig, DefaultTableGenerator, OutputFormat, SnapshotClient, DEFAULT_PROFILE};
use tracing_subscriber::EnvFilter;

use render::RenderContext;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("iotctl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Manage apps, channels and device preferences on an IoT platform")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("json")
                .short('j')
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .conflicts_with("yaml")
                .help("Use JSON format of input and/or output"),
        )
        .arg(
            Arg::new("yaml")
                .short('y')
                .long("yaml")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Use YAML format of input and/or output"),
        )
        .arg(
            Arg::new("data")
                .long("data")
                .env("IOTCTL_DATA")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("JSON snapshot of platform resources"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .env("IOTCTL_CONFIG")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Path to config.yaml (defaults to the user config directory)"),
        )
        .arg(
            Arg::new("profile")
                .short('p')
                .long("profile")
                .env("IOTCTL_PROFILE")
                .global(true)
                .default_value(DEFAULT_PROFILE)
                .help("Configuration profile"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .default_value("warn")
                .value_parser(["error", "warn", "info", "debug", "trace"])
                .help("Log level written to stderr (RUST_LOG takes precedence)"),
        )
        .subcommand(
            Command::new("apps")
                .about("Get a specific app or a list of apps")
                .arg(Arg::new("id").help("The app id"))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .value_parser(["WEBHOOK_SMART_APP", "LAMBDA_SMART_APP", "API_ONLY"])
                        .help("Filter results by appType"),
                )
                .arg(
                    Arg::new("classification")
                        .long("classification")
                        .action(ArgAction::Append)
                        .value_parser([
                            "AUTOMATION",
                            "SERVICE",
                            "DEVICE",
                            "CONNECTED_SERVICE",
                        ])
                        .help("Filter results by one or more classifications"),
                )
                .arg(
                    Arg::new("verbose")
                        .short('v')
                        .long("verbose")
                        .action(ArgAction::SetTrue)
                        .help("Include URLs and ARNs in table output"),
                ),
        )
        .subcommand(
            Command::new("channels")
                .about("List all channels or get information for a specific channel")
                .arg(Arg::new("id").help("The channel id"))
                .arg(
                    Arg::new("include-read-only")
                        .short('I')
                        .long("include-read-only")
                        .action(ArgAction::SetTrue)
                        .help("Include subscribed-to channels as well as owned channels"),
                )
                .arg(
                    Arg::new("subscriber-type")
                        .long("subscriber-type")
                        .value_parser(["HUB"])
                        .help("Filter channels by subscriber type"),
                )
                .arg(
                    Arg::new("subscriber-id")
                        .long("subscriber-id")
                        .help("Filter channels by subscriber id, e.g. a hub id"),
                ),
        )
        .subcommand(
            Command::new("devicepreferences")
                .about("List device preferences or get information for a specific device preference")
                .arg(Arg::new("id").help("The device preference id")),
        )
}

/// Install the stderr log subscriber
fn init_logging(matches: &ArgMatches) {
    let level = matches
        .get_one::<String>("log-level")
        .map(|s| s.as_str())
        .unwrap_or("warn");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber may already be installed when embedded; keep the existing one
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(true)
        .try_init();
}

/// Extract channel list filters from matches
fn extract_channel_options(matches: &ArgMatches) -> ChannelListOptions {
    ChannelListOptions {
        include_read_only: matches.get_flag("include-read-only"),
        subscriber_type: matches.get_one::<String>("subscriber-type").cloned(),
        subscriber_id: matches.get_one::<String>("subscriber-id").cloned(),
    }
}

/// Pick the output format from flags, falling back to the profile default
fn output_format(matches: &ArgMatches, profile_default: OutputFormat) -> OutputFormat {
    if matches.get_flag("json") {
        OutputFormat::Json
    } else if matches.get_flag("yaml") {
        OutputFormat::Yaml
    } else {
        profile_default
    }
}

/// Extract app list filters from matches
fn extract_app_options(matches: &ArgMatches) -> AppListOptions {
    AppListOptions {
        app_type: matches.get_one::<String>("type").cloned(),
        classifications: matches
            .get_many::<String>("classification")
            .map(|v| v.cloned().collect())
            .unwrap_or_default(),
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<String> {
    let config_path = matches.get_one::<PathBuf>("config");
    let config = CliConfig::load(config_path.map(PathBuf::as_path))?;
    let profile_name = matches
        .get_one::<String>("profile")
        .map(|s| s.as_str())
        .unwrap_or(DEFAULT_PROFILE);
    let profile = config.profile(profile_name);
    tracing::debug!(profile = profile_name, ?profile, "loaded configuration");

    let data_path = matches
        .get_one::<PathBuf>("data")
        .context("no resource snapshot given; pass --data or set IOTCTL_DATA")?;
    let client = SnapshotClient::from_path(data_path)?;

    let generator = DefaultTableGenerator::new(profile.group_table_output_rows);
    let ctx = RenderContext {
        client: &client,
        generator: &generator,
        format: output_format(matches, profile.default_output),
    };

    let rendered = match matches.subcommand() {
        Some(("apps", sub)) => render::render_apps(
            &ctx,
            sub.get_one::<String>("id").map(|s| s.as_str()),
            &extract_app_options(sub),
            sub.get_flag("verbose"),
        )?,
        Some(("channels", sub)) => render::render_channels(
            &ctx,
            sub.get_one::<String>("id").map(|s| s.as_str()),
            &extract_channel_options(sub),
        )?,
        Some(("devicepreferences", sub)) => render::render_device_preferences(
            &ctx,
            sub.get_one::<String>("id").map(|s| s.as_str()),
        )?,
        _ => anyhow::bail!("unknown command"),
    };

    Ok(rendered)
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(&matches);

    match run(&matches) {
        Ok(output) => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            let label = Style::new().red().bold().apply_to("Error:");
            eprintln!("{} {:#}", label, e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ArgMatches {
        let mut full = vec!["iotctl"];
        full.extend(args);
        build_command().try_get_matches_from(full).unwrap()
    }

    #[test]
    fn test_command_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn test_output_format_flags() {
        assert_eq!(
            output_format(&parse(&["-j", "apps"]), OutputFormat::Table),
            OutputFormat::Json
        );
        assert_eq!(
            output_format(&parse(&["apps", "--yaml"]), OutputFormat::Table),
            OutputFormat::Yaml
        );
        assert_eq!(
            output_format(&parse(&["apps"]), OutputFormat::Yaml),
            OutputFormat::Yaml
        );
    }

    #[test]
    fn test_json_and_yaml_conflict() {
        assert!(build_command()
            .try_get_matches_from(["iotctl", "-j", "-y", "apps"])
            .is_err());
    }

    #[test]
    fn test_extract_app_options() {
        let matches = parse(&[
            "apps",
            "--type",
            "API_ONLY",
            "--classification",
            "SERVICE",
            "--classification",
            "DEVICE",
        ]);
        let (_, sub) = matches.subcommand().unwrap();
        let options = extract_app_options(sub);
        assert_eq!(options.app_type.as_deref(), Some("API_ONLY"));
        assert_eq!(options.classifications, vec!["SERVICE", "DEVICE"]);
    }

    #[test]
    fn test_extract_channel_options() {
        let matches = parse(&[
            "channels",
            "-I",
            "--subscriber-type",
            "HUB",
            "--subscriber-id",
            "hub-1",
        ]);
        let (_, sub) = matches.subcommand().unwrap();
        let options = extract_channel_options(sub);
        assert!(options.include_read_only);
        assert_eq!(options.subscriber_type.as_deref(), Some("HUB"));
        assert_eq!(options.subscriber_id.as_deref(), Some("hub-1"));

        let matches = parse(&["channels"]);
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(extract_channel_options(sub), ChannelListOptions::default());
    }
}
