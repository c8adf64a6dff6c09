use std::io;

use anyhow::Result;
use battview_cli::cli::{Cli, Commands, OutputFormat, StyleMode};
use battview_cli::commands::{ViewArgs, cmd_config, cmd_inspect, cmd_parse, cmd_view};
use battview_cli::config::Config;
use battview_cli::format::FormatOptions;
use battview_cli::util::source_from;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "battview", &mut io::stdout());
        return Ok(());
    }

    #[cfg(feature = "tui")]
    let is_tui = matches!(cli.command, Commands::Tui { .. });
    #[cfg(not(feature = "tui"))]
    let is_tui = false;

    if is_tui {
        #[cfg(feature = "tui")]
        battview_cli::tui::init_logging()?;
    } else {
        // When quiet mode is enabled, suppress info-level logging
        let filter = if cli.quiet {
            EnvFilter::new("warn")
        } else if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    let config_path = Config::path();
    let config = Config::load_from(&config_path);

    let style = cli
        .style
        .or_else(|| config.style.as_deref().and_then(StyleMode::from_config))
        .unwrap_or_default();
    let no_color = cli.no_color || config.no_color;
    let opts = FormatOptions::new(no_color, style).with_compact(cli.compact);
    let output = cli.output.as_ref();

    match cli.command {
        Commands::View {
            source,
            range,
            offset,
            size,
            format,
            no_header,
            all,
        } => {
            let format = format
                .or_else(|| config.format.as_deref().and_then(OutputFormat::from_config))
                .unwrap_or_default();
            let opts = opts.with_no_header(no_header);
            cmd_view(ViewArgs {
                source: source_from(&source, &config)?,
                interval: range.interval(),
                time_of_day: range.between,
                offset,
                size,
                all,
                format,
                output,
                config: &config,
                opts: &opts,
            })?;
        }
        Commands::Parse { timestamps, format } => {
            cmd_parse(&timestamps, format, output, &opts)?;
        }
        Commands::Inspect { source, format } => {
            cmd_inspect(source_from(&source, &config)?, format, output, &opts)?;
        }
        Commands::Config { action } => {
            cmd_config(action, &config_path, cli.quiet)?;
        }
        #[cfg(feature = "tui")]
        Commands::Tui { source, range } => {
            let initial = battview_types::ViewState::new()
                .with_interval(range.interval())
                .with_time_of_day(range.between);
            battview_cli::tui::run(battview_cli::tui::TuiOptions {
                source: source_from(&source, &config)?,
                initial,
                window: config.window,
            })
            .await?;
        }
        Commands::Completions { .. } => {
            // Already handled above
            unreachable!()
        }
    }

    Ok(())
}
