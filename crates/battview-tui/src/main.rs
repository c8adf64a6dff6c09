use anyhow::Result;
use battview_cli::config::{Config, resolve_source};
use battview_cli::source::SourceSpec;
use battview_cli::tui::{self, TuiOptions};
use battview_cli::util::require_source;
use battview_types::ViewState;

#[tokio::main]
async fn main() -> Result<()> {
    tui::init_logging()?;

    let config = Config::load();
    let source = resolve_source(std::env::args().nth(1), &config)
        .map(|location| SourceSpec::new(location, None));

    tui::run(TuiOptions {
        source: require_source(source)?,
        initial: ViewState::new(),
        window: config.window,
    })
    .await
}
