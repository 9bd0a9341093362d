//! Terminal host for the Notion widget.
//!
//! Each invocation mounts the widget against a JSON state file, applies one
//! interaction, and prints the resulting view.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use widget::config::DEFAULT_STATE_FILE;
use widget::{JsonFileStore, RecordFetcher, RelayClient, StateStore, Widget, WidgetConfig};

#[derive(Parser)]
#[command(name = "notion-widget", about = "Show Notion tasks fetched through the relay")]
struct Cli {
    /// Relay endpoint, e.g. https://example.vercel.app/api/notion
    #[arg(long, env = "NOTION_WIDGET_PROXY_URL")]
    proxy_url: String,

    /// Shared secret sent as x-widget-key
    #[arg(long, env = "NOTION_WIDGET_KEY", hide_env_values = true)]
    widget_key: String,

    /// Synced state file
    #[arg(long, env = "NOTION_WIDGET_STATE", default_value = DEFAULT_STATE_FILE)]
    state: std::path::PathBuf,

    /// Relay request timeout in seconds (0 or unset waits indefinitely)
    #[arg(long, env = "NOTION_WIDGET_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show records as a list
    List,
    /// Show the month calendar
    Calendar,
    /// Reload from the relay, then show the list
    Refresh,
    /// Go to the previous month and show the calendar
    Prev,
    /// Go to the next month and show the calendar
    Next,
}

impl Command {
    /// Refresh fetches on its own; mounting first would hit the relay twice.
    fn mounts_first(&self) -> bool {
        !matches!(self, Command::Refresh)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = WidgetConfig::new(cli.proxy_url, cli.widget_key, cli.state, cli.timeout_secs)?;

    let store = JsonFileStore::open(&config.state_path)?;
    let widget = Widget::new(RelayClient::new(&config)?, store);

    let command = cli.command.unwrap_or(Command::List);
    if command.mounts_first() {
        widget.mount().await?;
    }

    let today = Local::now().date_naive();
    match command {
        Command::List => print!("{}", widget.list_view().await),
        Command::Refresh => {
            widget.refresh().await?;
            print!("{}", widget.list_view().await);
        }
        Command::Calendar => print_calendar(&widget, today).await?,
        Command::Prev => {
            widget.prev_month().await?;
            print_calendar(&widget, today).await?;
        }
        Command::Next => {
            widget.next_month().await?;
            print_calendar(&widget, today).await?;
        }
    }

    Ok(())
}

async fn print_calendar<F: RecordFetcher, S: StateStore>(
    widget: &Widget<F, S>,
    today: NaiveDate,
) -> Result<()> {
    if let Some(error) = widget.list_view().await.error_line {
        eprintln!("{}", error);
    }
    print!("{}", widget.calendar_view(today).await?);
    Ok(())
}
