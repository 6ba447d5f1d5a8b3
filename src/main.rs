mod api;
mod app;
mod config;
mod input;
mod player;
mod playlist;
mod tui;

use anyhow::Context;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "periscope", version, about = "Terminal client for a YouTube proxy server")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Override the proxy base URL from the config.
    #[arg(long)]
    server: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the interactive TUI (default).
    Tui,
    /// Search videos and print results to stdout (headless).
    Search {
        query: String,
    },
    /// Print one page of a playlist to stdout (headless).
    Playlist {
        url: String,
        #[arg(long, default_value_t = 1)]
        page: u64,
    },
    /// Resolve a video URL or id to its proxy stream URL (headless).
    Play {
        input: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let mut cfg = config::load(cli.config.as_deref()).context("load config")?;
    if let Some(server) = cli.server {
        cfg.server.base_url = server;
    }
    let cfg_path = match cli.config.clone() {
        Some(p) => p,
        None => config::default_config_path().context("default config path")?,
    };

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            let mut terminal = tui::TerminalGuard::enter().context("init terminal")?;
            let mut app = app::App::new(cfg, cfg_path)?;
            app.run(terminal.terminal_mut()).await?;
        }
        Command::Search { query } => {
            let client = api::ProxyClient::new(&cfg.server.base_url)?;
            let items = client.search(&query).await?;
            print_items(&items);
        }
        Command::Playlist { url, page } => {
            let client = api::ProxyClient::new(&cfg.server.base_url)?;
            let resp = client.playlist_page(&url, page).await?;
            println!(
                "Page {} / {}  ({} items, {} per page)",
                resp.page, resp.total_pages, resp.total, resp.page_size
            );
            print_items(&resp.items);
        }
        Command::Play { input } => {
            let source = api::normalize_video_input(&input)
                .context("not a video URL or 11-char id")?;
            let client = api::ProxyClient::new(&cfg.server.base_url)?;
            println!("{}", client.stream_url_for(&source));
        }
    }

    Ok(())
}

fn print_items(items: &[api::models::VideoItem]) {
    for (i, item) in items.iter().enumerate() {
        let channel = item
            .channel
            .as_deref()
            .map(|c| format!("  {c}"))
            .unwrap_or_default();
        let duration = item
            .duration
            .as_deref()
            .map(|d| format!("  [{d}]"))
            .unwrap_or_default();
        println!("{:02}. {}{}{}  (id={})", i + 1, item.title, channel, duration, item.id);
    }
}
