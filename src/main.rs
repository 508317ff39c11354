//! Civitas CLI
//!
//! Drives the page controllers from a terminal:
//! - Look up representatives and detect them from coordinates
//! - Talk to the assistant
//! - Read the admin analytics
//! - Browse the 2024 results
//! - Write rendered pages to HTML files

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use civitas::auth::AuthState;
use civitas::chat::{ChatMessage, PendingTurn, Role};
use civitas::client::{ApiClient, Representative, StatsSnapshot};
use civitas::config::{generate_default_config, Config};
use civitas::electoral;
use civitas::pages::{AdminDashboard, CitizenPage, PageContext, PartiesPage};
use civitas::render::admin::format_timestamp;
use civitas::session::FileStore;

#[derive(Parser)]
#[command(name = "civitas")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find your representatives, ask about them and browse election results")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/civitas/config.toml or ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Civic API origin, overrides the config
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List representatives, optionally filtered
    Search {
        /// Name, constituency or state
        query: Option<String>,
    },

    /// Show the representatives of a position
    Detect {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Ask the assistant. Without a question, starts an interactive session.
    Chat {
        question: Option<String>,
        /// Rate the answer (1-5)
        #[arg(long)]
        rate: Option<u8>,
    },

    /// Admin analytics
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// 2024 Lok Sabha results
    Parties {
        /// Show every party instead of the preview
        #[arg(long)]
        all: bool,
        /// Seat breakdown of one state (ISO code, e.g. IN-KL)
        #[arg(long)]
        state: Option<String>,
    },

    /// Write a rendered page to an HTML file
    Render {
        #[arg(value_enum)]
        page: PageKind,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Citizen page search term
        #[arg(long)]
        search: Option<String>,
    },

    /// Generate default config file
    InitConfig {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum AdminAction {
    /// Check credentials and remember them
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Forget the stored credentials
    Logout,
    /// Print the current analytics snapshot
    Stats,
    /// Refresh the analytics until the session is rejected
    Watch {
        /// Seconds between refreshes
        #[arg(long, default_value = "30")]
        interval: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PageKind {
    Citizen,
    Admin,
    Parties,
}

/// How long a finished command waits for its analytics events
const TELEMETRY_GRACE: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    config.logging.init();

    if let Commands::InitConfig { output } = &cli.command {
        return write_output(output.as_ref(), &generate_default_config());
    }

    let ctx = build_context(&config)?;
    let result = run(cli.command, cli.format, &ctx, &config).await;

    // Events are sent on background tasks that die with the runtime
    ctx.telemetry.flush(TELEMETRY_GRACE).await;
    result
}

async fn run(
    command: Commands,
    format: OutputFormat,
    ctx: &PageContext,
    config: &Config,
) -> anyhow::Result<()> {
    match command {
        Commands::Search { query } => {
            let mut page = CitizenPage::new(ctx);
            match query.as_deref() {
                Some(q) if !q.trim().is_empty() => {
                    page.search(q).await?;
                }
                _ => page.load().await?,
            }
            print_representatives(page.representatives(), format)?;
        }

        Commands::Detect { lat, lon } => {
            let mut page = CitizenPage::new(ctx);
            let summary = page.detect_location(lat, lon).await;
            println!("{}", summary.report);
            if let Some(greeting) = summary.greeting {
                println!();
                println!("{}", greeting);
            }
        }

        Commands::Chat { question, rate } => {
            let heartbeat = ctx.telemetry.start_heartbeat(config.telemetry.heartbeat_interval());
            let mut page = CitizenPage::new(ctx);

            match question {
                Some(question) => {
                    let before = page.chat().messages().len();
                    let turn = page.begin_chat(&question);
                    let reply = answer(&mut page, turn, before).await;
                    if let (Some(id), Some(stars)) = (reply, rate) {
                        page.rate(id, stars).await?;
                        println!("Rated {} / 5", stars);
                    }
                }
                None => interactive_chat(&mut page).await?,
            }

            heartbeat.abort();
        }

        Commands::Admin { action } => {
            let mut dashboard = AdminDashboard::new(ctx);
            match action {
                AdminAction::Login { username, password } => {
                    dashboard.login(&username, &password).await?;
                    println!("Logged in as {}", username);
                }
                AdminAction::Logout => {
                    dashboard.logout();
                    println!("Logged out");
                }
                AdminAction::Stats => {
                    require_session(&mut dashboard).await?;
                    match dashboard.stats() {
                        Some(stats) => print_stats(stats, format)?,
                        None => bail!("Stats are unavailable right now"),
                    }
                }
                AdminAction::Watch { interval } => {
                    require_session(&mut dashboard).await?;
                    let refreshed = dashboard.poll(Duration::from_secs(interval.max(1))).await;
                    println!("Session ended after {} refreshes", refreshed);
                }
            }
        }

        Commands::Parties { all, state } => {
            print_parties(ctx, all, format)?;
            if let Some(code) = state {
                print_state(&code)?;
            }
        }

        Commands::Render {
            page,
            output,
            search,
        } => {
            let html = match page {
                PageKind::Citizen => {
                    let mut citizen = CitizenPage::new(ctx);
                    match search.as_deref() {
                        Some(q) => citizen.search(q).await.map(|_| ())?,
                        None => citizen.load().await?,
                    }
                    citizen.to_html()
                }
                PageKind::Admin => {
                    let mut dashboard = AdminDashboard::new(ctx);
                    dashboard.start().await;
                    dashboard.to_html()
                }
                PageKind::Parties => PartiesPage::new(&ctx.flags).to_html(),
            };
            write_output(output.as_ref(), &html)?;
        }

        Commands::InitConfig { .. } => {}
    }

    Ok(())
}

fn build_context(config: &Config) -> anyhow::Result<PageContext> {
    let client = ApiClient::http(&config.api)?;
    let path = config.storage.store_path();
    let store = FileStore::open(&path)
        .with_context(|| format!("Failed to open local state at {:?}", path))?;

    Ok(PageContext::new(
        client,
        Arc::new(store),
        config.pages.clone(),
        config.telemetry.enabled,
    ))
}

async fn require_session(dashboard: &mut AdminDashboard) -> anyhow::Result<()> {
    if dashboard.start().await != AuthState::Authenticated {
        bail!("Not logged in. Run `civitas admin login` first.");
    }
    Ok(())
}

/// Read questions from stdin until EOF.
///
/// `/rate <id> <stars>` rates an answer, `/chip <id> <n>` sends a suggestion.
async fn interactive_chat(page: &mut CitizenPage) -> anyhow::Result<()> {
    print_new_messages(page.chat().messages(), 0);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let before = page.chat().messages().len();
        let mut words = line.split_whitespace();

        // Index of the first message not yet on screen
        let (turn, unseen) = match words.next() {
            Some("/rate") => {
                match two_numbers(words) {
                    Ok((id, stars)) => {
                        let stars = u8::try_from(stars).unwrap_or(u8::MAX);
                        match page.rate(id, stars).await {
                            Ok(()) => println!("Rated message {} with {} stars", id, stars),
                            Err(e) => eprintln!("{}", e),
                        }
                    }
                    Err(e) => eprintln!("usage: /rate <id> <stars> ({})", e),
                }
                continue;
            }
            Some("/chip") => match two_numbers(words) {
                Ok((id, chip)) => (page.begin_suggestion(id, chip as usize), before),
                Err(e) => {
                    eprintln!("usage: /chip <id> <n> ({})", e);
                    continue;
                }
            },
            // The typed line is already on the terminal
            Some(_) => (page.begin_chat(&line), before + 1),
            None => continue,
        };

        answer(page, turn, unseen).await;
    }

    Ok(())
}

/// Print the question and the placeholder, then the answer once it lands.
///
/// `unseen` is the index of the first message not yet on screen.
async fn answer(page: &mut CitizenPage, turn: Option<PendingTurn>, unseen: usize) -> Option<u64> {
    let turn = turn?;
    print_new_messages(page.chat().messages(), unseen);

    // The placeholder is last and is replaced by the reply
    let placeholder_at = page.chat().messages().len().saturating_sub(1);
    let id = page.finish_chat(turn).await;
    print_new_messages(page.chat().messages(), placeholder_at);
    Some(id)
}

fn two_numbers<'a>(mut words: impl Iterator<Item = &'a str>) -> anyhow::Result<(u64, u64)> {
    let first = words.next().context("missing message id")?.parse()?;
    let second = words.next().context("missing number")?.parse()?;
    Ok((first, second))
}

fn print_new_messages(messages: &[ChatMessage], from: usize) {
    for message in messages.iter().skip(from) {
        let speaker = match message.role {
            Role::User => "you",
            Role::Assistant => "assistant",
        };
        println!("[{}] {}: {}", message.id, speaker, message.text);
        for (i, chip) in message.chips.iter().enumerate() {
            println!("      ({}) {}", i, chip);
        }
    }
}

fn print_representatives(reps: &[Representative], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(reps)?);
        return Ok(());
    }

    if reps.is_empty() {
        println!("No representatives found.");
        return Ok(());
    }

    println!("{:<28} {:<10} {:<24} {}", "NAME", "PARTY", "CONSTITUENCY", "STATE");
    for rep in reps {
        println!(
            "{:<28} {:<10} {:<24} {}",
            rep.name.as_deref().unwrap_or("-"),
            rep.party.as_deref().unwrap_or("-"),
            rep.constituency.as_deref().unwrap_or("-"),
            rep.state.as_deref().unwrap_or("-"),
        );
    }
    println!();
    println!("{} representatives", reps.len());
    Ok(())
}

fn print_stats(stats: &StatsSnapshot, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    let overview = civitas::render::render_overview(stats);
    println!("New users:    {}", overview.users);
    println!("Avg. session: {}", overview.duration);

    println!();
    println!("Top actions:");
    for row in &stats.top_actions {
        println!("  {:<24} {}", row.event_type.as_deref().unwrap_or("-"), row.count);
    }

    println!();
    println!("Drop-offs:");
    for row in &stats.drop_offs {
        println!("  {:<24} {}", row.event_type.as_deref().unwrap_or("-"), row.count);
    }

    println!();
    println!("Traffic by hour:");
    for (hour, count) in civitas::charts::normalize_hourly(&stats.traffic_by_hour) {
        if count > 0 {
            println!("  {}:00  {}", hour, count);
        }
    }

    println!();
    println!("Top locations:");
    for row in &stats.top_locations {
        println!("  {:<24} {}", row.location.as_deref().unwrap_or("-"), row.count);
    }

    println!();
    println!("Recent chats:");
    for chat in &stats.recent_chats {
        println!(
            "  {}  {}  ({} stars)",
            format_timestamp(chat.timestamp.as_deref()),
            chat.user_query.as_deref().unwrap_or("-"),
            chat.rating
        );
    }
    Ok(())
}

fn print_parties(ctx: &PageContext, all: bool, format: OutputFormat) -> anyhow::Result<()> {
    let standings = electoral::national_standings();
    let shown = if all {
        standings.len()
    } else {
        ctx.flags.party_preview_limit.min(standings.len())
    };

    if format == OutputFormat::Json {
        let rows: Vec<_> = standings[..shown]
            .iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.name,
                    "abbr": p.abbr,
                    "seats": p.seats,
                    "seat_share": p.seat_share,
                    "vote_share": p.vote_share,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{:<40} {:>6} {:>8} {:>8}", "PARTY", "SEATS", "SEATS %", "VOTES %");
    for party in &standings[..shown] {
        println!(
            "{:<40} {:>6} {:>8} {:>8}",
            format!("{} ({})", party.name, party.abbr),
            party.seats,
            party.seat_share,
            party.vote_share,
        );
    }
    if shown < standings.len() {
        println!("... {} more (use --all)", standings.len() - shown);
    }
    Ok(())
}

fn print_state(code: &str) -> anyhow::Result<()> {
    let Some(state) = electoral::state_result(code) else {
        bail!("No results for {}", code);
    };

    println!();
    println!("{} ({} seats)", state.name, state.total);
    for row in state.results {
        println!(
            "  {:<12} {:>3}  {:>5.1}%",
            row.party,
            row.seats,
            state.share_of(row)
        );
    }
    Ok(())
}

fn write_output(path: Option<&PathBuf>, content: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {:?}", path))?;
            println!("Wrote {:?}", path);
        }
        None => println!("{}", content),
    }
    Ok(())
}
