mod bookmarks;
mod chart_type;
mod config;
mod datasette;
mod desktop;
mod error;
mod extract;
mod frecency;
mod github;
mod http;
mod notice;
mod reference;
mod resolver;
mod search;
mod targets;

use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use bookmarks::{thumbnail_url, ChartFields, ChartStore};
use chart_type::ChartType;
use config::{Browser, Settings};
use datasette::DatasetteClient;
use error::StoreError;
use frecency::Frecency;
use github::GithubClient;
use notice::Style;
use resolver::Resolver;
use targets::{EnvironmentTarget, TargetKind};

#[derive(Parser)]
#[command(name = "owid", about = "Open Our World in Data charts across live, local and staging")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a URL, SVG filename, slug or chart id (default: clipboard) into links
    Page {
        /// Text to resolve instead of the clipboard content
        text: Option<String>,
        /// Open the page in "live", "local" or a staging branch
        #[arg(short, long)]
        open: Option<String>,
        /// Open the chart editor instead of the page
        #[arg(short, long, requires = "open")]
        editor: bool,
        /// Use the secondary browser
        #[arg(short = 'a', long)]
        secondary: bool,
        /// Copy the selected link instead of opening it
        #[arg(short, long, conflicts_with = "editor")]
        copy: bool,
        /// Open the metadata page of the n-th indicator
        #[arg(short, long, conflicts_with_all = ["open", "editor"])]
        metadata: Option<usize>,
        /// Print the resolved reference as JSON
        #[arg(long)]
        json: bool,
    },
    /// Staging sites with the copied URL's path appended
    Staging {
        /// URL to replay instead of the clipboard content
        text: Option<String>,
        /// Branch whose staging site to open
        #[arg(short, long)]
        open: Option<String>,
        /// Open the staging homepage instead of the copied path
        #[arg(long, requires = "open")]
        home: bool,
        /// Use the secondary browser
        #[arg(short = 'a', long)]
        secondary: bool,
    },
    /// One random chart per chart type
    Random {
        /// Show links on the local dev server instead of live
        #[arg(long)]
        local: bool,
    },
    /// Indicator metadata links for a chart
    Variables {
        /// Chart id or slug
        chart: String,
        /// Open the n-th metadata link
        #[arg(short, long)]
        open: Option<usize>,
    },
    /// Search charts and articles
    Search {
        query: Vec<String>,
        /// Open the n-th result
        #[arg(short, long)]
        open: Option<usize>,
    },
    /// Manage saved example charts
    Charts {
        #[command(subcommand)]
        command: ChartsCommand,
    },
}

#[derive(Subcommand)]
enum ChartsCommand {
    /// List saved charts, newest first
    List,
    /// Save a chart
    Add {
        #[arg(short = 't', long = "type", value_parser = parse_chart_type)]
        chart_type: ChartType,
        #[arg(short = 'l', long)]
        tag_line: String,
        #[arg(short, long)]
        url: String,
    },
    /// Edit a saved chart
    Update {
        id: String,
        #[arg(short = 't', long = "type", value_parser = parse_chart_type)]
        chart_type: Option<ChartType>,
        #[arg(short = 'l', long)]
        tag_line: Option<String>,
        #[arg(short, long)]
        url: Option<String>,
    },
    /// Delete a saved chart
    Delete { id: String },
    /// Open a saved chart
    Open {
        id: String,
        #[arg(short = 'a', long)]
        secondary: bool,
    },
    /// Copy a saved chart's link
    Copy { id: String },
    /// Print the preview image URL of a saved chart
    Thumbnail { id: String },
}

fn parse_chart_type(s: &str) -> Result<ChartType, String> {
    ChartType::parse(s).ok_or_else(|| {
        let names: Vec<&str> = ChartType::ALL.iter().map(|t| t.as_str()).collect();
        format!("unknown chart type, expected one of: {}", names.join(", "))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::load()?;
    let http = http::build_client(&settings)?;
    let datasette = DatasetteClient::new(http.clone(), &settings);
    let github = GithubClient::new(http.clone(), &settings);

    match cli.command {
        Commands::Page {
            text,
            open,
            editor,
            secondary,
            copy,
            metadata,
            json,
        } => {
            let text = text.unwrap_or_else(desktop::read_clipboard);
            let resolver = Resolver::new(datasette.clone(), &settings);

            let pb = spinner("Resolving chart...")?;
            let (resolution, sites) =
                tokio::join!(resolver.resolve(&text), github.list_pull_requests());
            let chart_id = resolution.reference.chart_id.unwrap_or(0);
            let (variables, random) = tokio::join!(
                datasette.fetch_variables(chart_id),
                datasette.fetch_random_charts()
            );
            pb.finish_and_clear();
            debug!("Resolved {:?} to {:?}", text, resolution.phase);

            if let Some(message) = &resolution.notice {
                notice::show(Style::Failure, message);
            }
            let reference = &resolution.reference;
            if json {
                println!("{}", serde_json::to_string_pretty(reference)?);
                return Ok(());
            }

            let mut frecency = Frecency::load(&settings.frecency_path());
            let sites = frecency.sort(sites, |s| s.branch.as_str(), Utc::now());
            let targets = EnvironmentTarget::all(&settings, &sites);

            if let Some(n) = metadata {
                let urls: Vec<String> = variables
                    .iter()
                    .map(|v| targets::metadata_url(&settings, v.id))
                    .collect();
                let url = pick(&urls, n)?;
                if copy {
                    desktop::copy_to_clipboard(url)?;
                    notice::show(Style::Success, &format!("Copied {}", url));
                } else {
                    desktop::launch(url, pick_browser(&settings, secondary));
                    println!("{}", url);
                }
                return Ok(());
            }

            let Some(name) = open else {
                print_targets(&targets, |t| t.url(reference));
                let links = targets[0].related_links(
                    reference,
                    &variables,
                    &random,
                    &settings,
                );
                println!("\n--- Related ({}) ---", targets[0].label());
                for link in &links {
                    println!("  {:<32} {}", truncate(&link.title, 32), link.url);
                }
                return Ok(());
            };

            let target = find_target(&targets, &name)?;
            let url = if editor {
                match target.editor_url(reference) {
                    Some(url) => url,
                    None => bail!("No chart editor for this page (chart id unknown or already an admin page)"),
                }
            } else {
                target.url(reference)
            };
            if copy {
                desktop::copy_to_clipboard(&url)?;
                notice::show(Style::Success, &format!("Copied {}", url));
            } else {
                desktop::launch(&url, pick_browser(&settings, secondary));
                println!("{}", url);
            }
            if let Some(branch) = target.branch() {
                frecency.record(branch, Utc::now())?;
            }
            Ok(())
        }
        Commands::Staging {
            text,
            open,
            home,
            secondary,
        } => {
            let text = text.unwrap_or_else(desktop::read_clipboard);
            let suffix = targets::path_suffix(&text);

            let pb = spinner("Listing pull requests...")?;
            let sites = github.list_pull_requests().await;
            pb.finish_and_clear();

            let mut frecency = Frecency::load(&settings.frecency_path());
            let sites = frecency.sort(sites, |s| s.branch.as_str(), Utc::now());
            let targets: Vec<EnvironmentTarget> =
                sites.iter().map(EnvironmentTarget::staging).collect();
            if targets.is_empty() {
                println!("No open pull requests.");
                return Ok(());
            }

            let Some(name) = open else {
                print_targets(&targets, |t| format!("{}{}", t.origin, suffix));
                return Ok(());
            };
            let target = find_target(&targets, &name)?;
            let url = if home {
                target.origin.clone()
            } else {
                format!("{}{}", target.origin, suffix)
            };
            desktop::launch(&url, pick_browser(&settings, secondary));
            println!("{}", url);
            if let Some(branch) = target.branch() {
                frecency.record(branch, Utc::now())?;
            }
            Ok(())
        }
        Commands::Random { local } => {
            let pb = spinner("Picking random charts...")?;
            let charts = datasette.fetch_random_charts().await;
            pb.finish_and_clear();

            let target = if local {
                EnvironmentTarget::local(&settings)
            } else {
                EnvironmentTarget::live(&settings)
            };
            if charts.is_empty() {
                println!("No charts found.");
                return Ok(());
            }
            println!("{:>3} | {:<26} | {}", "#", "Type", "URL");
            println!("{}", "-".repeat(80));
            for (i, chart) in charts.iter().enumerate() {
                println!(
                    "{:>3} | {:<26} | {}",
                    i + 1,
                    chart.chart_type.name(),
                    target.chart_url(&chart.slug)
                );
            }
            Ok(())
        }
        Commands::Variables { chart, open } => {
            let pb = spinner("Looking up indicators...")?;
            let chart_id = match chart.parse::<u64>() {
                Ok(id) => Some(id),
                Err(_) => datasette.fetch_chart(Some(chart.as_str()), None).await.map(|c| c.id),
            };
            let variables = match chart_id {
                Some(id) => datasette.fetch_variables(id).await,
                None => Vec::new(),
            };
            pb.finish_and_clear();

            if variables.is_empty() {
                println!("No indicators found for {}.", chart);
                return Ok(());
            }
            let urls: Vec<String> = variables
                .iter()
                .map(|v| targets::metadata_url(&settings, v.id))
                .collect();
            if let Some(n) = open {
                let url = pick(&urls, n)?;
                desktop::launch(url, &settings.primary_browser);
                println!("{}", url);
                return Ok(());
            }
            println!("{:>3} | {:<8} | {:<40} | {}", "#", "Id", "Name", "Metadata");
            println!("{}", "-".repeat(105));
            for (i, (v, url)) in variables.iter().zip(&urls).enumerate() {
                println!("{:>3} | {:<8} | {:<40} | {}", i + 1, v.id, truncate(&v.name, 40), url);
            }
            Ok(())
        }
        Commands::Search { query, open } => {
            let query = query.join(" ");
            let pb = spinner("Searching...")?;
            let results = search::search(&http, &settings, &query).await;
            pb.finish_and_clear();

            if results.is_empty() {
                println!("No results for \"{}\".", query);
                return Ok(());
            }
            if let Some(n) = open {
                let urls: Vec<String> = results.iter().map(|r| r.url.clone()).collect();
                let url = pick(&urls, n)?;
                desktop::launch(url, &settings.primary_browser);
                println!("{}", url);
                return Ok(());
            }
            for (i, r) in results.iter().enumerate() {
                println!("{:>3} | {:<50} | {}", i + 1, truncate(&r.title, 50), r.url);
            }
            Ok(())
        }
        Commands::Charts { command } => run_charts(command, &settings),
    }
}

fn run_charts(command: ChartsCommand, settings: &Settings) -> Result<()> {
    let mut store = ChartStore::load(&settings.charts_path())?;

    match command {
        ChartsCommand::List => {
            let charts = store.list();
            if charts.is_empty() {
                println!("No saved charts. Add one with `owid charts add`.");
                return Ok(());
            }
            println!(
                "{:<36} | {:<32} | {:<26} | {:<10} | {}",
                "Id", "Tag line", "Type", "Created", "URL"
            );
            println!("{}", "-".repeat(140));
            for c in charts {
                println!(
                    "{:<36} | {:<32} | {:<26} | {:<10} | {}",
                    c.id,
                    truncate(&c.tag_line, 32),
                    c.chart_type.name(),
                    c.created_at.format("%Y-%m-%d"),
                    c.url
                );
            }
            Ok(())
        }
        ChartsCommand::Add {
            chart_type,
            tag_line,
            url,
        } => match store.create(chart_type, &tag_line, &url) {
            Ok(chart) => {
                notice::show(Style::Success, "Chart saved");
                println!("{}", chart.id);
                Ok(())
            }
            Err(StoreError::DuplicateUrl(_)) => {
                notice::show(Style::Failure, "Chart already exists");
                Ok(())
            }
            Err(e) => Err(e.into()),
        },
        ChartsCommand::Update {
            id,
            chart_type,
            tag_line,
            url,
        } => {
            let fields = ChartFields {
                chart_type,
                tag_line,
                url,
            };
            match store.update(&id, fields) {
                Ok(_) => {
                    notice::show(Style::Success, "Chart updated");
                    Ok(())
                }
                Err(StoreError::DuplicateUrl(_)) => {
                    notice::show(Style::Failure, "Chart already exists");
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        }
        ChartsCommand::Delete { id } => {
            store.delete(&id)?;
            notice::show(Style::Success, "Chart deleted");
            Ok(())
        }
        ChartsCommand::Open { id, secondary } => {
            let chart = saved_chart(&store, &id)?;
            desktop::launch(&chart.url, pick_browser(settings, secondary));
            Ok(())
        }
        ChartsCommand::Copy { id } => {
            let chart = saved_chart(&store, &id)?;
            desktop::copy_to_clipboard(&chart.url)?;
            notice::show(Style::Success, "Copied link");
            Ok(())
        }
        ChartsCommand::Thumbnail { id } => {
            let chart = saved_chart(&store, &id)?;
            let url = thumbnail_url(&chart.url)
                .with_context(|| format!("{} is not a valid URL", chart.url))?;
            println!("{}", url);
            println!("{} · {}", chart.page_type.label(), chart.tag_line);
            Ok(())
        }
    }
}

fn saved_chart<'a>(store: &'a ChartStore, id: &str) -> Result<&'a bookmarks::Chart> {
    store
        .get(id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()).into())
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn print_targets(targets: &[EnvironmentTarget], url: impl Fn(&EnvironmentTarget) -> String) {
    println!(
        "{:>3} | {:<28} | {:<36} | {:<16} | {}",
        "#", "Environment", "Pull request", "Updated", "URL"
    );
    println!("{}", "-".repeat(150));
    for (i, t) in targets.iter().enumerate() {
        let (title, updated) = match &t.kind {
            TargetKind::Staging {
                title, updated_at, ..
            } => (
                truncate(title, 36),
                updated_at.format("%Y-%m-%d %H:%M").to_string(),
            ),
            _ => ("-".to_string(), "-".to_string()),
        };
        println!(
            "{:>3} | {:<28} | {:<36} | {:<16} | {}",
            i + 1,
            truncate(t.label(), 28),
            title,
            updated,
            url(t)
        );
    }
}

fn find_target<'a>(targets: &'a [EnvironmentTarget], name: &str) -> Result<&'a EnvironmentTarget> {
    targets
        .iter()
        .find(|t| t.matches(name))
        .with_context(|| format!("No environment named {:?}", name))
}

fn pick_browser(settings: &Settings, secondary: bool) -> &Browser {
    if secondary {
        &settings.secondary_browser
    } else {
        &settings.primary_browser
    }
}

/// 1-based selection from a printed list.
fn pick(urls: &[String], n: usize) -> Result<&String> {
    n.checked_sub(1)
        .and_then(|i| urls.get(i))
        .with_context(|| format!("Pick a number between 1 and {}", urls.len()))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
