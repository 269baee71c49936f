use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use gamedeck::app::{App, AppEvent};
use gamedeck::catalog::{self, CatalogSource};
use gamedeck::config::Config;
use gamedeck::engine::{compute_view, toggle_tag, FilterState, SortOrder};
use gamedeck::keybindings::KeybindingRegistry;
use gamedeck::preferences::{MemoryPreferenceStore, PreferenceStore, ThemeStore};
use gamedeck::storage::Database;
use gamedeck::theme::ThemeVariant;
use gamedeck::ui;
use gamedeck::util::strip_control_chars;

/// Catalog used when neither the command line nor the config names one.
const DEFAULT_CATALOG: &str = "games.json";

/// Get the config directory path (~/.config/gamedeck/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("gamedeck"))
}

#[derive(Parser, Debug)]
#[command(
    name = "gamedeck",
    about = "Browse a game catalog in the terminal: search, filter by tag, sort, play"
)]
struct Args {
    /// Catalog URL or path (defaults to `catalog` in the config, then ./games.json)
    #[arg(value_name = "CATALOG")]
    catalog: Option<String>,

    /// Use an alternative config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Theme for this session; also saved as the preference
    #[arg(long, value_parser = parse_theme)]
    theme: Option<ThemeVariant>,

    /// Keep preferences in memory only
    #[arg(long)]
    no_persist: bool,

    /// Print the filtered catalog and exit instead of starting the browser
    #[arg(long)]
    list: bool,

    /// Search text (with --list)
    #[arg(long, requires = "list")]
    query: Option<String>,

    /// Only show games with this tag; repeatable (with --list)
    #[arg(long = "tag", value_name = "TAG", requires = "list")]
    tags: Vec<String>,

    /// Sort order: popular, az or new
    #[arg(long)]
    sort: Option<SortOrder>,
}

fn parse_theme(s: &str) -> Result<ThemeVariant, String> {
    ThemeVariant::from_str_name(s).ok_or_else(|| format!("unknown theme '{}' (light|dark)", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    // The TUI owns stdout, so logs go to stderr (silent unless RUST_LOG is set)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let location = args
        .catalog
        .clone()
        .or_else(|| config.catalog.clone())
        .unwrap_or_else(|| DEFAULT_CATALOG.to_string());
    let source = CatalogSource::parse(&location).context("Invalid catalog location")?;
    let sort = args.sort.unwrap_or(config.sort);

    if args.list {
        return list(&source, &args, sort).await;
    }

    let default_theme = config.default_theme();

    let mut keybindings = KeybindingRegistry::new();
    for warning in keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!("{}", warning);
        eprintln!("Warning: {}", warning);
    }

    if args.no_persist {
        let prefs = ThemeStore::new(MemoryPreferenceStore::new(), default_theme);
        browse(source, sort, keybindings, prefs, args.theme).await?;
    } else {
        let db_path = prepare_config_dir(&config_dir)?.join("prefs.db");
        let db_path_str = db_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
        let db = Database::open(db_path_str)
            .await
            .context("Failed to open preferences database")?;
        let prefs = ThemeStore::new(db, default_theme);
        browse(source, sort, keybindings, prefs, args.theme).await?;
    }

    Ok(())
}

/// Create the config directory (user-only on Unix) if it does not exist yet.
fn prepare_config_dir(config_dir: &Path) -> Result<&Path> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir).context("Failed to create config directory")?;
        tracing::info!(path = %config_dir.display(), "Created config directory");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            if let Err(e) = std::fs::set_permissions(config_dir, perms) {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to set config directory permissions to 0700"
                );
            }
        }
    }
    Ok(config_dir)
}

/// Run the interactive browser until the user quits.
async fn browse<S: PreferenceStore>(
    source: CatalogSource,
    sort: SortOrder,
    keybindings: KeybindingRegistry,
    prefs: ThemeStore<S>,
    theme_override: Option<ThemeVariant>,
) -> Result<()> {
    let theme = match theme_override {
        Some(theme) => {
            if let Err(e) = prefs.set_theme(theme).await {
                tracing::warn!(error = %e, "Failed to save theme preference");
            }
            theme
        }
        None => prefs.get_theme().await,
    };

    let client = catalog::http_client().context("Failed to build HTTP client")?;
    let mut app = App::new(source.to_string(), theme, sort, keybindings);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(4);
    let loader = ui::spawn_catalog_load(source, client, event_tx);

    let result = ui::run(&mut app, &prefs, event_rx).await;
    loader.abort();
    result
}

/// `--list`: load once, filter, print one game per line.
async fn list(source: &CatalogSource, args: &Args, sort: SortOrder) -> Result<()> {
    let client = catalog::http_client().context("Failed to build HTTP client")?;
    let catalog = catalog::load(source, &client)
        .await
        .with_context(|| format!("Could not load catalog from {}", source))?;

    let mut filter = FilterState::new(sort);
    if let Some(query) = &args.query {
        filter = filter.with_query(query);
    }
    for tag in &args.tags {
        if !filter.is_tag_active(tag) {
            filter = toggle_tag(filter, tag);
        }
    }

    let view = compute_view(&catalog, &filter);
    for item in &view {
        let link = catalog
            .resolve_link(item)
            .map(|url| url.to_string())
            .unwrap_or_else(|| item.url.clone());
        println!(
            "{}\t{}\t{}",
            strip_control_chars(&item.title),
            strip_control_chars(&item.tag_line()),
            strip_control_chars(&link)
        );
    }
    tracing::info!(shown = view.len(), total = catalog.len(), "Listed catalog");
    Ok(())
}
