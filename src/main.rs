// Main entry point
use clap::Parser;
use colored::Colorize;
use hrm_cache::application::dashboard::{load_dashboard, refresh_dashboard};
use hrm_cache::application::query::{load_resource, refresh_resource};
use hrm_cache::infrastructure::config::{self, load_config, Config};
use hrm_cache::interfaces::cli::{Cli, View};
use hrm_cache::presentation::render::{format_dashboard, format_error, format_resource, format_status};
use hrm_cache::presentation::theme::Theme;
use hrm_cache::state::AppState;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup graceful shutdown handler
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    // Spawn signal handler task
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for shutdown signal: {}", e);
        } else {
            let _ = shutdown_tx.send(());
        }
    });

    let cli = Cli::parse();
    let config = load_config()?;

    // Initialize logging
    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    if cli.generate_config {
        config::generate_config_sample()?;
        return Ok(());
    }
    if cli.edit_config {
        if let Some(config_path) = config::get_config_path() {
            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
            // Run editor in blocking task
            tokio::task::spawn_blocking(move || {
                std::process::Command::new(editor)
                    .arg(&config_path)
                    .status()
            })
            .await??;
        } else {
            eprintln!("{}", "Config file not found".red());
        }
        return Ok(());
    }

    let state = AppState::new(config.clone())?;
    let theme_name = cli.theme.as_deref().unwrap_or(config.theme.as_str());
    let theme = Theme::from_name(theme_name);

    if cli.status {
        print_status(&state, &theme);
        return Ok(());
    }

    let views = cli.views();

    let Some(secs) = cli.watch else {
        if !render_views(&state, &cli, &views, &theme).await? {
            std::process::exit(1);
        }
        return Ok(());
    };

    // Cached resources are served from memory until they go stale
    let mut ticker = tokio::time::interval(Duration::from_secs(secs.max(1)));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                render_views(&state, &cli, &views, &theme).await?;
            }
            _ = &mut shutdown_rx => {
                eprintln!("\nStopped watching.");
                return Ok(());
            }
        }
    }
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &config::Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter_directive()));

    if let Some(path) = logging.path.as_deref().filter(|p| !p.is_empty()) {
        // Log to file
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .init();
        return Ok(());
    }

    // Log to stderr (default)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Render every requested view once; `false` if any of them failed.
async fn render_views(
    state: &AppState,
    cli: &Cli,
    views: &[View],
    theme: &Theme,
) -> anyhow::Result<bool> {
    let enable_emoji = state.config.enable_emoji;
    let mut all_ok = true;

    for view in views {
        match view.resource() {
            None => {
                let dashboard = if cli.refresh {
                    refresh_dashboard(state).await
                } else {
                    load_dashboard(state).await
                };
                all_ok &= dashboard.failed_panels() == 0;
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&dashboard)?);
                } else {
                    print!("{}", format_dashboard(&dashboard, theme, enable_emoji));
                }
            }
            Some(resource) => {
                let loaded = if cli.refresh {
                    refresh_resource(state, resource).await
                } else {
                    load_resource(state, resource).await
                };
                match loaded {
                    Ok(data) => {
                        if cli.json {
                            println!("{}", serde_json::to_string_pretty(&data)?);
                        } else {
                            print!("{}", format_resource(&data, theme, enable_emoji));
                        }
                    }
                    Err(e) => {
                        all_ok = false;
                        eprintln!("{}", format_error(&e, enable_emoji));
                    }
                }
            }
        }
    }

    Ok(all_ok)
}

fn print_status(state: &AppState, theme: &Theme) {
    let config: &Config = &state.config;

    println!("{}", "hrmc Status".green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!(
        "Config: {}",
        config::get_config_path()
            .filter(|p| p.exists())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Not found (using defaults)".to_string())
    );
    println!("API: {}{}", config.api_base_url, config.legacy_path);
    println!("Session: {}", config::get_session_path(config).display());

    // Never print the token itself
    if state.session.auth_token().is_some() {
        println!("Auth token: present");
    } else {
        println!("Auth token: {}", "missing".yellow());
    }
    match state.session.identity() {
        Some(identity) => println!("Logged in as: {}", identity.employee_id),
        None => println!("Logged in as: {}", "nobody".yellow()),
    }

    println!();
    println!("Request cache:");
    print!("{}", format_status(&state.cache.status(), theme));
}
