//! voxband - hosts the ban list for a voice server.
//!
//! Usage: `voxband [config.toml] [list]`

use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use voxban::{BanList, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| "config.toml".to_string());
    let command = args.next();

    let config = if Path::new(&config_path).exists() {
        Config::load(&config_path).map_err(|e| {
            error!(path = %config_path, error = %e, "Failed to load config");
            e
        })?
    } else {
        info!(path = %config_path, "Config file not found, using defaults");
        Config::default()
    };

    let bans = &config.bans;

    match command.as_deref() {
        None => {}
        Some("list") => {
            let list = BanList::load(&bans.file, bans.duration)?;
            serde_json::to_writer_pretty(std::io::stdout().lock(), &list.export_all())?;
            println!();
            return Ok(());
        }
        Some(other) => anyhow::bail!("unknown command: {other}"),
    }

    // Unreadable files are moved aside so the shutdown save cannot clobber them
    let mut list = BanList::load_or_quarantine(&bans.file, bans.duration).map_err(|e| {
        error!(path = %bans.file.display(), error = %e, "Failed to load ban file");
        e
    })?;

    info!(
        file = %bans.file.display(),
        bans = list.len(),
        default_duration = bans.duration,
        "Starting voxband"
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut prune_timer = tokio::time::interval(bans.prune_period());
    loop {
        tokio::select! {
            _ = prune_timer.tick() => {
                if list.prune_expired() > 0
                    && let Err(e) = list.save(&bans.file)
                {
                    error!(error = %e, code = e.error_code(), "Failed to persist after pruning expired bans");
                }
            }
            res = &mut shutdown => {
                res?;
                break;
            }
        }
    }

    list.save(&bans.file)?;
    info!(bans = list.len(), "Ban list saved, shutting down");
    Ok(())
}
