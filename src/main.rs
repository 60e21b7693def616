//! PALLETBID — liquidation pallet valuation and bid-sensitivity engine
//!
//! Entry point. Loads configuration, initialises structured logging,
//! loads the saved session, prints the valuation report, and optionally
//! serves the JSON API until Ctrl-C.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use palletbid::config::AppConfig;
use palletbid::dashboard::{self, DashboardState};
use palletbid::storage::{self, Session};
use palletbid::types::Intake;
use palletbid::valuation::ValuationReport;

const BANNER: &str = r#"
 ___  _   _    _    ___ _____ ___ ___ ___
| _ \/_\ | |  | |  | __|_   _| _ )_ _|   \
|  _/ _ \| |__| |__| _|  | | | _ \| || |) |
|_|/_/ \_\____|____|___| |_| |___/___|___/

  Liquidation pallet valuation & bid sensitivity
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path = AppConfig::resolve_path();
    let cfg = AppConfig::load(&config_path)?;

    init_logging();

    println!("{BANNER}");
    info!(
        app_name = %cfg.app.name,
        config = %config_path,
        currency = %cfg.app.currency,
        "PALLETBID starting up"
    );

    let settings = cfg.valuation_settings();

    let session = match storage::load_session(Some(&cfg.session.path))? {
        Some(s) => s,
        None => {
            warn!(path = %cfg.session.path, "No session file, valuing an empty pallet");
            Session::new("empty", Intake::default(), Vec::new())
        }
    };

    let report = ValuationReport::build(
        &session.items,
        &session.intake,
        &settings,
        cfg.valuation.sell_through_pct,
    );
    println!("Session: {} ({} lines)", session.name, session.items.len());
    println!("{report}");

    if cfg.dashboard.enabled {
        let state = Arc::new(DashboardState::new(settings, session));
        dashboard::serve(state, cfg.dashboard.port).await?;
    }

    info!("PALLETBID shut down cleanly");
    Ok(())
}

/// Initialise the tracing subscriber with env-filter and optional JSON output.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("palletbid=info"));

    let json_logging = std::env::var("PALLETBID_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
