use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde_json::{json, Value};
use tracing::{info, warn};

use reservo::cache::{JsonFileSource, ReservationCache};
use reservo::config::Config;
use reservo::refresher;
use reservo::validator::{validate, FieldErrors, ReservationDraft, Snapshot, ValidReservation};

/// Validate a draft reservation against the stored reservations.
#[derive(Parser, Debug)]
#[command(name = "reservo", version, about)]
struct Cli {
    /// Keep revalidating on every refresh tick; print whenever the verdict changes
    #[arg(long)]
    watch: bool,

    /// Draft reservation as JSON (reads stdin when omitted)
    draft: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config = Config::from_env();
    reservo::observability::init(config.metrics_port)?;

    let raw = match &cli.draft {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let draft: ReservationDraft = serde_json::from_str(&raw)?;

    info!("reservo checking draft for {:?}", draft.resource_id);
    info!("  reservations: {}", config.reservations_path.display());
    info!("  stale window: {:?}", config.stale_window);

    let cache = Arc::new(ReservationCache::new(
        JsonFileSource::new(&config.reservations_path),
        config.stale_window,
    ));

    if !cli.watch {
        let snapshot = if draft.resource_id.is_empty() {
            Snapshot::Loading
        } else {
            cache.snapshot_or_last(&draft.resource_id).await
        };
        let result = validate(&draft, &snapshot);
        println!("{}", serde_json::to_string_pretty(&render(&result))?);
        if result.is_err() {
            std::process::exit(1);
        }
        return Ok(());
    }

    if !draft.resource_id.is_empty()
        && let Err(e) = cache.load(&draft.resource_id).await
    {
        // Fail open: validate without conflict data until a refresh succeeds
        warn!("initial load failed: {e}");
    }
    tokio::spawn(refresher::run_refresher(cache.clone(), config.refresh_every));

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut tick = tokio::time::interval(config.refresh_every);
    let mut last: Option<Value> = None;
    loop {
        tokio::select! {
            _ = tick.tick() => {
                let snapshot = cache.snapshot(&draft.resource_id);
                let rendered = render(&validate(&draft, &snapshot));
                if last.as_ref() != Some(&rendered) {
                    println!("{}", serde_json::to_string_pretty(&rendered)?);
                    last = Some(rendered);
                }
            }
            _ = &mut shutdown => {
                info!("shutting down");
                break;
            }
        }
    }
    Ok(())
}

fn render(result: &Result<ValidReservation, FieldErrors>) -> Value {
    match result {
        Ok(valid) => json!({
            "status": "accepted",
            "reservation": {
                "title": valid.title,
                "resourceId": valid.resource_id,
                "startTime": valid.start_time(),
                "endTime": valid.end_time(),
                "participants": valid.participants.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
            }
        }),
        Err(errors) => json!({
            "status": "rejected",
            "errors": errors
                .iter()
                .map(|e| json!({
                    "field": e.field,
                    "issue": e.issue,
                    "message": e.issue.to_string(),
                }))
                .collect::<Vec<_>>(),
        }),
    }
}
