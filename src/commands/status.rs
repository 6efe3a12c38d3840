use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{info, warn};

use kokkai_minutes::model::ActionRunManifest;

use crate::cli::{StatusArgs, default_db_path};
use crate::store::{count_rows, schema_version};

pub fn run(args: StatusArgs) -> Result<()> {
    let manifest_dir = args.cache_root.join("manifests");
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| default_db_path(&args.cache_root));

    info!(cache_root = %args.cache_root.display(), "status requested");

    match latest_run_manifest(&manifest_dir)? {
        Some(path) => {
            let raw =
                fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
            let manifest: ActionRunManifest = serde_json::from_slice(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?;

            info!(
                run_id = %manifest.run_id,
                status = %manifest.status,
                started_at = %manifest.started_at,
                updated_at = %manifest.updated_at,
                dry_run = manifest.dry_run,
                bill_count = manifest.bill_count,
                meetings = manifest.counts.meetings_seen,
                skipped = manifest.counts.meetings_skipped,
                topics = manifest.counts.topics_extracted,
                bill_actions = manifest.counts.bill_actions_emitted,
                stale_deleted = manifest.counts.stale_bill_actions_deleted,
                warnings = manifest.warnings.len(),
                "loaded latest run manifest"
            );
        }
        None => warn!(path = %manifest_dir.display(), "no run manifest found"),
    }

    if db_path.exists() {
        let conn = Connection::open(&db_path)
            .with_context(|| format!("failed to open {}", db_path.display()))?;
        let minutes_count = count_rows(&conn, "SELECT COUNT(*) FROM minutes").unwrap_or(0);
        let speeches_count = count_rows(&conn, "SELECT COUNT(*) FROM speeches").unwrap_or(0);
        let actions_count = count_rows(&conn, "SELECT COUNT(*) FROM bill_actions").unwrap_or(0);
        let version = schema_version(&conn).ok().flatten().unwrap_or_default();

        info!(
            path = %db_path.display(),
            schema_version = %version,
            minutes = minutes_count,
            speeches = speeches_count,
            bill_actions = actions_count,
            "fact store status"
        );
    } else {
        warn!(path = %db_path.display(), "fact store missing");
    }

    Ok(())
}

fn latest_run_manifest(manifest_dir: &Path) -> Result<Option<PathBuf>> {
    if !manifest_dir.exists() {
        return Ok(None);
    }

    let entries = fs::read_dir(manifest_dir)
        .with_context(|| format!("failed to read {}", manifest_dir.display()))?;

    let mut latest: Option<PathBuf> = None;
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read entry in {}", manifest_dir.display()))?;
        let path = entry.path();
        let is_run_manifest = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with("actions_run_") && name.ends_with(".json"))
            .unwrap_or(false);

        if is_run_manifest && latest.as_ref().is_none_or(|current| path > *current) {
            latest = Some(path);
        }
    }

    Ok(latest)
}
