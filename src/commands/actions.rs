use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, info, warn};

use kokkai_minutes::extract::{
    TopicOptions, clean_speech, extract_bill_actions, is_moderator, scope_bill_names,
};
use kokkai_minutes::model::{
    ActionRunCounts, ActionRunManifest, BillAction, BillNames, BillSnapshot, MeetingBatch,
    MeetingRecord, Minutes, Speech, SpeechRecord,
};
use kokkai_minutes::util::{now_utc_string, read_json, utc_compact_string, write_json_pretty};

use super::meetings::{build_minutes, validate_meeting};
use crate::cli::{ActionsArgs, default_db_path};
use crate::store::{open_store, replace_bill_actions, upsert_minutes, upsert_speeches};

#[derive(Debug, Serialize)]
struct MinutesActions {
    minutes: Minutes,
    bill_actions: Vec<BillAction>,
}

#[derive(Debug)]
struct MeetingExtraction {
    minutes: Minutes,
    speeches: Vec<Speech>,
    bill_actions: Vec<BillAction>,
    moderator_speeches: usize,
}

pub fn run(args: ActionsArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        args.cache_root.join("manifests").join(format!(
            "actions_run_{}.json",
            utc_compact_string(started_ts)
        ))
    });
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| default_db_path(&args.cache_root));

    info!(cache_root = %args.cache_root.display(), run_id = %run_id, "starting bill-action extraction");

    let batch: MeetingBatch = read_json(&args.input)?;
    let snapshot: BillSnapshot = read_json(&args.bills)?;
    let bill_names = snapshot.into_names();
    info!(
        bills = bill_names.len(),
        meetings = batch.meeting_record.len(),
        number_of_records = ?batch.number_of_records,
        next_record_position = ?batch.next_record_position,
        "loaded inputs"
    );

    let mut connection = if args.dry_run {
        None
    } else {
        Some(open_store(&db_path)?)
    };

    let mut counts = ActionRunCounts::default();
    let mut warnings = Vec::<String>::new();
    let mut results = Vec::<MinutesActions>::new();

    for meeting in &batch.meeting_record {
        counts.meetings_seen += 1;

        if let Err(err) = validate_meeting(meeting) {
            let issue_id = meeting.issue_id.clone().unwrap_or_default();
            warn!(issue_id = %issue_id, error = %err, "skipping malformed meeting");
            warnings.push(format!("skipped meeting {issue_id}: {err}"));
            counts.meetings_skipped += 1;
            continue;
        }

        let extraction = extract_meeting(meeting, &bill_names, args.all_speakers);
        counts.topics_extracted += extraction.minutes.topics.len();
        counts.moderator_speeches += extraction.moderator_speeches;
        counts.bill_actions_emitted += extraction.bill_actions.len();

        info!(
            minutes = %extraction.minutes.name,
            topics = extraction.minutes.topics.len(),
            topic_ids = extraction.minutes.topic_ids.len(),
            bill_actions = extraction.bill_actions.len(),
            "extracted meeting"
        );

        if let Some(connection) = connection.as_mut() {
            persist_meeting(connection, &extraction, &mut counts)?;
        }

        results.push(MinutesActions {
            minutes: extraction.minutes,
            bill_actions: extraction.bill_actions,
        });
    }

    if let Some(path) = &args.output {
        write_json_pretty(path, &results)?;
        info!(path = %path.display(), "wrote bill actions");
    }

    let manifest = ActionRunManifest {
        manifest_version: 1,
        run_id,
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        input_path: args.input.display().to_string(),
        bills_path: args.bills.display().to_string(),
        db_path: (!args.dry_run).then(|| db_path.display().to_string()),
        dry_run: args.dry_run,
        bill_count: bill_names.len(),
        counts,
        warnings,
    };
    write_json_pretty(&manifest_path, &manifest)?;

    info!(
        path = %manifest_path.display(),
        meetings = manifest.counts.meetings_seen,
        skipped = manifest.counts.meetings_skipped,
        bill_actions = manifest.counts.bill_actions_emitted,
        "bill-action extraction completed"
    );

    Ok(())
}

fn extract_meeting(
    meeting: &MeetingRecord,
    bill_names: &BillNames,
    all_speakers: bool,
) -> MeetingExtraction {
    let mut minutes = build_minutes(meeting, TopicOptions::default());
    minutes.topic_ids = scope_bill_names(&minutes.topics, bill_names)
        .into_keys()
        .collect();

    let speeches = meeting
        .speech_record
        .iter()
        .map(|record| Speech::from_record(&minutes.id, record))
        .collect::<Vec<Speech>>();

    let scanned = meeting
        .speech_record
        .iter()
        .skip(1)
        .filter(|record| all_speakers || is_moderator(record.speaker_label()))
        .map(|record| SpeechRecord {
            speech: clean_speech(&record.speech),
            ..record.clone()
        })
        .collect::<Vec<SpeechRecord>>();
    debug!(minutes = %minutes.name, scanned = scanned.len(), "scanning speeches");

    let bill_actions = extract_bill_actions(&scanned, &minutes, bill_names);

    MeetingExtraction {
        moderator_speeches: scanned.len(),
        minutes,
        speeches,
        bill_actions,
    }
}

fn persist_meeting(
    connection: &mut Connection,
    extraction: &MeetingExtraction,
    counts: &mut ActionRunCounts,
) -> Result<()> {
    upsert_minutes(connection, &extraction.minutes)?;
    counts.minutes_upserted += 1;

    counts.speeches_upserted += upsert_speeches(connection, &extraction.speeches)?;

    let deleted = replace_bill_actions(
        connection,
        &extraction.minutes.id,
        &extraction.bill_actions,
    )?;
    if deleted > 0 {
        info!(minutes_id = %extraction.minutes.id, deleted, "removed stale bill actions");
    }
    counts.stale_bill_actions_deleted += deleted;

    Ok(())
}
