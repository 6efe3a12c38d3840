use anyhow::{Context, Result};
use tracing::{info, warn};

use kokkai_minutes::extract::TopicOptions;
use kokkai_minutes::model::{MeetingBatch, MinutesTopics};
use kokkai_minutes::util::{read_json, write_json_pretty};

use super::meetings::{build_minutes, validate_meeting};
use crate::cli::TopicsArgs;

pub fn run(args: TopicsArgs) -> Result<()> {
    let batch: MeetingBatch = read_json(&args.input)?;
    let options = TopicOptions {
        clean: !args.no_clean,
        split: !args.no_split,
    };

    info!(
        input = %args.input.display(),
        meetings = batch.meeting_record.len(),
        "extracting topics"
    );

    let mut results = Vec::<MinutesTopics>::with_capacity(batch.meeting_record.len());
    for meeting in &batch.meeting_record {
        if let Err(err) = validate_meeting(meeting) {
            warn!(
                issue_id = %meeting.issue_id.as_deref().unwrap_or_default(),
                error = %err,
                "skipping malformed meeting"
            );
            continue;
        }

        let minutes = build_minutes(meeting, options);
        if minutes.topics.is_empty() {
            info!(minutes = %minutes.name, "no agenda found in first speech");
        }

        results.push(MinutesTopics {
            minutes_id: minutes.id,
            name: minutes.name,
            date: minutes.date,
            topics: minutes.topics,
        });
    }

    match args.output {
        Some(path) => {
            write_json_pretty(&path, &results)?;
            info!(path = %path.display(), minutes = results.len(), "wrote topics");
        }
        None => {
            let rendered =
                serde_json::to_string_pretty(&results).context("failed to serialize topics")?;
            println!("{rendered}");
        }
    }

    Ok(())
}
