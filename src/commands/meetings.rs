use anyhow::{Result, bail};

use kokkai_minutes::extract::{TopicOptions, extract_topics_with, to_half_width_digits};
use kokkai_minutes::model::{MeetingRecord, Minutes};

pub fn minutes_name(meeting: &MeetingRecord) -> String {
    format!(
        "第{}回{}{}{}",
        meeting.session,
        meeting.name_of_house,
        meeting.name_of_meeting,
        to_half_width_digits(&meeting.issue)
    )
}

pub fn validate_meeting(meeting: &MeetingRecord) -> Result<()> {
    if meeting.speech_record.is_empty() {
        bail!("meeting has no speech records");
    }

    for pair in meeting.speech_record.windows(2) {
        if pair[1].order <= pair[0].order {
            bail!(
                "speech order is not strictly increasing: {} then {}",
                pair[0].order,
                pair[1].order
            );
        }
    }

    Ok(())
}

pub fn build_minutes(meeting: &MeetingRecord, options: TopicOptions) -> Minutes {
    let mut minutes = Minutes::new(&minutes_name(meeting), meeting.date.as_deref());
    if let Some(first) = meeting.speech_record.first() {
        minutes.topics = extract_topics_with(&first.speech, options);
    }
    minutes
}
