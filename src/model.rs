use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::util::stable_id;

/// Global snapshot of bill id -> canonical bill name.
pub type BillNames = BTreeMap<String, String>;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingBatch {
    #[serde(default)]
    pub number_of_records: Option<u64>,
    #[serde(default)]
    pub next_record_position: Option<u64>,
    #[serde(default)]
    pub meeting_record: Vec<MeetingRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRecord {
    #[serde(rename = "issueID", default)]
    pub issue_id: Option<String>,
    #[serde(deserialize_with = "number_or_string")]
    pub session: u32,
    pub name_of_house: String,
    pub name_of_meeting: String,
    pub issue: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub speech_record: Vec<SpeechRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechRecord {
    #[serde(rename = "speechID", default)]
    pub speech_id: Option<String>,
    #[serde(rename = "speechOrder", deserialize_with = "number_or_string")]
    pub order: u32,
    #[serde(default)]
    pub speaker: String,
    #[serde(default)]
    pub speech: String,
    #[serde(rename = "speechURL", default)]
    pub speech_url: String,
}

impl SpeechRecord {
    pub fn speaker_label(&self) -> &str {
        let trimmed = self.speech.trim_start();
        if trimmed.starts_with('○') {
            if let Some(label) = trimmed.split_whitespace().next() {
                return label;
            }
        }
        &self.speaker
    }
}

fn number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text
            .trim()
            .parse::<u32>()
            .map_err(|err| serde::de::Error::custom(format!("invalid number '{text}': {err}"))),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BillSnapshot {
    List(Vec<BillEntry>),
    Map(BTreeMap<String, String>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct BillEntry {
    pub id: String,
    pub name: String,
}

impl BillSnapshot {
    pub fn into_names(self) -> BillNames {
        match self {
            BillSnapshot::List(entries) => entries
                .into_iter()
                .map(|entry| (entry.id, entry.name))
                .collect(),
            BillSnapshot::Map(map) => map,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Minutes {
    pub id: String,
    pub name: String,
    pub date: Option<String>,
    pub topics: Vec<String>,
    pub topic_ids: Vec<String>,
}

impl Minutes {
    pub fn new(name: &str, date: Option<&str>) -> Self {
        Self {
            id: stable_id("Minutes", &[name, date.unwrap_or_default()]),
            name: name.to_string(),
            date: date.map(ToOwned::to_owned),
            topics: Vec::new(),
            topic_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Speech {
    pub id: String,
    pub minutes_id: String,
    pub order_in_minutes: u32,
    pub speaker: String,
    pub url: String,
}

impl Speech {
    pub fn from_record(minutes_id: &str, record: &SpeechRecord) -> Self {
        Self {
            id: build_speech_id(minutes_id, record.order),
            minutes_id: minutes_id.to_string(),
            order_in_minutes: record.order,
            speaker: record.speaker.clone(),
            url: record.speech_url.clone(),
        }
    }
}

pub fn build_speech_id(minutes_id: &str, order: u32) -> String {
    stable_id("Speech", &[minutes_id, &order.to_string()])
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillActionType {
    AmendmentExplanation,
    SupplementaryExplanation,
    BillExplanation,
    Question,
    Debate,
    Vote,
    Report,
}

impl BillActionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AmendmentExplanation => "AMENDMENT_EXPLANATION",
            Self::SupplementaryExplanation => "SUPPLEMENTARY_EXPLANATION",
            Self::BillExplanation => "BILL_EXPLANATION",
            Self::Question => "QUESTION",
            Self::Debate => "DEBATE",
            Self::Vote => "VOTE",
            Self::Report => "REPORT",
        }
    }
}

impl fmt::Display for BillActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillAction {
    pub id: String,
    pub bill_id: String,
    pub minutes_id: String,
    #[serde(rename = "type")]
    pub action_type: BillActionType,
    pub speech_id: String,
}

impl BillAction {
    pub fn new(
        bill_id: &str,
        minutes_id: &str,
        action_type: BillActionType,
        speech_id: &str,
    ) -> Self {
        Self {
            id: stable_id("BillAction", &[bill_id, minutes_id, action_type.as_str()]),
            bill_id: bill_id.to_string(),
            minutes_id: minutes_id.to_string(),
            action_type,
            speech_id: speech_id.to_string(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillCategory {
    Kakuhou,
    Shuhou,
    Sanhou,
}

impl BillCategory {
    pub fn short_label(self) -> &'static str {
        match self {
            Self::Kakuhou => "閣",
            Self::Shuhou => "衆",
            Self::Sanhou => "参",
        }
    }

    pub fn from_short_label(label: &str) -> Option<Self> {
        match label {
            "閣" => Some(Self::Kakuhou),
            "衆" => Some(Self::Shuhou),
            "参" => Some(Self::Sanhou),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MinutesTopics {
    pub minutes_id: String,
    pub name: String,
    pub date: Option<String>,
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ActionRunCounts {
    pub meetings_seen: usize,
    pub meetings_skipped: usize,
    pub minutes_upserted: usize,
    pub speeches_upserted: usize,
    pub moderator_speeches: usize,
    pub topics_extracted: usize,
    pub bill_actions_emitted: usize,
    pub stale_bill_actions_deleted: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub input_path: String,
    pub bills_path: String,
    pub db_path: Option<String>,
    pub dry_run: bool,
    pub bill_count: usize,
    pub counts: ActionRunCounts,
    pub warnings: Vec<String>,
}
