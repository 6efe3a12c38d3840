use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::text::contains_word;
use crate::model::{BillAction, BillActionType, BillNames, Minutes, SpeechRecord, build_speech_id};

struct ActionRule {
    allow: &'static [&'static str],
    block: &'static [&'static str],
    action_type: BillActionType,
}

const EXPLANATION_ALLOW: &[&str] = &["説明"];
const EXPLANATION_BLOCK: &[&str] = &["省略", "終わり", "既に聴取"];

const EXPLANATION_RULES: [ActionRule; 3] = [
    ActionRule {
        allow: &["修正案"],
        block: &[],
        action_type: BillActionType::AmendmentExplanation,
    },
    ActionRule {
        allow: &["附帯決議"],
        block: &[],
        action_type: BillActionType::SupplementaryExplanation,
    },
    ActionRule {
        allow: &["趣旨の説明", "趣旨説明"],
        block: &[],
        action_type: BillActionType::BillExplanation,
    },
];

const PROCEDURE_RULES: [ActionRule; 4] = [
    ActionRule {
        allow: &["質疑"],
        block: &[],
        action_type: BillActionType::Question,
    },
    ActionRule {
        allow: &["討論"],
        block: &[],
        action_type: BillActionType::Debate,
    },
    ActionRule {
        allow: &["採決"],
        block: &[],
        action_type: BillActionType::Vote,
    },
    ActionRule {
        allow: &["委員長の報告"],
        block: &[],
        action_type: BillActionType::Report,
    },
];

impl ActionRule {
    fn matches(&self, speech: &str) -> bool {
        contains_word(speech, self.allow, self.block)
    }
}

/// Classifies the legislative actions a moderator speech announces.
pub fn extract_bill_action_types(speech: &str) -> Vec<BillActionType> {
    let mut action_types = Vec::<BillActionType>::new();

    if contains_word(speech, EXPLANATION_ALLOW, EXPLANATION_BLOCK) {
        if let Some(rule) = EXPLANATION_RULES.iter().find(|rule| rule.matches(speech)) {
            action_types.push(rule.action_type);
        }
    }

    action_types.extend(
        PROCEDURE_RULES
            .iter()
            .filter(|rule| rule.matches(speech))
            .map(|rule| rule.action_type),
    );

    action_types
}

/// Restricts the global bill snapshot to bills named by one of the topics.
pub fn scope_bill_names(topics: &[String], bill_names: &BillNames) -> BillNames {
    bill_names
        .iter()
        .filter(|(_, name)| !name.is_empty() && topics.iter().any(|topic| topic.contains(name.as_str())))
        .map(|(id, name)| (id.clone(), name.clone()))
        .collect()
}

/// Ids of every bill whose canonical name appears in `speech`.
pub fn extract_topic_ids(speech: &str, bill_names: &BillNames) -> Vec<String> {
    let topic_ids = bill_names
        .iter()
        .filter(|(_, name)| !name.is_empty() && speech.contains(name.as_str()))
        .map(|(id, _)| id.clone())
        .collect::<Vec<String>>();

    if topic_ids.len() > 1 {
        debug!(speech = %speech, topic_ids = ?topic_ids, "found multiple topics");
    }
    topic_ids
}

#[derive(Debug, Default)]
struct DiscussionState {
    current_bill_ids: Vec<String>,
    emitted: HashMap<String, HashSet<BillActionType>>,
    actions: Vec<BillAction>,
}

impl DiscussionState {
    fn observe(
        mut self,
        record: &SpeechRecord,
        minutes: &Minutes,
        scoped_names: &BillNames,
    ) -> Self {
        let speech = record.speech.as_str();

        let mentions_topic = minutes
            .topics
            .iter()
            .any(|topic| !topic.is_empty() && speech.contains(topic.as_str()))
            || scoped_names.values().any(|name| speech.contains(name.as_str()));
        if mentions_topic {
            self.current_bill_ids = extract_topic_ids(speech, scoped_names);
        }

        let action_types = extract_bill_action_types(speech);
        if self.current_bill_ids.is_empty() || action_types.is_empty() {
            return self;
        }

        let speech_id = build_speech_id(&minutes.id, record.order);
        for bill_id in &self.current_bill_ids {
            let emitted = self.emitted.entry(bill_id.clone()).or_default();
            for action_type in &action_types {
                if emitted.insert(*action_type) {
                    self.actions
                        .push(BillAction::new(bill_id, &minutes.id, *action_type, &speech_id));
                }
            }
        }

        self
    }
}

/// Emits at most one fact per (bill, action type) for the whole meeting.
pub fn extract_bill_actions(
    records: &[SpeechRecord],
    minutes: &Minutes,
    bill_names: &BillNames,
) -> Vec<BillAction> {
    let scoped_names = scope_bill_names(&minutes.topics, bill_names);
    if scoped_names.len() < minutes.topics.len() {
        debug!(
            minutes_id = %minutes.id,
            topics = minutes.topics.len(),
            resolved = scoped_names.len(),
            "some topics resolve to no bill"
        );
    }

    records
        .iter()
        .fold(DiscussionState::default(), |state, record| {
            state.observe(record, minutes, &scoped_names)
        })
        .actions
}
