mod actions;
mod bill_number;
mod numerals;
mod text;
mod topics;
#[cfg(test)]
mod tests;

pub use actions::{extract_bill_action_types, extract_bill_actions, extract_topic_ids, scope_bill_names};
pub use bill_number::{BillNumber, BillNumberParser};
pub use numerals::{NumeralError, normalize_numerals, parse_kansuji};
pub use text::{clean_speech, contains_word, deduplicate, is_moderator, str_offset, to_half_width_digits};
pub use topics::{TopicOptions, clean_topic, extract_topics, extract_topics_with, split_topic};
