use std::collections::HashSet;
use std::hash::Hash;

const MODERATOR_WORDS: [&str; 4] = ["議長", "委員長", "会長", "主査"];
const FULL_WIDTH_ZERO: u32 = '０' as u32;

/// True when `text` contains any `allow` word and none of the `block` words.
pub fn contains_word(text: &str, allow: &[&str], block: &[&str]) -> bool {
    allow.iter().any(|word| text.contains(word)) && !block.iter().any(|word| text.contains(word))
}

/// Drops repeated items, keeping each at its first position.
pub fn deduplicate<T: Clone + Eq + Hash>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::<T>::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Count of leading half- or full-width spaces; -1 for a line with no content.
pub fn str_offset(line: &str) -> i64 {
    line.chars()
        .position(|ch| ch != ' ' && ch != '\u{3000}')
        .map(|offset| offset as i64)
        .unwrap_or(-1)
}

pub fn to_half_width_digits(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '０'..='９' => char::from_u32(u32::from('0') + (ch as u32 - FULL_WIDTH_ZERO)).unwrap_or(ch),
            _ => ch,
        })
        .collect()
}

/// Removes the speaker label (first token) and all whitespace from a speech.
pub fn clean_speech(speech: &str) -> String {
    speech.split_whitespace().skip(1).collect::<String>()
}

pub fn is_moderator(speaker_label: &str) -> bool {
    MODERATOR_WORDS
        .iter()
        .any(|word| speaker_label.contains(word))
}
