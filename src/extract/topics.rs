use tracing::debug;

use super::numerals::{is_numeral_char, parse_kansuji};
use super::text::{contains_word, deduplicate, str_offset};

pub const TOPIC_SECTIONS: [&str; 3] = ["議事日程", "本日の会議に付した案件", "本日の公聴会で意見を聞いた案件"];

pub const TOPIC_WORDS: [&str; 15] = [
    "法律案",
    "法案",
    "決議案",
    "議決案",
    "調査",
    "調書",
    "協定",
    "承認",
    "予算",
    "互選",
    "件",
    "決算書",
    "計算書",
    "請願",
    "質疑",
];

pub const IGNORE_WORDS: [&str; 6] = ["-", "―", "━", "─", "◇", "開議"];

const AGENDA_PREFIX: &str = "日程";
const ORDINAL_PREFIX: char = '第';
const SPEAKER_MARK: char = '○';
const ORDINAL_COUNTERS: [char; 2] = ['回', '号'];

#[derive(Debug, Clone, Copy)]
pub struct TopicOptions {
    pub clean: bool,
    pub split: bool,
}

impl Default for TopicOptions {
    fn default() -> Self {
        Self {
            clean: true,
            split: true,
        }
    }
}

pub fn extract_topics(first_speech: &str) -> Vec<String> {
    extract_topics_with(first_speech, TopicOptions::default())
}

pub fn extract_topics_with(first_speech: &str, options: TopicOptions) -> Vec<String> {
    let lines = first_speech.lines().collect::<Vec<&str>>();
    let Some(header_index) = lines
        .iter()
        .rposition(|line| contains_word(line, &TOPIC_SECTIONS, &[]))
    else {
        return Vec::new();
    };

    let mut topics = Vec::<String>::new();
    let mut buffer = String::new();
    let mut parent_offset = 0i64;

    for raw_line in lines[header_index + 1..]
        .iter()
        .copied()
        .chain(std::iter::once(""))
    {
        let offset = str_offset(raw_line);
        let line = raw_line.trim();

        if buffer.is_empty() {
            parent_offset = offset;
        }

        let (flush, append) = if is_decoration(line) {
            parent_offset = 0;
            (true, false)
        } else if offset <= parent_offset {
            parent_offset = offset;
            (true, true)
        } else {
            (false, true)
        };

        if flush {
            flush_entry(&buffer, options, &mut topics);
            buffer.clear();
        }
        if append {
            buffer.push_str(line);
        }
    }

    deduplicate(topics)
}

fn is_decoration(line: &str) -> bool {
    contains_word(line, &IGNORE_WORDS, &[]) || contains_word(line, &TOPIC_SECTIONS, &[])
}

fn flush_entry(entry: &str, options: TopicOptions, topics: &mut Vec<String>) {
    if entry.is_empty() {
        return;
    }
    if !contains_word(entry, &TOPIC_WORDS, &[]) {
        debug!(entry = %entry, "dropping agenda line without topic words");
        return;
    }

    let entry = if options.clean {
        clean_topic(entry)
    } else {
        entry.to_string()
    };

    if options.split {
        topics.extend(split_topic(&entry));
    } else {
        topics.push(entry);
    }
}

/// Strips a leading ordinal such as "日程第一　", "第十二、" or "第三".
pub fn clean_topic(topic: &str) -> String {
    let trimmed = topic.trim();
    let rest = trimmed.strip_prefix(SPEAKER_MARK).unwrap_or(trimmed);
    let (has_agenda_prefix, rest) = match rest.strip_prefix(AGENDA_PREFIX) {
        Some(rest) => (true, rest),
        None => (false, rest),
    };
    let Some(rest) = rest.strip_prefix(ORDINAL_PREFIX) else {
        return trimmed.to_string();
    };

    let numeral_len = leading_len(rest, is_numeral_char);
    if numeral_len == 0 {
        return trimmed.to_string();
    }
    let (numeral, body) = rest.split_at(numeral_len);

    if !has_agenda_prefix && body.starts_with(ORDINAL_COUNTERS) {
        return trimmed.to_string();
    }
    let separator_len = leading_len(body, |ch| ch == '、' || ch.is_whitespace());

    if let Err(err) = parse_kansuji(numeral) {
        debug!(topic = %trimmed, error = %err, "keeping unparsable ordinal prefix");
        return trimmed.to_string();
    }

    body[separator_len..].trim().to_string()
}

fn leading_len(text: &str, predicate: impl Fn(char) -> bool) -> usize {
    text.char_indices()
        .find(|(_, ch)| !predicate(*ch))
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

/// Splits "A（…）、B" and "A（…）及びB" at top-level brackets only.
pub fn split_topic(topic: &str) -> Vec<String> {
    let normalized = topic.replace("）及び", "）、");
    let mut pieces = Vec::<String>::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut previous: Option<char> = None;

    for ch in normalized.chars() {
        match ch {
            '（' => depth += 1,
            '）' => depth = depth.saturating_sub(1),
            '、' if depth == 0 && previous == Some('）') => {
                push_piece(&mut pieces, &current);
                current.clear();
                previous = Some(ch);
                continue;
            }
            _ => {}
        }
        current.push(ch);
        previous = Some(ch);
    }
    push_piece(&mut pieces, &current);

    pieces
}

fn push_piece(pieces: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        pieces.push(piece.to_string());
    }
}
