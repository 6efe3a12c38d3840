use super::*;
use crate::model::{BillActionType, BillCategory, BillNames, Minutes, SpeechRecord, build_speech_id};

fn build_records(speeches: &[&str]) -> Vec<SpeechRecord> {
    speeches
        .iter()
        .enumerate()
        .map(|(index, speech)| SpeechRecord {
            speech_id: None,
            order: index as u32,
            speaker: String::new(),
            speech: speech.to_string(),
            speech_url: "https://google.com".to_string(),
        })
        .collect()
}

fn build_minutes(topics: &[&str]) -> Minutes {
    let mut minutes = Minutes::new("猫ちゃん会議", Some("2021-01-01"));
    minutes.topics = topics.iter().map(|topic| topic.to_string()).collect();
    minutes
}

fn bill_names(pairs: &[(&str, &str)]) -> BillNames {
    pairs
        .iter()
        .map(|(id, name)| (id.to_string(), name.to_string()))
        .collect()
}

fn assert_bill_action(
    action: &crate::model::BillAction,
    minutes: &Minutes,
    bill_id: &str,
    action_type: BillActionType,
    order: u32,
) {
    assert_eq!(action.bill_id, bill_id);
    assert_eq!(action.action_type, action_type);
    assert_eq!(action.minutes_id, minutes.id);
    assert_eq!(action.speech_id, build_speech_id(&minutes.id, order));
}

#[test]
fn parse_kansuji_matches_reference_table() {
    let cases = [
        ("一〇", 10),
        ("四二", 42),
        ("百", 100),
        ("百九十六", 196),
        ("一九六", 196),
        ("千二", 1002),
        ("千十", 1010),
        ("千十六", 1016),
        ("千九十六", 1096),
    ];

    for (kansuji, expected) in cases {
        assert_eq!(parse_kansuji(kansuji), Ok(expected), "kansuji {kansuji}");
    }
}

#[test]
fn parse_kansuji_rejects_malformed_runs() {
    assert_eq!(
        parse_kansuji("百千"),
        Err(NumeralError::MisplacedMultiplier { multiplier: '百' })
    );
    assert_eq!(
        parse_kansuji("犬百"),
        Err(NumeralError::UnknownCharacter { ch: '犬', position: 0 })
    );
    assert_eq!(
        parse_kansuji("一二三百"),
        Err(NumeralError::DigitOverflow {
            multiplier: '百',
            digits: 3
        })
    );
    assert_eq!(parse_kansuji(""), Err(NumeralError::Empty));
}

#[test]
fn parse_kansuji_handles_myriad_groups() {
    assert_eq!(parse_kansuji("万"), Ok(10_000));
    assert_eq!(parse_kansuji("三千万"), Ok(30_000_000));
    assert_eq!(parse_kansuji("二十万五千"), Ok(205_000));
    assert!(parse_kansuji("万万").is_err());
}

#[test]
fn normalize_numerals_rewrites_runs_and_keeps_failures() {
    assert_eq!(normalize_numerals("第二百一回国会"), "第201回国会");
    assert_eq!(normalize_numerals("午後一時二分開議"), "午後1時2分開議");
    assert_eq!(normalize_numerals("百千の猫"), "百千の猫");
    assert_eq!(normalize_numerals("犬"), "犬");
    assert_eq!(normalize_numerals("万一の場合"), "万一の場合");
    assert_eq!(normalize_numerals("三万円"), "30000円");
}

#[test]
fn bill_number_parser_reads_kansuji_and_full_width_numbers() {
    let parser = BillNumberParser::new().expect("parser compiles");

    let number = parser
        .extract_bill_number("第二百一回国会閣法第十号")
        .expect("bill number found");
    assert_eq!(number.diet_number, 201);
    assert_eq!(number.category, Some(BillCategory::Kakuhou));
    assert_eq!(number.submission_number, 10);
    assert_eq!(number.to_string(), "第201回国会閣法第10号");

    let number = parser
        .extract_bill_number("第２０４回国会衆法第３号")
        .expect("bill number found");
    assert_eq!(number.to_string(), "第204回国会衆法第3号");

    assert!(parser.extract_bill_number("猫と犬").is_none());
    assert!(parser.extract_bill_number("第百千回国会").is_none());
}

#[test]
fn bill_number_parser_detects_category() {
    let parser = BillNumberParser::new().expect("parser compiles");

    assert_eq!(
        parser.extract_bill_category("猫法を改正する法律案（内閣提出）"),
        Some(BillCategory::Kakuhou)
    );
    assert_eq!(parser.extract_bill_category("参法第三号"), Some(BillCategory::Sanhou));
    assert_eq!(
        parser.extract_bill_category("衆議院提出の法律案"),
        Some(BillCategory::Shuhou)
    );
    assert_eq!(parser.extract_bill_category("猫法"), None);
}

#[test]
fn text_helpers_follow_transcript_conventions() {
    assert!(contains_word("趣旨説明お願いします", &["説明"], &["省略"]));
    assert!(!contains_word("説明を省略します", &["説明"], &["省略"]));
    assert!(!contains_word("猫", &[], &[]));

    assert_eq!(deduplicate(vec!["b", "a", "b", "c", "a"]), vec!["b", "a", "c"]);

    assert_eq!(str_offset("猫"), 0);
    assert_eq!(str_offset("　　猫"), 2);
    assert_eq!(str_offset("  　猫"), 3);
    assert_eq!(str_offset(""), -1);
    assert_eq!(str_offset("　 "), -1);

    assert_eq!(to_half_width_digits("第２０４回"), "第204回");
}

#[test]
fn clean_speech_drops_speaker_and_whitespace() {
    let speech = "○議長（大島理森君）　各請願は委員長の報告を省略して採択するに御異議ありませんか。 　　　　〔「異議なし」と呼ぶ者あり〕";
    let expected = "各請願は委員長の報告を省略して採択するに御異議ありませんか。〔「異議なし」と呼ぶ者あり〕";
    assert_eq!(clean_speech(speech), expected);
}

#[test]
fn is_moderator_checks_speaker_label() {
    assert!(is_moderator("○議長（大島理森君）"));
    assert!(is_moderator("○委員長（松本文明君）"));
    assert!(is_moderator("○主査（猫田君）"));
    assert!(!is_moderator("○国務大臣（犬山君）"));
}

#[test]
fn extract_topics_reads_agenda_section() {
    let first_speech = "令和二年一月一日（水曜日）\n議事日程\n日程第一　猫と犬との間の協定について承認を求めるの件\n日程第二　猫法を改正する法律案（内閣提出）及び愛猫法（内閣提出）の趣旨説明及び質疑\n日程第三　犬法を改正する法律案（内閣提出）\n愛犬法（内閣提出）の趣旨説明及び質疑\n午後一時二分開議";

    let topics = extract_topics(first_speech);
    assert_eq!(
        topics,
        vec![
            "猫と犬との間の協定について承認を求めるの件",
            "猫法を改正する法律案（内閣提出）",
            "愛猫法（内閣提出）の趣旨説明及び質疑",
            "犬法を改正する法律案（内閣提出）",
            "愛犬法（内閣提出）の趣旨説明及び質疑",
        ]
    );
}

#[test]
fn extract_topics_merges_indented_continuation_lines() {
    let first_speech = "本日の会議に付した案件\n　国家公務員法等の一部を改正する\n　　法律案（内閣提出第五二号）\n　──────────────\n　裁判所職員定員法の一部を改正する法律案\n";

    let topics = extract_topics(first_speech);
    assert_eq!(
        topics,
        vec![
            "国家公務員法等の一部を改正する法律案（内閣提出第五二号）",
            "裁判所職員定員法の一部を改正する法律案",
        ]
    );
}

#[test]
fn extract_topics_uses_last_section_header() {
    let first_speech = "議事日程\n日程第一　猫法案\n本日の会議に付した案件\n日程第一　犬法案\n";
    assert_eq!(extract_topics(first_speech), vec!["犬法案"]);
}

#[test]
fn extract_topics_without_header_is_empty() {
    assert!(extract_topics("これより会議を開きます。\n猫法案").is_empty());
    assert!(extract_topics("").is_empty());
}

#[test]
fn extract_topics_deduplicates_in_first_occurrence_order() {
    let first_speech = "議事日程\n日程第一　猫法案\n日程第二　犬法案\n日程第三　猫法案\n";
    assert_eq!(extract_topics(first_speech), vec!["猫法案", "犬法案"]);
}

#[test]
fn extract_topics_with_options_keeps_raw_entries() {
    let first_speech = "議事日程\n日程第一　猫法案（内閣提出）及び犬法案（内閣提出）\n";
    let topics = extract_topics_with(
        first_speech,
        TopicOptions {
            clean: false,
            split: false,
        },
    );
    assert_eq!(topics, vec!["日程第一　猫法案（内閣提出）及び犬法案（内閣提出）"]);
}

#[test]
fn clean_topic_strips_ordinals_once() {
    assert_eq!(clean_topic("日程第一　猫法案"), "猫法案");
    assert_eq!(clean_topic("○日程第十二　猫法案"), "猫法案");
    assert_eq!(clean_topic("第三、犬法案"), "犬法案");
    assert_eq!(clean_topic("第一猫法案"), "猫法案");
    assert_eq!(clean_topic("第十二号議案"), "第十二号議案");
    assert_eq!(clean_topic("第二百一回国会閣法第十号"), "第二百一回国会閣法第十号");
    assert_eq!(clean_topic("日程第百千　猫法案"), "日程第百千　猫法案");

    let cleaned = clean_topic("日程第一　猫と犬との間の協定について承認を求めるの件");
    assert_eq!(clean_topic(&cleaned), cleaned);
}

#[test]
fn split_topic_respects_brackets() {
    assert_eq!(
        split_topic("猫法を改正する法律案（内閣提出）及び愛猫法（内閣提出）の趣旨説明及び質疑"),
        vec![
            "猫法を改正する法律案（内閣提出）",
            "愛猫法（内閣提出）の趣旨説明及び質疑",
        ]
    );
    assert_eq!(
        split_topic("猫法案（第一条（定義）、第二条）及び犬法案"),
        vec!["猫法案（第一条（定義）、第二条）", "犬法案"]
    );
    assert_eq!(split_topic("猫、犬及び鳥に関する件"), vec!["猫、犬及び鳥に関する件"]);
}

#[test]
fn extract_bill_action_types_classifies_speech() {
    assert_eq!(
        extract_bill_action_types("これより質疑に入ります。"),
        vec![BillActionType::Question]
    );
    assert!(extract_bill_action_types("本案の趣旨の説明につきましては、これを省略します").is_empty());
    assert_eq!(
        extract_bill_action_types("修正案の趣旨の説明を求めます"),
        vec![BillActionType::AmendmentExplanation]
    );
    assert_eq!(
        extract_bill_action_types("附帯決議案の趣旨の説明を聴取します"),
        vec![BillActionType::SupplementaryExplanation]
    );
    assert_eq!(
        extract_bill_action_types("これより討論に入ります。討論を終局し採決に入ります"),
        vec![BillActionType::Debate, BillActionType::Vote]
    );
    assert_eq!(
        extract_bill_action_types("委員長の報告を求めます"),
        vec![BillActionType::Report]
    );
    assert!(extract_bill_action_types("お疲れ様でした").is_empty());
}

#[test]
fn extract_bill_actions_skips_unresolved_topics() {
    let records = build_records(&[
        "これより会議を始めます",
        "法律案Xを議題とします",
        "質疑に入ります",
        "法律案Yを議題とします",
        "採決に入ります",
        "法律案Zを議題とします",
        "趣旨説明お願いします",
        "採決に入ります",
        "お疲れ様でした",
    ]);
    let minutes = build_minutes(&["法律案X", "法律案Y", "法律案Z"]);
    let names = bill_names(&[("Bill:X", "法律案X"), ("Bill:Z", "法律案Z")]);

    let actions = extract_bill_actions(&records, &minutes, &names);
    assert_eq!(actions.len(), 3);
    assert_bill_action(&actions[0], &minutes, "Bill:X", BillActionType::Question, 2);
    assert_bill_action(&actions[1], &minutes, "Bill:Z", BillActionType::BillExplanation, 6);
    assert_bill_action(&actions[2], &minutes, "Bill:Z", BillActionType::Vote, 7);
}

#[test]
fn extract_bill_actions_handles_joint_agenda_and_meeting_wide_dedup() {
    let records = build_records(&[
        "これより会議を始めます",
        "法律案Aと法律案Bを一括して議題とします",
        "趣旨説明は既に聴取しておりますので、質疑に入ります",
        "法律案Aと法律案Bの質疑を終わります",
        "法律案Cを議題とします",
        "採決に入ります",
        "法律案Dを議題とします",
        "趣旨説明お願いします",
        "採決に入ります",
        "お疲れ様でした",
    ]);
    let minutes = build_minutes(&["法律案A", "法律案B", "法律案C", "法律案D"]);
    let names = bill_names(&[
        ("Bill:A", "法律案A"),
        ("Bill:B", "法律案B"),
        ("Bill:D", "法律案D"),
    ]);

    let actions = extract_bill_actions(&records, &minutes, &names);
    assert_eq!(actions.len(), 4);
    assert_bill_action(&actions[0], &minutes, "Bill:A", BillActionType::Question, 2);
    assert_bill_action(&actions[1], &minutes, "Bill:B", BillActionType::Question, 2);
    assert_bill_action(&actions[2], &minutes, "Bill:D", BillActionType::BillExplanation, 7);
    assert_bill_action(&actions[3], &minutes, "Bill:D", BillActionType::Vote, 8);
}

#[test]
fn extract_bill_actions_dedups_across_focus_changes() {
    let records = build_records(&[
        "法律案Aを議題とします",
        "質疑に入ります",
        "法律案Bを議題とします",
        "法律案Aを再び議題とします",
        "質疑に入ります",
    ]);
    let minutes = build_minutes(&["法律案A", "法律案B"]);
    let names = bill_names(&[("Bill:A", "法律案A"), ("Bill:B", "法律案B")]);

    let actions = extract_bill_actions(&records, &minutes, &names);
    assert_eq!(actions.len(), 1);
    assert_bill_action(&actions[0], &minutes, "Bill:A", BillActionType::Question, 1);
}

#[test]
fn extract_bill_actions_is_repeatable_with_stable_ids() {
    let records = build_records(&["法律案Aを議題とします", "質疑に入ります"]);
    let minutes = build_minutes(&["法律案A"]);
    let names = bill_names(&[("Bill:A", "法律案A")]);

    let first = extract_bill_actions(&records, &minutes, &names);
    let second = extract_bill_actions(&records, &minutes, &names);
    assert_eq!(first, second);
    assert_eq!(first[0].id, second[0].id);
}

#[test]
fn scope_and_topic_ids_match_by_substring() {
    let names = bill_names(&[
        ("Bill:A", "猫法を改正する法律案"),
        ("Bill:B", "犬法を改正する法律案"),
        ("Bill:C", "鳥法案"),
    ]);
    let topics = vec!["猫法を改正する法律案（内閣提出）".to_string(), "犬法を改正する法律案（内閣提出）".to_string()];

    let scoped = scope_bill_names(&topics, &names);
    assert_eq!(scoped.keys().cloned().collect::<Vec<String>>(), vec!["Bill:A", "Bill:B"]);

    assert_eq!(
        extract_topic_ids("猫法を改正する法律案及び犬法を改正する法律案を一括して議題とします", &scoped),
        vec!["Bill:A", "Bill:B"]
    );
    assert!(extract_topic_ids("これより会議を開きます", &scoped).is_empty());
}
