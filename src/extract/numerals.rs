use thiserror::Error;
use tracing::debug;

const DIGITS: [char; 10] = ['〇', '一', '二', '三', '四', '五', '六', '七', '八', '九'];
const MULTIPLIERS: [(char, usize); 3] = [('十', 1), ('百', 2), ('千', 3)];
const MYRIAD: char = '万';
const MYRIAD_VALUE: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumeralError {
    #[error("empty numeral run")]
    Empty,

    #[error("unexpected character '{ch}' at position {position}")]
    UnknownCharacter { ch: char, position: usize },

    #[error("multiplier '{multiplier}' cannot carry {digits} stacked digits")]
    DigitOverflow { multiplier: char, digits: usize },

    #[error("multiplier '{multiplier}' appears below a place that is already filled")]
    MisplacedMultiplier { multiplier: char },

    #[error("numeral value does not fit in 64 bits")]
    TooLarge,
}

pub(crate) fn is_numeral_char(ch: char) -> bool {
    digit_value(ch).is_some() || multiplier_rank(ch).is_some() || ch == MYRIAD
}

fn digit_value(ch: char) -> Option<u8> {
    DIGITS
        .iter()
        .position(|digit| *digit == ch)
        .map(|index| index as u8)
}

fn multiplier_rank(ch: char) -> Option<usize> {
    MULTIPLIERS
        .iter()
        .find(|(multiplier, _)| *multiplier == ch)
        .map(|(_, rank)| *rank)
}

/// Parses a run made only of kansuji characters into its value.
pub fn parse_kansuji(input: &str) -> Result<u64, NumeralError> {
    let chars = input.chars().collect::<Vec<char>>();
    if chars.is_empty() {
        return Err(NumeralError::Empty);
    }

    if let Some((position, ch)) = chars
        .iter()
        .enumerate()
        .find(|(_, ch)| !is_numeral_char(**ch))
    {
        return Err(NumeralError::UnknownCharacter { ch: *ch, position });
    }

    let myriad_positions = chars
        .iter()
        .enumerate()
        .filter(|(_, ch)| **ch == MYRIAD)
        .map(|(index, _)| index)
        .collect::<Vec<usize>>();

    match myriad_positions.as_slice() {
        [] => parse_group(&chars),
        [split] => {
            let high_chars = &chars[..*split];
            let low_chars = &chars[split + 1..];

            let high = if high_chars.is_empty() {
                1
            } else {
                parse_group(high_chars)?
            };
            if high >= MYRIAD_VALUE {
                return Err(NumeralError::DigitOverflow {
                    multiplier: MYRIAD,
                    digits: high_chars.len(),
                });
            }

            let low = if low_chars.is_empty() {
                0
            } else {
                parse_group(low_chars)?
            };
            if low >= MYRIAD_VALUE {
                return Err(NumeralError::MisplacedMultiplier { multiplier: MYRIAD });
            }

            high.checked_mul(MYRIAD_VALUE)
                .and_then(|value| value.checked_add(low))
                .ok_or(NumeralError::TooLarge)
        }
        _ => Err(NumeralError::MisplacedMultiplier { multiplier: MYRIAD }),
    }
}

fn parse_group(chars: &[char]) -> Result<u64, NumeralError> {
    let mut places = Vec::<u8>::new();
    let mut place = 0usize;
    let mut stacking: Option<(char, usize, usize)> = None;

    for index in (0..chars.len()).rev() {
        let ch = chars[index];

        if let Some(digit) = digit_value(ch) {
            if let Some((multiplier, rank, stacked)) = stacking.as_mut() {
                *stacked += 1;
                if *stacked > *rank {
                    return Err(NumeralError::DigitOverflow {
                        multiplier: *multiplier,
                        digits: *stacked,
                    });
                }
            }
            set_place(&mut places, place, digit);
            place += 1;
            continue;
        }

        let rank = multiplier_rank(ch).ok_or(NumeralError::UnknownCharacter {
            ch,
            position: index,
        })?;
        if place > rank {
            return Err(NumeralError::MisplacedMultiplier { multiplier: ch });
        }

        place = rank;
        stacking = Some((ch, rank, 0));

        let preceded_by_digit = index > 0 && digit_value(chars[index - 1]).is_some();
        if !preceded_by_digit {
            set_place(&mut places, place, 1);
            place += 1;
        }
    }

    places.iter().rev().try_fold(0u64, |acc, digit| {
        acc.checked_mul(10)
            .and_then(|value| value.checked_add(u64::from(*digit)))
            .ok_or(NumeralError::TooLarge)
    })
}

fn set_place(places: &mut Vec<u8>, place: usize, digit: u8) {
    if places.len() <= place {
        places.resize(place + 1, 0);
    }
    places[place] = digit;
}

/// Rewrites kansuji runs as Arabic digits; unparsable runs and runs opening
/// with 万 are left as written.
pub fn normalize_numerals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = String::new();

    for ch in text.chars() {
        if is_numeral_char(ch) {
            run.push(ch);
            continue;
        }
        flush_run(&mut run, &mut out);
        out.push(ch);
    }
    flush_run(&mut run, &mut out);

    out
}

fn flush_run(run: &mut String, out: &mut String) {
    if run.is_empty() {
        return;
    }

    if run.starts_with(MYRIAD) {
        out.push_str(run);
        run.clear();
        return;
    }

    match parse_kansuji(run) {
        Ok(value) => out.push_str(&value.to_string()),
        Err(err) => {
            debug!(run = %run, error = %err, "leaving numeral run untouched");
            out.push_str(run);
        }
    }
    run.clear();
}
