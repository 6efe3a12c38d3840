use std::fmt;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;

use super::numerals::normalize_numerals;
use super::text::to_half_width_digits;
use crate::model::BillCategory;

/// Canonical bill number, rendered as `第{diet}回国会{閣|衆|参}法第{n}号`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillNumber {
    pub diet_number: u32,
    pub category: Option<BillCategory>,
    pub submission_number: u32,
}

impl fmt::Display for BillNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "第{}回国会{}法第{}号",
            self.diet_number,
            self.category.map(BillCategory::short_label).unwrap_or_default(),
            self.submission_number
        )
    }
}

#[derive(Debug)]
pub struct BillNumberParser {
    bill_number: Regex,
    category: Regex,
}

impl BillNumberParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            bill_number: Regex::new(
                r"第?(?P<diet>[0-9]+)回?(?:国会)?(?P<category>閣|衆|参|)法?第?(?P<number>[0-9]+)号?",
            )
            .context("failed to compile bill number regex")?,
            category: Regex::new(r"(内閣|衆議院|参議院)提出|(閣法|衆法|参法)")
                .context("failed to compile bill category regex")?,
        })
    }

    pub fn extract_bill_number(&self, text: &str) -> Option<BillNumber> {
        let normalized = to_half_width_digits(&normalize_numerals(text));
        let captures = self.bill_number.captures(&normalized)?;

        let diet_number = captures.name("diet")?.as_str().parse::<u32>().ok()?;
        let submission_number = captures.name("number")?.as_str().parse::<u32>().ok()?;
        let category = captures
            .name("category")
            .and_then(|value| BillCategory::from_short_label(value.as_str()));

        Some(BillNumber {
            diet_number,
            category,
            submission_number,
        })
    }

    pub fn extract_bill_category(&self, text: &str) -> Option<BillCategory> {
        let found = self.category.find(text)?;
        match found.as_str() {
            "内閣提出" | "閣法" => Some(BillCategory::Kakuhou),
            "衆議院提出" | "衆法" => Some(BillCategory::Shuhou),
            "参議院提出" | "参法" => Some(BillCategory::Sanhou),
            _ => None,
        }
    }
}
