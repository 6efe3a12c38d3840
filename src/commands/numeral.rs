use anyhow::Result;
use tracing::info;

use kokkai_minutes::extract::{BillNumberParser, normalize_numerals};

use crate::cli::NumeralArgs;

pub fn run(args: NumeralArgs) -> Result<()> {
    let parser = BillNumberParser::new()?;
    let lines = render_lines(&parser, &args.text);

    info!(text = %args.text, lines = lines.len(), "normalized numerals");
    for line in lines {
        println!("{line}");
    }

    Ok(())
}

fn render_lines(parser: &BillNumberParser, text: &str) -> Vec<String> {
    let mut lines = vec![normalize_numerals(text)];
    if let Some(bill_number) = parser.extract_bill_number(text) {
        lines.push(format!("bill_number: {bill_number}"));
    }
    if let Some(category) = parser.extract_bill_category(text) {
        lines.push(format!("category: {}", category.short_label()));
    }
    lines
}
