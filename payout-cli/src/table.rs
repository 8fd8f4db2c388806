//! Plain-text rendering of the ledger.

use payout_core::{Entry, EntryRow};

const INDEX_HEADER: &str = "#";

/// Renders entries as an aligned table, one row per entry, prefixed with
/// the position `remove` expects. An empty ledger renders as a single line.
pub fn render(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return "No entries.\n".to_string();
    }

    let rows: Vec<(String, EntryRow)> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| (index.to_string(), EntryRow::from_entry(entry)))
        .collect();

    let mut widths = [0usize; 7];
    widths[0] = INDEX_HEADER.len();
    for (i, header) in EntryRow::HEADERS.iter().enumerate() {
        widths[i + 1] = header.chars().count();
    }
    for (index, row) in &rows {
        widths[0] = widths[0].max(index.chars().count());
        for (i, cell) in row.cells().iter().enumerate() {
            widths[i + 1] = widths[i + 1].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<&str> = std::iter::once(INDEX_HEADER)
        .chain(EntryRow::HEADERS)
        .collect();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for (index, row) in &rows {
        let cells: Vec<&str> = std::iter::once(index.as_str())
            .chain(row.cells())
            .collect();
        push_line(&mut out, &cells, &widths);
    }
    out
}

fn push_line<S: AsRef<str>>(
    out: &mut String,
    cells: &[S],
    widths: &[usize],
) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use payout_core::TierCalculator;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_ledger_renders_placeholder() {
        assert_eq!(render(&[]), "No entries.\n");
    }

    #[test]
    fn renders_header_rule_and_rows() {
        let calc = TierCalculator::standard();
        let entries = vec![
            Entry::new("5000", calc.compute(dec!(5000))),
            Entry::new("2000", calc.compute(dec!(2000))),
        ];

        let table = render(&entries);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("#  Gross amount  Percentage  Driver earnings"));
        assert!(lines[1].starts_with("-  ------------"));
        assert_eq!(
            lines[2],
            "0  5000          40%         2000.00          1000  1     2000.00"
        );
        assert_eq!(
            lines[3],
            "1  2000          20%         400.00           1000  1     600.00"
        );
    }
}
