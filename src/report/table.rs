//! Plain-text table rendering for the CLI.

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

/// Columns whose cells are right-aligned (dollar and percent columns).
pub fn render_table(
    headers: &[&str],
    rows: &[Vec<String>],
    right_aligned: &[usize],
) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| Cell::new(h)).collect::<Vec<_>>());

    for row in rows {
        table.add_row(
            row.iter()
                .enumerate()
                .map(|(i, value)| {
                    let cell = Cell::new(value);
                    if right_aligned.contains(&i) {
                        cell.set_alignment(CellAlignment::Right)
                    } else {
                        cell
                    }
                })
                .collect::<Vec<_>>(),
        );
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headers_and_rows() {
        let out = render_table(
            &["Account", "Dollars"],
            &[vec!["Broker A".to_string(), "$1,000".to_string()]],
            &[1],
        );
        assert!(out.contains("Account"));
        assert!(out.contains("Broker A"));
        assert!(out.contains("$1,000"));
    }
}
