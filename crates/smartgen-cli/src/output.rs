use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Left-aligned columns separated by two spaces, with a dashed rule under
/// the header. Widths count chars so masked and non-ASCII cells line up.
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let widths: Vec<usize> = (0..headers.len())
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .fold(headers[col].chars().count(), usize::max)
        })
        .collect();
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();

    println!("{}", render_row(headers, &widths));
    println!("{}", render_row(&rule, &widths));
    for row in &rows {
        println!("{}", render_row(row, &widths));
    }
}

fn render_row<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{:w$}", cell.as_ref()))
        .collect();
    padded.join("  ").trim_end().to_string()
}

/// `********` when a secret is set, `-` otherwise.
pub fn mask(present: bool) -> String {
    if present {
        "********".to_string()
    } else {
        "-".to_string()
    }
}
