//! Plain-text tables for the admin console.

/// Render `rows` under `headers` as aligned lines:
///
/// ```text
/// +--------+-------------+
/// | Option | Value       |
/// +--------+-------------+
/// | cmd    | '/bin/true' |
/// +--------+-------------+
/// ```
pub fn render(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );
    let line = |cells: Vec<&str>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!(" {}{} ", cell, " ".repeat(w - cell.chars().count())))
            .collect();
        format!("|{}|", padded.join("|"))
    };

    let mut out = vec![rule.clone(), line(headers.to_vec()), rule.clone()];
    for row in rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.push(rule);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_padded_to_widest_cell() {
        let lines = render(
            &["Option", "Value"],
            &[vec!["cmd".into(), "'/bin/true'".into()]],
        );
        assert_eq!(
            lines,
            [
                "+--------+-------------+",
                "| Option | Value       |",
                "+--------+-------------+",
                "| cmd    | '/bin/true' |",
                "+--------+-------------+",
            ]
        );
    }

    #[test]
    fn header_only() {
        let lines = render(&["Command", "Description"], &[]);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "| Command | Description |");
    }
}
