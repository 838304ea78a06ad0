use crate::error::{CliError, CliResult};
use rowgate_csvs::{Row, UploadState, PAGE_SIZE_OPTIONS};

/// clap value parser for `--page-size`
pub fn parse_page_size(s: &str) -> Result<usize, String> {
    let size: usize = s.parse().map_err(|e| format!("{}", e))?;
    check_page_size(size).map_err(|e| e.to_string())?;
    Ok(size)
}

/// Page size must be one of [`PAGE_SIZE_OPTIONS`]
pub fn check_page_size(size: usize) -> CliResult<()> {
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(())
    } else {
        Err(CliError::InvalidConfig(format!(
            "Page size must be one of {:?}",
            PAGE_SIZE_OPTIONS
        )))
    }
}

/// Print the rejection or error list, if any; returns true when something was printed
pub fn print_problems(state: &UploadState) -> bool {
    if let Some(rejection) = &state.rejection {
        println!("🚫 {}", rejection);
        return true;
    }

    if !state.errors.is_empty() {
        println!("❌ {} problem(s) found:", state.errors.len());
        for error in &state.errors {
            println!("  - {}", error);
        }
        return true;
    }

    false
}

/// Print the current page of `state.rows` under `columns`
pub fn print_page(columns: &[String], state: &UploadState) {
    print!("{}", render_page(columns, state));
}

pub fn render_page(columns: &[String], state: &UploadState) -> String {
    let total = state.rows.len();
    if total == 0 {
        return "(no rows)\n".to_string();
    }

    let range = state.pagination.page_range(total);
    let visible = state.visible_rows();
    let mut out = render_table(columns, visible);
    out.push_str(&format!(
        "{}–{} of {}  (page {}/{}, {} per page)\n",
        range.start + 1,
        range.end,
        total,
        state.pagination.page() + 1,
        state.pagination.page_count(total),
        state.pagination.rows_per_page(),
    ));
    out
}

fn render_table(columns: &[String], rows: &[Row]) -> String {
    let cells: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| row.get(c).unwrap_or(""))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, columns.iter().map(String::as_str), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);
    for row in &cells {
        push_line(&mut out, row.iter().copied(), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    out.push_str(line.join(" | ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowgate_csvs::{ColumnRule, FileInput, UploadSession};

    fn columns() -> Vec<String> {
        vec!["id".to_string(), "name".to_string()]
    }

    #[test]
    fn test_render_first_page() {
        let mut session =
            UploadSession::new(vec![ColumnRule::required("id"), ColumnRule::optional("name")])
                .unwrap();
        session.upload(FileInput::new(
            "people.csv",
            "id,name\n1,Ann\n2,Bo\n3,Cy\n4,Di\n5,Ed\n6,Flo\n10,\n",
        ));

        let text = render_page(&columns(), session.state());
        assert_eq!(
            text,
            "id | name\n\
             -- | ----\n\
             1  | Ann\n\
             2  | Bo\n\
             3  | Cy\n\
             4  | Di\n\
             5  | Ed\n\
             1–5 of 7  (page 1/2, 5 per page)\n"
        );
    }

    #[test]
    fn test_render_last_page() {
        let mut session =
            UploadSession::new(vec![ColumnRule::required("id"), ColumnRule::optional("name")])
                .unwrap();
        session.upload(FileInput::new("people.csv", "id,name\n1,Ann\n2,Bo\n3,Cy\n"));
        session.set_rows_per_page(10);
        session.set_page(4);

        let text = render_page(&columns(), session.state());
        assert!(text.ends_with("1–3 of 3  (page 1/1, 10 per page)\n"));
    }

    #[test]
    fn test_page_size_parser() {
        assert_eq!(parse_page_size("5"), Ok(5));
        assert_eq!(parse_page_size("10"), Ok(10));
        assert!(parse_page_size("7").is_err());
        assert!(parse_page_size("ten").is_err());
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_page(&columns(), &UploadState::default()), "(no rows)\n");
    }
}
