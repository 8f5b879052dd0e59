//! `show interfaces description | include <port>`
//!
//! ```text
//! Interface                      Status         Protocol Description
//! Gi1/0/41                       up             up       912_SKUD
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

static COLUMN_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());
static PROMPT_ECHO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w.\-]*[#>]").unwrap());

const HEADER_TOKEN: &str = "Interface";

/// Description of the first interface row.
///
/// Columns are separated by two or more spaces. A row with only three columns
/// yields the third one, which is the Status column ("up", "down", ...), not a
/// description. That matches how the reports have always been produced.
pub fn parse(output: &str) -> Option<String> {
    let mut lines = output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !PROMPT_ECHO.is_match(line))
        .peekable();

    if lines.peek().is_some_and(|first| first.contains(HEADER_TOKEN)) {
        lines.next();
    }

    let row = lines.next()?;
    let columns: Vec<&str> = COLUMN_GAP.split(row).collect();
    let description = match columns.len() {
        n if n >= 4 => columns[3],
        3 => columns[2],
        _ => return None,
    };

    Some(description.trim().to_string()).filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_should_skip_header() {
        let output = "\
Interface                      Status         Protocol Description
Gi1/0/41                       up             up       912_SKUD
";
        assert_eq!(parse(output).as_deref(), Some("912_SKUD"));
    }

    #[test]
    fn parse_should_read_row_without_header() {
        let output = "Gi1/0/41                       up             up       912_SKUD\n";
        assert_eq!(parse(output).as_deref(), Some("912_SKUD"));
    }

    #[test]
    fn three_columns_should_yield_status_column() {
        assert_eq!(parse("Gi1/0/1   up   up").as_deref(), Some("up"));
    }

    #[test]
    fn parse_should_ignore_prompt_echo_and_blank_lines() {
        let output = "\
access-sw-01#show interfaces description | include Gi1/0/41

Gi1/0/41                       up             up       reception desk
access-sw-01#";
        assert_eq!(parse(output).as_deref(), Some("reception desk"));
    }

    #[test]
    fn parse_should_return_none_for_sparse_rows() {
        assert_eq!(parse("Gi1/0/41   up"), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("Interface   Status   Protocol Description\n"), None);
    }
}
