// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-platform printer query commands and their output parsers.
//
// Only the command strings differ between platforms; the strategy-to-parser
// mapping in `discovery` is the same everywhere. The parsers are pure text
// functions so they can be tested against captured command output on any
// host.

// ---------------------------------------------------------------------------
// Query commands — Windows
// ---------------------------------------------------------------------------

/// Modern listing query: one printer name per line.
#[cfg(windows)]
pub const LIST_PRIMARY: &str =
    "powershell -NoProfile -Command \"Get-Printer | Select-Object -ExpandProperty Name\"";

/// Broader management query via CIM, same one-name-per-line output.
#[cfg(windows)]
pub const LIST_MANAGEMENT: &str = "powershell -NoProfile -Command \"Get-CimInstance -ClassName Win32_Printer | Select-Object -ExpandProperty Name\"";

/// Deprecated tabular query; emits a `Name` header line before the data.
#[cfg(windows)]
pub const LIST_LEGACY: &str = "wmic printer get name";

/// Default-printer query filtering by the spooler's default flag.
#[cfg(windows)]
pub const DEFAULT_FILTER: &str = "powershell -NoProfile -Command \"Get-CimInstance -ClassName Win32_Printer -Filter 'Default=true' | Select-Object -ExpandProperty Name\"";

/// Legacy two-column name/default table. Windows only; other platforms have
/// no equivalent, so the constant is an `Option`.
#[cfg(windows)]
pub const DEFAULT_TABLE: Option<&str> = Some("wmic printer get name,default");

// ---------------------------------------------------------------------------
// Query commands — unix (CUPS)
// ---------------------------------------------------------------------------

/// Modern listing query: `lpstat -e` prints one destination name per line.
#[cfg(not(windows))]
pub const LIST_PRIMARY: &str = "lpstat -e";

/// Broader query over accepting destinations; the name is the first column.
#[cfg(not(windows))]
pub const LIST_MANAGEMENT: &str = "lpstat -a | cut -d ' ' -f 1";

/// Legacy query over configured printers.
#[cfg(not(windows))]
pub const LIST_LEGACY: &str = "lpstat -p | awk '/^printer/ {print $2}'";

/// Default destination, stripped down to the bare name.
#[cfg(not(windows))]
pub const DEFAULT_FILTER: &str = "lpstat -d | sed -n 's/^system default destination: //p'";

/// No tabular default listing exists under CUPS.
#[cfg(not(windows))]
pub const DEFAULT_TABLE: Option<&str> = None;

// ---------------------------------------------------------------------------
// Output parsers
// ---------------------------------------------------------------------------

/// Parse one-name-per-line output: split into lines, trim, drop empties.
pub fn parse_name_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Parse legacy tabular name output: as [`parse_name_lines`], additionally
/// dropping a literal header line whose trimmed value is `Name` in any case.
pub fn parse_legacy_name_table(output: &str) -> Vec<String> {
    parse_name_lines(output)
        .into_iter()
        .filter(|line| !line.eq_ignore_ascii_case("Name"))
        .collect()
}

/// Parse a two-column (name, default-flag) table and return the name from
/// the first row whose flag token case-insensitively contains `true`.
///
/// Columns are separated by runs of two or more whitespace characters, so
/// printer names containing single spaces survive intact. Rows with fewer
/// than two columns are skipped; a header row never matches because its
/// flag token does not contain `true`.
pub fn parse_default_flag_table(output: &str) -> Option<String> {
    for line in output.lines() {
        let columns = split_columns(line);
        let (Some(name), Some(flag)) = (columns.first(), columns.get(1)) else {
            continue;
        };
        if flag.to_ascii_lowercase().contains("true") {
            return Some((*name).to_string());
        }
    }
    None
}

/// Split a line on runs of two-or-more whitespace characters.
fn split_columns(line: &str) -> Vec<&str> {
    let trimmed = line.trim();
    let mut columns = Vec::new();
    let mut field_start: Option<usize> = None;
    let mut ws_start: Option<usize> = None;
    let mut ws_len = 0usize;

    for (idx, ch) in trimmed.char_indices() {
        if ch.is_whitespace() {
            if ws_len == 0 {
                ws_start = Some(idx);
            }
            ws_len += 1;
        } else {
            match (field_start, ws_start) {
                (Some(start), Some(ws)) if ws_len >= 2 => {
                    columns.push(trimmed[start..ws].trim_end());
                    field_start = Some(idx);
                }
                (None, _) => field_start = Some(idx),
                _ => {}
            }
            ws_start = None;
            ws_len = 0;
        }
    }
    if let Some(start) = field_start {
        columns.push(trimmed[start..].trim_end());
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_lines_are_trimmed_and_filtered() {
        let output = "  Receipt One \n\n\tBack Office\n   \n";
        assert_eq!(parse_name_lines(output), vec!["Receipt One", "Back Office"]);
    }

    #[test]
    fn legacy_table_drops_header_any_case() {
        for header in ["Name", "NAME", "name"] {
            let output = format!("{header}\nHP LaserJet\n\nEPSON TM-T20\n");
            assert_eq!(
                parse_legacy_name_table(&output),
                vec!["HP LaserJet", "EPSON TM-T20"],
                "header {header} not dropped"
            );
        }
    }

    #[test]
    fn legacy_table_keeps_printer_actually_named_like_header() {
        // Only the exact word drops; a printer whose name merely starts
        // with it stays.
        let output = "Name\nName Badge Printer\n";
        assert_eq!(parse_legacy_name_table(output), vec!["Name Badge Printer"]);
    }

    #[test]
    fn default_table_picks_first_true_row() {
        let output = "HP LaserJet   FALSE\nCanon MX       TRUE\nOther        TRUE\n";
        assert_eq!(parse_default_flag_table(output), Some("Canon MX".into()));
    }

    #[test]
    fn default_table_flag_match_is_case_insensitive() {
        let output = "Canon MX       True\n";
        assert_eq!(parse_default_flag_table(output), Some("Canon MX".into()));
    }

    #[test]
    fn default_table_skips_short_rows_and_header() {
        let output = "Default  Name\nUnflaggedPrinter\nOffice Laser   TRUE\n";
        assert_eq!(parse_default_flag_table(output), Some("Office Laser".into()));
    }

    #[test]
    fn default_table_without_true_row_is_absent() {
        let output = "HP LaserJet   FALSE\nCanon MX       FALSE\n";
        assert_eq!(parse_default_flag_table(output), None);
    }

    #[test]
    fn columns_split_on_wide_gaps_only() {
        assert_eq!(
            split_columns("HP Color LaserJet M254  TRUE"),
            vec!["HP Color LaserJet M254", "TRUE"]
        );
        assert_eq!(split_columns("  lone  "), vec!["lone"]);
        assert_eq!(split_columns(""), Vec::<&str>::new());
        assert_eq!(split_columns("a \t b"), vec!["a", "b"]);
    }
}
