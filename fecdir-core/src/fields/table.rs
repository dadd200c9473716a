//! Field parsers for the table layout (2019 print run).
//!
//! A record is a list of table rows, each flattened to `cell | cell | …`.
//! These heuristics were tuned on that print run and deliberately differ from
//! the line-layout parsers (address fallback order, no comma trimming).

use crate::config::Vocabulary;
use crate::text::{after_first, after_last, non_empty, phone_marker_index};

fn is_sector_row(row: &str) -> bool {
    row.to_lowercase().contains("secteur")
}

fn is_phone_row(row: &str) -> bool {
    row.contains("Tel") || row.contains("Tél")
}

pub fn parse_legal_name(vocabulary: &Vocabulary, rows: &[String]) -> Option<String> {
    rows.iter()
        .filter(|row| !row.contains("Nom") && !is_phone_row(row) && !is_sector_row(row))
        .filter(|row| !row.contains('@'))
        .filter(|row| !vocabulary.is_excluded_legal_name(row))
        .find_map(|row| {
            let first_cell = row.split('|').next().unwrap_or("");
            let first_cell = first_cell.trim();
            if vocabulary.is_excluded_legal_name(first_cell) {
                return None;
            }
            non_empty(&first_cell.replace("Tel", ""))
        })
}

pub fn parse_sectors(rows: &[String]) -> Option<Vec<String>> {
    let row = rows.iter().find(|row| is_sector_row(row))?;
    let flattened = row.replace('|', " ");
    let mut tokens: Vec<String> = after_last(&flattened, ':')
        .split_whitespace()
        .filter(|token| !token.eq_ignore_ascii_case("et"))
        .map(str::to_string)
        .collect();
    // Last token of the sector row is the email / description cell
    tokens.pop();
    if tokens.is_empty() {
        None
    } else {
        Some(tokens)
    }
}

pub fn parse_phones(rows: &[String]) -> Option<Vec<String>> {
    let row = rows.iter().find(|row| is_phone_row(row))?;
    let flattened = row.replace('|', " ");
    Some(
        after_last(&flattened, ':')
            .split('-')
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect(),
    )
}

/// The sector row, or else any row without contact or web data; the value is
/// its last cell
pub fn parse_address(vocabulary: &Vocabulary, rows: &[String]) -> Option<String> {
    let row = rows.iter().find(|row| {
        is_sector_row(row) || (!row.contains("Nom") && !is_phone_row(row) && !row.contains("www"))
    })?;

    let value = if row.contains('|') {
        after_last(row, '|')
    } else {
        after_last(row, ':')
    };
    let address = non_empty(value)?;
    if vocabulary.is_excluded_address(&address) {
        None
    } else {
        Some(address)
    }
}

/// Email and site url read from the last word of the sector row
pub fn parse_web(rows: &[String]) -> (Option<String>, Option<String>) {
    let Some(row) = rows.iter().find(|row| is_sector_row(row)) else {
        return (None, None);
    };
    let flattened = row.replace('|', " ");
    let Some(last) = after_last(&flattened, ':').split_whitespace().last() else {
        return (None, None);
    };

    let email_of = |s: &str| {
        if s.contains('@') {
            Some(s.to_string())
        } else {
            None
        }
    };

    match last.find("www") {
        Some(index) => (email_of(&last[..index]), Some(last[index..].to_string())),
        None => (email_of(last), None),
    }
}

pub fn parse_contact_name(vocabulary: &Vocabulary, rows: &[String]) -> Option<String> {
    rows.iter()
        .filter(|row| !vocabulary.is_excluded_profile_name(row))
        .filter(|row| row.contains("Nom"))
        .find_map(|row| {
            let flattened = row.replace('|', " ");
            let after_label = after_first(&flattened, ':')?;
            // Only the segment up to the next label belongs to the name
            let mut name = after_label.split(':').next().unwrap_or("");
            if let Some(end) = phone_marker_index(name) {
                name = &name[..end];
            }
            non_empty(name)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_VOCABULARY;

    fn rows() -> Vec<String> {
        vec![
            "ACME SARL | 12, Av. du Commerce, Gombe".to_string(),
            "Nom: Jean Mukendi | Tel: 0812345678 - 0991112222".to_string(),
            "Secteur: Commerce et Import Export | contact@acme.cdwww.acme.cd".to_string(),
        ]
    }

    #[test]
    fn test_legal_name_is_first_cell() {
        assert_eq!(
            parse_legal_name(&DEFAULT_VOCABULARY, &rows()),
            Some("ACME SARL".to_string())
        );
    }

    #[test]
    fn test_legal_name_skips_region_rows() {
        let mut rows = rows();
        rows.insert(0, "KINSHASA".to_string());
        assert_eq!(
            parse_legal_name(&DEFAULT_VOCABULARY, &rows),
            Some("ACME SARL".to_string())
        );
    }

    #[test]
    fn test_sectors_drop_trailing_web_token() {
        assert_eq!(
            parse_sectors(&rows()),
            Some(vec![
                "Commerce".to_string(),
                "Import".to_string(),
                "Export".to_string()
            ])
        );
    }

    #[test]
    fn test_phones_split_on_hyphen() {
        assert_eq!(
            parse_phones(&rows()),
            Some(vec!["0812345678".to_string(), "0991112222".to_string()])
        );
    }

    #[test]
    fn test_address_is_last_cell_of_first_plain_row() {
        assert_eq!(
            parse_address(&DEFAULT_VOCABULARY, &rows()),
            Some("12, Av. du Commerce, Gombe".to_string())
        );
    }

    #[test]
    fn test_web_split_on_glued_token() {
        assert_eq!(
            parse_web(&rows()),
            (Some("contact@acme.cd".to_string()), Some("www.acme.cd".to_string()))
        );
    }

    #[test]
    fn test_contact_name_stops_at_next_label() {
        assert_eq!(
            parse_contact_name(&DEFAULT_VOCABULARY, &rows()),
            Some("Jean Mukendi".to_string())
        );
    }
}
