//! Field parsers for the line layout: one field per source line, in no fixed
//! order. Each parser scans the whole record and never fails.

use crate::classifier::LineClassifier;
use crate::text::{
    after_first, after_last, capitalize_first, non_empty, normalize_token, phone_marker_index,
    strip_trailing_digits, web_token_index,
};
use crate::types::LineTag;
use regex::Regex;
use std::sync::LazyLock;

// A lone hyphen separates numbers; hyphens inside a number are kept
static PHONE_SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+-\s+|/|;|,").unwrap());

/// `Nom …:` label lines carry the contact person, not the company
fn is_name_label(line: &str) -> bool {
    line.to_lowercase().contains("nom") && line.contains(':')
}

pub fn parse_legal_name(classifier: &LineClassifier, lines: &[String]) -> Option<String> {
    let vocabulary = classifier.vocabulary();
    lines
        .iter()
        .filter(|line| {
            matches!(
                classifier.classify(line),
                LineTag::LegalNameCandidate | LineTag::ContactName
            )
        })
        .filter(|line| !is_name_label(line))
        .filter(|line| !vocabulary.is_excluded_legal_name(line))
        .find_map(|line| clean_legal_name(line))
}

/// Remove reference codes and address fragments fused onto a name line
pub fn clean_legal_name(line: &str) -> Option<String> {
    let stripped = strip_trailing_digits(line);
    let commas = stripped.matches(',').count();
    let name = if (1..=3).contains(&commas) {
        let segments: Vec<&str> = stripped.split(',').collect();
        segments[..segments.len() - commas].join(",")
    } else {
        stripped
    };
    non_empty(name.trim_matches(|c: char| c == '|' || c.is_whitespace()))
}

pub fn parse_sectors(lines: &[String]) -> Option<Vec<String>> {
    let line = lines
        .iter()
        .find(|line| line.to_lowercase().contains("secteur"))?;

    let mut tokens: Vec<&str> = after_last(line, ':')
        .split(|c: char| c.is_whitespace() || c == '|')
        .filter(|token| !token.is_empty())
        .filter(|token| !token.eq_ignore_ascii_case("et"))
        .collect();
    // The last word is usually the start of a wrapped description
    tokens.pop();

    let sectors: Vec<String> = tokens
        .into_iter()
        .map(|token| token.trim_end_matches([',', ';', '.']).to_string())
        .filter(|token| !token.is_empty())
        .collect();

    if sectors.is_empty() {
        None
    } else {
        Some(sectors)
    }
}

pub fn parse_phones(lines: &[String]) -> Option<Vec<String>> {
    let line = lines.iter().find(|line| phone_marker_index(line).is_some())?;

    let numbers = if line.contains(':') {
        after_last(line, ':')
    } else {
        // "Tél 081 …" without a colon: skip the marker word itself
        let marker = phone_marker_index(line).unwrap_or(0);
        let rest = &line[marker..];
        rest.split_once(char::is_whitespace)
            .map(|(_, numbers)| numbers)
            .unwrap_or("")
    };

    Some(
        PHONE_SEPARATOR_REGEX
            .split(numbers)
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect(),
    )
}

pub fn parse_address(classifier: &LineClassifier, lines: &[String]) -> Option<String> {
    let vocabulary = classifier.vocabulary();

    let from_indicator = lines
        .iter()
        .filter(|line| classifier.classify(line) == LineTag::Address)
        .find_map(|line| address_from_indicator(classifier, line));

    let address = from_indicator.or_else(|| {
        lines
            .iter()
            .filter(|line| line.contains(','))
            .filter(|line| {
                matches!(
                    classifier.classify(line),
                    LineTag::LegalNameCandidate | LineTag::Address
                )
            })
            .find_map(|line| non_empty(after_last(line, ',')))
    })?;

    if vocabulary.is_excluded_address(&address) {
        None
    } else {
        Some(address)
    }
}

/// Text from the first address indicator token to the end of the line,
/// stopping before any phone or web part
fn address_from_indicator(classifier: &LineClassifier, line: &str) -> Option<String> {
    let vocabulary = classifier.vocabulary();
    let mut offset = 0;
    let mut start = None;
    for token in line.split_inclusive(char::is_whitespace) {
        let normalized = normalize_token(token.trim());
        let indicator = vocabulary.is_address_indicator(&normalized)
            || vocabulary
                .address_indicators
                .iter()
                .filter(|i| i.ends_with('/') || i.ends_with('°'))
                .any(|i| normalized.starts_with(i.as_str()));
        if indicator {
            start = Some(offset);
            break;
        }
        offset += token.len();
    }

    let mut address = &line[start?..];
    if let Some(end) = phone_marker_index(address) {
        address = &address[..end];
    }
    if let Some(end) = web_token_index(address) {
        address = &address[..end];
    }
    non_empty(address.trim_end_matches(|c: char| c == ',' || c == '|' || c.is_whitespace()))
        .map(|a| capitalize_first(&a))
}

/// Email and site url, split at the `www` token when both share a line
pub fn parse_web(lines: &[String]) -> (Option<String>, Option<String>) {
    if let Some(line) = lines.iter().find(|line| line.contains('@')) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let www = tokens
            .iter()
            .position(|t| t.to_lowercase().starts_with("www") && !t.contains('@'));

        let (before, site) = match www {
            Some(index) => (&tokens[..index], Some(clean_site(tokens[index]))),
            None => (&tokens[..], None),
        };

        let email_token = before.iter().rev().find(|t| t.contains('@'));
        let (email, glued_site) = match email_token.and_then(|t| split_glued_site(t)) {
            Some((email, site)) => (Some(clean_email(email)), Some(clean_site(site))),
            None => (email_token.map(|t| clean_email(t)), None),
        };
        return (email, site.or(glued_site).or_else(|| find_site(lines)));
    }

    (None, find_site(lines))
}

/// `contact@acme.cdwww.acme.cd` -> (`contact@acme.cd`, `www.acme.cd`)
fn split_glued_site(token: &str) -> Option<(&str, &str)> {
    let at = token.find('@')?;
    let www = at + token[at..].to_ascii_lowercase().find("www")?;
    if www <= at + 1 {
        return None;
    }
    Some((&token[..www], &token[www..]))
}

fn find_site(lines: &[String]) -> Option<String> {
    lines.iter().find_map(|line| {
        line.split_whitespace()
            .find(|t| {
                let lower = t.to_lowercase();
                lower.starts_with("www.") || lower.starts_with("http://") || lower.starts_with("https://")
            })
            .map(clean_site)
    })
}

fn clean_email(token: &str) -> String {
    // "E-mail:info@acme.cd," -> "info@acme.cd"
    after_last(token, ':')
        .trim_matches(|c: char| matches!(c, ',' | ';' | '|' | '(' | ')'))
        .to_string()
}

fn clean_site(token: &str) -> String {
    token
        .trim_end_matches(|c: char| matches!(c, ',' | ';' | '|' | ')'))
        .to_string()
}

pub fn parse_contact_name(classifier: &LineClassifier, lines: &[String]) -> Option<String> {
    let vocabulary = classifier.vocabulary();
    lines
        .iter()
        .filter(|line| classifier.classify(line) == LineTag::ContactName)
        .filter(|line| !vocabulary.is_excluded_profile_name(line))
        .filter(|line| is_name_label(line))
        .find_map(|line| {
            let mut name = after_first(line, ':')?;
            if let Some(end) = phone_marker_index(name) {
                name = &name[..end];
            }
            non_empty(name.trim_matches(|c: char| c == '|' || c == ',' || c.is_whitespace()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_VOCABULARY;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn classifier() -> LineClassifier<'static> {
        LineClassifier::new(&DEFAULT_VOCABULARY)
    }

    #[test]
    fn test_legal_name_comma_trim() {
        let record = lines(&["ACME SARL, Kinshasa, Gombe"]);
        assert_eq!(
            parse_legal_name(&classifier(), &record),
            Some("ACME SARL".to_string())
        );
    }

    #[test]
    fn test_legal_name_comma_counts() {
        assert_eq!(clean_legal_name("A, B").as_deref(), Some("A"));
        assert_eq!(clean_legal_name("A, B, C, D").as_deref(), Some("A"));
        assert_eq!(
            clean_legal_name("A, B, C, D, E").as_deref(),
            Some("A, B, C, D, E")
        );
        assert_eq!(clean_legal_name("ACME SARL 00123").as_deref(), Some("ACME SARL"));
        assert_eq!(clean_legal_name("ACME, 00123").as_deref(), Some("ACME"));
        assert_eq!(clean_legal_name("  , ").as_deref(), None);
    }

    #[test]
    fn test_legal_name_skips_fields_and_exclusions() {
        let record = lines(&[
            "KINSHASA",
            "Manioc",
            "Nom: Jean Mukendi",
            "Tél: 081-234-5678",
            "12, Av. du Commerce",
            "BRALIMA SA",
        ]);
        assert_eq!(
            parse_legal_name(&classifier(), &record),
            Some("BRALIMA SA".to_string())
        );
    }

    #[test]
    fn test_legal_name_absent() {
        let record = lines(&["Tél: 081", "Secteur: Mines et Carrières"]);
        assert_eq!(parse_legal_name(&classifier(), &record), None);
    }

    #[test]
    fn test_sector_parsing() {
        let record = lines(&["Secteur d'activité: Commerce et Import Export divers"]);
        assert_eq!(
            parse_sectors(&record),
            Some(vec![
                "Commerce".to_string(),
                "Import".to_string(),
                "Export".to_string()
            ])
        );
        assert_eq!(parse_sectors(&lines(&["ACME"])), None);
    }

    #[test]
    fn test_phone_parsing() {
        let record = lines(&["Tél: 081-234-5678 - 099-111-2222"]);
        assert_eq!(
            parse_phones(&record),
            Some(vec!["081-234-5678".to_string(), "099-111-2222".to_string()])
        );
        assert_eq!(
            parse_phones(&lines(&["Tél 081 000 11 22 / 099 111 22 33"])),
            Some(vec!["081 000 11 22".to_string(), "099 111 22 33".to_string()])
        );
        assert_eq!(parse_phones(&lines(&["ACME"])), None);
    }

    #[test]
    fn test_email_and_site_split() {
        let record = lines(&["contact@acme.cd www.acme.cd"]);
        assert_eq!(
            parse_web(&record),
            (Some("contact@acme.cd".to_string()), Some("www.acme.cd".to_string()))
        );
    }

    #[test]
    fn test_glued_email_and_site_split() {
        assert_eq!(
            parse_web(&lines(&["contact@acme.cdwww.acme.cd"])),
            (Some("contact@acme.cd".to_string()), Some("www.acme.cd".to_string()))
        );
        assert_eq!(
            parse_web(&lines(&["E-mail: info@acme.cdWWW.acme.cd, BP 123"])),
            (Some("info@acme.cd".to_string()), Some("WWW.acme.cd".to_string()))
        );
    }

    #[test]
    fn test_email_only_and_site_only() {
        assert_eq!(
            parse_web(&lines(&["E-mail: info@acme.cd"])),
            (Some("info@acme.cd".to_string()), None)
        );
        assert_eq!(
            parse_web(&lines(&["ACME", "www.acme.cd"])),
            (None, Some("www.acme.cd".to_string()))
        );
        assert_eq!(parse_web(&lines(&["ACME"])), (None, None));
    }

    #[test]
    fn test_address_from_indicator() {
        let record = lines(&["ACME SARL", "12, av. du Commerce, Gombe"]);
        assert_eq!(
            parse_address(&classifier(), &record),
            Some("Av. du Commerce, Gombe".to_string())
        );
    }

    #[test]
    fn test_address_stops_before_web_part() {
        let record = lines(&["Avenue Lukusa 7 info@acme.cd"]);
        assert_eq!(
            parse_address(&classifier(), &record),
            Some("Avenue Lukusa 7".to_string())
        );
    }

    #[test]
    fn test_address_stops_before_phone_part() {
        assert_eq!(
            address_from_indicator(&classifier(), "Av. du Port 4, Gombe Tél: 081 000 00 00"),
            Some("Av. du Port 4, Gombe".to_string())
        );
    }

    #[test]
    fn test_address_comma_fallback() {
        let record = lines(&["ACME SARL, Limete"]);
        assert_eq!(
            parse_address(&classifier(), &record),
            Some("Limete".to_string())
        );
        let excluded = lines(&["ACME SARL, du"]);
        assert_eq!(parse_address(&classifier(), &excluded), None);
    }

    #[test]
    fn test_contact_name() {
        let record = lines(&["ACME SARL", "Nom: Jean Mukendi"]);
        assert_eq!(
            parse_contact_name(&classifier(), &record),
            Some("Jean Mukendi".to_string())
        );
        assert_eq!(
            parse_contact_name(&classifier(), &lines(&["Nom du responsable:"])),
            None
        );
    }

    #[test]
    fn test_sector_line_is_never_contact_name() {
        let record = lines(&["ACME SARL", "Secteur d'activité: Agronomie Elevage divers"]);
        assert_eq!(parse_contact_name(&classifier(), &record), None);

        let record = lines(&[
            "ACME SARL",
            "Secteur: Economie Conseil",
            "Nom: Jean Mukendi",
        ]);
        assert_eq!(
            parse_contact_name(&classifier(), &record),
            Some("Jean Mukendi".to_string())
        );
    }
}
