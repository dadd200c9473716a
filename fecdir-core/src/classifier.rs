use crate::config::Vocabulary;
use crate::types::LineTag;

/// A heuristic test on one raw line
pub type LinePredicate = fn(&Vocabulary, &str) -> bool;

pub struct LineRule {
    pub tag: LineTag,
    pub name: &'static str,
    pub predicate: LinePredicate,
}

/// Classification ladder, evaluated top to bottom; the first hit wins.
/// Lines matching nothing are legal-name candidates.
pub const LINE_RULES: &[LineRule] = &[
    LineRule {
        tag: LineTag::Noise,
        name: "DirectoryTitle",
        predicate: predicates::is_noise,
    },
    LineRule {
        tag: LineTag::Phone,
        name: "PhoneMarker",
        predicate: predicates::is_phone,
    },
    LineRule {
        tag: LineTag::Address,
        name: "AddressIndicator",
        predicate: predicates::is_address,
    },
    LineRule {
        tag: LineTag::Email,
        name: "AtSign",
        predicate: predicates::is_email,
    },
    LineRule {
        tag: LineTag::SiteUrl,
        name: "WebPrefix",
        predicate: predicates::is_site_url,
    },
    LineRule {
        tag: LineTag::Sector,
        name: "SectorLabel",
        predicate: predicates::is_sector,
    },
    LineRule {
        tag: LineTag::ContactName,
        name: "NameLabel",
        predicate: predicates::is_contact_name,
    },
];

pub mod predicates {
    use crate::config::Vocabulary;
    use crate::text::{has_phone_marker, normalize_token};

    pub fn is_noise(vocabulary: &Vocabulary, line: &str) -> bool {
        vocabulary.is_noise(line)
    }

    pub fn is_phone(_vocabulary: &Vocabulary, line: &str) -> bool {
        has_phone_marker(line)
    }

    pub fn is_address(vocabulary: &Vocabulary, line: &str) -> bool {
        line.split_whitespace().any(|token| {
            let token = normalize_token(token);
            vocabulary.is_address_indicator(&token)
                || vocabulary
                    .address_indicators
                    .iter()
                    .filter(|i| i.ends_with('/') || i.ends_with('°'))
                    .any(|i| token.starts_with(i.as_str()))
        })
    }

    pub fn is_email(_vocabulary: &Vocabulary, line: &str) -> bool {
        line.contains('@')
    }

    pub fn is_site_url(_vocabulary: &Vocabulary, line: &str) -> bool {
        let lower = line.trim_start().to_lowercase();
        lower.starts_with("www.") || lower.starts_with("http://") || lower.starts_with("https://")
    }

    pub fn is_sector(_vocabulary: &Vocabulary, line: &str) -> bool {
        line.to_lowercase().contains("secteur")
    }

    pub fn is_contact_name(_vocabulary: &Vocabulary, line: &str) -> bool {
        line.to_lowercase().contains("nom")
    }
}

pub struct LineClassifier<'a> {
    vocabulary: &'a Vocabulary,
}

impl<'a> LineClassifier<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn classify(&self, line: &str) -> LineTag {
        match self.matching_rule(line) {
            Some(rule) => {
                tracing::trace!("{:?} <- {:?} (rule {})", rule.tag, line, rule.name);
                rule.tag
            }
            None => LineTag::LegalNameCandidate,
        }
    }

    /// The rule that decided a line's tag, `None` for legal-name candidates
    pub fn matching_rule(&self, line: &str) -> Option<&'static LineRule> {
        LINE_RULES
            .iter()
            .find(|rule| (rule.predicate)(self.vocabulary, line))
    }

    pub fn vocabulary(&self) -> &'a Vocabulary {
        self.vocabulary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_VOCABULARY;

    fn classify(line: &str) -> LineTag {
        LineClassifier::new(&DEFAULT_VOCABULARY).classify(line)
    }

    #[test]
    fn test_each_predicate_alone() {
        let v = &*DEFAULT_VOCABULARY;
        assert!(predicates::is_noise(v, "Annuaire des entreprises 2020"));
        assert!(predicates::is_phone(v, "Tél: 081 000 00 00"));
        assert!(predicates::is_phone(v, "Tel.: 099"));
        assert!(predicates::is_address(v, "12, Av. du Commerce"));
        assert!(predicates::is_address(v, "Q/Matonge C/Kalamu"));
        assert!(predicates::is_address(v, "N° 45 Boulevard du 30 Juin"));
        assert!(!predicates::is_address(v, "Avenir Congo SARL"));
        assert!(predicates::is_email(v, "info@acme.cd"));
        assert!(predicates::is_site_url(v, "www.acme.cd"));
        assert!(predicates::is_sector(v, "Secteur d'activité: Mines"));
        assert!(predicates::is_contact_name(v, "Nom: Jean Mukendi"));
    }

    #[test]
    fn test_classification_order() {
        // Phone beats address
        assert_eq!(classify("Av. du Port Tél: 081"), LineTag::Phone);
        // Address beats email
        assert_eq!(classify("Av. du Port 4 info@acme.cd"), LineTag::Address);
        // Email beats sector
        assert_eq!(classify("Secteur: Mines info@acme.cd"), LineTag::Email);
        // Sector beats contact name
        assert_eq!(classify("Secteur: Agronomie"), LineTag::Sector);
        assert_eq!(classify("Nom: Jean Mukendi"), LineTag::ContactName);
        assert_eq!(classify("www.acme.cd"), LineTag::SiteUrl);
        assert_eq!(classify("ACME SARL"), LineTag::LegalNameCandidate);
    }

    #[test]
    fn test_title_lines_are_noise() {
        assert_eq!(
            classify("FEDERATION DES ENTREPRISES DU CONGO Tél: 081"),
            LineTag::Noise
        );
    }

    #[test]
    fn test_matching_rule_names() {
        let classifier = LineClassifier::new(&DEFAULT_VOCABULARY);
        assert_eq!(
            classifier.matching_rule("Tél: 081").map(|r| r.name),
            Some("PhoneMarker")
        );
        assert!(classifier.matching_rule("ACME SARL").is_none());
    }
}
