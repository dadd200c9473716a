use crate::classifier::LineClassifier;
use crate::config::Vocabulary;
use crate::text::{has_token, phone_marker_index, web_token_index};
use crate::types::{LineTag, RawRecord, TableRow};

/// Groups a page's lines into raw records.
///
/// A record closes on its sector line. Whatever is still open when the page
/// ends is dropped: records are never carried across pages.
pub struct LineSegmenter<'a> {
    classifier: LineClassifier<'a>,
    min_fragment_len: usize,
}

impl<'a> LineSegmenter<'a> {
    pub fn new(vocabulary: &'a Vocabulary, min_fragment_len: usize) -> Self {
        Self {
            classifier: LineClassifier::new(vocabulary),
            min_fragment_len,
        }
    }

    pub fn segment(&self, lines: &[String]) -> Vec<RawRecord> {
        let mut records = Vec::new();
        let mut current = RawRecord::new();
        let mut index = 0;

        while index < lines.len() {
            let line = lines[index].trim();
            index += 1;

            if self.is_layout_artifact(line) {
                continue;
            }

            match self.classifier.classify(line) {
                LineTag::Noise => continue,
                LineTag::Sector => {
                    current.push(line);
                    if let Some(next) = lines.get(index).map(|l| l.trim()) {
                        if self.is_sector_continuation(next) {
                            current.push(next);
                            index += 1;
                        }
                    }
                    records.push(std::mem::take(&mut current));
                }
                tag => {
                    for fragment in split_fused_line(line, tag) {
                        current.push(fragment);
                    }
                }
            }
        }

        if !current.is_empty() {
            tracing::debug!(
                "dropping unterminated record at page end ({} lines)",
                current.len()
            );
        }

        records
    }

    /// Page numbers, stray letters and blank lines
    fn is_layout_artifact(&self, line: &str) -> bool {
        line.is_empty()
            || (line.chars().count() < self.min_fragment_len
                && !line.contains(char::is_whitespace))
    }

    /// A sector description wrapped onto the following source line
    fn is_sector_continuation(&self, next: &str) -> bool {
        if next.is_empty() || self.classifier.classify(next) == LineTag::Noise {
            return false;
        }
        next.to_lowercase().contains("www") || has_token(next, "des") || has_token(next, "et")
    }
}

/// Split lines where the print layout fused two fields together:
/// `name Tél: …` and `address email www…`
fn split_fused_line(line: &str, tag: LineTag) -> Vec<&str> {
    let split_at = match tag {
        LineTag::Phone => phone_marker_index(line),
        LineTag::Address => web_token_index(line),
        _ => None,
    };

    match split_at {
        Some(index) if index > 0 && !line[..index].trim().is_empty() => {
            vec![line[..index].trim(), line[index..].trim()]
        }
        _ => vec![line],
    }
}

/// Groups table rows into raw records, one flattened row per line
pub struct TableSegmenter<'a> {
    vocabulary: &'a Vocabulary,
}

impl<'a> TableSegmenter<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn segment_rows(&self, rows: &[TableRow]) -> Vec<RawRecord> {
        let mut records = Vec::new();
        let mut current = RawRecord::new();

        for row in rows {
            let Some(line) = flatten_row(row) else {
                continue;
            };
            if self.vocabulary.is_noise(&line) {
                continue;
            }

            current.push(&line);
            if line.to_lowercase().contains("secteur") {
                records.push(std::mem::take(&mut current));
            }
        }

        if !current.is_empty() {
            tracing::debug!(
                "dropping unterminated table record at page end ({} rows)",
                current.len()
            );
        }

        records
    }
}

/// Join the filled cells of a row with ` | `; `None` for an empty row
pub fn flatten_row(row: &TableRow) -> Option<String> {
    let cells: Vec<&str> = row
        .iter()
        .flatten()
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .collect();
    if cells.is_empty() {
        None
    } else {
        Some(cells.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_VOCABULARY;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn segmenter() -> LineSegmenter<'static> {
        LineSegmenter::new(&DEFAULT_VOCABULARY, 4)
    }

    #[test]
    fn test_sector_line_closes_record() {
        let page = lines(&[
            "ACME SARL",
            "12, Av. du Commerce",
            "Tél: 081-234-5678",
            "Secteur: Commerce Import",
            "BRALIMA SA",
            "Secteur: Brasserie Boissons",
        ]);
        let records = segmenter().segment(&page);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].len(), 4);
        assert_eq!(records[1].lines()[0], "BRALIMA SA");
    }

    #[test]
    fn test_trailing_open_record_is_dropped() {
        let page = lines(&["ACME SARL", "Secteur: Mines Carrières", "BRALIMA SA", "Tél: 099"]);
        let records = segmenter().segment(&page);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_artifacts_and_titles_are_skipped() {
        let page = lines(&[
            "12",
            "FEDERATION DES ENTREPRISES DU CONGO",
            "ACME SARL",
            "Secteur: Commerce Import",
        ]);
        let records = segmenter().segment(&page);
        assert_eq!(records[0].lines(), &["ACME SARL", "Secteur: Commerce Import"]);
    }

    #[test]
    fn test_fused_name_and_phone_are_split() {
        let page = lines(&["ACME SARL Tél: 081", "Secteur: Commerce Import"]);
        let records = segmenter().segment(&page);
        assert_eq!(
            records[0].lines(),
            &["ACME SARL", "Tél: 081", "Secteur: Commerce Import"]
        );
    }

    #[test]
    fn test_fused_address_and_web_are_split() {
        let page = lines(&[
            "ACME SARL",
            "Av. du Port 4 info@acme.cd www.acme.cd",
            "Secteur: Commerce Import",
        ]);
        let records = segmenter().segment(&page);
        assert_eq!(records[0].lines()[1], "Av. du Port 4");
        assert_eq!(records[0].lines()[2], "info@acme.cd www.acme.cd");
    }

    #[test]
    fn test_duplicate_fragments_keep_first() {
        let page = lines(&[
            "ACME SARL",
            "ACME",
            "Tél: 081",
            "Tél: 081 - 099",
            "Secteur: Commerce Import",
        ]);
        let records = segmenter().segment(&page);
        assert_eq!(
            records[0].lines(),
            &["ACME SARL", "Tél: 081", "Secteur: Commerce Import"]
        );
    }

    #[test]
    fn test_sector_continuation_is_absorbed() {
        let page = lines(&[
            "ACME SARL",
            "Secteur: Commerce Import",
            "et distribution des produits",
            "BRALIMA SA",
            "Secteur: Brasserie Boissons",
        ]);
        let records = segmenter().segment(&page);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].lines()[2], "et distribution des produits");
        assert_eq!(records[1].lines()[0], "BRALIMA SA");
    }

    #[test]
    fn test_sector_continuation_on_site_line() {
        let page = lines(&[
            "ACME SARL",
            "Secteur: Commerce Import",
            "www.acme.cd",
            "BRALIMA SA",
            "Secteur: Brasserie Boissons",
        ]);
        let records = segmenter().segment(&page);
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].lines(),
            &["ACME SARL", "Secteur: Commerce Import", "www.acme.cd"]
        );
        assert_eq!(records[1].lines()[0], "BRALIMA SA");
    }

    #[test]
    fn test_noise_is_never_a_sector_continuation() {
        let page = lines(&[
            "ACME SARL",
            "Secteur: Commerce Import",
            "Fédération des Entreprises du Congo",
            "BRALIMA SA",
            "Secteur: Brasserie Boissons",
        ]);
        let records = segmenter().segment(&page);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].len(), 2);
    }

    #[test]
    fn test_table_noise_rows_are_skipped() {
        let rows: Vec<TableRow> = vec![
            vec![Some("FEDERATION DES ENTREPRISES DU CONGO".into()), None],
            vec![Some("ACME SARL".into()), Some("Av. du Port 4".into())],
            vec![None, Some("Annuaire des membres 2019".into())],
            vec![Some("Secteur: Commerce".into()), Some("info@acme.cd".into())],
        ];
        let records = TableSegmenter::new(&DEFAULT_VOCABULARY).segment_rows(&rows);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].lines(),
            &["ACME SARL | Av. du Port 4", "Secteur: Commerce | info@acme.cd"]
        );
    }

    #[test]
    fn test_table_rows_close_on_sector() {
        let rows: Vec<TableRow> = vec![
            vec![Some("ACME SARL".into()), None, Some("Av. du Port 4".into())],
            vec![None, None],
            vec![Some("Nom: Jean".into()), Some("Tel: 081".into())],
            vec![Some("Secteur: Commerce".into()), Some("info@acme.cd".into())],
            vec![Some("BRALIMA SA".into())],
        ];
        let records = TableSegmenter::new(&DEFAULT_VOCABULARY).segment_rows(&rows);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].lines(),
            &[
                "ACME SARL | Av. du Port 4",
                "Nom: Jean | Tel: 081",
                "Secteur: Commerce | info@acme.cd"
            ]
        );
    }
}
