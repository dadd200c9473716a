use crate::classifier::LineClassifier;
use crate::config::Vocabulary;
use crate::fields::{lines, table, ParsedFields};
use crate::types::{AdministrativeState, CompanyRecord, RawRecord};

/// Turns a raw record into the output schema.
///
/// The legal name is resolved first; a record without one is discarded here
/// and nowhere else.
pub trait RecordAssembler {
    fn assemble(
        &self,
        raw: &RawRecord,
        state: Option<&AdministrativeState>,
    ) -> Option<CompanyRecord>;
}

pub struct LineRecordAssembler<'a> {
    classifier: LineClassifier<'a>,
}

impl<'a> LineRecordAssembler<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self {
            classifier: LineClassifier::new(vocabulary),
        }
    }
}

impl<'a> RecordAssembler for LineRecordAssembler<'a> {
    fn assemble(
        &self,
        raw: &RawRecord,
        state: Option<&AdministrativeState>,
    ) -> Option<CompanyRecord> {
        let record_lines = raw.lines();
        let legal_name = lines::parse_legal_name(&self.classifier, record_lines)?;
        let (email, site_url) = lines::parse_web(record_lines);

        let fields = ParsedFields {
            legal_name,
            sectors: lines::parse_sectors(record_lines),
            address: lines::parse_address(&self.classifier, record_lines),
            phones: lines::parse_phones(record_lines),
            email,
            site_url,
            contact_name: lines::parse_contact_name(&self.classifier, record_lines),
        };
        Some(fields.into_record(state))
    }
}

pub struct TableRecordAssembler<'a> {
    vocabulary: &'a Vocabulary,
}

impl<'a> TableRecordAssembler<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self { vocabulary }
    }
}

impl<'a> RecordAssembler for TableRecordAssembler<'a> {
    fn assemble(
        &self,
        raw: &RawRecord,
        state: Option<&AdministrativeState>,
    ) -> Option<CompanyRecord> {
        let rows = raw.lines();
        let legal_name = table::parse_legal_name(self.vocabulary, rows)?;
        let (email, site_url) = table::parse_web(rows);

        let fields = ParsedFields {
            legal_name,
            sectors: table::parse_sectors(rows),
            address: table::parse_address(self.vocabulary, rows),
            phones: table::parse_phones(rows),
            email,
            site_url,
            contact_name: table::parse_contact_name(self.vocabulary, rows),
        };
        Some(fields.into_record(state))
    }
}
