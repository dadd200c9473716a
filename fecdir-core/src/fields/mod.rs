// Field parsers, one set per print layout:
// - lines.rs: loosely aligned text lines
// - table.rs: flattened table rows (2019 print run)

pub mod lines;
pub mod table;

use crate::types::{AdministrativeState, CompanyRecord, Contact, Profile};

/// Everything the parsers found for one record, before defaults are applied
#[derive(Debug, Clone, Default)]
pub struct ParsedFields {
    pub legal_name: String,
    pub sectors: Option<Vec<String>>,
    pub address: Option<String>,
    pub phones: Option<Vec<String>>,
    pub email: Option<String>,
    pub site_url: Option<String>,
    pub contact_name: Option<String>,
}

impl ParsedFields {
    pub fn into_record(self, state: Option<&AdministrativeState>) -> CompanyRecord {
        let phones = self.phones.unwrap_or_default();
        CompanyRecord {
            legal_name: self.legal_name,
            city: None,
            state: state.cloned(),
            sectors: self.sectors,
            address: self.address,
            contact: Contact {
                profile: Profile {
                    name: self.contact_name,
                    phone: phones.first().cloned(),
                    email: self.email.clone(),
                    social_links: None,
                },
                phones,
                email: self.email,
                site_url: self.site_url,
            },
        }
    }
}
