use crate::error::ExtractionError;
use crate::types::CompanyRecord;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Persists the records of one document
pub trait RecordSink {
    fn write(&self, destination: &Path, records: &[CompanyRecord]) -> Result<(), ExtractionError>;
}

/// Newline-delimited JSON, one record per line, no enclosing array
pub struct JsonLinesSink;

impl RecordSink for JsonLinesSink {
    fn write(&self, destination: &Path, records: &[CompanyRecord]) -> Result<(), ExtractionError> {
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ExtractionError::io(parent, e))?;
            }
        }

        let file = File::create(destination).map_err(|e| ExtractionError::io(destination, e))?;
        let mut writer = BufWriter::new(file);
        write_json_lines(&mut writer, records).map_err(|e| match e {
            JsonLinesError::Io(source) => ExtractionError::io(destination, source),
            JsonLinesError::Serialize(source) => ExtractionError::Serialize(source),
        })?;

        tracing::info!("wrote {} records to {}", records.len(), destination.display());
        Ok(())
    }
}

enum JsonLinesError {
    Io(std::io::Error),
    Serialize(serde_json::Error),
}

fn write_json_lines<W: Write>(writer: &mut W, records: &[CompanyRecord]) -> Result<(), JsonLinesError> {
    for record in records {
        serde_json::to_writer(&mut *writer, record).map_err(JsonLinesError::Serialize)?;
        writer.write_all(b"\n").map_err(JsonLinesError::Io)?;
    }
    writer.flush().map_err(JsonLinesError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AdministrativeState, Contact, Profile};

    fn company(name: &str) -> CompanyRecord {
        CompanyRecord {
            legal_name: name.to_string(),
            city: None,
            state: Some(AdministrativeState::new("Kinshasa")),
            sectors: Some(vec!["Commerce".to_string()]),
            address: None,
            contact: Contact {
                profile: Profile::default(),
                phones: vec!["081".to_string()],
                email: None,
                site_url: None,
            },
        }
    }

    #[test]
    fn test_one_json_object_per_line() {
        let mut buffer = Vec::new();
        assert!(write_json_lines(&mut buffer, &[company("ACME SARL"), company("BRALIMA SA")]).is_ok());

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(!text.starts_with('['));

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["legal_name"], "ACME SARL");
        assert_eq!(first["state"], "Kinshasa");
        assert_eq!(first["city"], serde_json::Value::Null);
    }

    #[test]
    fn test_sink_creates_missing_directory() {
        let dir = std::env::temp_dir().join(format!("fecdir_sink_{}", std::process::id()));
        let destination = dir.join("nested").join("_produced.json");

        JsonLinesSink.write(&destination, &[company("ACME SARL")]).unwrap();

        let written = fs::read_to_string(&destination).unwrap();
        assert_eq!(written.lines().count(), 1);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_empty_record_list_writes_empty_file() {
        let mut buffer = Vec::new();
        assert!(write_json_lines(&mut buffer, &[]).is_ok());
        assert!(buffer.is_empty());
    }
}
