use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::info;

use super::models::ConceptRecord;
use crate::core::error::Result;


/// Reads concept records from a JSON array:
/// `[{"id": "...", "pref_labels": [...], "alt_labels": [...], "broader": [...]}]`.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<ConceptRecord>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let records: Vec<ConceptRecord> = serde_json::from_reader(reader)?;

    let relations: usize = records.iter().map(|r| r.broader.len()).sum();
    info!(
        "Loaded {} concept records and {} relations from {}",
        records.len(),
        relations,
        path.display()
    );
    Ok(records)
}


pub fn parse_records(json: &str) -> Result<Vec<ConceptRecord>> {
    Ok(serde_json::from_str(json)?)
}
