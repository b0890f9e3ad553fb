pub mod generate;
pub mod types;

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

pub use self::types::Record;

/// Load the company table from a CSV file with `company,parent,root` headers.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    let records = read_records(file)
        .with_context(|| format!("Failed to parse CSV file: {}", path.display()))?;
    tracing::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse records from any reader. Columns are matched by header name, so
/// their order in the file does not matter.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<Record>().enumerate() {
        // +2: one for the header line, one for 1-based numbering
        let record = row.with_context(|| format!("Failed to read row {}", idx + 2))?;
        records.push(record);
    }

    Ok(records)
}

/// Write records as CSV with a `company,parent,root` header.
pub fn write_records<W: Write>(writer: W, records: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write records to a file path.
pub fn save_records(path: &Path, records: &[Record]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    write_records(file, records)?;
    tracing::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_matched_by_header_name() {
        let csv = "root,company,parent\nR,A,\nR,B,A\n";
        let records = read_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].company, "A");
        assert_eq!(records[0].parent_id(), None);
        assert_eq!(records[1].parent_id(), Some("A"));
        assert_eq!(records[1].root, "R");
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv = "company,parent\nA,\n";
        assert!(read_records(csv.as_bytes()).is_err());
    }

    #[test]
    fn fields_are_trimmed() {
        let csv = "company,parent,root\n  A , , R \n";
        let records = read_records(csv.as_bytes()).unwrap();
        assert_eq!(records[0].company, "A");
        assert_eq!(records[0].root, "R");
        assert_eq!(records[0].parent_id(), None);
    }

    #[test]
    fn written_table_reads_back() {
        let records = vec![
            Record::new("Acme", None, "Acme"),
            Record::new("Acme Labs", Some("Acme"), "Acme"),
        ];
        let mut buf = Vec::new();
        write_records(&mut buf, &records).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("company,parent,root"));
        assert_eq!(read_records(buf.as_slice()).unwrap(), records);
    }
}
