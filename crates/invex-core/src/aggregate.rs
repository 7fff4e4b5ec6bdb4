//! Flattening of per-document fields into records.

use crate::extract::DocumentFields;
use crate::models::record::ExtractedRecord;

/// One record per extracted value, each carrying the document's file and date.
///
/// Records follow label order, then match order within a label. A document
/// configured without labels produces no records.
pub fn aggregate(file: &str, fields: DocumentFields) -> Vec<ExtractedRecord> {
    let DocumentFields { date, values } = fields;

    values
        .into_iter()
        .flat_map(|labeled| {
            let label = labeled.label;
            labeled
                .values
                .into_iter()
                .map(move |value| (label.clone(), value))
        })
        .map(|(label, value)| ExtractedRecord {
            file: file.to_string(),
            date: date.clone(),
            label,
            value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::LabeledValues;
    use crate::models::record::{CanonicalDate, Extracted};

    fn labeled(label: &str, values: Vec<Extracted<String>>) -> LabeledValues {
        LabeledValues {
            label: label.to_string(),
            values,
        }
    }

    #[test]
    fn test_one_record_per_label() {
        let date = Extracted::Found(CanonicalDate::new(26, 11, 2016));
        let fields = DocumentFields {
            date: date.clone(),
            values: vec![
                labeled("Total", vec![Extracted::Found("123.45".to_string())]),
                labeled("VAT", vec![Extracted::NotFound]),
            ],
        };

        let records = aggregate("invoice.pdf", fields);
        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record.file, "invoice.pdf");
            assert_eq!(record.date, date);
        }
        assert_eq!(records[0].label, "Total");
        assert_eq!(records[0].value_text(), "123.45");
        assert_eq!(records[1].label, "VAT");
        assert_eq!(records[1].value_text(), "Value not found");
    }

    #[test]
    fn test_multiple_matches_keep_order() {
        let fields = DocumentFields {
            date: Extracted::NotFound,
            values: vec![labeled(
                "Total",
                vec![
                    Extracted::Found("1".to_string()),
                    Extracted::Found("2".to_string()),
                ],
            )],
        };

        let records = aggregate("a.pdf", fields);
        let values: Vec<_> = records.iter().map(|r| r.value_text()).collect();
        assert_eq!(values, vec!["1", "2"]);
        assert_eq!(records[0].date_text(), "Date not found");
    }

    #[test]
    fn test_no_labels_no_records() {
        let fields = DocumentFields {
            date: Extracted::Found(CanonicalDate::new(1, 1, 2020)),
            values: Vec::new(),
        };
        assert!(aggregate("a.pdf", fields).is_empty());
    }
}
