//! CSV feed parser. Columns are located by header name, so the sheet may
//! reorder them freely. Quoted fields may contain commas.

use std::collections::HashSet;

use tracing::warn;

use crate::models::framework::{split_objectives, FrameworkRecord};

/// Column indices resolved from the header row. A missing column stays `None`
/// and every record gets an empty string for it.
#[derive(Debug, Default)]
struct Columns {
    id: Option<usize>,
    name: Option<usize>,
    synopsis: Option<usize>,
    template: Option<usize>,
    objectives: Option<usize>,
}

impl Columns {
    fn from_header(header: &csv::StringRecord) -> Self {
        let position = |key: &str| header.iter().position(|h| h.trim() == key);
        Self {
            id: position("id"),
            name: position("name"),
            synopsis: position("synopsis"),
            template: position("template"),
            objectives: position("objectives"),
        }
    }
}

fn field(row: &csv::StringRecord, column: Option<usize>) -> String {
    column
        .and_then(|idx| row.get(idx))
        .unwrap_or_default()
        .to_string()
}

/// Parses the feed body into framework records.
///
/// Short rows yield empty fields instead of failing the parse. Rows repeating
/// an earlier non-empty id are dropped so ids stay unique within one set.
pub fn parse_frameworks(text: &str) -> Vec<FrameworkRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.trim().as_bytes());

    let columns = match reader.headers() {
        Ok(header) => Columns::from_header(header),
        Err(e) => {
            warn!("CSV header unreadable: {e}");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for (line, row) in reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping unreadable CSV row {}: {e}", line + 2);
                continue;
            }
        };
        if row.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let record = FrameworkRecord {
            id: field(&row, columns.id),
            name: field(&row, columns.name),
            synopsis: field(&row, columns.synopsis),
            template: field(&row, columns.template),
            objectives: split_objectives(&field(&row, columns.objectives)),
        };

        // Rows without an id are kept; only a repeated non-empty id is dropped.
        if !record.id.is_empty() && !seen.insert(record.id.clone()) {
            warn!("Duplicate framework id '{}' dropped", record.id);
            continue;
        }
        records.push(record);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = "id,name,synopsis,template,objectives\n\
        pas,Problem Agitate Solve,Classic three-step,\"Problem: {keyword}, agitated\",Sales|Email\n\
        aida,AIDA,\"Attention, Interest, Desire, Action\",Look at {keyword},Sales|Ads\n\
        bab,Before After Bridge,Transformation,Imagine {keyword},Trust\n";

    #[test]
    fn test_parse_yields_one_record_per_data_row() {
        let records = parse_frameworks(FEED);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, "pas");
        assert_eq!(records[2].name, "Before After Bridge");
    }

    #[test]
    fn test_quoted_field_with_commas_stays_single_field() {
        let records = parse_frameworks(FEED);
        assert_eq!(records[0].template, "Problem: {keyword}, agitated");
        assert_eq!(records[1].synopsis, "Attention, Interest, Desire, Action");
        assert_eq!(records[1].template, "Look at {keyword}");
        assert_eq!(records[1].objectives, vec!["Sales", "Ads"]);
    }

    #[test]
    fn test_columns_are_mapped_by_header_name() {
        let feed = "objectives,template,id,synopsis,name\r\n\
            Leads|Trust,T1,x1,S1,Name One\r\n";
        let records = parse_frameworks(feed);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.id, "x1");
        assert_eq!(r.name, "Name One");
        assert_eq!(r.synopsis, "S1");
        assert_eq!(r.template, "T1");
        assert_eq!(r.objectives, vec!["Leads", "Trust"]);
    }

    #[test]
    fn test_short_row_yields_empty_fields() {
        let feed = "id,name,synopsis,template,objectives\nonly-id,Only Name\n";
        let records = parse_frameworks(feed);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Only Name");
        assert_eq!(records[0].synopsis, "");
        assert_eq!(records[0].template, "");
        assert!(records[0].objectives.is_empty());
    }

    #[test]
    fn test_missing_column_yields_empty_fields() {
        let feed = "id,name\na,Alpha\n";
        let records = parse_frameworks(feed);
        assert_eq!(records[0].template, "");
        assert!(records[0].objectives.is_empty());
    }

    #[test]
    fn test_duplicate_ids_keep_first_row() {
        let feed = "id,name\na,First\na,Second\nb,Third\n";
        let records = parse_frameworks(feed);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "First");
        assert_eq!(records[1].id, "b");
    }

    #[test]
    fn test_blank_ids_are_not_collapsed() {
        let records = parse_frameworks("id,name\n,Alpha\n,Beta\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Alpha");
        assert_eq!(records[1].name, "Beta");
    }

    #[test]
    fn test_missing_id_column_keeps_every_row() {
        let records = parse_frameworks("name,objectives\nAlpha,Sales\nBeta,Trust\n");
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.id.is_empty()));
        assert_eq!(records[1].objectives, vec!["Trust"]);
    }

    #[test]
    fn test_doubled_quote_is_literal() {
        let records = parse_frameworks("id,name,template\nq,Quote,\"Say \"\"hi\"\", ok\"\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].template, "Say \"hi\", ok");
    }

    #[test]
    fn test_blank_lines_and_surrounding_whitespace_ignored() {
        let feed = "\n  id,name\na,Alpha\n\nb,Beta\n\n  ";
        let records = parse_frameworks(feed);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_header_only_yields_nothing() {
        assert!(parse_frameworks("id,name,synopsis,template,objectives").is_empty());
        assert!(parse_frameworks("").is_empty());
    }
}
