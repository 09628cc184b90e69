use std::collections::HashMap;

/// Header-indexed rows split out of a comma separated export.
///
/// Splitting is naive: a quoted field that contains a comma still splits on
/// that comma, so later columns of the row shift to the right. Quote
/// characters are stripped from every value.
#[derive(Clone, Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    column_by_header: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

/// A read-only view of one row.
#[derive(Clone, Copy, Debug)]
pub struct Record<'a> {
    table: &'a Table,
    values: &'a [String],
}

impl Record<'_> {
    /// Value of `key` in this row, or `""` for unknown columns.
    pub fn get(&self, key: &str) -> &str {
        self.table
            .column_by_header
            .get(key)
            .and_then(|&column| self.values.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Like [`Record::get`] but treats an empty value as absent.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        Some(self.get(key)).filter(|value| !value.is_empty())
    }
}

impl Table {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |values| Record {
            table: self,
            values,
        })
    }
}

fn clean_field(raw: &str) -> String {
    raw.trim().replace('"', "")
}

pub fn parse_table(text: &str) -> Table {
    let mut lines = text.split('\n');
    let headers = lines
        .next()
        .map(|line| line.split(',').map(clean_field).collect::<Vec<_>>())
        .unwrap_or_default();

    let mut column_by_header = HashMap::with_capacity(headers.len());
    for (column, header) in headers.iter().enumerate() {
        column_by_header.insert(header.clone(), column);
    }

    let rows = lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut values = line.split(',').map(clean_field).collect::<Vec<_>>();
            values.resize(headers.len(), String::new());
            values
        })
        .collect::<Vec<_>>();

    Table {
        headers,
        column_by_header,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_rows_by_header() {
        let table = parse_table("firstName,lastName\nAda,Lovelace\nAlan,Turing\n");
        assert_eq!(table.headers(), ["firstName", "lastName"]);
        assert_eq!(table.len(), 2);

        let names = table
            .records()
            .map(|record| format!("{} {}", record.get("firstName"), record.get("lastName")))
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Ada Lovelace", "Alan Turing"]);
    }

    #[test]
    fn trims_values_and_strips_quotes() {
        let table = parse_table("\"name\" , city\r\n \"Ada\" ,  London \r\n");
        let record = table.records().next().unwrap();
        assert_eq!(record.get("name"), "Ada");
        assert_eq!(record.get("city"), "London");
    }

    #[test]
    fn short_rows_are_padded_and_long_rows_truncated() {
        let table = parse_table("a,b,c\n1\n1,2,3,4\n");
        let records = table.records().collect::<Vec<_>>();
        assert_eq!(records[0].get("a"), "1");
        assert_eq!(records[0].get("b"), "");
        assert_eq!(records[0].non_empty("c"), None);
        assert_eq!(records[1].get("c"), "3");
        assert_eq!(records[1].get("missing"), "");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let table = parse_table("a\n\n   \nx\n\n");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn empty_and_header_only_inputs_have_no_rows() {
        assert!(parse_table("").is_empty());
        assert!(parse_table("firstName,lastName").is_empty());
        assert!(parse_table("firstName,lastName\n").is_empty());
    }

    #[test]
    fn quoted_commas_misalign_columns() {
        let table = parse_table("name,city\n\"Lovelace, Ada\",London\n");
        let record = table.records().next().unwrap();
        assert_eq!(record.get("name"), "Lovelace");
        assert_eq!(record.get("city"), "Ada");
    }

    #[test]
    fn duplicate_headers_resolve_to_last_column() {
        let table = parse_table("a,a\n1,2\n");
        assert_eq!(table.records().next().unwrap().get("a"), "2");
    }
}
