use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, StringRecord};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{DashboardError, Result};
use crate::models::Record;

/// One row as it appears in the source table. Every column is optional so
/// that absent or extra columns never fail deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    pub person_uuid: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub article_uuid: Option<String>,
    pub title: Option<String>,
    pub publication_year: Option<String>,
    pub doi: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub journal_title: Option<String>,
    pub journal_issn: Option<String>,
    pub is_sustain: Option<String>,
    #[serde(rename = "top 1")]
    pub top_1: Option<String>,
    #[serde(rename = "top 2")]
    pub top_2: Option<String>,
    #[serde(rename = "top 3")]
    pub top_3: Option<String>,
    #[serde(rename = "Financial Times")]
    pub financial_times: Option<String>,
    #[serde(rename = "UT Dallas")]
    pub ut_dallas: Option<String>,
    #[serde(rename = "General Business")]
    pub general_business: Option<String>,
    pub active: Option<String>,
}

impl RawRow {
    /// Builds a row from a column-name to value mapping, using the exact
    /// external column names.
    pub fn from_map(columns: &HashMap<String, String>) -> Self {
        let get = |key: &str| columns.get(key).cloned();
        Self {
            person_uuid: get("person_uuid"),
            name: get("name"),
            email: get("email"),
            department: get("department"),
            article_uuid: get("article_uuid"),
            title: get("title"),
            publication_year: get("publication_year"),
            doi: get("doi"),
            abstract_text: get("abstract"),
            journal_title: get("journal_title"),
            journal_issn: get("journal_issn"),
            is_sustain: get("is_sustain"),
            top_1: get("top 1"),
            top_2: get("top 2"),
            top_3: get("top 3"),
            financial_times: get("Financial Times"),
            ut_dallas: get("UT Dallas"),
            general_business: get("General Business"),
            active: get("active"),
        }
    }

    /// Converts the row into a [`Record`], or `None` when either identifier
    /// is missing.
    pub fn into_record(self) -> Option<Record> {
        let person_uuid = self.person_uuid.filter(|value| !value.is_empty())?;
        let article_uuid = self.article_uuid.filter(|value| !value.is_empty())?;

        Some(Record {
            person_uuid,
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            department: self.department.unwrap_or_default(),
            article_uuid,
            title: self.title.unwrap_or_default(),
            publication_year: self.publication_year.unwrap_or_default(),
            doi: self.doi.unwrap_or_default(),
            abstract_text: self.abstract_text.unwrap_or_default(),
            journal_title: self.journal_title.unwrap_or_default(),
            journal_issn: self.journal_issn.unwrap_or_default(),
            is_sustain: coerce_int(self.is_sustain.as_deref()),
            goals: [
                coerce_int(self.top_1.as_deref()),
                coerce_int(self.top_2.as_deref()),
                coerce_int(self.top_3.as_deref()),
            ],
            financial_times: self.financial_times.unwrap_or_default(),
            ut_dallas: self.ut_dallas.unwrap_or_default(),
            general_business: self.general_business.unwrap_or_default(),
            active: self.active.unwrap_or_default(),
        })
    }
}

/// Reads the leading integer of `value`: optional whitespace, an optional
/// sign, then digits up to the first non-digit. Anything without a leading
/// digit run yields `None`.
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let run: &str = {
        let end = digits
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(index, _)| index)
            .unwrap_or(digits.len());
        &digits[..end]
    };
    if run.is_empty() {
        return None;
    }

    let magnitude = run.bytes().fold(0i64, |acc, digit| {
        acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

fn coerce_int(value: Option<&str>) -> i64 {
    value.and_then(parse_leading_int).unwrap_or(0)
}

/// Converts raw rows into records, silently dropping rows without a faculty
/// or article identifier.
pub fn parse_records<I>(rows: I) -> Vec<Record>
where
    I: IntoIterator<Item = RawRow>,
{
    rows.into_iter().filter_map(RawRow::into_record).collect()
}

/// Invalid UTF-8 sequences become U+FFFD instead of failing the row.
fn lossy_record(record: &ByteRecord) -> StringRecord {
    record.iter().map(String::from_utf8_lossy).collect()
}

/// Reads a headered CSV table. Text is decoded lossily, and rows that lack
/// identifiers are skipped; only I/O or header failures are errors.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);
    let headers = lossy_record(reader.byte_headers().map_err(DashboardError::Header)?);

    let mut records = Vec::new();
    let mut undecodable = 0usize;
    let mut dropped = 0usize;
    let mut fields = ByteRecord::new();
    let mut line = 1usize;

    while reader.read_byte_record(&mut fields).map_err(DashboardError::Read)? {
        line += 1;
        let row = match lossy_record(&fields).deserialize::<RawRow>(Some(&headers)) {
            Ok(row) => row,
            Err(err) => {
                debug!(line, error = %err, "skipping undecodable row");
                undecodable += 1;
                continue;
            }
        };
        match row.into_record() {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    debug!(
        kept = records.len(),
        dropped, undecodable, "parsed article records"
    );
    Ok(records)
}

pub fn load_csv(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path).map_err(|source| DashboardError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_records(file)?;
    info!(path = %path.display(), records = records.len(), "loaded dataset");
    Ok(records)
}

/// Columns that filter option lists are built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueField {
    Department,
    PublicationYear,
}

/// Sorted distinct non-blank values of `field`.
pub fn distinct_values(records: &[Record], field: ValueField) -> Vec<String> {
    records
        .iter()
        .map(|record| match field {
            ValueField::Department => record.department.as_str(),
            ValueField::PublicationYear => record.publication_year.as_str(),
        })
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(person: &str, article: &str) -> RawRow {
        RawRow {
            person_uuid: Some(person.to_string()),
            article_uuid: Some(article.to_string()),
            ..RawRow::default()
        }
    }

    #[test]
    fn leading_int_follows_lenient_rules() {
        assert_eq!(parse_leading_int("3"), Some(3));
        assert_eq!(parse_leading_int("  12abc"), Some(12));
        assert_eq!(parse_leading_int("3.0"), Some(3));
        assert_eq!(parse_leading_int("-4"), Some(-4));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
    }

    #[test]
    fn drops_rows_without_identifiers() {
        let rows = vec![
            row("p1", "a1"),
            row("", "a2"),
            row("p3", ""),
            RawRow::default(),
        ];
        let records = parse_records(rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].article_uuid, "a1");
    }

    #[test]
    fn coerces_numeric_fields_with_zero_default() {
        let mut raw = row("p1", "a1");
        raw.is_sustain = Some("1".to_string());
        raw.top_1 = Some("7".to_string());
        raw.top_2 = Some("n/a".to_string());
        raw.top_3 = None;

        let record = raw.into_record().expect("valid row");
        assert!(record.is_sustainable());
        assert_eq!(record.goals, [7, 0, 0]);
        assert_eq!(record.title, "");
        assert_eq!(record.ut_dallas, "");
    }

    #[test]
    fn from_map_uses_external_column_names() {
        let mut columns = HashMap::new();
        columns.insert("person_uuid".to_string(), "p1".to_string());
        columns.insert("article_uuid".to_string(), "a1".to_string());
        columns.insert("top 2".to_string(), "13".to_string());
        columns.insert("UT Dallas".to_string(), "1".to_string());
        columns.insert("abstract".to_string(), "Carbon markets".to_string());
        columns.insert("unrelated".to_string(), "ignored".to_string());

        let record = RawRow::from_map(&columns).into_record().expect("valid row");
        assert_eq!(record.goals, [0, 13, 0]);
        assert!(record.is_top_journal());
        assert_eq!(record.abstract_text, "Carbon markets");
    }

    #[test]
    fn reads_csv_with_missing_and_extra_columns() {
        let data = "person_uuid,article_uuid,is_sustain,top 1,extra\n\
                    p1,a1,1,3,x\n\
                    ,a2,1,4,x\n\
                    p2,a3,oops,,x\n";
        let records = read_records(data.as_bytes()).expect("readable csv");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].goals, [3, 0, 0]);
        assert_eq!(records[1].is_sustain, 0);
        assert_eq!(records[1].department, "");
    }

    #[test]
    fn invalid_utf8_is_replaced_instead_of_dropping_the_row() {
        let data: &[u8] = b"person_uuid,article_uuid,abstract,is_sustain,top 1\n\
                            p1,A1,Caf\xE9 study,1,7\n\
                            p2,A2,Plain,0,0\n";
        let records = read_records(data).expect("readable csv");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].article_uuid, "A1");
        assert_eq!(records[0].abstract_text, "Caf\u{FFFD} study");
        assert_eq!(records[0].goals, [7, 0, 0]);
        assert_eq!(records[1].abstract_text, "Plain");
    }

    #[test]
    fn distinct_values_are_sorted_and_skip_blanks() {
        let mut first = row("p1", "a1");
        first.department = Some("Finance".to_string());
        first.publication_year = Some("2021".to_string());
        let mut second = row("p2", "a2");
        second.department = Some("Accounting".to_string());
        second.publication_year = Some("2019".to_string());
        let mut third = row("p3", "a3");
        third.department = Some("  ".to_string());
        third.publication_year = Some("2021".to_string());

        let records = parse_records(vec![first, second, third]);
        assert_eq!(
            distinct_values(&records, ValueField::Department),
            vec!["Accounting".to_string(), "Finance".to_string()]
        );
        assert_eq!(
            distinct_values(&records, ValueField::PublicationYear),
            vec!["2019".to_string(), "2021".to_string()]
        );
    }
}
