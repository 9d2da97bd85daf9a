use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::domain::{RawAge, RawPatientInput};

/// One usable row of a registry cohort export.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortRow {
    /// 1-based data row number, excluding the header.
    pub line: usize,
    pub input: RawPatientInput,
}

/// Parsed cohort export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CohortImport {
    pub rows: Vec<CohortRow>,
    /// Rows dropped because age, sex, or mobility was blank.
    pub skipped: usize,
}

/// Read a CSV export with `age`, `sex` and `mobility` columns.
///
/// Rows missing any of those values are skipped and counted. Registry columns
/// the estimator does not score on, such as `cogstat` or `uresidence`, may be
/// blank. Values are not validated here; that happens per row when the cohort
/// is estimated.
pub fn parse_cohort<R: Read>(reader: R) -> Result<CohortImport, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut import = CohortImport::default();

    for (index, record) in csv_reader.deserialize::<CohortCsvRow>().enumerate() {
        let row = record?;
        match (row.age, row.sex, row.mobility) {
            (Some(age), Some(sex), Some(mobility)) => import.rows.push(CohortRow {
                line: index + 1,
                input: RawPatientInput {
                    age: Some(RawAge::Text(age)),
                    gender: Some(sex),
                    pre_injury_mobility: Some(mobility),
                },
            }),
            _ => import.skipped += 1,
        }
    }

    Ok(import)
}

#[derive(Debug, Deserialize)]
struct CohortCsvRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    age: Option<String>,
    #[serde(default, alias = "gender", deserialize_with = "empty_string_as_none")]
    sex: Option<String>,
    #[serde(
        default,
        alias = "pre_injury_mobility",
        deserialize_with = "empty_string_as_none"
    )]
    mobility: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
