use super::{OffenceCode, OffenceFlags, OffenceTable, WeightingKind};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::io::Read;

const FLAG_YES: &str = "Y";
const FLAG_NO: &str = "N";

#[derive(Debug, thiserror::Error)]
pub enum OffenceTableError {
    #[error("failed to read offence table: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed offence table: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}, field `{field}`: {message}")]
    InvalidField {
        line: u64,
        field: &'static str,
        message: String,
    },
    #[error("line {line}: duplicate offence code {code}")]
    DuplicateCode { line: u64, code: String },
    #[error("offence table contains no offence codes")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct OffenceRow {
    code: String,
    category: String,
    sub_category: String,
    violent: String,
    sexual: String,
    indecent_image: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    general_weighting: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    violent_weighting: Option<String>,
}

/// Parses a complete offence table. Any malformed cell rejects the whole
/// table; nothing is defaulted.
pub fn parse_table<R: Read>(reader: R) -> Result<OffenceTable, OffenceTableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut seen = HashSet::new();
    let mut offences = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|position| position.line()).unwrap_or(0);
        let row: OffenceRow = record.deserialize(Some(&headers))?;
        let offence = row.into_offence(line)?;

        if !seen.insert(offence.code.clone()) {
            return Err(OffenceTableError::DuplicateCode {
                line,
                code: offence.code,
            });
        }
        offences.push(offence);
    }

    if offences.is_empty() {
        return Err(OffenceTableError::Empty);
    }

    Ok(OffenceTable::from_offences(offences))
}

impl OffenceRow {
    fn into_offence(self, line: u64) -> Result<OffenceCode, OffenceTableError> {
        let code = parse_code(&self.code, line)?;
        let flags = OffenceFlags {
            violent: parse_flag(&self.violent, line, "violent")?,
            sexual: parse_flag(&self.sexual, line, "sexual")?,
            indecent_image: parse_flag(&self.indecent_image, line, "indecent_image")?,
        };

        let mut offence = OffenceCode::new(code, self.category, self.sub_category, flags);
        if let Some(raw) = self.general_weighting.as_deref() {
            let coefficient = parse_weighting(raw, line, "general_weighting")?;
            offence = offence.with_weighting(WeightingKind::General, coefficient);
        }
        if let Some(raw) = self.violent_weighting.as_deref() {
            let coefficient = parse_weighting(raw, line, "violent_weighting")?;
            offence = offence.with_weighting(WeightingKind::Violent, coefficient);
        }

        Ok(offence)
    }
}

fn parse_code(raw: &str, line: u64) -> Result<String, OffenceTableError> {
    if raw.len() == 5 && raw.bytes().all(|byte| byte.is_ascii_digit()) {
        Ok(raw.to_string())
    } else {
        Err(OffenceTableError::InvalidField {
            line,
            field: "code",
            message: format!("'{raw}' is not a 5-digit offence code"),
        })
    }
}

fn parse_flag(raw: &str, line: u64, field: &'static str) -> Result<bool, OffenceTableError> {
    match raw {
        FLAG_YES => Ok(true),
        FLAG_NO => Ok(false),
        other => Err(OffenceTableError::InvalidField {
            line,
            field,
            message: format!("'{other}' is not one of '{FLAG_YES}' or '{FLAG_NO}'"),
        }),
    }
}

fn parse_weighting(raw: &str, line: u64, field: &'static str) -> Result<f64, OffenceTableError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(OffenceTableError::InvalidField {
            line,
            field,
            message: format!("'{raw}' is not a decimal coefficient"),
        }),
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str =
        "code,category,sub_category,violent,sexual,indecent_image,general_weighting,violent_weighting\n";

    fn parse(body: &str) -> Result<OffenceTable, OffenceTableError> {
        parse_table(Cursor::new(format!("{HEADER}{body}")))
    }

    #[test]
    fn parses_flags_and_optional_weightings() {
        let table = parse(
            "00101,Homicide,Murder,Y,N,N,-0.6337,0.0\n\
             08100,Sexual,Indecent images,N,Y,Y,,\n",
        )
        .expect("table parses");

        assert_eq!(table.len(), 2);
        let murder = table.lookup("00101").expect("murder");
        assert!(murder.flags.violent);
        assert_eq!(murder.weighting(WeightingKind::General), Some(-0.6337));
        assert_eq!(murder.weighting(WeightingKind::Violent), Some(0.0));

        let images = table.lookup("08100").expect("images");
        assert!(images.flags.indecent_image && images.flags.sexual);
        assert_eq!(images.weighting(WeightingKind::General), None);
    }

    #[test]
    fn rejects_flags_outside_the_vocabulary() {
        let error = parse(
            "00101,Homicide,Murder,Y,N,N,-0.6337,0.0\n\
             02801,Theft,Shoplifting,N,yes,N,0.77,\n",
        )
        .expect_err("flag rejected");

        match error {
            OffenceTableError::InvalidField { line, field, .. } => {
                assert_eq!(line, 3);
                assert_eq!(field, "sexual");
            }
            other => panic!("expected invalid field, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_codes_and_weightings() {
        match parse("0101,Homicide,Murder,Y,N,N,,\n").expect_err("short code") {
            OffenceTableError::InvalidField { line: 2, field: "code", .. } => {}
            other => panic!("expected code error, got {other:?}"),
        }

        match parse("02801,Theft,Shoplifting,N,N,N,abc,\n").expect_err("bad weighting") {
            OffenceTableError::InvalidField {
                line: 2,
                field: "general_weighting",
                ..
            } => {}
            other => panic!("expected weighting error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_codes() {
        let error = parse(
            "02801,Theft,Shoplifting,N,N,N,0.77,\n\
             02801,Theft,Shoplifting,N,N,N,0.78,\n",
        )
        .expect_err("duplicate rejected");
        assert!(matches!(
            error,
            OffenceTableError::DuplicateCode { line: 3, .. }
        ));
    }

    #[test]
    fn rejects_empty_tables_and_missing_columns() {
        assert!(matches!(parse(""), Err(OffenceTableError::Empty)));
        let error = parse_table(Cursor::new("code,category\n02801,Theft\n")).expect_err("columns");
        assert!(matches!(error, OffenceTableError::Csv(_)));
    }
}
