use crate::model::mapping::dedupe;
use crate::model::value::{is_null_marker, parse_date, parse_number};
use crate::model::{Amount, ColumnKind, Header, Mapping, Value, AMOUNT};
use crate::{utils, Result};
use anyhow::{bail, Context};
use chrono::Datelike;
use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// The disclosure date column. When present it is parsed and a year column is derived from it.
pub const DISCLOSURE_DATE: &str = "fecha_divulgada";

/// The derived approval year column.
pub const YEAR: &str = "Año";

/// One column of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    name: Header,
    kind: ColumnKind,
    values: Vec<Value>,
}

impl Series {
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    fn from_raw(name: Header, raw: Vec<String>) -> Self {
        let numeric = raw
            .iter()
            .filter(|s| !is_null_marker(s))
            .all(|s| parse_number(s).is_some());

        let (kind, values) = if numeric {
            let values = raw
                .iter()
                .map(|s| match parse_number(s) {
                    Some(n) if !is_null_marker(s) => Value::Number(n),
                    _ => Value::Null,
                })
                .collect();
            (ColumnKind::Number, values)
        } else {
            let values = raw
                .into_iter()
                .map(|s| {
                    if is_null_marker(&s) {
                        Value::Null
                    } else {
                        Value::Text(s)
                    }
                })
                .collect();
            (ColumnKind::Text, values)
        };

        Self { name, kind, values }
    }
}

/// The full table of investment projects, in file order.
///
/// Columns are stored one `Series` at a time, the way a data-frame holds them. A `Dataset` is never
/// mutated after it has been loaded; it is shared read-only by every chart and by the controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    mapping: Mapping,
    series: Vec<Series>,
    len: usize,
}

impl Dataset {
    /// Reads the CSV file at `path`. A missing or unreadable file is an error.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = utils::read(path).await?;
        let dataset = Self::from_reader(bytes.as_slice())
            .with_context(|| format!("Failed to load dataset from {}", path.display()))?;
        info!(
            "Loaded {} projects with {} columns from {}",
            dataset.len(),
            dataset.width(),
            path.display()
        );
        if let Ok(amounts) = dataset.amounts(AMOUNT) {
            let negative = amounts.iter().flatten().filter(|a| a.is_negative()).count();
            if negative > 0 {
                warn!("{negative} projects have a negative '{AMOUNT}'");
            }
        }
        Ok(dataset)
    }

    /// Parses CSV data with a header row. Rows shorter than the header are padded with missing
    /// values; longer rows are an error.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let mapping = Mapping::new(dedupe(
            rdr.headers()
                .context("Unable to read the header row")?
                .iter()
                .map(|h| h.trim().to_string()),
        ))?;
        if mapping.is_empty() {
            bail!("An empty header row cannot be parsed into a Dataset");
        }

        let width = mapping.len();
        let mut raw: Vec<Vec<String>> = vec![Vec::new(); width];
        for (row_ix, result) in rdr.records().enumerate() {
            let record = result.with_context(|| format!("Unable to read row {}", row_ix + 2))?;
            if record.len() > width {
                bail!(
                    "A row longer than the headers list was encountered at row {}",
                    row_ix + 2
                );
            }
            for (col_ix, column) in raw.iter_mut().enumerate() {
                column.push(record.get(col_ix).unwrap_or_default().to_string());
            }
        }

        let len = raw.first().map(Vec::len).unwrap_or_default();
        let series = mapping
            .headers()
            .iter()
            .cloned()
            .zip(raw)
            .map(|(name, values)| Series::from_raw(name, values))
            .collect();

        let mut dataset = Self {
            mapping,
            series,
            len,
        };
        dataset.derive_year()?;
        Ok(dataset)
    }

    /// Parses the disclosure date column and derives the year column from it. Cells that do not
    /// parse become missing dates with a missing year.
    fn derive_year(&mut self) -> Result<()> {
        let Some(ix) = self.mapping.index(DISCLOSURE_DATE) else {
            debug!("No '{DISCLOSURE_DATE}' column, the '{YEAR}' column will not be derived");
            return Ok(());
        };

        let mut unparsed = 0usize;
        let dates: Vec<Value> = self.series[ix]
            .values
            .iter()
            .map(|value| {
                let raw = match value {
                    Value::Null => return Value::Null,
                    Value::Text(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Date(d) => return Value::Date(*d),
                };
                match parse_date(&raw) {
                    Some(d) => Value::Date(d),
                    None => {
                        unparsed += 1;
                        Value::Null
                    }
                }
            })
            .collect();
        if unparsed > 0 {
            debug!("{unparsed} '{DISCLOSURE_DATE}' cells could not be parsed as dates");
        }

        let years: Vec<Value> = dates
            .iter()
            .map(|d| match d.as_date() {
                Some(d) => Value::Number(Decimal::from(d.year())),
                None => Value::Null,
            })
            .collect();

        self.series[ix].kind = ColumnKind::Date;
        self.series[ix].values = dates;

        let year = Series {
            name: Header::from(YEAR),
            kind: ColumnKind::Number,
            values: years,
        };
        match self.mapping.index(YEAR) {
            Some(existing) => self.series[existing] = year,
            None => {
                self.mapping.push(YEAR)?;
                self.series.push(year);
            }
        }
        Ok(())
    }

    /// The number of rows.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of columns.
    pub fn width(&self) -> usize {
        self.series.len()
    }

    pub fn headers(&self) -> &[Header] {
        self.mapping.headers()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.mapping.index(name).is_some()
    }

    pub fn columns(&self) -> &[Series] {
        &self.series
    }

    /// Looks up a column by name. An absent column is a schema mismatch and an error.
    pub fn series(&self, name: &str) -> Result<&Series> {
        match self.mapping.index(name) {
            Some(ix) => Ok(&self.series[ix]),
            None => bail!("Column '{name}' was not found in the dataset"),
        }
    }

    /// The values of `name` as grouping labels, `None` where the cell is missing.
    pub fn labels(&self, name: &str) -> Result<Vec<Option<String>>> {
        Ok(self
            .series(name)?
            .values
            .iter()
            .map(|v| v.label().map(|s| s.into_owned()))
            .collect())
    }

    /// The values of the numeric column `name`, `None` where the cell is missing.
    pub fn amounts(&self, name: &str) -> Result<Vec<Option<Amount>>> {
        let series = self.series(name)?;
        if series.kind != ColumnKind::Number {
            bail!("Column '{name}' is not numeric, it holds {} data", series.kind);
        }
        Ok(series.values.iter().map(Value::as_amount).collect())
    }

    /// The derived approval year of each row.
    pub fn years(&self) -> Result<Vec<Option<i32>>> {
        Ok(self.series(YEAR)?.values.iter().map(Value::as_year).collect())
    }

    /// Iterates the rows, each row yielding its cells in column order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.len).map(move |row| self.series.iter().map(|s| &s.values[row]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{write_csv, PROJECTS_CSV};
    use std::str::FromStr;

    #[test]
    fn test_without_date_column() {
        let csv = "pais,estado,total_inversion_ifc_aprobada_junta_millones_usd\n\
                   Peru,Active,10\n\
                   Kenya,Completed,5.5\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.width(), 3);
        assert!(!dataset.has_column(YEAR));
        assert!(dataset.years().is_err());
    }

    #[test]
    fn test_year_is_derived_from_dates() {
        let csv = "pais,fecha_divulgada\n\
                   Peru,2015-03-01\n\
                   Kenya,2019-11-20T10:00:00\n\
                   Chile,\n\
                   India,not a date\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.width(), 3);
        assert_eq!(dataset.headers().last().unwrap().as_ref(), YEAR);
        assert_eq!(
            dataset.series(DISCLOSURE_DATE).unwrap().kind(),
            ColumnKind::Date
        );
        assert_eq!(
            dataset.years().unwrap(),
            vec![Some(2015), Some(2019), None, None]
        );
    }

    #[test]
    fn test_existing_year_column_is_replaced() {
        let csv = "Año,fecha_divulgada\n1999,2021-01-01\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.width(), 2);
        assert_eq!(dataset.years().unwrap(), vec![Some(2021)]);
    }

    #[test]
    fn test_column_kinds() {
        let dataset = Dataset::from_reader(PROJECTS_CSV.as_bytes()).unwrap();
        assert_eq!(dataset.series("pais").unwrap().kind(), ColumnKind::Text);
        assert_eq!(
            dataset
                .series("total_inversion_ifc_aprobada_junta_millones_usd")
                .unwrap()
                .kind(),
            ColumnKind::Number
        );
        assert!(dataset.amounts("pais").is_err());
    }

    #[test]
    fn test_missing_cells_are_null() {
        let csv = "pais,monto\nPeru,\nKenya,NaN\n,3\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(
            dataset.amounts("monto").unwrap(),
            vec![None, None, Some(Amount::from_str("3").unwrap())]
        );
        assert_eq!(
            dataset.labels("pais").unwrap(),
            vec![Some("Peru".to_string()), Some("Kenya".to_string()), None]
        );
    }

    #[test]
    fn test_short_rows_are_padded_and_long_rows_rejected() {
        let short = "a,b,c\n1,2\n";
        let dataset = Dataset::from_reader(short.as_bytes()).unwrap();
        assert!(dataset.series("c").unwrap().values()[0].is_null());

        let long = "a,b\n1,2,3\n";
        let err = Dataset::from_reader(long.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn test_duplicate_headers_are_renamed() {
        let csv = "pais,estado,pais\nPeru,Active,Chile\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        let headers: Vec<&str> = dataset.headers().iter().map(|h| h.as_ref()).collect();
        assert_eq!(headers, vec!["pais", "estado", "pais.1"]);
        assert_eq!(
            dataset.labels("pais.1").unwrap(),
            vec![Some("Chile".to_string())]
        );
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let dataset = Dataset::from_reader(PROJECTS_CSV.as_bytes()).unwrap();
        let err = dataset.series("sector").unwrap_err();
        assert!(err.to_string().contains("'sector'"));
    }

    #[test]
    fn test_rows_follow_column_order() {
        let csv = "a,b\nx,1\ny,2\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        let rows: Vec<Vec<&Value>> = dataset.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], &Value::Text("y".into()));
        assert_eq!(rows[1][1], &Value::Number(Decimal::from(2)));
    }

    #[tokio::test]
    async fn test_load() {
        let (_dir, path) = write_csv(PROJECTS_CSV);
        let dataset = Dataset::load(&path).await.unwrap();
        assert_eq!(dataset.len(), 12);
        assert!(dataset.has_column(YEAR));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = Dataset::load("/definitely/not/here.csv").await.unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.csv"));
    }
}
