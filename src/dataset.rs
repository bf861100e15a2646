//! Dataset I/O: CSV/TSV tables, MR/text instances and report writers.
//!
//! Input files are CSV or TSV (the delimiter is sniffed from the header
//! line). Both the E2E dataset's own column names (`MR`, `output`) and the
//! system-output convention (`mr`, `ref`) are accepted.

use crate::da::{parse_mr, parse_tgen, DialogueAct};
use crate::eval::CorpusReport;
use crate::{Error, Result};
use std::io;
use std::path::Path;

/// Delimiter of TSV files.
pub const TAB: u8 = b'\t';
/// Delimiter of CSV files.
pub const COMMA: u8 = b',';

// =============================================================================
// Table
// =============================================================================

/// A headed table of string cells, kept in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// An empty table with the given columns.
    #[must_use]
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Read a CSV or TSV file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
            .map_err(|e| Error::dataset(format!("{}: {}", path.display(), e)))
    }

    /// Parse CSV or TSV content; a tab in the header line selects TSV.
    pub fn parse(content: &str) -> Result<Self> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let delimiter = sniff_delimiter(content);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }
        Ok(Self { headers, rows })
    }

    /// Column names.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// All cells of a column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| Error::dataset(format!("missing column '{}'", name)))?;
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
            .collect())
    }

    /// Append a row; it must have one cell per column.
    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        if row.len() != self.headers.len() {
            return Err(Error::dataset(format!(
                "row has {} cells, table has {} columns",
                row.len(),
                self.headers.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Keep only rows whose index satisfies `keep`.
    pub fn retain_indices(&mut self, mut keep: impl FnMut(usize) -> bool) {
        let mut idx = 0;
        self.rows.retain(|_| {
            let k = keep(idx);
            idx += 1;
            k
        });
    }

    /// Write to any writer.
    pub fn write_to<W: io::Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        let mut out = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        out.write_record(&self.headers)?;
        for row in &self.rows {
            out.write_record(row)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Write to a file.
    pub fn write(&self, path: impl AsRef<Path>, delimiter: u8) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        self.write_to(io::BufWriter::new(file), delimiter)
    }
}

fn sniff_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or("");
    if first_line.contains('\t') {
        TAB
    } else {
        COMMA
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// Serialized MR grammar of a dataset's MR column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MrFormat {
    /// `name[X], food[Y]`
    Bracket,
    /// `inform(name=X,food=Y)`
    Tgen,
}

impl MrFormat {
    /// Parse one MR string in this format.
    pub fn parse(self, raw: &str) -> Result<DialogueAct> {
        match self {
            MrFormat::Bracket => parse_mr(raw),
            MrFormat::Tgen => parse_tgen(raw),
        }
    }
}

/// One MR/text pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    /// MR string as read.
    pub mr: String,
    /// Text to check against the MR.
    pub text: String,
}

/// A list of instances plus the column names they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    /// Display name (usually the file path).
    pub name: String,
    /// Grammar of the MR strings.
    pub format: MrFormat,
    /// Name of the MR column (`MR` or `mr`).
    pub mr_column: String,
    /// Name of the text column (`output` or `ref`).
    pub text_column: String,
    /// Instances in file order.
    pub instances: Vec<Instance>,
}

impl Dataset {
    /// Build from a table, picking `MR`/`mr` and `output`/`ref` columns.
    pub fn from_table(name: impl Into<String>, table: &Table) -> Result<Self> {
        let mr_column = if table.column_index("MR").is_some() {
            "MR"
        } else {
            "mr"
        };
        let text_column = if table.column_index("output").is_some() {
            "output"
        } else {
            "ref"
        };

        let mrs = table.column(mr_column)?;
        let texts = table.column(text_column)?;
        let instances = mrs
            .into_iter()
            .zip(texts)
            .map(|(mr, text)| Instance {
                mr: mr.to_string(),
                text: text.to_string(),
            })
            .collect();

        Ok(Self {
            name: name.into(),
            format: MrFormat::Bracket,
            mr_column: mr_column.to_string(),
            text_column: text_column.to_string(),
            instances,
        })
    }

    /// Read a CSV/TSV file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let table = Table::read(path)?;
        let dataset = Self::from_table(path.display().to_string(), &table)
            .map_err(|e| Error::dataset(format!("{}: {}", path.display(), e)))?;
        log::debug!(
            "[dataset] {}: {} instances (columns '{}', '{}')",
            dataset.name,
            dataset.len(),
            dataset.mr_column,
            dataset.text_column
        );
        Ok(dataset)
    }

    /// Pair TGen-format MR lines with plain-text output lines.
    pub fn from_mr_lines(
        name: impl Into<String>,
        mrs: Vec<String>,
        texts: Vec<String>,
    ) -> Result<Self> {
        let name = name.into();
        if mrs.len() != texts.len() {
            return Err(Error::dataset(format!(
                "{}: {} outputs for {} MRs",
                name,
                texts.len(),
                mrs.len()
            )));
        }
        let instances = mrs
            .into_iter()
            .zip(texts)
            .map(|(mr, text)| Instance { mr, text })
            .collect();
        Ok(Self {
            name,
            format: MrFormat::Tgen,
            mr_column: "mr".to_string(),
            text_column: "ref".to_string(),
            instances,
        })
    }

    /// Number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// True when there are no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Read a text file as trimmed lines (one instance per line).
pub fn load_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    Ok(content.lines().map(|l| l.trim().to_string()).collect())
}

// =============================================================================
// Report writers
// =============================================================================

/// Per-instance statistics as a TSV table.
///
/// Columns: MR, text, added, missing, valerr, repeated, mr_len, diff, fixed_mr.
pub fn dump_table(dataset: &Dataset, report: &CorpusReport) -> Result<Table> {
    let mut table = Table::new(
        [
            dataset.mr_column.as_str(),
            dataset.text_column.as_str(),
            "added",
            "missing",
            "valerr",
            "repeated",
            "mr_len",
            "diff",
            "fixed_mr",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    );
    for scored in &report.instances {
        let text = instance_text(dataset, scored.index)?;
        let r = &scored.result;
        table.push_row(vec![
            scored.orig_mr.clone(),
            text.to_string(),
            r.counts.added.to_string(),
            r.counts.missing.to_string(),
            r.counts.valerr.to_string(),
            r.counts.repeated.to_string(),
            r.gold_slots.to_string(),
            r.diff.to_json(),
            r.corrected_mr.clone(),
        ])?;
    }
    Ok(table)
}

/// Corrected dataset as a CSV table.
///
/// Columns: MR (corrected), text, fixed (1 if the MR changed), orig_mr.
pub fn fixed_table(dataset: &Dataset, report: &CorpusReport) -> Result<Table> {
    let mut table = Table::new(vec![
        dataset.mr_column.clone(),
        dataset.text_column.clone(),
        "fixed".to_string(),
        "orig_mr".to_string(),
    ]);
    for scored in &report.instances {
        let text = instance_text(dataset, scored.index)?;
        let changed = scored.result.corrected_mr != scored.orig_mr;
        table.push_row(vec![
            scored.result.corrected_mr.clone(),
            text.to_string(),
            if changed { "1" } else { "0" }.to_string(),
            scored.orig_mr.clone(),
        ])?;
    }
    Ok(table)
}

/// One summary line per scored file.
///
/// Columns: filename, total_insts, total_attr, semerr, added, missing, valerr,
/// repeated, inst_ok, inst_add, inst_mis, inst_m+a.
pub fn summary_table(reports: &[CorpusReport]) -> Table {
    let mut table = Table::new(
        [
            "filename",
            "total_insts",
            "total_attr",
            "semerr",
            "added",
            "missing",
            "valerr",
            "repeated",
            "inst_ok",
            "inst_add",
            "inst_mis",
            "inst_m+a",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    );
    for report in reports {
        let s = &report.stats;
        let row = vec![
            report.name.clone(),
            s.instances.to_string(),
            s.gold_slots.to_string(),
            s.sem_err_rate().to_string(),
            s.errors.added.to_string(),
            s.errors.missing.to_string(),
            s.errors.valerr.to_string(),
            s.errors.repeated.to_string(),
            s.bucket_rate(crate::Bucket::Ok).to_string(),
            s.bucket_rate(crate::Bucket::Added).to_string(),
            s.bucket_rate(crate::Bucket::Missing).to_string(),
            s.bucket_rate(crate::Bucket::Mixed).to_string(),
        ];
        table.rows.push(row);
    }
    table
}

fn instance_text(dataset: &Dataset, index: usize) -> Result<&str> {
    dataset
        .instances
        .get(index)
        .map(|inst| inst.text.as_str())
        .ok_or_else(|| Error::dataset(format!("report refers to missing instance {}", index)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_tsv() {
        let table = Table::parse("mr\tref\nname[Aromi]\tAromi is nice, really.\n").unwrap();
        assert_eq!(table.headers(), &["mr", "ref"]);
        assert_eq!(table.rows()[0][1], "Aromi is nice, really.");
    }

    #[test]
    fn parses_quoted_csv() {
        let content = "MR,output\n\"name[Aromi], food[French]\",\"Aromi serves French food.\"\n";
        let table = Table::parse(content).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0][0], "name[Aromi], food[French]");
    }

    #[test]
    fn strips_byte_order_mark() {
        let table = Table::parse("\u{feff}mr,ref\na[b],c\n").unwrap();
        assert_eq!(table.headers()[0], "mr");
    }

    #[test]
    fn column_names_are_normalized() {
        let e2e = Table::parse("MR,output\nname[Aromi],Aromi.\n").unwrap();
        let ds = Dataset::from_table("e2e", &e2e).unwrap();
        assert_eq!((ds.mr_column.as_str(), ds.text_column.as_str()), ("MR", "output"));

        let sys = Table::parse("mr,ref,extra\nname[Aromi],Aromi.,x\n").unwrap();
        let ds = Dataset::from_table("sys", &sys).unwrap();
        assert_eq!((ds.mr_column.as_str(), ds.text_column.as_str()), ("mr", "ref"));
        assert_eq!(ds.instances[0].text, "Aromi.");
    }

    #[test]
    fn missing_column_is_an_error() {
        let table = Table::parse("meaning,text\na,b\n").unwrap();
        assert!(matches!(
            Dataset::from_table("x", &table),
            Err(Error::Dataset(_))
        ));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(matches!(
            Table::parse("mr,ref\na,b,c\n"),
            Err(Error::Csv(_))
        ));
    }

    #[test]
    fn mr_lines_must_pair_up() {
        let err = Dataset::from_mr_lines("t", vec!["inform(name=Aromi)".into()], vec![]);
        assert!(err.is_err());
        let ok = Dataset::from_mr_lines(
            "t",
            vec!["inform(name=Aromi)".into()],
            vec!["Aromi.".into()],
        )
        .unwrap();
        assert_eq!(ok.format, MrFormat::Tgen);
    }

    #[test]
    fn table_round_trips_through_writer() {
        let mut table = Table::new(vec!["mr".into(), "ref".into()]);
        table
            .push_row(vec!["name[A], food[B]".into(), "He said \"hi\"".into()])
            .unwrap();
        assert!(table.push_row(vec!["only one".into()]).is_err());

        let mut buf = Vec::new();
        table.write_to(&mut buf, COMMA).unwrap();
        let back = Table::parse(std::str::from_utf8(&buf).unwrap()).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn retain_by_index() {
        let mut table = Table::new(vec!["n".into()]);
        for i in 0..5 {
            table.push_row(vec![i.to_string()]).unwrap();
        }
        table.retain_indices(|i| i % 2 == 0);
        assert_eq!(table.column("n").unwrap(), vec!["0", "2", "4"]);
    }
}
