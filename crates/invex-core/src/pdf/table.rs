//! Table grids, and their reconstruction from column-aligned page text
//! when no ruled or aligned table was detected in the PDF itself.
//!
//! Text extracted from invoice PDFs keeps table columns apart with runs of
//! spaces, tabs or `|` rules. A block of consecutive lines that each split
//! into two or more cells is treated as one table whose first line is the
//! header row.

use tracing::trace;

/// A table grid: rows of optional cell strings, header row first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<Option<String>>>) -> Self {
        Self { rows }
    }

    /// Build a table where every cell is present.
    pub fn from_strings<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|cell| Some(cell.into())).collect())
                .collect(),
        }
    }

    /// Get header row (first row).
    pub fn header(&self) -> Option<&[Option<String>]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Get data rows (all rows except header).
    pub fn data_rows(&self) -> &[Vec<Option<String>>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Index of the first header cell exactly equal to `label`.
    pub fn column_of(&self, label: &str) -> Option<usize> {
        self.header()?
            .iter()
            .position(|cell| cell.as_deref() == Some(label))
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }
}

/// Split one line into cells.
///
/// Lines containing `|` are split on it, dropping border rules. Otherwise a
/// tab or a run of at least `min_gap` whitespace characters separates cells.
pub fn split_cells(line: &str, min_gap: usize) -> Vec<Option<String>> {
    if line.contains('|') {
        let trimmed = line.trim();
        let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
        let inner = inner.strip_suffix('|').unwrap_or(inner);
        return inner
            .split('|')
            .map(|cell| {
                let cell = cell.trim();
                (!cell.is_empty()).then(|| cell.to_string())
            })
            .collect();
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut gap = 0usize;
    let mut tab = false;

    for ch in line.trim().chars() {
        if ch.is_whitespace() {
            tab |= ch == '\t';
            gap += 1;
            continue;
        }

        if gap > 0 {
            if tab || gap >= min_gap {
                cells.push(Some(std::mem::take(&mut current)));
            } else {
                current.extend(std::iter::repeat(' ').take(gap));
            }
            gap = 0;
            tab = false;
        }
        current.push(ch);
    }

    if !current.is_empty() {
        cells.push(Some(current));
    }

    cells
}

/// Find the tables in a page's text.
pub fn detect_tables(text: &str, min_gap: usize) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut block: Vec<Vec<Option<String>>> = Vec::new();

    for line in text.lines() {
        let cells = split_cells(line, min_gap);
        if cells.len() >= 2 {
            block.push(cells);
        } else {
            flush_block(&mut block, &mut tables);
        }
    }
    flush_block(&mut block, &mut tables);

    trace!("Detected {} tables", tables.len());
    tables
}

fn flush_block(block: &mut Vec<Vec<Option<String>>>, tables: &mut Vec<Table>) {
    // A header without data rows carries nothing to extract.
    if block.len() >= 2 {
        tables.push(Table::new(std::mem::take(block)));
    } else {
        block.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn test_split_on_space_runs() {
        assert_eq!(
            split_cells("  Total      5. März 2020   ", 2),
            cells(&["Total", "5. März 2020"])
        );
    }

    #[test]
    fn test_single_spaces_stay_in_cell() {
        assert_eq!(
            split_cells("Invoice date: Nov 26, 2016", 2),
            cells(&["Invoice date: Nov 26, 2016"])
        );
    }

    #[test]
    fn test_split_on_tabs() {
        assert_eq!(split_cells("Name\tDate", 4), cells(&["Name", "Date"]));
    }

    #[test]
    fn test_split_on_pipes() {
        assert_eq!(
            split_cells("| Name | | Date |", 2),
            vec![Some("Name".to_string()), None, Some("Date".to_string())]
        );
    }

    #[test]
    fn test_detect_tables() {
        let text = "ACME GmbH\n\
                    Name        Date           Amount\n\
                    Total       5. März 2020   100,00\n\
                    \n\
                    Thank you\n\
                    Item   Qty\n\
                    Nails  100";

        let tables = detect_tables(text, 2);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].header().unwrap(), cells(&["Name", "Date", "Amount"]).as_slice());
        assert_eq!(tables[0].data_rows().len(), 1);
        assert_eq!(tables[0].column_of("Date"), Some(1));
        assert_eq!(tables[1].column_of("Date"), None);
    }

    #[test]
    fn test_header_only_block_is_dropped() {
        assert!(detect_tables("Name    Date\nfooter", 2).is_empty());
    }

    #[test]
    fn test_column_of_requires_exact_cell() {
        let table = Table::from_strings(vec![vec!["Name", "Date of delivery"], vec!["x", "y"]]);
        assert_eq!(table.column_of("Date"), None);
    }
}
