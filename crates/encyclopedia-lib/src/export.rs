//! Blueprint cost export.
//!
//! Every blueprint has its own material list, but a sheet needs one fixed set
//! of columns. The sheet header is the union of material names across the
//! whole selection, sorted, after the fixed `Blueprint` and `ISK` columns.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Local, TimeZone};
use csv::WriterBuilder;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::ids::ItemId;
use crate::store::GameData;

/// Header of the blueprint name column.
pub const BLUEPRINT_COLUMN: &str = "Blueprint";
/// Header of the ISK cost column.
pub const ISK_COLUMN: &str = "ISK";

/// Ordered, de-duplicated list of blueprints chosen for export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExportSelection {
    ids: Vec<ItemId>,
}

impl ExportSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a blueprint unless it is already selected. Returns whether it was added.
    pub fn add(&mut self, id: ItemId) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove the blueprint at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<ItemId> {
        (index < self.ids.len()).then(|| self.ids.remove(index))
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<ItemId> for ExportSelection {
    fn from_iter<T: IntoIterator<Item = ItemId>>(iter: T) -> Self {
        let mut selection = Self::new();
        for id in iter {
            selection.add(id);
        }
        selection
    }
}

/// One cell of a cost sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(u64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Number(value) => write!(f, "{value}"),
        }
    }
}

/// Denormalized blueprint cost table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostSheet {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl CostSheet {
    /// Value in `column` of the row at `row`, by header name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.header.iter().position(|name| name == column)?;
        self.rows.get(row)?.get(index)
    }
}

/// Build the cost sheet for a selection.
///
/// Each blueprint's manufacture record is found by its id, or else by the
/// id of the item it produces. A blueprint with neither fails the export.
pub fn build_cost_sheet(data: &GameData, selection: &ExportSelection) -> Result<CostSheet> {
    if selection.is_empty() {
        return Err(Error::EmptyExport);
    }
    let industry = data
        .industry
        .as_ref()
        .ok_or_else(|| Error::DatasetUnavailable {
            name: crate::dataset::files::INDUSTRY.to_string(),
        })?;

    let mut materials = BTreeSet::new();
    let mut rows = Vec::with_capacity(selection.len());
    for &id in selection.ids() {
        let item = data.item(id)?;
        let record = industry
            .for_blueprint(id, item)
            .ok_or(Error::ManufactureDataMissing { id })?;

        let mut quantities = BTreeMap::new();
        for (material, count) in &record.material {
            let name = data.item_name(*material);
            materials.insert(name.clone());
            *quantities.entry(name).or_insert(0) += count;
        }
        rows.push((data.item_name(id), record.money, quantities));
    }

    let mut header = vec![BLUEPRINT_COLUMN.to_string(), ISK_COLUMN.to_string()];
    header.extend(materials.iter().cloned());

    let rows = rows
        .into_iter()
        .map(|(name, money, quantities)| {
            let mut row = vec![Cell::Text(name), Cell::Number(money)];
            row.extend(materials.iter().map(|material| {
                Cell::Number(quantities.get(material).copied().unwrap_or(0))
            }));
            row
        })
        .collect();

    debug!(
        blueprints = selection.len(),
        materials = materials.len(),
        "built blueprint cost sheet"
    );
    Ok(CostSheet { header, rows })
}

/// Interchangeable tabular output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl SheetFormat {
    pub fn extension(self) -> &'static str {
        match self {
            SheetFormat::Csv => "csv",
            SheetFormat::Tsv => "tsv",
            SheetFormat::Json => "json",
        }
    }
}

impl FromStr for SheetFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(SheetFormat::Csv),
            "tsv" => Ok(SheetFormat::Tsv),
            "json" => Ok(SheetFormat::Json),
            other => Err(Error::UnsupportedSheetFormat {
                format: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SheetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Serialize a sheet in the given format.
pub fn write_sheet<W: Write>(
    sheet: &CostSheet,
    format: SheetFormat,
    mut writer: W,
) -> Result<()> {
    match format {
        SheetFormat::Csv | SheetFormat::Tsv => {
            let delimiter = if format == SheetFormat::Tsv { b'\t' } else { b',' };
            let mut csv_writer = WriterBuilder::new().delimiter(delimiter).from_writer(writer);
            csv_writer.write_record(&sheet.header)?;
            for row in &sheet.rows {
                csv_writer.write_record(row.iter().map(|cell| cell.to_string()))?;
            }
            csv_writer.flush()?;
        }
        SheetFormat::Json => {
            let mut table: Vec<Vec<Cell>> = Vec::with_capacity(sheet.rows.len() + 1);
            table.push(sheet.header.iter().cloned().map(Cell::Text).collect());
            table.extend(sheet.rows.iter().cloned());
            serde_json::to_writer_pretty(&mut writer, &table)?;
            writer.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// Export filename with a timestamp to the minute, e.g. `blueprints-20240131-0945.csv`.
pub fn export_filename<Tz: TimeZone>(now: &DateTime<Tz>, format: SheetFormat) -> String
where
    Tz::Offset: fmt::Display,
{
    format!(
        "blueprints-{}.{}",
        now.format("%Y%m%d-%H%M"),
        format.extension()
    )
}

/// Write a sheet into `dir` under a timestamped name, returning the path.
///
/// The file is written to a temporary sibling first and moved into place.
pub fn save_sheet(sheet: &CostSheet, format: SheetFormat, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_filename(&Local::now(), format));

    let mut temp = NamedTempFile::new_in(dir)?;
    write_sheet(sheet, format, temp.as_file_mut())?;
    temp.persist(&path).map_err(|err| err.error)?;

    info!(path = %path.display(), rows = sheet.rows.len(), "saved blueprint cost sheet");
    Ok(path)
}
