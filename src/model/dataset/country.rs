use std::collections::HashMap;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use log::{debug, warn};
use serde::Serialize;

use super::{coerce_float, coerce_int, LoadError, LoadReport};

/// Name of the country table inside the flag game directory.
pub const COUNTRIES_FILE: &str = "stats/countries.csv";
/// Name of the flag image folder inside the flag game directory.
pub const FLAGS_FOLDER: &str = "flags";

/// Columns that may carry the ISO 3166 alpha-2 code, in order of preference.
const ISO2_COLUMNS: [&str; 5] = ["iso2", "ISO2", "id", "Id", "ID"];

/// One row of the country table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Country {
    pub name: String,
    /// Lowercase ISO 3166 alpha-2 code, also the flag image stem.
    pub iso2: String,
    pub population: i64,
    /// Square kilometres.
    pub area: i64,
    pub gdp: i64,
    /// Inhabitants per square kilometre.
    pub density: f64,
}

/// The flag game's snapshot.
pub struct Countries {
    records: Vec<Country>,
    flags_dir: PathBuf,
}

impl Countries {
    pub fn new(records: Vec<Country>, flags_dir: PathBuf) -> Self {
        Self { records, flags_dir }
    }

    pub fn empty(game_dir: &Path) -> Self {
        Self::new(Vec::new(), game_dir.join(FLAGS_FOLDER))
    }

    pub fn records(&self) -> &[Country] {
        &self.records
    }

    /// Folder the flag images are served from.
    pub fn flags_dir(&self) -> &Path {
        &self.flags_dir
    }

    /// Load the country table from `game_dir`, keeping only rows with an
    /// identifier and a flag image on disk.
    pub fn load(game_dir: &Path) -> Result<(Self, LoadReport), LoadError> {
        let path = game_dir.join(COUNTRIES_FILE);
        let contents = std::fs::read_to_string(&path).map_err(|e| LoadError::io(&path, e))?;
        let flags_dir = game_dir.join(FLAGS_FOLDER);

        let delimiter = detect_delimiter(&contents);
        debug!("Reading {} with delimiter {:?}", path.display(), delimiter as char);
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(contents.as_bytes());
        let headers = reader.headers()?.clone();

        let mut records = Vec::new();
        let mut report = LoadReport::default();
        for (line, row) in reader.records().enumerate() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    warn!("Skipping unreadable country row {}: {e}", line + 1);
                    report.skipped += 1;
                    continue;
                }
            };
            match Country::from_row(&headers, &row, &flags_dir) {
                Some(country) => {
                    records.push(country);
                    report.loaded += 1;
                }
                None => report.skipped += 1,
            }
        }

        Ok((Self::new(records, flags_dir), report))
    }
}

impl Country {
    /// Build a country from a table row, or `None` if the row has no
    /// identifier or no flag image.
    fn from_row(headers: &StringRecord, row: &StringRecord, flags_dir: &Path) -> Option<Self> {
        let fields: HashMap<&str, &str> = headers.iter().zip(row.iter()).collect();
        let field = |name: &str| fields.get(name).copied().unwrap_or("");
        let name = fields
            .get("country")
            .map(|name| name.to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let Some(iso2) = ISO2_COLUMNS
            .iter()
            .filter_map(|column| fields.get(column))
            .find(|code| !code.is_empty())
        else {
            warn!("Skipping country row without an ISO2 code: {name}");
            return None;
        };

        if !flag_exists(flags_dir, iso2) {
            warn!("Skipping {name}: no flag image for {iso2}");
            return None;
        }

        Some(Self {
            name,
            iso2: iso2.to_lowercase(),
            population: coerce_int(field("population")),
            area: coerce_int(field("area")),
            gdp: coerce_int(field("gdp")),
            density: coerce_float(field("density")),
        })
    }
}

/// Tab if the header line has one, comma otherwise.
fn detect_delimiter(contents: &str) -> u8 {
    let first_line = contents.lines().next().unwrap_or("");
    if first_line.contains('\t') {
        b'\t'
    } else {
        b','
    }
}

fn flag_exists(flags_dir: &Path, iso2: &str) -> bool {
    [iso2.to_lowercase(), iso2.to_uppercase()]
        .iter()
        .any(|stem| flags_dir.join(format!("{stem}.png")).is_file())
}
