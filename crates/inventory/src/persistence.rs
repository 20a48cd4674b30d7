//! Full-snapshot CSV persistence for [`Store`].
//!
//! Format: one header row `id,name,quantity,price,category`, then one row per
//! item in ascending id order. Saves overwrite the destination atomically
//! (temp file + rename); a missing source loads as an empty store.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use atomicwrites::{AtomicFile, OverwriteBehavior};
use serde::Deserialize;
use thiserror::Error;

use crate::item::Item;
use crate::store::Store;

/// Canonical column order of the persisted format.
pub const HEADER: [&str; 5] = ["id", "name", "quantity", "price", "category"];

/// Older files name the first two columns `item_id` and `item_name`.
const LEGACY_ALIASES: [(&str, &str); 2] = [("id", "item_id"), ("name", "item_name")];

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed row at line {line} of {}: {message}", .path.display())]
    MalformedRow {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("{} has no `{column}` column", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },
}

impl PersistenceError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn from_csv(path: &Path, err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(source) => Self::io(path, source),
            _ => Self::MalformedRow {
                path: path.to_path_buf(),
                line,
                message,
            },
        }
    }
}

/// What to do with a row that cannot be parsed during load.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Fail the whole load on the first malformed row.
    #[default]
    Strict,
    /// Log and skip malformed rows, keeping the rest.
    SkipMalformed,
}

#[derive(Debug, Deserialize)]
struct ItemRow {
    #[serde(alias = "item_id")]
    id: i64,
    #[serde(alias = "item_name")]
    name: String,
    quantity: i64,
    price: f64,
    category: String,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item::new(row.id, row.name, row.quantity, row.price, row.category)
    }
}

impl Store {
    /// Write every item to `path`, replacing any previous content.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        let contents = self.to_csv(path)?;

        // The temp file is created next to the target, so a bare file name
        // needs an explicit directory.
        let target = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
                path.to_path_buf()
            }
            None => Path::new(".").join(path),
        };

        AtomicFile::new(&target, OverwriteBehavior::AllowOverwrite)
            .write(|f| {
                f.write_all(&contents)?;
                f.flush()
            })
            .map_err(|err| match err {
                atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => {
                    PersistenceError::io(path, e)
                }
            })?;

        tracing::info!(path = %path.display(), items = self.len(), "saved inventory");
        Ok(())
    }

    /// Strict load: see [`Store::load_with`].
    pub fn load(path: impl AsRef<Path>) -> Result<Store, PersistenceError> {
        Self::load_with(path, LoadPolicy::Strict)
    }

    /// Read a store from `path`. A missing file yields an empty store.
    ///
    /// Rows are trusted as previously validated and are not re-validated.
    pub fn load_with(
        path: impl AsRef<Path>,
        policy: LoadPolicy,
    ) -> Result<Store, PersistenceError> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no inventory file; starting empty");
                return Ok(Store::new());
            }
            Err(e) => return Err(PersistenceError::io(path, e)),
        };

        let store = read_csv(file, path, policy)?;
        tracing::info!(path = %path.display(), items = store.len(), "loaded inventory");
        Ok(store)
    }

    fn to_csv(&self, path: &Path) -> Result<Vec<u8>, PersistenceError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(HEADER)
            .map_err(|e| PersistenceError::from_csv(path, e))?;

        for (_, item) in self.list_all() {
            wtr.write_record([
                item.id().to_string(),
                item.name().to_string(),
                item.quantity().to_string(),
                item.price().to_string(),
                item.category().to_string(),
            ])
            .map_err(|e| PersistenceError::from_csv(path, e))?;
        }

        wtr.into_inner()
            .map_err(|e| PersistenceError::io(path, e.into_error()))
    }
}

/// Parse a persisted store from any reader. `path` is only used in errors.
fn read_csv<R: Read>(
    reader: R,
    path: &Path,
    policy: LoadPolicy,
) -> Result<Store, PersistenceError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| PersistenceError::from_csv(path, e))?
        .clone();
    // A zero-byte file has no header at all and is just an empty store.
    if !headers.is_empty() {
        check_columns(&headers, path)?;
    }

    let mut items = Vec::new();
    let mut skipped = 0usize;
    for result in rdr.deserialize::<ItemRow>() {
        match result {
            Ok(row) => items.push(Item::from(row)),
            Err(e) => match (policy, PersistenceError::from_csv(path, e)) {
                (LoadPolicy::SkipMalformed, PersistenceError::MalformedRow { line, message, .. }) => {
                    tracing::warn!(line, %message, "skipping malformed inventory row");
                    skipped += 1;
                }
                (_, err) => return Err(err),
            },
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, path = %path.display(), "some inventory rows were skipped");
    }
    Ok(Store::from_trusted(items))
}

fn check_columns(headers: &csv::StringRecord, path: &Path) -> Result<(), PersistenceError> {
    for column in HEADER {
        let legacy = LEGACY_ALIASES
            .iter()
            .find(|(canonical, _)| *canonical == column)
            .map(|(_, alias)| *alias);
        let present = headers
            .iter()
            .any(|h| h == column || Some(h) == legacy);
        if !present {
            return Err(PersistenceError::MissingColumn {
                path: path.to_path_buf(),
                column,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockpile_core::ItemId;

    fn sample_store() -> Store {
        let mut store = Store::new();
        store.add(Item::new(2, "Bolt", 500, 0.05, "Hardware")).unwrap();
        store.add(Item::new(1, "Widget", 10, 2.50, "Tools")).unwrap();
        store
    }

    fn parse(text: &str, policy: LoadPolicy) -> Result<Store, PersistenceError> {
        read_csv(text.as_bytes(), Path::new("test.csv"), policy)
    }

    #[test]
    fn writes_header_then_rows_in_id_order() {
        let bytes = sample_store().to_csv(Path::new("test.csv")).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "id,name,quantity,price,category\n1,Widget,10,2.5,Tools\n2,Bolt,500,0.05,Hardware\n"
        );
    }

    #[test]
    fn empty_store_writes_only_the_header() {
        let bytes = Store::new().to_csv(Path::new("test.csv")).unwrap();
        assert_eq!(bytes, b"id,name,quantity,price,category\n");
    }

    #[test]
    fn whole_prices_have_no_forced_decimals() {
        let mut store = Store::new();
        store.add(Item::new(1, "Crate", 1, 10.0, "Storage")).unwrap();
        let text = String::from_utf8(store.to_csv(Path::new("t.csv")).unwrap()).unwrap();
        assert!(text.ends_with("1,Crate,1,10,Storage\n"));
    }

    #[test]
    fn quotes_fields_containing_delimiters() {
        let mut store = Store::new();
        store.add(Item::new(1, "Nuts, assorted", 3, 1.5, "Hardware")).unwrap();
        let text = String::from_utf8(store.to_csv(Path::new("t.csv")).unwrap()).unwrap();
        assert!(text.contains("1,\"Nuts, assorted\",3,1.5,Hardware"));

        let loaded = parse(&text, LoadPolicy::Strict).unwrap();
        assert_eq!(loaded.find(ItemId::new(1)).unwrap().name(), "Nuts, assorted");
    }

    #[test]
    fn parses_rows_into_items() {
        let store = parse(
            "id,name,quantity,price,category\n1,Widget,10,2.5,Tools\n",
            LoadPolicy::Strict,
        )
        .unwrap();
        assert_eq!(
            store.find(ItemId::new(1)),
            Some(&Item::new(1, "Widget", 10, 2.5, "Tools"))
        );
    }

    #[test]
    fn accepts_legacy_column_names() {
        let store = parse(
            "item_id,item_name,quantity,price,category\n7,Gear,4,1.25,Parts\n",
            LoadPolicy::Strict,
        )
        .unwrap();
        assert_eq!(store.find(ItemId::new(7)).unwrap().name(), "Gear");
    }

    #[test]
    fn loaded_rows_are_not_revalidated() {
        let store = parse(
            "id,name,quantity,price,category\n3,Odd,-2,1.0,Misc\n",
            LoadPolicy::Strict,
        )
        .unwrap();
        assert_eq!(store.find(ItemId::new(3)).unwrap().quantity(), -2);
    }

    #[test]
    fn non_numeric_quantity_fails_strict_load() {
        let err = parse(
            "id,name,quantity,price,category\n1,Widget,ten,2.5,Tools\n",
            LoadPolicy::Strict,
        )
        .unwrap_err();
        assert!(matches!(err, PersistenceError::MalformedRow { line: 2, .. }), "{err}");
    }

    #[test]
    fn non_numeric_id_and_price_fail_strict_load() {
        for row in ["x,Widget,1,2.5,Tools", "1,Widget,1,cheap,Tools"] {
            let text = format!("id,name,quantity,price,category\n{row}\n");
            let err = parse(&text, LoadPolicy::Strict).unwrap_err();
            assert!(matches!(err, PersistenceError::MalformedRow { .. }), "{err}");
        }
    }

    #[test]
    fn skip_policy_keeps_good_rows() {
        let store = parse(
            "id,name,quantity,price,category\n1,Widget,ten,2.5,Tools\n2,Bolt,500,0.05,Hardware\n3,Short,1\n",
            LoadPolicy::SkipMalformed,
        )
        .unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.contains(ItemId::new(2)));
    }

    #[test]
    fn missing_column_is_reported_even_without_rows() {
        let err = parse("id,name,quantity,price\n", LoadPolicy::Strict).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::MissingColumn { column: "category", .. }
        ));
    }

    #[test]
    fn zero_byte_input_is_an_empty_store() {
        assert!(parse("", LoadPolicy::Strict).unwrap().is_empty());
    }

    #[test]
    fn header_only_input_is_an_empty_store() {
        let store = parse("id,name,quantity,price,category\n", LoadPolicy::Strict).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn later_duplicate_row_wins() {
        let store = parse(
            "id,name,quantity,price,category\n1,Old,1,1,A\n1,New,2,2,B\n",
            LoadPolicy::Strict,
        )
        .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.find(ItemId::new(1)).unwrap().name(), "New");
    }
}
