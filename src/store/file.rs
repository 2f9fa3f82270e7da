//! JSON file store. The whole collection lives in a single document under the
//! user's configuration directory; every save rewrites it through a temp file
//! so readers never see a torn write.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;

use crate::models::Expense;
use crate::store::ExpenseStore;

/// Folder name created beneath the user's config directory.
const APP_DIR_NAME: &str = "expense-tracker";
/// Save file name stored inside the application data directory.
const DATA_FILE_NAME: &str = "expenses.json";
/// Extension suffix for the temp file a save goes through.
const TMP_SUFFIX: &str = "tmp";

/// File-backed implementation of [`ExpenseStore`]. Holds only the resolved
/// data directory; every operation opens the file fresh.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Resolve the per-user data directory and make sure it exists. This is
    /// the production constructor `main` calls; a failure here is fatal to
    /// startup.
    pub fn open() -> Result<Self> {
        Self::at(default_save_dir())
    }

    /// Same as [`JsonFileStore::open`] but rooted at an explicit directory.
    /// Used by tests and anything that wants a sandboxed save file.
    pub fn at(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).context("failed to create data directory")?;
        Ok(Self { dir })
    }

    /// Directory the save file and the CSV export live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Absolute path of the JSON save file.
    pub fn data_path(&self) -> PathBuf {
        self.dir.join(DATA_FILE_NAME)
    }
}

impl ExpenseStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Expense>> {
        let path = self.data_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&path).context("failed to read save file")?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw).context("failed to decode save file")
    }

    fn save(&self, expenses: &[Expense]) -> Result<()> {
        let data =
            serde_json::to_string_pretty(expenses).context("failed to encode expenses")?;

        let path = self.data_path();
        let tmp = tmp_path(&path);
        write_file(&tmp, &data)?;
        fs::rename(&tmp, &path).context("failed to replace save file")?;
        Ok(())
    }
}

/// Per-user config directory plus the application subfolder, falling back to a
/// relative directory when the platform directories cannot be resolved.
fn default_save_dir() -> PathBuf {
    match BaseDirs::new() {
        Some(dirs) => dirs.config_dir().join(APP_DIR_NAME),
        None => PathBuf::from(APP_DIR_NAME),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path).context("failed to create save file")?;
    file.write_all(data.as_bytes())
        .context("failed to write save file")?;
    file.flush().context("failed to flush save file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use super::*;

    fn sample_expenses() -> Vec<Expense> {
        vec![
            Expense {
                id: 1,
                description: "Coffee".to_string(),
                category: "Food".to_string(),
                amount: 3.5,
                spent_at: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            },
            Expense {
                id: 2,
                description: "Lunch".to_string(),
                category: "Food".to_string(),
                amount: 12.0,
                spent_at: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            },
        ]
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().expect("tempdir");
        let store = JsonFileStore::at(dir.path().to_path_buf()).expect("create store");

        let expenses = sample_expenses();
        store.save(&expenses).expect("save");
        let loaded = store.load().expect("load");

        assert_eq!(loaded, expenses);
    }

    #[test]
    fn empty_collection_round_trips() {
        let dir = tempdir().expect("tempdir");
        let store = JsonFileStore::at(dir.path().to_path_buf()).expect("create store");

        store.save(&[]).expect("save");
        assert_eq!(store.load().expect("load"), Vec::new());
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempdir().expect("tempdir");
        let store = JsonFileStore::at(dir.path().to_path_buf()).expect("create store");

        assert!(!store.data_path().exists());
        assert_eq!(store.load().expect("load"), Vec::new());
    }

    #[test]
    fn blank_file_loads_as_empty() {
        let dir = tempdir().expect("tempdir");
        let store = JsonFileStore::at(dir.path().to_path_buf()).expect("create store");

        fs::write(store.data_path(), "  \n").expect("write blank file");
        assert_eq!(store.load().expect("load"), Vec::new());
    }

    #[test]
    fn save_replaces_previous_contents() {
        let dir = tempdir().expect("tempdir");
        let store = JsonFileStore::at(dir.path().to_path_buf()).expect("create store");

        store.save(&sample_expenses()).expect("first save");
        store.save(&sample_expenses()[..1]).expect("second save");

        let loaded = store.load().expect("load");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 1);
    }

    #[test]
    fn corrupt_file_surfaces_an_error() {
        let dir = tempdir().expect("tempdir");
        let store = JsonFileStore::at(dir.path().to_path_buf()).expect("create store");

        fs::write(store.data_path(), "{not json").expect("write corrupt file");
        assert!(store.load().is_err());
    }
}
