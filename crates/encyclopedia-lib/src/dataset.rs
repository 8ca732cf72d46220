use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Environment variable overriding the local data directory.
pub const DATA_DIR_ENV: &str = "ENCYCLOPEDIA_DATA_DIR";
/// Environment variable pointing at a remote base URL for the datasets.
pub const DATA_URL_ENV: &str = "ENCYCLOPEDIA_DATA_URL";

/// File names of the datasets, relative to the data source root.
pub mod files {
    pub const ITEMS: &str = "items.json";
    pub const INDUSTRY: &str = "industry.json";
    pub const GROUPS: &str = "groups.json";
    pub const ITEM_GROUPS: &str = "items.groups.json";
    pub const ITEMS_INDEX: &str = "items.index.json";
    pub const ATTRIBUTES: &str = "attributes.json";
    pub const CAL_CODE_MODIFIER: &str = "cal_code_modifier.json";
    pub const MODULE_CODE_LIST: &str = "module_code_list.json";
    pub const EQUIP_ATTR: &str = "equip_attr.json";

    /// Localization table for a language code, e.g. `en.json`.
    pub fn strings(lang: &str) -> String {
        format!("{lang}.json")
    }
}

/// Where dataset files are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// A directory on disk holding the JSON files.
    Directory(PathBuf),
    /// An HTTP(S) base URL; files are fetched as `<base>/<file>`.
    Remote(String),
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Directory(path) => write!(f, "{}", path.display()),
            DatasetSource::Remote(url) => f.write_str(url),
        }
    }
}

impl DatasetSource {
    /// Resolve the dataset source.
    ///
    /// Resolution order:
    /// 1. Explicit `url` argument, then explicit `dir` argument.
    /// 2. `ENCYCLOPEDIA_DATA_URL`, then `ENCYCLOPEDIA_DATA_DIR`.
    /// 3. Platform-specific project data directory.
    pub fn resolve(dir: Option<&Path>, url: Option<&str>) -> Result<Self> {
        if let Some(url) = url {
            return Ok(Self::Remote(url.to_string()));
        }
        if let Some(dir) = dir {
            return Self::directory(dir);
        }
        if let Ok(url) = env::var(DATA_URL_ENV) {
            if !url.trim().is_empty() {
                return Ok(Self::Remote(url));
            }
        }
        if let Some(env_path) = env::var_os(DATA_DIR_ENV) {
            return Self::directory(Path::new(&env_path));
        }

        let default = default_data_dir()?;
        info!("using default data directory {}", default.display());
        Self::directory(&default)
    }

    fn directory(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(Error::DatasetNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(Self::Directory(path.to_path_buf()))
    }

    /// Read the raw bytes of a dataset file.
    pub fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        match self {
            DatasetSource::Directory(root) => {
                let path = root.join(name);
                debug!(path = %path.display(), "reading dataset file");
                Ok(fs::read(path)?)
            }
            DatasetSource::Remote(base) => {
                let url = remote_url(base, name);
                debug!(%url, "fetching dataset file");
                let response = Client::new().get(&url).send()?.error_for_status()?;
                Ok(response.bytes()?.to_vec())
            }
        }
    }

    /// Fetch and parse a JSON dataset file.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let bytes = self.fetch(name)?;
        serde_json::from_slice(&bytes).map_err(|source| Error::DatasetParse {
            name: name.to_string(),
            source,
        })
    }
}

/// URL of a dataset file under a remote base, tolerating a trailing slash.
fn remote_url(base: &str, name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), name)
}

/// Resolve the default data location using platform-specific project directories.
pub fn default_data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "encyclopedia", "encyclopedia")
        .ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().to_path_buf())
}
