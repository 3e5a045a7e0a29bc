use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, ErrorKind},
    path::{Path, PathBuf},
};

use log::debug;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::PageError;

use super::{GeneratedPage, HomeProps, PostProps};

/// Generated pages on disk: `index.json` and `post/<uid>.json`.
#[derive(Debug, Clone)]
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn listing_path(&self) -> PathBuf {
        self.root.join("index.json")
    }

    pub fn post_path(&self, uid: &str) -> Result<PathBuf, PageError> {
        let valid = !uid.is_empty()
            && !uid.starts_with('.')
            && !uid.contains(['/', '\\']);
        if !valid {
            let message = format!("`{}` cannot be used as a page name", uid);
            return Err(io::Error::new(ErrorKind::InvalidInput, message).into());
        }
        Ok(self.root.join("post").join(format!("{}.json", uid)))
    }

    pub fn load_listing(&self) -> Result<Option<GeneratedPage<HomeProps>>, PageError> {
        load(&self.listing_path())
    }

    pub fn save_listing(&self, page: &GeneratedPage<HomeProps>) -> Result<(), PageError> {
        save(&self.listing_path(), page)
    }

    pub fn load_post(&self, uid: &str) -> Result<Option<GeneratedPage<PostProps>>, PageError> {
        load(&self.post_path(uid)?)
    }

    pub fn save_post(&self, uid: &str, page: &GeneratedPage<PostProps>) -> Result<(), PageError> {
        save(&self.post_path(uid)?, page)
    }
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PageError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    debug!("Loading page {}", path.display());
    let reader = BufReader::new(file);
    Ok(Some(serde_json::from_reader(reader)?))
}

fn save<T: Serialize>(path: &Path, data: &T) -> Result<(), PageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    debug!("Saving page {}", path.display());
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, data)?;
    Ok(())
}
