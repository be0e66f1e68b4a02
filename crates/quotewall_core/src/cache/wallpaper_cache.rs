//! Directory-backed wallpaper slot storage.
//!
//! Slot files are named `quote_{id}_{dark|light}.png`. Writes stage into a
//! per-writer `.staging_*.tmp` file and rename it over the slot, so a present
//! slot is always a complete image. Other files in the directory are never
//! touched.

use crate::model::quote::QuoteId;
use crate::model::style::WallpaperStyle;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const SLOT_PREFIX: &str = "quote_";
const SLOT_EXTENSION: &str = "png";
const STAGING_PREFIX: &str = ".staging_";

pub type CacheResult<T> = Result<T, CacheError>;

/// Cache storage failure.
#[derive(Debug)]
pub enum CacheError {
    Io {
        op: &'static str,
        path: PathBuf,
        source: io::Error,
    },
    MissingSource(PathBuf),
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { op, path, source } => {
                write!(f, "wallpaper cache {op} failed at `{}`: {source}", path.display())
            }
            Self::MissingSource(path) => {
                write!(f, "rendered wallpaper not found at `{}`", path.display())
            }
        }
    }
}

impl Error for CacheError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::MissingSource(_) => None,
        }
    }
}

/// Opaque handle to a ready-to-apply wallpaper image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheRef(PathBuf);

impl CacheRef {
    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl Display for CacheRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Wallpaper slot directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallpaperCache {
    dir: PathBuf,
}

impl WallpaperCache {
    /// Uses `dir` as the slot directory. The directory is created lazily on
    /// first store.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the slot reference when the slot file exists.
    pub fn lookup(&self, quote_id: QuoteId, style: WallpaperStyle) -> Option<CacheRef> {
        let path = self.slot_path(quote_id, style);
        path.is_file().then_some(CacheRef(path))
    }

    /// Copies a rendered image into its slot, replacing any previous image.
    pub fn store(
        &self,
        quote_id: QuoteId,
        style: WallpaperStyle,
        source: &Path,
    ) -> CacheResult<CacheRef> {
        if !source.is_file() {
            return Err(CacheError::MissingSource(source.to_path_buf()));
        }

        fs::create_dir_all(&self.dir).map_err(|err| io_error("create_dir", &self.dir, err))?;

        let target = self.slot_path(quote_id, style);
        // Each writer stages into its own file; the rename is the only step
        // readers can observe.
        let mut staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(|err| io_error("create_staging", &self.dir, err))?;
        let mut reader = fs::File::open(source).map_err(|err| io_error("open", source, err))?;
        io::copy(&mut reader, &mut staging).map_err(|err| io_error("copy", &target, err))?;
        staging
            .persist(&target)
            .map_err(|err| io_error("rename", &target, err.error))?;

        Ok(CacheRef(target))
    }

    /// Removes both style slots of one quote. Returns removed file count.
    pub fn remove_quote(&self, quote_id: QuoteId) -> CacheResult<usize> {
        let prefix = format!("{SLOT_PREFIX}{quote_id}_");
        self.remove_matching(|name| name.starts_with(&prefix))
    }

    /// Removes every slot file. Returns removed file count.
    pub fn clear(&self) -> CacheResult<usize> {
        self.remove_matching(|name| name.starts_with(SLOT_PREFIX))
    }

    fn slot_path(&self, quote_id: QuoteId, style: WallpaperStyle) -> PathBuf {
        self.dir.join(slot_file_name(quote_id, style))
    }

    fn remove_matching(&self, matches: impl Fn(&str) -> bool) -> CacheResult<usize> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(io_error("read_dir", &self.dir, err)),
        };

        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|err| io_error("read_dir", &self.dir, err))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if matches(name) {
                fs::remove_file(&path).map_err(|err| io_error("remove", &path, err))?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// File name for one cache slot.
pub fn slot_file_name(quote_id: QuoteId, style: WallpaperStyle) -> String {
    format!("{SLOT_PREFIX}{quote_id}_{}.{SLOT_EXTENSION}", style.as_str())
}

fn io_error(op: &'static str, path: &Path, source: io::Error) -> CacheError {
    CacheError::Io {
        op,
        path: path.to_path_buf(),
        source,
    }
}
