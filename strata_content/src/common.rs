use std::{
    fs, io,
    path::{Path, PathBuf},
    result,
};

use strata_shared::thiserror;

use crate::AssetId;

/// Extension of the sidecar file that holds the metadata of an asset.
pub const META_EXTENSION: &str = "meta";

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Asset already exists: {0}")]
    AlreadyExists(PathBuf),
    #[error("IoError: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),
    #[error("Failed to read the asset: {0}")]
    InvalidAssetData(PathBuf),
    #[error("Invalid meta file '{path}': {message}")]
    InvalidMeta { path: PathBuf, message: String },
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Failed to load model '{path}': {message}")]
    Model { path: PathBuf, message: String },
    #[error("Asset not found: {0}")]
    AssetNotFound(AssetId),
    #[error("Scene not found: {0}")]
    SceneNotFound(String),
    #[error("Invalid project file '{path}': {message}")]
    InvalidProject { path: PathBuf, message: String },
}

/// Locations the [`AssetManager`](crate::AssetManager) works with.
#[derive(Debug, Clone)]
pub struct Directories {
    assets: PathBuf,
    standard_assets: PathBuf,
}

impl Directories {
    /// Creates a new [`Directories`] without touching the file system.
    pub fn new(assets: impl Into<PathBuf>, standard_assets: impl Into<PathBuf>) -> Self {
        Self {
            assets: assets.into(),
            standard_assets: standard_assets.into(),
        }
    }

    /// Creates the asset folder if it doesn't exist yet.
    ///
    /// # Example
    ///
    /// ```rust
    /// use strata_content::Directories;
    /// let directories = Directories::create_all_dir("my_project/assets", "standard_assets").unwrap();
    /// assert!(directories.assets_path().is_dir());
    /// ```
    pub fn create_all_dir(assets: impl Into<PathBuf>, standard_assets: impl Into<PathBuf>) -> Result<Self> {
        let directories = Self::new(assets, standard_assets);
        fs::create_dir_all(&directories.assets)?;
        Ok(directories)
    }

    /// Checks that the asset folder exists and is a directory.
    pub fn check(&self) -> Result<()> {
        if !self.assets.is_dir() {
            return Err(Error::InvalidPath(self.assets.clone()));
        }
        Ok(())
    }

    /// Folder containing the assets of the project.
    pub fn assets_path(&self) -> &Path {
        &self.assets
    }

    /// Folder containing the images that are bundled with the editor.
    pub fn standard_assets_path(&self) -> &Path {
        &self.standard_assets
    }
}

/// Returns the path of the meta file that belongs to the given asset file: `<name>.<ext>.meta`.
pub fn meta_path_for(asset_file: &Path) -> PathBuf {
    let mut file_name = asset_file.file_name().unwrap_or_default().to_owned();
    file_name.push(".");
    file_name.push(META_EXTENSION);
    asset_file.with_file_name(file_name)
}

pub(crate) fn extract_extension_from_path(path: &Path) -> Result<String> {
    Ok(path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_lowercase())
        .ok_or(Error::InvalidPath(path.to_owned()))?
        .to_owned())
}

pub(crate) fn extract_file_name_from_path(path: &Path) -> Result<String> {
    Ok(path
        .file_name()
        .and_then(|file_name| file_name.to_str())
        .ok_or(Error::InvalidPath(path.to_owned()))?
        .to_owned())
}

/// Creates an empty file or leaves an existing one untouched.
pub(crate) fn touch(path: &Path) -> io::Result<()> {
    fs::OpenOptions::new().create(true).append(true).open(path).map(|_| ())
}

/// Removes the file when it exists. Returns whether a file was removed.
pub(crate) fn remove_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}
