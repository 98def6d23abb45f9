//! Sidecar metadata of assets.
//!
//! Every asset file `<name>.<ext>` is accompanied by a meta file `<name>.<ext>.meta`. The meta file
//! is a YAML document holding the identifier of the asset, the version of the meta format, the
//! time of the last modification, the [`AssetType`] and, depending on the type, a sub-record with
//! type-specific values.
//!
//! ```yaml
//! id: 3f1c0a9e8b7d4c2aa1e6f0b9d8c7e6f5
//! version: 1
//! last_modified: 1700000000000
//! type: TERRAIN
//! terrain:
//!   size: 1200
//!   uv: 60.0
//!   splat_base: chessboard
//! ```
//!
//! Meta files are always written in full. The new content is written to a temporary file
//! next to the meta file which then replaces the meta file.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use strata_shared::{
    epoch_millis_now,
    log::{error, trace},
};

use crate::{AssetId, Error, Result};

/// Version of the meta format that is written by this crate.
pub const CURRENT_META_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Texture,
    PixmapTexture,
    Model,
    Terrain,
    Material,
    Water,
    Skybox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaTexture {
    pub tileable: bool,
    pub generate_mipmaps: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaTerrain {
    pub size: u32,
    pub uv: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splatmap: Option<AssetId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splat_base: Option<AssetId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaWater {
    pub size: u32,
    pub tiling: f32,
    pub wave_strength: f32,
    pub wave_speed: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dudv_map: Option<AssetId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_map: Option<AssetId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaModel {
    /// Maps the material names of the model file to the material assets used by default.
    #[serde(default)]
    pub default_materials: BTreeMap<String, AssetId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(skip)]
    file: PathBuf,
    id: AssetId,
    pub version: u32,
    pub last_modified: i64,
    #[serde(rename = "type")]
    asset_type: AssetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<MetaTexture>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terrain: Option<MetaTerrain>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water: Option<MetaWater>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<MetaModel>,
}

impl Meta {
    /// Creates a new meta file with a fresh identifier at the given location and saves it immediately.
    ///
    /// Fails with [`Error::AlreadyExists`] if there is already a file at `path`. The existing
    /// file is left untouched in that case.
    pub fn create(path: impl Into<PathBuf>, asset_type: AssetType) -> Result<Self> {
        let file = path.into();
        if file.exists() {
            error!("Tried to create a meta file that already exists: {}", file.display());
            return Err(Error::AlreadyExists(file));
        }

        let meta = Self {
            file,
            id: AssetId::generate(),
            version: CURRENT_META_VERSION,
            last_modified: epoch_millis_now(),
            asset_type,
            texture: None,
            terrain: None,
            water: None,
            model: None,
        };
        meta.save()?;
        Ok(meta)
    }

    /// Reads the meta file at the given location.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let file = path.into();
        let content = fs::read_to_string(&file)?;
        let mut meta: Meta = serde_yaml::from_str(&content).map_err(|err| Error::InvalidMeta {
            path: file.clone(),
            message: err.to_string(),
        })?;
        meta.file = file;
        Ok(meta)
    }

    /// Writes the whole record to its file, replacing the previous content.
    pub fn save(&self) -> Result<()> {
        let tmp_file = tmp_path_for(&self.file);
        trace!("Writing meta file '{}'", self.file.display());
        {
            let mut writer = BufWriter::new(File::create(&tmp_file)?);
            serde_yaml::to_writer(&mut writer, self).map_err(|err| Error::InvalidMeta {
                path: self.file.clone(),
                message: err.to_string(),
            })?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        if let Err(err) = fs::rename(&tmp_file, &self.file) {
            let _ = fs::remove_file(&tmp_file);
            return Err(err.into());
        }
        Ok(())
    }

    /// Location of the meta file.
    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn id(&self) -> &AssetId {
        &self.id
    }

    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    /// Only the [`AssetIndex`](crate::AssetIndex) changes identifiers, see [`AssetIndex::rekey`](crate::AssetIndex::rekey).
    pub(crate) fn set_id(&mut self, id: AssetId) {
        self.id = id;
    }

    /// Sets the modification time to now.
    pub fn touch(&mut self) {
        self.last_modified = epoch_millis_now();
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut file_name = path.file_name().unwrap_or_default().to_owned();
    file_name.push(".tmp");
    path.with_file_name(file_name)
}
