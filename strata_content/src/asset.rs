use std::path::{Path, PathBuf};

use strata_shared::log::trace;

use crate::{
    common::{extract_extension_from_path, extract_file_name_from_path, meta_path_for},
    material::MaterialAsset,
    meta::{AssetType, Meta},
    model::ModelAsset,
    skybox::SkyboxAsset,
    terrain::TerrainAsset,
    texture::{PixmapTextureAsset, TextureAsset},
    usage::AssetUsage,
    water::WaterAsset,
    AssetId, Error, Result, META_EXTENSION,
};

/// Reads and writes the payload of one asset kind.
///
/// `write` also updates the type-specific values of the [`Meta`] but never saves the meta file.
pub trait AssetCodec: Sized {
    fn read(file: &Path, meta: &Meta) -> Result<Self>;
    fn write(&self, file: &Path, meta: &mut Meta) -> Result<()>;

    /// Identifiers of the assets that are referenced by this asset.
    fn dependencies(&self) -> Vec<AssetId>;
}

#[derive(Debug, Clone)]
pub enum AssetKind {
    Texture(TextureAsset),
    PixmapTexture(PixmapTextureAsset),
    Model(ModelAsset),
    Terrain(TerrainAsset),
    Material(MaterialAsset),
    Water(WaterAsset),
    Skybox(SkyboxAsset),
}

impl AssetKind {
    pub fn asset_type(&self) -> AssetType {
        match self {
            AssetKind::Texture(_) => AssetType::Texture,
            AssetKind::PixmapTexture(_) => AssetType::PixmapTexture,
            AssetKind::Model(_) => AssetType::Model,
            AssetKind::Terrain(_) => AssetType::Terrain,
            AssetKind::Material(_) => AssetType::Material,
            AssetKind::Water(_) => AssetType::Water,
            AssetKind::Skybox(_) => AssetType::Skybox,
        }
    }

    pub fn read_payload(asset_type: AssetType, file: &Path, meta: &Meta) -> Result<Self> {
        Ok(match asset_type {
            AssetType::Texture => AssetKind::Texture(TextureAsset::read(file, meta)?),
            AssetType::PixmapTexture => AssetKind::PixmapTexture(PixmapTextureAsset::read(file, meta)?),
            AssetType::Model => AssetKind::Model(ModelAsset::read(file, meta)?),
            AssetType::Terrain => AssetKind::Terrain(TerrainAsset::read(file, meta)?),
            AssetType::Material => AssetKind::Material(MaterialAsset::read(file, meta)?),
            AssetType::Water => AssetKind::Water(WaterAsset::read(file, meta)?),
            AssetType::Skybox => AssetKind::Skybox(SkyboxAsset::read(file, meta)?),
        })
    }

    pub fn write_payload(&self, file: &Path, meta: &mut Meta) -> Result<()> {
        match self {
            AssetKind::Texture(texture) => texture.write(file, meta),
            AssetKind::PixmapTexture(pixmap) => pixmap.write(file, meta),
            AssetKind::Model(model) => model.write(file, meta),
            AssetKind::Terrain(terrain) => terrain.write(file, meta),
            AssetKind::Material(material) => material.write(file, meta),
            AssetKind::Water(water) => water.write(file, meta),
            AssetKind::Skybox(skybox) => skybox.write(file, meta),
        }
    }

    pub fn dependencies(&self) -> Vec<AssetId> {
        match self {
            AssetKind::Texture(texture) => texture.dependencies(),
            AssetKind::PixmapTexture(pixmap) => pixmap.dependencies(),
            AssetKind::Model(model) => model.dependencies(),
            AssetKind::Terrain(terrain) => terrain.dependencies(),
            AssetKind::Material(material) => material.dependencies(),
            AssetKind::Water(water) => water.dependencies(),
            AssetKind::Skybox(skybox) => skybox.dependencies(),
        }
    }
}

/// An asset file of the project together with its [`Meta`].
#[derive(Debug, Clone)]
pub struct Asset {
    file: PathBuf,
    meta: Meta,
    kind: AssetKind,
}

impl Asset {
    pub(crate) fn new(file: PathBuf, meta: Meta, kind: AssetKind) -> Self {
        Self { file, meta, kind }
    }

    /// Loads the asset that belongs to the given meta file.
    pub fn load(meta_path: &Path) -> Result<Self> {
        if extract_extension_from_path(meta_path)? != META_EXTENSION {
            return Err(Error::InvalidPath(meta_path.to_owned()));
        }
        let meta = Meta::load(meta_path)?;
        let file = meta_path.with_extension("");
        trace!("Loading {:?} asset '{}'", meta.asset_type(), file.display());
        let kind = AssetKind::read_payload(meta.asset_type(), &file, &meta)?;
        Ok(Self { file, meta, kind })
    }

    /// Writes the payload and the meta file. The modification time is set to now.
    pub fn save(&mut self) -> Result<()> {
        self.kind.write_payload(&self.file, &mut self.meta)?;
        self.meta.touch();
        self.meta.save()?;
        trace!("Saved asset '{}'", self.file.display());
        Ok(())
    }

    pub fn id(&self) -> &AssetId {
        self.meta.id()
    }

    /// File name of the payload file, e.g. `grass.png`.
    pub fn name(&self) -> String {
        extract_file_name_from_path(&self.file).unwrap_or_else(|_| self.file.display().to_string())
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn meta_file(&self) -> PathBuf {
        meta_path_for(&self.file)
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub(crate) fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }

    pub fn kind(&self) -> &AssetKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut AssetKind {
        &mut self.kind
    }

    pub fn asset_type(&self) -> AssetType {
        self.kind.asset_type()
    }

    pub fn dependencies(&self) -> Vec<AssetId> {
        self.kind.dependencies()
    }

    /// Every file on disk that belongs to the asset, the meta file last.
    pub fn files(&self) -> Vec<PathBuf> {
        let mut files = vec![self.file.clone()];
        if let AssetKind::Model(_) = self.kind {
            files.extend(ModelAsset::companion_file(&self.file));
        }
        files.push(self.meta_file());
        files
    }

    pub fn as_terrain(&self) -> Option<&TerrainAsset> {
        match &self.kind {
            AssetKind::Terrain(terrain) => Some(terrain),
            _ => None,
        }
    }

    pub fn as_terrain_mut(&mut self) -> Option<&mut TerrainAsset> {
        match &mut self.kind {
            AssetKind::Terrain(terrain) => Some(terrain),
            _ => None,
        }
    }

    pub fn as_material_mut(&mut self) -> Option<&mut MaterialAsset> {
        match &mut self.kind {
            AssetKind::Material(material) => Some(material),
            _ => None,
        }
    }

    pub fn as_model_mut(&mut self) -> Option<&mut ModelAsset> {
        match &mut self.kind {
            AssetKind::Model(model) => Some(model),
            _ => None,
        }
    }

    pub fn as_skybox(&self) -> Option<&SkyboxAsset> {
        match &self.kind {
            AssetKind::Skybox(skybox) => Some(skybox),
            _ => None,
        }
    }

    pub fn as_pixmap_mut(&mut self) -> Option<&mut PixmapTextureAsset> {
        match &mut self.kind {
            AssetKind::PixmapTexture(pixmap) => Some(pixmap),
            _ => None,
        }
    }
}

impl AssetUsage for Asset {
    fn uses_asset(&self, asset: &Asset) -> bool {
        self.id() != asset.id() && self.dependencies().contains(asset.id())
    }
}
