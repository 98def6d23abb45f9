use std::path::Path;

use strata_shared::ByteColor4;

use crate::{asset::AssetCodec, meta::Meta, properties::Properties, AssetId, Error, Result};

pub const MATERIAL_EXTENSION: &str = "mat";

pub const PROP_DIFFUSE_COLOR: &str = "diffuseColor";
pub const PROP_DIFFUSE_TEXTURE: &str = "diffuseTexture";
pub const PROP_NORMAL_MAP: &str = "normalMap";
pub const PROP_OPACITY: &str = "opacity";
pub const PROP_SHININESS: &str = "shininess";

pub const DEFAULT_OPACITY: f32 = 1.0;
pub const DEFAULT_SHININESS: f32 = 0.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialAsset {
    pub diffuse_color: Option<ByteColor4>,
    pub diffuse_texture: Option<AssetId>,
    pub normal_map: Option<AssetId>,
    pub opacity: f32,
    pub shininess: f32,
}

impl Default for MaterialAsset {
    fn default() -> Self {
        Self {
            diffuse_color: None,
            diffuse_texture: None,
            normal_map: None,
            opacity: DEFAULT_OPACITY,
            shininess: DEFAULT_SHININESS,
        }
    }
}

impl MaterialAsset {
    /// Converts the material to its property list. Absent fields are absent keys.
    pub fn to_properties(&self) -> Properties {
        let mut properties = Properties::new();
        if let Some(diffuse_color) = &self.diffuse_color {
            properties.set(PROP_DIFFUSE_COLOR, diffuse_color.to_hex());
        }
        if let Some(diffuse_texture) = &self.diffuse_texture {
            properties.set(PROP_DIFFUSE_TEXTURE, diffuse_texture.as_str());
        }
        if let Some(normal_map) = &self.normal_map {
            properties.set(PROP_NORMAL_MAP, normal_map.as_str());
        }
        properties.set(PROP_OPACITY, self.opacity.to_string());
        properties.set(PROP_SHININESS, self.shininess.to_string());
        properties
    }

    pub fn from_properties(properties: &Properties, file: &Path) -> Result<Self> {
        let invalid = |_| Error::InvalidAssetData(file.to_owned());
        let diffuse_color = properties
            .get(PROP_DIFFUSE_COLOR)
            .map(|value| value.parse::<ByteColor4>().map_err(|_| Error::InvalidAssetData(file.to_owned())))
            .transpose()?;
        let opacity = properties
            .get(PROP_OPACITY)
            .map(|value| value.parse::<f32>().map_err(invalid))
            .transpose()?
            .unwrap_or(DEFAULT_OPACITY);
        let shininess = properties
            .get(PROP_SHININESS)
            .map(|value| value.parse::<f32>().map_err(invalid))
            .transpose()?
            .unwrap_or(DEFAULT_SHININESS);
        Ok(Self {
            diffuse_color,
            diffuse_texture: properties.get(PROP_DIFFUSE_TEXTURE).map(AssetId::from),
            normal_map: properties.get(PROP_NORMAL_MAP).map(AssetId::from),
            opacity,
            shininess,
        })
    }
}

impl AssetCodec for MaterialAsset {
    fn read(file: &Path, _meta: &Meta) -> Result<Self> {
        let properties = Properties::read_from_file(file)?;
        Self::from_properties(&properties, file)
    }

    fn write(&self, file: &Path, _meta: &mut Meta) -> Result<()> {
        self.to_properties().write_to_file(file)
    }

    fn dependencies(&self) -> Vec<AssetId> {
        self.diffuse_texture.iter().chain(self.normal_map.iter()).cloned().collect()
    }
}
