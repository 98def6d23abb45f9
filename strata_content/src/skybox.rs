use std::path::Path;

use crate::{asset::AssetCodec, meta::Meta, properties::Properties, AssetId, Error, Result};

pub const SKYBOX_EXTENSION: &str = "sky";

pub const PROP_POSITIVE_X: &str = "positiveX";
pub const PROP_NEGATIVE_X: &str = "negativeX";
pub const PROP_POSITIVE_Y: &str = "positiveY";
pub const PROP_NEGATIVE_Y: &str = "negativeY";
pub const PROP_POSITIVE_Z: &str = "positiveZ";
pub const PROP_NEGATIVE_Z: &str = "negativeZ";

/// Keys of the faces in the order in which they are written.
pub const FACE_KEYS: [&str; 6] = [
    PROP_POSITIVE_X,
    PROP_NEGATIVE_X,
    PROP_POSITIVE_Y,
    PROP_NEGATIVE_Y,
    PROP_POSITIVE_Z,
    PROP_NEGATIVE_Z,
];

/// A cube map made of six texture assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkyboxAsset {
    /// Texture identifiers in the order of [`FACE_KEYS`].
    faces: [AssetId; 6],
}

impl SkyboxAsset {
    pub fn new(faces: [AssetId; 6]) -> Self {
        Self { faces }
    }

    pub fn faces(&self) -> &[AssetId; 6] {
        &self.faces
    }

    pub fn set_faces(&mut self, faces: [AssetId; 6]) {
        self.faces = faces;
    }

    pub fn to_properties(&self) -> Properties {
        let mut properties = Properties::new();
        for (key, face) in FACE_KEYS.iter().zip(&self.faces) {
            properties.set(*key, face.as_str());
        }
        properties
    }

    /// Every face is required.
    pub fn from_properties(properties: &Properties, file: &Path) -> Result<Self> {
        let face = |key: &str| {
            properties
                .get(key)
                .map(AssetId::from)
                .ok_or_else(|| Error::InvalidAssetData(file.to_owned()))
        };
        Ok(Self::new([
            face(PROP_POSITIVE_X)?,
            face(PROP_NEGATIVE_X)?,
            face(PROP_POSITIVE_Y)?,
            face(PROP_NEGATIVE_Y)?,
            face(PROP_POSITIVE_Z)?,
            face(PROP_NEGATIVE_Z)?,
        ]))
    }
}

impl AssetCodec for SkyboxAsset {
    fn read(file: &Path, _meta: &Meta) -> Result<Self> {
        let properties = Properties::read_from_file(file)?;
        Self::from_properties(&properties, file)
    }

    fn write(&self, file: &Path, _meta: &mut Meta) -> Result<()> {
        self.to_properties().write_to_file(file)
    }

    fn dependencies(&self) -> Vec<AssetId> {
        self.faces.to_vec()
    }
}
