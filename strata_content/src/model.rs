use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use strata_shared::log::trace;

use crate::{
    asset::AssetCodec,
    common::extract_extension_from_path,
    meta::{Meta, MetaModel},
    AssetId, Error, Result,
};

pub const FORMAT_3D_GLTF: &str = "gltf";
pub const FORMAT_3D_GLB: &str = "glb";

/// Extension of the external binary buffer that accompanies a `.gltf` file.
pub const GLTF_BINARY_EXTENSION: &str = "bin";

/// An imported model file. The file is a copy of the source model and is never rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelAsset {
    material_names: Vec<String>,
    /// Material asset that is used for a material of the model file when a scene object doesn't override it.
    pub default_materials: BTreeMap<String, AssetId>,
}

impl ModelAsset {
    /// Names of the materials declared in the model file. Only known for glTF models.
    pub fn material_names(&self) -> &[String] {
        &self.material_names
    }

    pub fn set_default_material(&mut self, model_material: impl Into<String>, material: AssetId) {
        self.default_materials.insert(model_material.into(), material);
    }

    /// Returns the binary buffer file that has to travel with the model, e.g. `tree.bin` for `tree.gltf`.
    pub fn companion_file(file: &Path) -> Option<PathBuf> {
        let extension = extract_extension_from_path(file).ok()?;
        (extension == FORMAT_3D_GLTF).then(|| file.with_extension(GLTF_BINARY_EXTENSION))
    }

    /// Parses glTF files and returns the material names. Other formats are passed through unchecked.
    pub fn inspect(file: &Path) -> Result<Vec<String>> {
        let extension = extract_extension_from_path(file)?;
        if extension != FORMAT_3D_GLTF && extension != FORMAT_3D_GLB {
            trace!("Model '{}' is not a glTF file and is not inspected", file.display());
            return Ok(Vec::new());
        }
        let gltf = gltf::Gltf::open(file).map_err(|err| Error::Model {
            path: file.to_owned(),
            message: err.to_string(),
        })?;
        let material_names = gltf
            .document
            .materials()
            .enumerate()
            .map(|(index, material)| {
                material
                    .name()
                    .map(str::to_owned)
                    .unwrap_or_else(|| format!("material_{index}"))
            })
            .collect();
        Ok(material_names)
    }
}

impl AssetCodec for ModelAsset {
    fn read(file: &Path, meta: &Meta) -> Result<Self> {
        let material_names = Self::inspect(file)?;
        let default_materials = meta
            .model
            .as_ref()
            .map(|model| model.default_materials.clone())
            .unwrap_or_default();
        Ok(Self {
            material_names,
            default_materials,
        })
    }

    fn write(&self, _file: &Path, meta: &mut Meta) -> Result<()> {
        let model = meta.model.get_or_insert_with(MetaModel::default);
        for (model_material, material) in &self.default_materials {
            model.default_materials.insert(model_material.clone(), material.clone());
        }
        model
            .default_materials
            .retain(|model_material, _| self.default_materials.contains_key(model_material));
        Ok(())
    }

    fn dependencies(&self) -> Vec<AssetId> {
        self.default_materials.values().cloned().collect()
    }
}
