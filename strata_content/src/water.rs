use std::path::Path;

use crate::{
    asset::AssetCodec,
    common::touch,
    meta::{Meta, MetaWater},
    AssetId, Error, Result,
};

pub const WATER_EXTENSION: &str = "water";

pub const DEFAULT_TILING: f32 = 0.04;
pub const DEFAULT_WAVE_STRENGTH: f32 = 0.04;
pub const DEFAULT_WAVE_SPEED: f32 = 0.03;

/// Water surface. All values live in the meta file; the `.water` file is an empty marker.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterAsset {
    pub size: u32,
    pub tiling: f32,
    pub wave_strength: f32,
    pub wave_speed: f32,
    pub dudv_map: Option<AssetId>,
    pub normal_map: Option<AssetId>,
}

impl WaterAsset {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            tiling: DEFAULT_TILING,
            wave_strength: DEFAULT_WAVE_STRENGTH,
            wave_speed: DEFAULT_WAVE_SPEED,
            dudv_map: None,
            normal_map: None,
        }
    }
}

impl AssetCodec for WaterAsset {
    fn read(_file: &Path, meta: &Meta) -> Result<Self> {
        let water = meta.water.as_ref().ok_or_else(|| Error::InvalidMeta {
            path: meta.file().to_owned(),
            message: "water record is missing".to_owned(),
        })?;
        Ok(Self {
            size: water.size,
            tiling: water.tiling,
            wave_strength: water.wave_strength,
            wave_speed: water.wave_speed,
            dudv_map: water.dudv_map.clone(),
            normal_map: water.normal_map.clone(),
        })
    }

    fn write(&self, file: &Path, meta: &mut Meta) -> Result<()> {
        touch(file)?;
        meta.water = Some(MetaWater {
            size: self.size,
            tiling: self.tiling,
            wave_strength: self.wave_strength,
            wave_speed: self.wave_speed,
            dudv_map: self.dudv_map.clone(),
            normal_map: self.normal_map.clone(),
        });
        Ok(())
    }

    fn dependencies(&self) -> Vec<AssetId> {
        self.dudv_map.iter().chain(self.normal_map.iter()).cloned().collect()
    }
}
