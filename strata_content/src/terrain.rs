//! Terrain assets.
//!
//! The height data of a terrain is stored in a `.terra` file. The file contains the heights of a
//! square grid with `resolution × resolution` vertices in row-major order. Every height is a
//! big-endian 32-bit float. There is no header and no padding, so the length of the file is
//! exactly `resolution² × 4` bytes.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use strata_shared::byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use crate::{
    asset::AssetCodec,
    meta::{Meta, MetaTerrain},
    AssetId, Error, Result,
};

pub const TERRA_EXTENSION: &str = "terra";

/// UV scale that new terrains start with.
pub const TERRAIN_DEFAULT_UV: f32 = 60.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TerrainAsset {
    resolution: u32,
    height_data: Vec<f32>,
    /// World size of the terrain.
    pub size: u32,
    pub uv: f32,
    /// Pixmap texture holding the blend weights of the terrain textures.
    pub splatmap: Option<AssetId>,
    /// Texture that is visible where the splatmap has no weight.
    pub splat_base: Option<AssetId>,
}

impl TerrainAsset {
    /// Creates a flat terrain with `vertex_resolution × vertex_resolution` heights of zero.
    pub fn flat(vertex_resolution: u32, size: u32) -> Self {
        let count = vertex_resolution as usize * vertex_resolution as usize;
        Self {
            resolution: vertex_resolution,
            height_data: vec![0.0; count],
            size,
            uv: TERRAIN_DEFAULT_UV,
            splatmap: None,
            splat_base: None,
        }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn height_data(&self) -> &[f32] {
        &self.height_data
    }

    /// Returns the height of the vertex in column `x` and row `z`.
    pub fn height(&self, x: u32, z: u32) -> Option<f32> {
        self.index(x, z).map(|index| self.height_data[index])
    }

    /// Sets the height of the vertex in column `x` and row `z`. Returns `false` when out of bounds.
    pub fn set_height(&mut self, x: u32, z: u32, height: f32) -> bool {
        match self.index(x, z) {
            Some(index) => {
                self.height_data[index] = height;
                true
            }
            None => false,
        }
    }

    fn index(&self, x: u32, z: u32) -> Option<usize> {
        (x < self.resolution && z < self.resolution).then(|| z as usize * self.resolution as usize + x as usize)
    }
}

impl AssetCodec for TerrainAsset {
    fn read(file: &Path, meta: &Meta) -> Result<Self> {
        let terrain = meta.terrain.as_ref().ok_or_else(|| Error::InvalidMeta {
            path: meta.file().to_owned(),
            message: "terrain record is missing".to_owned(),
        })?;
        let (resolution, height_data) = read_height_data(file)?;
        Ok(Self {
            resolution,
            height_data,
            size: terrain.size,
            uv: terrain.uv,
            splatmap: terrain.splatmap.clone(),
            splat_base: terrain.splat_base.clone(),
        })
    }

    fn write(&self, file: &Path, meta: &mut Meta) -> Result<()> {
        write_height_data(file, &self.height_data)?;
        meta.terrain = Some(MetaTerrain {
            size: self.size,
            uv: self.uv,
            splatmap: self.splatmap.clone(),
            splat_base: self.splat_base.clone(),
        });
        Ok(())
    }

    fn dependencies(&self) -> Vec<AssetId> {
        self.splatmap.iter().chain(self.splat_base.iter()).cloned().collect()
    }
}

/// Writes the heights as contiguous big-endian floats.
pub fn write_height_data(path: &Path, height_data: &[f32]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for height in height_data {
        writer.write_f32::<BigEndian>(*height)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a `.terra` file and returns the resolution of the grid together with the heights.
///
/// Fails with [`Error::InvalidAssetData`] when the file length doesn't describe a non-empty square grid.
pub fn read_height_data(path: &Path) -> Result<(u32, Vec<f32>)> {
    let bytes = std::fs::read(path)?;
    if bytes.is_empty() || bytes.len() % 4 != 0 {
        return Err(Error::InvalidAssetData(path.to_owned()));
    }
    let count = bytes.len() / 4;
    let resolution = (count as f64).sqrt().round() as usize;
    if resolution * resolution != count {
        return Err(Error::InvalidAssetData(path.to_owned()));
    }
    let mut height_data = vec![0.0; count];
    BigEndian::read_f32_into(&bytes, &mut height_data);
    Ok((resolution as u32, height_data))
}
