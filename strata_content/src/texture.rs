use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::{
    asset::AssetCodec,
    meta::{Meta, MetaTexture},
    AssetId, Result,
};

/// An imported image. The file is a copy of the source image and is never rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureAsset {
    pub tileable: bool,
    pub generate_mipmaps: bool,
    width: u32,
    height: u32,
}

impl TextureAsset {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl AssetCodec for TextureAsset {
    fn read(file: &Path, meta: &Meta) -> Result<Self> {
        let (width, height) = image::image_dimensions(file)?;
        // Textures are always tileable and mipmapped unless the meta file says otherwise.
        let (tileable, generate_mipmaps) = meta
            .texture
            .as_ref()
            .map(|texture| (texture.tileable, texture.generate_mipmaps))
            .unwrap_or((true, true));
        Ok(Self {
            tileable,
            generate_mipmaps,
            width,
            height,
        })
    }

    fn write(&self, _file: &Path, meta: &mut Meta) -> Result<()> {
        meta.texture = Some(MetaTexture {
            tileable: self.tileable,
            generate_mipmaps: self.generate_mipmaps,
        });
        Ok(())
    }

    fn dependencies(&self) -> Vec<AssetId> {
        Vec::new()
    }
}

/// A texture that is painted in the editor, e.g. the splatmap of a terrain.
#[derive(Debug, Clone, PartialEq)]
pub struct PixmapTextureAsset {
    pixmap: RgbaImage,
}

impl PixmapTextureAsset {
    /// Creates a transparent square pixmap.
    pub fn blank(size: u32) -> Self {
        Self {
            pixmap: RgbaImage::new(size, size),
        }
    }

    pub fn pixmap(&self) -> &RgbaImage {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixmap
    }
}

impl AssetCodec for PixmapTextureAsset {
    fn read(file: &Path, _meta: &Meta) -> Result<Self> {
        let pixmap = image::open(file)?.into_rgba8();
        Ok(Self { pixmap })
    }

    fn write(&self, file: &Path, _meta: &mut Meta) -> Result<()> {
        self.pixmap.save_with_format(file, ImageFormat::Png)?;
        Ok(())
    }

    fn dependencies(&self) -> Vec<AssetId> {
        Vec::new()
    }
}
