//! The lifecycle of the assets of a project.
//!
//! The [`AssetManager`] creates assets in the asset folder, keeps track of which of them have to be
//! saved and deletes them once nothing references them anymore. Every created asset starts out as
//! *new*. Saving an asset makes it clean; changing a saved asset has to be reported with
//! [`AssetManager::mark_modified`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use strata_shared::{
    log::{error, info, trace, warn},
    pathdiff,
    walkdir::WalkDir,
};

use crate::{
    asset::{Asset, AssetCodec, AssetKind},
    asset_index::AssetIndex,
    common::{extract_extension_from_path, extract_file_name_from_path, meta_path_for, remove_if_exists},
    dirty_state::DirtyState,
    material::{MaterialAsset, MATERIAL_EXTENSION},
    meta::{AssetType, Meta, MetaModel, MetaTexture},
    model::ModelAsset,
    skybox::{SkyboxAsset, SKYBOX_EXTENSION},
    terrain::{TerrainAsset, TERRA_EXTENSION},
    texture::{PixmapTextureAsset, TextureAsset},
    usage::{find_usage_conflict, LogNotifier, Notifier, ProjectProvider, UsageConflict},
    water::{WaterAsset, WATER_EXTENSION},
    AssetId, Directories, Error, Result, META_EXTENSION,
};

pub const STANDARD_ASSET_CHESSBOARD: &str = "chessboard";
pub const STANDARD_ASSET_DUDV: &str = "dudv";
pub const STANDARD_ASSET_WATER_NORMAL: &str = "waterNormal";

/// Identifiers of the standard assets and the images in the standard asset folder they are created from.
pub const STANDARD_ASSETS: [(&str, &str); 3] = [
    (STANDARD_ASSET_CHESSBOARD, "chessboard.png"),
    (STANDARD_ASSET_DUDV, "dudv.png"),
    (STANDARD_ASSET_WATER_NORMAL, "waterNormal.png"),
];

/// Number of hex characters in the file name of a pixmap texture.
const PIXMAP_NAME_LENGTH: usize = 5;

#[derive(Debug)]
pub enum DeleteOutcome {
    Deleted,
    /// The asset is still referenced. Nothing was changed.
    Blocked(UsageConflict),
}

#[derive(Debug)]
pub struct StandardAssetFailure {
    pub id: AssetId,
    pub error: Error,
}

/// Result of [`AssetManager::create_standard_assets`].
#[derive(Debug, Default)]
pub struct StandardAssetsReport {
    pub created: Vec<AssetId>,
    pub failures: Vec<StandardAssetFailure>,
}

impl StandardAssetsReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct AssetManager {
    directories: Directories,
    index: AssetIndex,
    dirty_state: DirtyState,
    notifier: Box<dyn Notifier>,
}

impl AssetManager {
    /// Creates an [`AssetManager`] without any assets. Fails if the asset folder doesn't exist.
    pub fn new(directories: Directories) -> Result<Self> {
        directories.check()?;
        info!("Creating AssetManager for '{directories:?}'");
        Ok(Self {
            directories,
            index: AssetIndex::new(),
            dirty_state: DirtyState::new(),
            notifier: Box::new(LogNotifier),
        })
    }

    /// Replaces the [`LogNotifier`] which receives the usages that block a deletion.
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn directories(&self) -> &Directories {
        &self.directories
    }

    pub fn index(&self) -> &AssetIndex {
        &self.index
    }

    pub fn dirty_state(&self) -> &DirtyState {
        &self.dirty_state
    }

    pub fn find(&self, id: &AssetId) -> Option<&Asset> {
        self.index.find(id)
    }

    /// Changes to the asset have to be reported with [`AssetManager::mark_modified`].
    pub fn find_mut(&mut self, id: &AssetId) -> Option<&mut Asset> {
        self.index.find_mut(id)
    }

    pub fn mark_new(&mut self, id: &AssetId) {
        self.dirty_state.mark_new(id.clone());
    }

    pub fn mark_modified(&mut self, id: &AssetId) {
        self.dirty_state.mark_modified(id.clone());
    }

    pub fn skybox_assets(&self) -> Vec<&Asset> {
        self.index.iter().filter(|asset| asset.as_skybox().is_some()).collect()
    }

    /// Loads every asset of the asset folder. Assets that can't be loaded are skipped.
    ///
    /// Returns the number of loaded assets.
    pub fn load_all(&mut self) -> Result<usize> {
        let path = self.directories.assets_path().to_owned();
        info!("Loading assets in path: {path:?}");

        let mut count = 0;
        for entry in WalkDir::new(&path) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Failed to read directory entry in WalkDir: {err}");
                    continue;
                }
            };
            if entry.path().is_dir() {
                continue;
            }
            match extract_extension_from_path(entry.path()) {
                Ok(extension) if extension == META_EXTENSION => {}
                _ => continue,
            }

            let relative_path = pathdiff::diff_paths(entry.path(), &path).unwrap_or_else(|| entry.path().to_owned());
            let asset = match Asset::load(entry.path()) {
                Ok(asset) => asset,
                Err(err) => {
                    warn!("Skipping asset '{}': {err}", relative_path.display());
                    continue;
                }
            };
            if let Err(err) = self.index.add(asset) {
                warn!("Skipping asset '{}': {err}", relative_path.display());
                continue;
            }
            trace!("Loaded asset '{}'", relative_path.display());
            count += 1;
        }

        info!("Loaded {count} assets");
        Ok(count)
    }

    /// Copies the image into the asset folder.
    pub fn create_texture_asset(&mut self, source: &Path) -> Result<&Asset> {
        let file = self.directories.assets_path().join(extract_file_name_from_path(source)?);
        self.create_asset(file, AssetType::Texture, Vec::new(), |file, meta| {
            fs::copy(source, file)?;
            trace!("Copied '{}' to '{}'", source.display(), file.display());
            meta.texture = Some(MetaTexture {
                tileable: true,
                generate_mipmaps: true,
            });
            Ok(AssetKind::Texture(TextureAsset::read(file, meta)?))
        })
    }

    /// Returns the texture with the file name of `source` if there is one, otherwise imports `source`.
    pub fn get_or_create_texture_asset(&mut self, source: &Path) -> Result<&Asset> {
        let file_name = extract_file_name_from_path(source)?;
        let existing = self
            .index
            .find_by_file_name(&file_name)
            .filter(|asset| asset.asset_type() == AssetType::Texture)
            .map(|asset| asset.id().clone());
        match existing {
            Some(id) => self.index.find(&id).ok_or(Error::AssetNotFound(id)),
            None => self.create_texture_asset(source),
        }
    }

    /// Creates a transparent square PNG with a random five character name.
    pub fn create_pixmap_texture_asset(&mut self, size: u32) -> Result<&Asset> {
        let name: String = AssetId::generate().as_str().chars().take(PIXMAP_NAME_LENGTH).collect();
        let file = self.directories.assets_path().join(format!("{name}.png"));
        self.create_asset(file, AssetType::PixmapTexture, Vec::new(), |_, _| {
            Ok(AssetKind::PixmapTexture(PixmapTextureAsset::blank(size)))
        })
    }

    /// Copies the model into the asset folder. The binary buffer of a `.gltf` file is copied along.
    pub fn create_model_asset(&mut self, source: &Path) -> Result<&Asset> {
        let file = self.directories.assets_path().join(extract_file_name_from_path(source)?);
        let companion = ModelAsset::companion_file(source)
            .filter(|companion| companion.exists())
            .zip(ModelAsset::companion_file(&file));
        if let Some((_, target)) = &companion {
            if target.exists() {
                error!("Tried to import a model whose binary buffer already exists: {}", target.display());
                return Err(Error::AlreadyExists(target.clone()));
            }
        }

        let created_files = companion.iter().map(|(_, target)| target.clone()).collect();
        self.create_asset(file, AssetType::Model, created_files, |file, meta| {
            fs::copy(source, file)?;
            if let Some((source_companion, target_companion)) = &companion {
                fs::copy(source_companion, target_companion)?;
                trace!("Copied binary buffer '{}'", source_companion.display());
            }
            meta.model = Some(MetaModel::default());
            Ok(AssetKind::Model(ModelAsset::read(file, meta)?))
        })
    }

    /// Creates a flat terrain. The chessboard standard asset becomes the splat base if it exists.
    ///
    /// Fails with [`Error::InvalidAssetData`] when `vertex_resolution` is zero.
    pub fn create_terrain_asset(&mut self, name: &str, vertex_resolution: u32, size: u32) -> Result<&Asset> {
        let file = self.directories.assets_path().join(format!("{name}.{TERRA_EXTENSION}"));
        if vertex_resolution == 0 {
            error!("Tried to create terrain '{name}' without any vertices");
            return Err(Error::InvalidAssetData(file));
        }
        let splat_base = self.standard_asset(STANDARD_ASSET_CHESSBOARD);
        self.create_asset(file, AssetType::Terrain, Vec::new(), move |_, _| {
            let mut terrain = TerrainAsset::flat(vertex_resolution, size);
            terrain.splat_base = splat_base;
            Ok(AssetKind::Terrain(terrain))
        })
    }

    pub fn create_material_asset(&mut self, name: &str) -> Result<&Asset> {
        let file = self.directories.assets_path().join(format!("{name}.{MATERIAL_EXTENSION}"));
        self.create_asset(file, AssetType::Material, Vec::new(), |_, _| {
            Ok(AssetKind::Material(MaterialAsset::default()))
        })
    }

    /// Faces in the order +X, -X, +Y, -Y, +Z, -Z.
    pub fn create_skybox_asset(&mut self, name: &str, faces: [AssetId; 6]) -> Result<&Asset> {
        let file = self.directories.assets_path().join(format!("{name}.{SKYBOX_EXTENSION}"));
        self.create_asset(file, AssetType::Skybox, Vec::new(), move |_, _| {
            Ok(AssetKind::Skybox(SkyboxAsset::new(faces)))
        })
    }

    /// Creates a water surface using the dudv and normal map standard assets if they exist.
    pub fn create_water_asset(&mut self, name: &str, size: u32) -> Result<&Asset> {
        let file = self.directories.assets_path().join(format!("{name}.{WATER_EXTENSION}"));
        let dudv_map = self.standard_asset(STANDARD_ASSET_DUDV);
        let normal_map = self.standard_asset(STANDARD_ASSET_WATER_NORMAL);
        self.create_asset(file, AssetType::Water, Vec::new(), move |_, _| {
            let mut water = WaterAsset::new(size);
            water.dudv_map = dudv_map;
            water.normal_map = normal_map;
            Ok(AssetKind::Water(water))
        })
    }

    /// Writes the asset and its meta file. Saving a terrain saves its splatmap as well.
    pub fn save_asset(&mut self, id: &AssetId) -> Result<()> {
        let asset = self.index.find_mut(id).ok_or_else(|| Error::AssetNotFound(id.clone()))?;
        asset.save()?;
        info!("Saved asset '{}'", asset.name());
        let splatmap = asset.as_terrain().and_then(|terrain| terrain.splatmap.clone());
        self.dirty_state.remove(id);

        if let Some(splatmap) = splatmap {
            match self.index.find_mut(&splatmap) {
                Some(pixmap) => {
                    pixmap.save()?;
                    trace!("Saved splatmap '{}'", pixmap.name());
                    self.dirty_state.remove(&splatmap);
                }
                None => warn!("Splatmap '{splatmap}' of terrain '{id}' is not loaded"),
            }
        }
        Ok(())
    }

    /// Saves every new and modified asset. Returns the number of saved assets.
    pub fn save_all(&mut self) -> Result<usize> {
        let ids: Vec<AssetId> = self
            .dirty_state
            .new_assets()
            .iter()
            .chain(self.dirty_state.modified_assets())
            .cloned()
            .collect();
        let mut count = 0;
        for id in ids {
            if !self.index.contains(&id) {
                warn!("Asset '{id}' is marked for saving but is not loaded");
                self.dirty_state.remove(&id);
                continue;
            }
            // Already saved along with its terrain.
            if !self.dirty_state.is_new(&id) && !self.dirty_state.is_modified(&id) {
                continue;
            }
            self.save_asset(&id)?;
            count += 1;
        }
        Ok(count)
    }

    /// Deletes the asset and its files unless a scene or another asset still references it.
    ///
    /// Usages are reported to the [`Notifier`] and returned as [`DeleteOutcome::Blocked`]. Deleting an
    /// asset that isn't loaded, for example one that was deleted before, does nothing.
    pub fn delete_asset(&mut self, id: &AssetId, provider: &dyn ProjectProvider) -> Result<DeleteOutcome> {
        let Some(asset) = self.index.find(id) else {
            warn!("Asset '{id}' is not loaded. Nothing to delete");
            self.dirty_state.remove(id);
            return Ok(DeleteOutcome::Deleted);
        };
        if let Some(conflict) = find_usage_conflict(asset, provider, self.index.iter())? {
            warn!("Asset '{}' is still in use and is not deleted", asset.name());
            self.notifier.show_details(conflict.message(), &conflict.details());
            return Ok(DeleteOutcome::Blocked(conflict));
        }

        let asset = self.index.remove(id).ok_or_else(|| Error::AssetNotFound(id.clone()))?;
        self.dirty_state.remove(id);
        delete_asset_files(&asset)?;
        info!("Deleted asset '{}'", asset.name());
        Ok(DeleteOutcome::Deleted)
    }

    /// Deletes the files of all new assets without looking for usages and forgets the assets.
    pub fn delete_new_unsaved_assets(&mut self) -> Result<()> {
        let ids: Vec<AssetId> = self.dirty_state.new_assets().iter().cloned().collect();
        let mut first_error = None;
        for id in ids {
            let Some(asset) = self.index.remove(&id) else {
                warn!("New asset '{id}' is not loaded");
                continue;
            };
            info!("Removing new unsaved asset: {}", asset.name());
            if let Err(err) = delete_asset_files(&asset) {
                error!("Failed to remove the files of asset '{}': {err}", asset.name());
                first_error.get_or_insert(err);
            }
        }
        self.dirty_state.clear_new();
        first_error.map_or(Ok(()), Err)
    }

    /// Creates the standard assets from the images in the standard asset folder.
    ///
    /// Failures don't stop the remaining standard assets from being created. They are logged and
    /// listed in the returned report.
    pub fn create_standard_assets(&mut self) -> StandardAssetsReport {
        let mut report = StandardAssetsReport::default();
        for (id, file_name) in STANDARD_ASSETS {
            let id = AssetId::from(id);
            let source = self.directories.standard_assets_path().join(file_name);
            match self.create_standard_asset(&source, id.clone()) {
                Ok(()) => {
                    info!("Created standard asset '{id}'");
                    report.created.push(id);
                }
                Err(err) => {
                    error!("Failed to create standard asset '{id}' from '{}': {err}", source.display());
                    report.failures.push(StandardAssetFailure { id, error: err });
                }
            }
        }
        report
    }

    /// Gives the asset a new identifier and saves its meta file.
    ///
    /// The meta file is written before the index changes. When writing fails, the asset keeps its
    /// old identifier everywhere.
    pub fn rekey_asset(&mut self, old_id: &AssetId, new_id: AssetId) -> Result<&Asset> {
        let asset = self.index.find(old_id).ok_or_else(|| Error::AssetNotFound(old_id.clone()))?;
        if old_id != &new_id {
            if let Some(existing) = self.index.find(&new_id) {
                return Err(Error::AlreadyExists(existing.file().to_owned()));
            }
        }
        let mut meta = asset.meta().clone();
        meta.set_id(new_id.clone());
        meta.save()?;

        let asset = self.index.rekey(old_id, new_id.clone())?;
        self.dirty_state.rekey(old_id, new_id);
        Ok(&*asset)
    }

    fn create_standard_asset(&mut self, source: &Path, id: AssetId) -> Result<()> {
        let created_id = self.create_texture_asset(source)?.id().clone();
        if let Err(err) = self.rekey_asset(&created_id, id) {
            if let Some(asset) = self.index.remove(&created_id) {
                self.dirty_state.remove(&created_id);
                delete_asset_files(&asset)?;
            }
            return Err(err);
        }
        Ok(())
    }

    fn standard_asset(&self, id: &str) -> Option<AssetId> {
        let asset = self.index.find(&AssetId::from(id)).map(|asset| asset.id().clone());
        if asset.is_none() {
            warn!("Standard asset '{id}' is not loaded");
        }
        asset
    }

    /// Creates the meta file, lets `build` write the payload and registers the new asset.
    ///
    /// Nothing is written if the asset file or its meta file already exists. On failure the files
    /// written so far, including `created_files`, are removed again.
    fn create_asset(
        &mut self,
        file: PathBuf,
        asset_type: AssetType,
        created_files: Vec<PathBuf>,
        build: impl FnOnce(&Path, &mut Meta) -> Result<AssetKind>,
    ) -> Result<&Asset> {
        let meta_path = meta_path_for(&file);
        if file.exists() && !meta_path.exists() {
            error!("Tried to create an asset that already exists: {}", file.display());
            return Err(Error::AlreadyExists(file));
        }
        let mut meta = Meta::create(&meta_path, asset_type)?;
        trace!("Created meta file '{}'", meta_path.display());

        let result = build(&file, &mut meta).and_then(|kind| {
            let mut asset = Asset::new(file.clone(), meta, kind);
            asset.save()?;
            Ok(asset)
        });
        let asset = match result {
            Ok(asset) => asset,
            Err(err) => {
                error!("Failed to create asset '{}': {err}", file.display());
                remove_created_files(created_files.iter().chain([&file, &meta_path]));
                return Err(err);
            }
        };

        info!("Created {:?} asset '{}' with id '{}'", asset_type, asset.name(), asset.id());
        let id = asset.id().clone();
        if let Err(err) = self.index.add(asset) {
            error!("Failed to register asset '{}': {err}", file.display());
            remove_created_files(created_files.iter().chain([&file, &meta_path]));
            return Err(err);
        }
        self.dirty_state.mark_new(id.clone());
        self.index.find(&id).ok_or(Error::AssetNotFound(id))
    }
}

fn remove_created_files<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) {
    for path in paths {
        if let Err(err) = remove_if_exists(path) {
            warn!("Failed to remove '{}': {err}", path.display());
        }
    }
}

/// Removes the payload, the binary buffer of a glTF model and the meta file of the asset.
///
/// Files that don't exist are skipped. Returns the number of removed files.
pub fn delete_asset_files(asset: &Asset) -> Result<usize> {
    let mut count = 0;
    for file in asset.files() {
        if remove_if_exists(&file)? {
            trace!("Removed '{}'", file.display());
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::BTreeSet, rc::Rc};

    use strata_shared::ByteColor4;
    use strata_test::{setup_logger, spectral::prelude::*, write_png};
    use tempdir::TempDir;

    use crate::{
        terrain::read_height_data,
        usage::{tests::MemoryProject, ObjectUsage},
    };

    use super::*;

    struct Fixture {
        root: TempDir,
        manager: AssetManager,
    }

    impl Fixture {
        fn new() -> Self {
            setup_logger();
            let root = TempDir::new("root").unwrap();
            let directories =
                Directories::create_all_dir(root.path().join("assets"), root.path().join("standard_assets")).unwrap();
            let manager = AssetManager::new(directories).unwrap();
            Self { root, manager }
        }

        fn with_standard_assets(self) -> Self {
            let standard_assets = self.root.path().join("standard_assets");
            fs::create_dir_all(&standard_assets).unwrap();
            for (_, file_name) in STANDARD_ASSETS {
                write_png(standard_assets.join(file_name), 8);
            }
            self
        }

        fn source_png(&self, name: &str) -> PathBuf {
            let folder = self.root.path().join("import");
            fs::create_dir_all(&folder).unwrap();
            let path = folder.join(name);
            write_png(&path, 4);
            path
        }

        fn asset_path(&self, name: &str) -> PathBuf {
            self.root.path().join("assets").join(name)
        }
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier(Rc<RefCell<Vec<(String, String)>>>);

    impl Notifier for RecordingNotifier {
        fn show_details(&self, message: &str, details: &str) {
            self.0.borrow_mut().push((message.to_owned(), details.to_owned()));
        }
    }

    #[test]
    fn missing_asset_folder() {
        let root = TempDir::new("root").unwrap();
        let directories = Directories::new(root.path().join("missing"), root.path().join("standard_assets"));
        assert!(matches!(AssetManager::new(directories), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn identifiers_are_unique() {
        // Given
        let mut fixture = Fixture::new();

        // When
        for i in 0..10 {
            fixture.manager.create_material_asset(&format!("material{i}")).unwrap();
            fixture.manager.create_pixmap_texture_asset(4).unwrap();
            fixture.manager.create_water_asset(&format!("water{i}"), 100).unwrap();
        }

        // Then
        let ids = fixture.manager.index().ids().collect::<BTreeSet<_>>();
        assert_eq!(ids.len(), 30);
        assert_eq!(fixture.manager.index().len(), 30);
        assert_eq!(fixture.manager.dirty_state().new_assets().len(), 30);
    }

    #[test]
    fn create_existing_asset() {
        // Given
        let mut fixture = Fixture::new();
        fixture.manager.create_material_asset("stone").unwrap();
        let meta_path = fixture.asset_path("stone.mat.meta");
        let content = fs::read_to_string(&meta_path).unwrap();

        // When
        let result = fixture.manager.create_material_asset("stone");

        // Then
        assert!(matches!(result, Err(Error::AlreadyExists(path)) if path == meta_path));
        assert_eq!(fs::read_to_string(&meta_path).unwrap(), content);
        assert_eq!(fixture.manager.index().len(), 1);
    }

    #[test]
    fn create_over_stray_payload() {
        let mut fixture = Fixture::new();
        fs::write(fixture.asset_path("stone.mat"), "opacity=0.5").unwrap();

        let result = fixture.manager.create_material_asset("stone");

        assert!(matches!(result, Err(Error::AlreadyExists(_))));
        assert_eq!(fs::read_to_string(fixture.asset_path("stone.mat")).unwrap(), "opacity=0.5");
        assert!(!fixture.asset_path("stone.mat.meta").exists());
    }

    #[test]
    fn modified_after_new() {
        let mut fixture = Fixture::new();
        let id = fixture.manager.create_material_asset("stone").unwrap().id().clone();

        fixture.manager.mark_modified(&id);

        assert!(fixture.manager.dirty_state().is_new(&id));
        assert!(!fixture.manager.dirty_state().is_modified(&id));
    }

    #[test]
    fn texture() {
        // Given
        let mut fixture = Fixture::new();
        let source = fixture.source_png("grass.png");

        // When
        let texture = fixture.manager.create_texture_asset(&source).unwrap();

        // Then
        assert_eq!(texture.name(), "grass.png");
        assert_eq!(texture.meta().texture, Some(MetaTexture { tileable: true, generate_mipmaps: true }));
        assert!(fixture.asset_path("grass.png").exists());
        assert!(fixture.asset_path("grass.png.meta").exists());
    }

    #[test]
    fn get_or_create_texture() {
        let mut fixture = Fixture::new();
        let source = fixture.source_png("grass.png");
        let id = fixture.manager.create_texture_asset(&source).unwrap().id().clone();

        let texture = fixture.manager.get_or_create_texture_asset(&source).unwrap();

        assert_eq!(texture.id(), &id);
        assert_eq!(fixture.manager.index().len(), 1);
    }

    #[test]
    fn failed_import_leaves_no_files() {
        let mut fixture = Fixture::new();
        let source = fixture.root.path().join("missing.png");

        let result = fixture.manager.create_texture_asset(&source);

        assert!(matches!(result, Err(Error::IoError(_))));
        assert!(!fixture.asset_path("missing.png.meta").exists());
        assert!(fixture.manager.index().is_empty());
    }

    #[test]
    fn pixmap_texture() {
        let mut fixture = Fixture::new();

        let pixmap = fixture.manager.create_pixmap_texture_asset(16).unwrap();

        let name = pixmap.name();
        assert_eq!(name.len(), PIXMAP_NAME_LENGTH + ".png".len());
        assert!(name.ends_with(".png"));
        assert_eq!(image::image_dimensions(pixmap.file()).unwrap(), (16, 16));
    }

    #[test]
    fn terrain() {
        // Given
        let mut fixture = Fixture::new().with_standard_assets();
        assert!(fixture.manager.create_standard_assets().is_complete());

        // When
        let terrain = fixture.manager.create_terrain_asset("hills", 129, 1200).unwrap();

        // Then
        let terrain_asset = terrain.as_terrain().unwrap();
        assert_eq!(terrain_asset.splat_base, Some(AssetId::from(STANDARD_ASSET_CHESSBOARD)));
        assert_eq!(terrain.meta().terrain.as_ref().unwrap().size, 1200);
        let file_length = fs::metadata(fixture.asset_path("hills.terra")).unwrap().len();
        assert_eq!(file_length, 129 * 129 * 4);
    }

    #[test]
    fn terrain_without_vertices() {
        let mut fixture = Fixture::new();

        let result = fixture.manager.create_terrain_asset("flat", 0, 100);

        assert!(matches!(result, Err(Error::InvalidAssetData(_))));
        assert!(!fixture.asset_path("flat.terra").exists());
        assert!(!fixture.asset_path("flat.terra.meta").exists());
        assert!(fixture.manager.index().is_empty());
        assert!(fixture.manager.dirty_state().new_assets().is_empty());
    }

    #[test]
    fn terrain_without_standard_assets() {
        let mut fixture = Fixture::new();
        let terrain = fixture.manager.create_terrain_asset("hills", 2, 100).unwrap();
        assert_eq!(terrain.as_terrain().unwrap().splat_base, None);
    }

    #[test]
    fn saving_terrain_saves_splatmap() {
        // Given
        let mut fixture = Fixture::new();
        let terrain_id = fixture.manager.create_terrain_asset("hills", 4, 100).unwrap().id().clone();
        let splatmap_id = fixture.manager.create_pixmap_texture_asset(4).unwrap().id().clone();
        fixture.manager.save_all().unwrap();

        // When
        let splatmap = fixture.manager.find_mut(&splatmap_id).unwrap();
        splatmap.as_pixmap_mut().unwrap().pixmap_mut().put_pixel(1, 1, image::Rgba([255, 0, 0, 255]));
        let splatmap_file = splatmap.file().to_owned();
        let terrain = fixture.manager.find_mut(&terrain_id).unwrap().as_terrain_mut().unwrap();
        terrain.splatmap = Some(splatmap_id.clone());
        terrain.set_height(2, 3, 7.5);
        fixture.manager.mark_modified(&terrain_id);
        fixture.manager.save_asset(&terrain_id).unwrap();

        // Then
        let (resolution, height_data) = read_height_data(&fixture.asset_path("hills.terra")).unwrap();
        assert_eq!(resolution, 4);
        assert_eq!(height_data[3 * 4 + 2], 7.5);
        let pixmap = image::open(splatmap_file).unwrap().into_rgba8();
        assert_eq!(*pixmap.get_pixel(1, 1), image::Rgba([255, 0, 0, 255]));
        assert!(fixture.manager.dirty_state().modified_assets().is_empty());
    }

    #[test]
    fn material_roundtrip() {
        // Given
        let mut fixture = Fixture::new();
        let id = fixture.manager.create_material_asset("stone").unwrap().id().clone();
        let material = MaterialAsset {
            diffuse_color: Some(ByteColor4::new(12, 34, 56, 255)),
            diffuse_texture: Some(AssetId::generate()),
            normal_map: None,
            opacity: 0.3,
            shininess: 12.125,
        };

        // When
        *fixture.manager.find_mut(&id).unwrap().as_material_mut().unwrap() = material.clone();
        fixture.manager.save_asset(&id).unwrap();
        let loaded = Asset::load(&fixture.asset_path("stone.mat.meta")).unwrap();

        // Then
        assert_eq!(loaded.id(), &id);
        match loaded.kind() {
            AssetKind::Material(loaded) => {
                assert_eq!(loaded, &material);
                assert_eq!(loaded.opacity.to_bits(), material.opacity.to_bits());
                assert_eq!(loaded.normal_map, None);
            }
            kind => panic!("expected a material, got {kind:?}"),
        }
    }

    #[test]
    fn water() {
        let mut fixture = Fixture::new().with_standard_assets();
        fixture.manager.create_standard_assets();

        let water = fixture.manager.create_water_asset("lake", 500).unwrap();

        let water_asset = match water.kind() {
            AssetKind::Water(water) => water.clone(),
            kind => panic!("expected water, got {kind:?}"),
        };
        assert_eq!(water_asset.dudv_map, Some(AssetId::from(STANDARD_ASSET_DUDV)));
        assert_eq!(water_asset.normal_map, Some(AssetId::from(STANDARD_ASSET_WATER_NORMAL)));
        assert_eq!(water.meta().water.as_ref().unwrap().size, 500);
        assert_eq!(fs::metadata(fixture.asset_path("lake.water")).unwrap().len(), 0);
    }

    #[test]
    fn skybox_assets() {
        let mut fixture = Fixture::new();
        let faces = std::array::from_fn(|_| AssetId::generate());
        fixture.manager.create_skybox_asset("day", faces).unwrap();
        fixture.manager.create_material_asset("stone").unwrap();

        let skyboxes = fixture.manager.skybox_assets();

        assert_that(&skyboxes).has_length(1);
        assert_eq!(skyboxes[0].name(), "day.sky");
    }

    #[test]
    fn gltf_model_with_binary_buffer() {
        // Given
        let mut fixture = Fixture::new();
        let import = fixture.root.path().join("import");
        fs::create_dir_all(&import).unwrap();
        fs::write(
            import.join("tree.gltf"),
            r#"{ "asset": { "version": "2.0" }, "materials": [ { "name": "bark" } ] }"#,
        )
        .unwrap();
        fs::write(import.join("tree.bin"), [0u8; 4]).unwrap();

        // When
        let model = fixture.manager.create_model_asset(&import.join("tree.gltf")).unwrap();
        let id = model.id().clone();

        // Then
        match model.kind() {
            AssetKind::Model(model) => assert_eq!(model.material_names(), ["bark".to_owned()]),
            kind => panic!("expected a model, got {kind:?}"),
        }
        assert!(fixture.asset_path("tree.bin").exists());

        // When
        let outcome = fixture.manager.delete_asset(&id, &MemoryProject::default()).unwrap();

        // Then
        assert!(matches!(outcome, DeleteOutcome::Deleted));
        assert!(!fixture.asset_path("tree.gltf").exists());
        assert!(!fixture.asset_path("tree.bin").exists());
        assert!(!fixture.asset_path("tree.gltf.meta").exists());
    }

    #[test]
    fn delete_blocked_by_scene_object() {
        // Given
        let notifier = RecordingNotifier::default();
        let mut fixture = Fixture::new();
        fixture.manager = fixture.manager.with_notifier(notifier.clone());
        let id = fixture.manager.create_material_asset("stone").unwrap().id().clone();
        fixture.manager.save_all().unwrap();
        let provider = MemoryProject::default().with_scene("main", None, vec![("rock", vec![id.clone()])]);

        // When
        let outcome = fixture.manager.delete_asset(&id, &provider).unwrap();

        // Then
        match outcome {
            DeleteOutcome::Blocked(UsageConflict::Asset { objects, assets }) => {
                assert_eq!(
                    objects,
                    vec![ObjectUsage {
                        scene: "main".to_owned(),
                        object: "rock".to_owned(),
                    }]
                );
                assert!(assets.is_empty());
            }
            outcome => panic!("expected a blocked deletion, got {outcome:?}"),
        }
        assert!(fixture.asset_path("stone.mat").exists());
        assert!(fixture.asset_path("stone.mat.meta").exists());
        assert!(fixture.manager.find(&id).is_some());
        assert_eq!(notifier.0.borrow().len(), 1);
    }

    #[test]
    fn delete_blocked_by_asset() {
        // Given
        let mut fixture = Fixture::new();
        let source = fixture.source_png("grass.png");
        let texture_id = fixture.manager.create_texture_asset(&source).unwrap().id().clone();
        let material_id = fixture.manager.create_material_asset("grass").unwrap().id().clone();
        fixture.manager.find_mut(&material_id).unwrap().as_material_mut().unwrap().diffuse_texture =
            Some(texture_id.clone());

        // When
        let outcome = fixture.manager.delete_asset(&texture_id, &MemoryProject::default()).unwrap();

        // Then
        assert!(matches!(
            outcome,
            DeleteOutcome::Blocked(UsageConflict::Asset { objects, assets })
                if objects.is_empty() && assets == vec!["grass.mat".to_owned()]
        ));
        assert!(fixture.asset_path("grass.png").exists());
    }

    #[test]
    fn delete_unused_asset() {
        // Given
        let mut fixture = Fixture::new();
        let id = fixture.manager.create_material_asset("stone").unwrap().id().clone();
        fixture.manager.save_all().unwrap();
        let asset = fixture.manager.find(&id).unwrap().clone();
        let provider = MemoryProject::default().with_scene("main", None, vec![("rock", vec![])]);

        // When
        let outcome = fixture.manager.delete_asset(&id, &provider).unwrap();

        // Then
        assert!(matches!(outcome, DeleteOutcome::Deleted));
        assert!(!fixture.asset_path("stone.mat").exists());
        assert!(!fixture.asset_path("stone.mat.meta").exists());
        assert!(fixture.manager.find(&id).is_none());
        assert_eq!(delete_asset_files(&asset).unwrap(), 0);
    }

    #[test]
    fn delete_unknown_asset() {
        let mut fixture = Fixture::new();
        let result = fixture.manager.delete_asset(&AssetId::generate(), &MemoryProject::default());
        assert!(matches!(result, Ok(DeleteOutcome::Deleted)));
    }

    #[test]
    fn delete_twice() {
        // Given
        let mut fixture = Fixture::new();
        let id = fixture.manager.create_material_asset("stone").unwrap().id().clone();
        fixture.manager.save_all().unwrap();
        let provider = MemoryProject::default();

        // When
        let first = fixture.manager.delete_asset(&id, &provider).unwrap();
        let second = fixture.manager.delete_asset(&id, &provider).unwrap();

        // Then
        assert!(matches!(first, DeleteOutcome::Deleted));
        assert!(matches!(second, DeleteOutcome::Deleted));
        assert!(!fixture.asset_path("stone.mat").exists());
        assert!(!fixture.asset_path("stone.mat.meta").exists());
        assert!(fixture.manager.index().is_empty());
    }

    #[test]
    fn delete_skybox_blocked_by_scene() {
        // Given
        let mut fixture = Fixture::new();
        let faces = std::array::from_fn(|_| AssetId::generate());
        let id = fixture.manager.create_skybox_asset("day", faces).unwrap().id().clone();
        let provider = MemoryProject::default()
            .with_scene("main", Some(id.clone()), vec![])
            .with_scene("cave", None, vec![]);

        // When
        let outcome = fixture.manager.delete_asset(&id, &provider).unwrap();

        // Then
        assert!(matches!(
            outcome,
            DeleteOutcome::Blocked(UsageConflict::Skybox { scenes }) if scenes == vec!["main".to_owned()]
        ));
        assert!(fixture.asset_path("day.sky").exists());
    }

    #[test]
    fn delete_new_unsaved_assets() {
        // Given
        let mut fixture = Fixture::new();
        let saved = fixture.manager.create_material_asset("saved").unwrap().id().clone();
        fixture.manager.save_all().unwrap();
        let stone = fixture.manager.create_material_asset("stone").unwrap().id().clone();
        let sky = fixture
            .manager
            .create_skybox_asset("day", std::array::from_fn(|_| stone.clone()))
            .unwrap()
            .id()
            .clone();

        // When
        fixture.manager.delete_new_unsaved_assets().unwrap();

        // Then
        assert!(fixture.manager.dirty_state().new_assets().is_empty());
        for name in ["stone.mat", "stone.mat.meta", "day.sky", "day.sky.meta"] {
            assert!(!fixture.asset_path(name).exists(), "{name} still exists");
        }
        assert!(fixture.manager.find(&stone).is_none());
        assert!(fixture.manager.find(&sky).is_none());
        assert!(fixture.manager.find(&saved).is_some());
        assert!(fixture.asset_path("saved.mat").exists());
    }

    #[test]
    fn standard_assets() {
        // Given
        let mut fixture = Fixture::new().with_standard_assets();

        // When
        let report = fixture.manager.create_standard_assets();

        // Then
        assert!(report.is_complete());
        assert_eq!(
            report.created,
            vec![
                AssetId::from(STANDARD_ASSET_CHESSBOARD),
                AssetId::from(STANDARD_ASSET_DUDV),
                AssetId::from(STANDARD_ASSET_WATER_NORMAL),
            ]
        );
        let chessboard = fixture.manager.find(&AssetId::from(STANDARD_ASSET_CHESSBOARD)).unwrap();
        assert_eq!(chessboard.name(), "chessboard.png");
        let meta = Meta::load(fixture.asset_path("chessboard.png.meta")).unwrap();
        assert_eq!(meta.id(), &AssetId::from(STANDARD_ASSET_CHESSBOARD));
        assert!(fixture.manager.dirty_state().is_new(&AssetId::from(STANDARD_ASSET_CHESSBOARD)));
        assert_eq!(fixture.manager.index().len(), 3);
    }

    #[test]
    fn rekey() {
        // Given
        let mut fixture = Fixture::new();
        let source = fixture.source_png("grass.png");
        let old_id = fixture.manager.create_texture_asset(&source).unwrap().id().clone();

        // When
        let asset = fixture.manager.rekey_asset(&old_id, AssetId::from("grass")).unwrap();

        // Then
        assert_eq!(asset.id(), &AssetId::from("grass"));
        let meta = Meta::load(fixture.asset_path("grass.png.meta")).unwrap();
        assert_eq!(meta.id(), &AssetId::from("grass"));
        assert!(fixture.manager.find(&old_id).is_none());
        assert!(fixture.manager.dirty_state().is_new(&AssetId::from("grass")));
        assert!(!fixture.manager.dirty_state().is_new(&old_id));
    }

    #[test]
    fn failed_rekey_keeps_old_id() {
        // Given
        let mut fixture = Fixture::new();
        let source = fixture.source_png("grass.png");
        let old_id = fixture.manager.create_texture_asset(&source).unwrap().id().clone();
        let blocker = fixture.asset_path("grass.png.meta.tmp");
        fs::create_dir_all(&blocker).unwrap();

        // When
        let result = fixture.manager.rekey_asset(&old_id, AssetId::from(STANDARD_ASSET_CHESSBOARD));

        // Then
        assert!(matches!(result, Err(Error::IoError(_))));
        assert!(fixture.manager.find(&old_id).is_some());
        assert!(fixture.manager.find(&AssetId::from(STANDARD_ASSET_CHESSBOARD)).is_none());
        assert!(fixture.manager.dirty_state().is_new(&old_id));
        let meta = Meta::load(fixture.asset_path("grass.png.meta")).unwrap();
        assert_eq!(meta.id(), &old_id);

        // When
        fs::remove_dir(&blocker).unwrap();
        fixture.manager.delete_new_unsaved_assets().unwrap();

        // Then
        assert!(!fixture.asset_path("grass.png").exists());
        assert!(!fixture.asset_path("grass.png.meta").exists());
        assert!(fixture.manager.index().is_empty());
    }

    #[test]
    fn rekey_onto_taken_id() {
        let mut fixture = Fixture::new();
        let stone = fixture.manager.create_material_asset("stone").unwrap().id().clone();
        let sand = fixture.manager.create_material_asset("sand").unwrap().id().clone();

        let result = fixture.manager.rekey_asset(&stone, sand.clone());

        assert!(matches!(result, Err(Error::AlreadyExists(_))));
        let meta = Meta::load(fixture.asset_path("stone.mat.meta")).unwrap();
        assert_eq!(meta.id(), &stone);
        assert!(fixture.manager.dirty_state().is_new(&stone));
    }

    #[test]
    fn created_assets_are_registered() {
        let mut fixture = Fixture::new();
        fixture.manager.create_material_asset("stone").unwrap();
        fixture.manager.create_water_asset("lake", 10).unwrap();
        fixture.manager.create_terrain_asset("hills", 2, 10).unwrap();

        for id in fixture.manager.dirty_state().new_assets() {
            assert!(fixture.manager.index().contains(id), "{id} is new but not indexed");
        }
        assert_eq!(fixture.manager.dirty_state().new_assets().len(), fixture.manager.index().len());
    }

    #[test]
    fn standard_assets_are_best_effort() {
        // Given
        let mut fixture = Fixture::new();
        let standard_assets = fixture.root.path().join("standard_assets");
        fs::create_dir_all(&standard_assets).unwrap();
        write_png(standard_assets.join("dudv.png"), 8);

        // When
        let report = fixture.manager.create_standard_assets();

        // Then
        assert!(!report.is_complete());
        assert_eq!(report.created, vec![AssetId::from(STANDARD_ASSET_DUDV)]);
        let failed = report.failures.iter().map(|failure| failure.id.clone()).collect::<Vec<_>>();
        assert_eq!(
            failed,
            vec![AssetId::from(STANDARD_ASSET_CHESSBOARD), AssetId::from(STANDARD_ASSET_WATER_NORMAL)]
        );
    }

    #[test]
    fn save_all() {
        // Given
        let mut fixture = Fixture::new();
        let id = fixture.manager.create_material_asset("stone").unwrap().id().clone();
        fixture.manager.create_water_asset("lake", 10).unwrap();
        assert_eq!(fixture.manager.save_all().unwrap(), 2);

        // When
        fixture.manager.find_mut(&id).unwrap().as_material_mut().unwrap().shininess = 4.0;
        fixture.manager.mark_modified(&id);
        let saved = fixture.manager.save_all().unwrap();

        // Then
        assert_eq!(saved, 1);
        assert!(fixture.manager.dirty_state().new_assets().is_empty());
        assert!(fixture.manager.dirty_state().modified_assets().is_empty());
        let content = fs::read_to_string(fixture.asset_path("stone.mat")).unwrap();
        assert!(content.contains("shininess=4"));
    }

    #[test]
    fn load_all() {
        // Given
        let mut fixture = Fixture::new();
        let source = fixture.source_png("grass.png");
        fixture.manager.create_texture_asset(&source).unwrap();
        fixture.manager.create_terrain_asset("hills", 8, 100).unwrap();
        fixture.manager.create_material_asset("stone").unwrap();
        fixture.manager.save_all().unwrap();
        fs::write(fixture.asset_path("broken.mat.meta"), "not: [valid").unwrap();
        let directories = fixture.manager.directories().clone();

        // When
        let mut manager = AssetManager::new(directories).unwrap();
        let count = manager.load_all().unwrap();

        // Then
        assert_eq!(count, 3);
        assert!(manager.index().find_by_file_name("hills.terra").is_some());
        assert!(manager.index().find_by_file_name("broken.mat").is_none());
        assert!(manager.dirty_state().new_assets().is_empty());
    }
}
