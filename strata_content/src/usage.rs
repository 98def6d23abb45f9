//! Finds the references to an asset before it is deleted.
//!
//! An asset can be referenced by the objects of the project's scenes, by the skybox of a scene
//! and by other assets. References are never stored; they are collected on demand.

use std::fmt::Write;

use strata_shared::log::warn;

use crate::{asset::Asset, AssetId, Result};

/// Implemented by everything that can hold a reference to an asset.
pub trait AssetUsage {
    fn uses_asset(&self, asset: &Asset) -> bool;
}

/// A component that references exactly one asset.
impl AssetUsage for AssetId {
    fn uses_asset(&self, asset: &Asset) -> bool {
        self == asset.id()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    /// Names of the scenes of the project.
    pub scenes: Vec<String>,
}

pub struct Scene {
    pub name: String,
    pub objects: Vec<SceneObject>,
    pub skybox_asset_id: Option<AssetId>,
}

pub struct SceneObject {
    pub name: String,
    pub components: Vec<Box<dyn AssetUsage>>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
        }
    }

    pub fn with_component(mut self, component: impl AssetUsage + 'static) -> Self {
        self.components.push(Box::new(component));
        self
    }
}

impl AssetUsage for SceneObject {
    fn uses_asset(&self, asset: &Asset) -> bool {
        self.components.iter().any(|component| component.uses_asset(asset))
    }
}

/// Gives access to the open project and its scenes.
pub trait ProjectProvider {
    fn current(&self) -> &Project;
    fn load_scene(&self, project: &Project, name: &str) -> Result<Scene>;
}

/// A scene object that references an asset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ObjectUsage {
    pub scene: String,
    pub object: String,
}

/// The references that prevent an asset from being deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageConflict {
    /// The skybox is active in these scenes.
    Skybox { scenes: Vec<String> },
    Asset {
        objects: Vec<ObjectUsage>,
        /// Names of the assets that depend on the asset.
        assets: Vec<String>,
    },
}

impl UsageConflict {
    pub fn message(&self) -> &'static str {
        match self {
            UsageConflict::Skybox { .. } => {
                "Before deleting a skybox, remove usages of the skybox and save the scene. See details for usages."
            }
            UsageConflict::Asset { .. } => {
                "Before deleting an asset, remove usages of the asset and save the scene. See details for usages."
            }
        }
    }

    /// Lists the usages in two sections, the scene usages first.
    pub fn details(&self) -> String {
        let mut details = String::from("Scenes using asset:");
        match self {
            UsageConflict::Skybox { scenes } => {
                for scene in scenes {
                    let _ = write!(details, "\nScene: {scene}");
                }
                details.push_str("\n\nAssets using asset:");
            }
            UsageConflict::Asset { objects, assets } => {
                for usage in objects {
                    let _ = write!(details, "\nScene: {} Object name: {}", usage.scene, usage.object);
                }
                details.push_str("\n\nAssets using asset:");
                for asset in assets {
                    let _ = write!(details, "\nName: {asset}");
                }
            }
        }
        details
    }
}

/// Receives the conflicts found when deleting an asset.
pub trait Notifier {
    fn show_details(&self, message: &str, details: &str);
}

/// Writes the notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show_details(&self, message: &str, details: &str) {
        warn!("{message}\n{details}");
    }
}

/// Names of the scenes whose active skybox is the given asset.
pub fn find_skybox_usages(asset: &Asset, provider: &dyn ProjectProvider) -> Result<Vec<String>> {
    let project = provider.current();
    let mut scenes = Vec::new();
    for name in &project.scenes {
        let scene = provider.load_scene(project, name)?;
        if scene.skybox_asset_id.as_ref() == Some(asset.id()) {
            scenes.push(scene.name);
        }
    }
    Ok(scenes)
}

/// Scene objects of all scenes of the project that use the given asset.
pub fn find_object_usages(asset: &Asset, provider: &dyn ProjectProvider) -> Result<Vec<ObjectUsage>> {
    let project = provider.current();
    let mut usages = Vec::new();
    for name in &project.scenes {
        let scene = provider.load_scene(project, name)?;
        usages.extend(
            scene
                .objects
                .iter()
                .filter(|object| object.uses_asset(asset))
                .map(|object| ObjectUsage {
                    scene: scene.name.clone(),
                    object: object.name.clone(),
                }),
        );
    }
    Ok(usages)
}

/// Names of the assets that depend on the given asset.
pub fn find_asset_usages<'a>(asset: &Asset, assets: impl IntoIterator<Item = &'a Asset>) -> Vec<String> {
    assets
        .into_iter()
        .filter(|other| other.uses_asset(asset))
        .map(Asset::name)
        .collect()
}

/// Collects everything that prevents the deletion of the asset.
///
/// Skyboxes are only checked against the scenes' active skybox. Every other asset is checked
/// against the scene objects and the given assets.
pub fn find_usage_conflict<'a>(
    asset: &Asset,
    provider: &dyn ProjectProvider,
    assets: impl IntoIterator<Item = &'a Asset>,
) -> Result<Option<UsageConflict>> {
    if asset.as_skybox().is_some() {
        let scenes = find_skybox_usages(asset, provider)?;
        return Ok((!scenes.is_empty()).then_some(UsageConflict::Skybox { scenes }));
    }

    let objects = find_object_usages(asset, provider)?;
    let assets = find_asset_usages(asset, assets);
    if objects.is_empty() && assets.is_empty() {
        Ok(None)
    } else {
        Ok(Some(UsageConflict::Asset { objects, assets }))
    }
}
