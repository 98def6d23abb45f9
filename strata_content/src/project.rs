//! Projects stored as YAML files.
//!
//! ```text
//! my_project/
//! ├─ project.yaml
//! ├─ scenes/
//! │  ├─ main.yaml
//! ├─ assets/
//! │  ├─ grass.png
//! │  ├─ grass.png.meta
//! ```
//!
//! A scene file lists the objects of the scene together with the components that reference assets:
//!
//! ```yaml
//! skybox: 0c7d2e3b4a5f46e8b9a0c1d2e3f4a5b6
//! objects:
//!   - name: rock
//!     components:
//!       - type: model
//!         model: 5e4d3c2b1a0f4e9d8c7b6a5f4e3d2c1b
//!         materials:
//!           stone: 9a8b7c6d5e4f4a3b2c1d0e9f8a7b6c5d
//! ```

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use strata_shared::log::{info, trace};

use crate::{
    asset::Asset,
    usage::{AssetUsage, Project, ProjectProvider, Scene, SceneObject},
    AssetId, Error, Result,
};

pub const PROJECT_FILE: &str = "project.yaml";
pub const SCENES_FOLDER: &str = "scenes";
pub const ASSETS_FOLDER: &str = "assets";
pub const SCENE_EXTENSION: &str = "yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ProjectFile {
    name: String,
    #[serde(default)]
    scenes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skybox: Option<AssetId>,
    #[serde(default)]
    pub objects: Vec<SceneObjectFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObjectFile {
    pub name: String,
    #[serde(default)]
    pub components: Vec<SceneComponent>,
}

/// Components of a scene object that reference assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneComponent {
    Model {
        model: AssetId,
        /// Materials that replace the default materials of the model.
        #[serde(default)]
        materials: BTreeMap<String, AssetId>,
    },
    Terrain {
        terrain: AssetId,
    },
    Water {
        water: AssetId,
    },
    Material {
        material: AssetId,
    },
}

impl AssetUsage for SceneComponent {
    fn uses_asset(&self, asset: &Asset) -> bool {
        match self {
            SceneComponent::Model { model, materials } => {
                model == asset.id() || materials.values().any(|material| material == asset.id())
            }
            SceneComponent::Terrain { terrain } => terrain == asset.id(),
            SceneComponent::Water { water } => water == asset.id(),
            SceneComponent::Material { material } => material == asset.id(),
        }
    }
}

/// A project in a folder on disk.
#[derive(Debug)]
pub struct FileSystemProject {
    root: PathBuf,
    project: Project,
}

impl FileSystemProject {
    /// Creates the project file and the scene folder. Fails if the project file already exists.
    pub fn create(root: impl Into<PathBuf>, name: impl Into<String>) -> Result<Self> {
        let root = root.into();
        let project_file = root.join(PROJECT_FILE);
        if project_file.exists() {
            return Err(Error::AlreadyExists(project_file));
        }
        fs::create_dir_all(root.join(SCENES_FOLDER))?;
        let project = Self {
            root,
            project: Project {
                name: name.into(),
                scenes: Vec::new(),
            },
        };
        project.save_project_file()?;
        info!("Created project '{}' in '{}'", project.project.name, project.root.display());
        Ok(project)
    }

    /// Opens the project in the given folder.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let project_file: ProjectFile = read_yaml(&root.join(PROJECT_FILE))?;
        trace!("Opened project '{}' with {} scenes", project_file.name, project_file.scenes.len());
        Ok(Self {
            root,
            project: Project {
                name: project_file.name,
                scenes: project_file.scenes,
            },
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder containing the assets of the project.
    pub fn assets_path(&self) -> PathBuf {
        self.root.join(ASSETS_FOLDER)
    }

    pub fn scene_path(&self, name: &str) -> PathBuf {
        self.root.join(SCENES_FOLDER).join(format!("{name}.{SCENE_EXTENSION}"))
    }

    /// Writes the scene and adds it to the project if it is new.
    pub fn save_scene(&mut self, name: &str, scene: &SceneFile) -> Result<()> {
        let path = self.scene_path(name);
        let content = serde_yaml::to_string(scene).map_err(|err| Error::InvalidProject {
            path: path.clone(),
            message: err.to_string(),
        })?;
        fs::write(&path, content)?;
        if !self.project.scenes.iter().any(|scene| scene == name) {
            self.project.scenes.push(name.to_owned());
            self.save_project_file()?;
        }
        trace!("Saved scene '{name}'");
        Ok(())
    }

    /// Reads the scene file without converting it.
    pub fn read_scene_file(&self, name: &str) -> Result<SceneFile> {
        if !self.project.scenes.iter().any(|scene| scene == name) {
            return Err(Error::SceneNotFound(name.to_owned()));
        }
        read_yaml(&self.scene_path(name))
    }

    fn save_project_file(&self) -> Result<()> {
        let path = self.root.join(PROJECT_FILE);
        let project_file = ProjectFile {
            name: self.project.name.clone(),
            scenes: self.project.scenes.clone(),
        };
        let content = serde_yaml::to_string(&project_file).map_err(|err| Error::InvalidProject {
            path: path.clone(),
            message: err.to_string(),
        })?;
        fs::write(path, content)?;
        Ok(())
    }
}

impl ProjectProvider for FileSystemProject {
    fn current(&self) -> &Project {
        &self.project
    }

    fn load_scene(&self, project: &Project, name: &str) -> Result<Scene> {
        if !project.scenes.iter().any(|scene| scene == name) {
            return Err(Error::SceneNotFound(name.to_owned()));
        }
        let scene_file = self.read_scene_file(name)?;
        let objects = scene_file
            .objects
            .into_iter()
            .map(|object| {
                object
                    .components
                    .into_iter()
                    .fold(SceneObject::new(object.name), SceneObject::with_component)
            })
            .collect();
        Ok(Scene {
            name: name.to_owned(),
            objects,
            skybox_asset_id: scene_file.skybox,
        })
    }
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|err| Error::InvalidProject {
        path: path.to_owned(),
        message: err.to_string(),
    })
}
