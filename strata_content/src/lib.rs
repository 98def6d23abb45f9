//! # Overview
//!
//! Crate for managing the assets of a level editor project.
//!
//! Every asset is a file in the asset folder of the project that is accompanied by a meta file
//! with the same name and the additional extension `.meta`. The meta file contains the
//! [identifier](AssetId) of the asset, its [type](AssetType) and values that are specific to
//! the type of the asset.
//!
//! ## Example:
//!
//! ```text
//! assets/
//! ├─ chessboard.png
//! ├─ chessboard.png.meta
//! ├─ hills.terra
//! ├─ hills.terra.meta
//! ├─ rock.mat
//! ├─ rock.mat.meta
//! ├─ lake.water
//! ├─ lake.water.meta
//! ```
//!
//! # Components
//!
//! The [`AssetManager`] creates, saves and deletes assets. It owns the [`AssetIndex`] containing
//! the loaded assets and the [`DirtyState`] which knows which assets still have to be saved.
//! Before an asset is deleted, the [`usage`] module looks for scene objects and other assets that
//! still reference it.

mod asset;
mod asset_id;
mod asset_index;
mod asset_manager;
mod common;
mod dirty_state;

pub mod material;
pub mod meta;
pub mod model;
pub mod project;
pub mod properties;
pub mod skybox;
pub mod terrain;
pub mod texture;
pub mod usage;
pub mod water;

pub use asset::*;
pub use asset_id::AssetId;
pub use asset_index::AssetIndex;
pub use asset_manager::*;
pub use common::{meta_path_for, Directories, Error, Result, META_EXTENSION};
pub use dirty_state::DirtyState;
pub use meta::{AssetType, Meta};
