use std::collections::{btree_map::Entry, BTreeMap};

use strata_shared::log::trace;

use crate::{asset::Asset, AssetId, Error, Result};

/// Owns every loaded [`Asset`] of a project, keyed by its identifier.
#[derive(Debug, Default)]
pub struct AssetIndex {
    assets: BTreeMap<AssetId, Asset>,
}

impl AssetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, id: &AssetId) -> Option<&Asset> {
        self.assets.get(id)
    }

    pub fn find_mut(&mut self, id: &AssetId) -> Option<&mut Asset> {
        self.assets.get_mut(id)
    }

    /// Finds an asset by the file name of its payload, e.g. `grass.png`.
    pub fn find_by_file_name(&self, file_name: &str) -> Option<&Asset> {
        self.assets.values().find(|asset| asset.name() == file_name)
    }

    pub fn contains(&self, id: &AssetId) -> bool {
        self.assets.contains_key(id)
    }

    /// Inserts the asset. Fails with [`Error::AlreadyExists`] if the identifier is taken.
    pub fn add(&mut self, asset: Asset) -> Result<&mut Asset> {
        match self.assets.entry(asset.id().clone()) {
            Entry::Occupied(_) => Err(Error::AlreadyExists(asset.file().to_owned())),
            Entry::Vacant(entry) => Ok(entry.insert(asset)),
        }
    }

    pub fn remove(&mut self, id: &AssetId) -> Option<Asset> {
        self.assets.remove(id)
    }

    /// Moves the asset stored under `old_id` to `new_id` and rewrites the identifier in its meta.
    ///
    /// The meta file itself is not saved. Nothing changes when the call fails.
    pub fn rekey(&mut self, old_id: &AssetId, new_id: AssetId) -> Result<&mut Asset> {
        if old_id == &new_id {
            return self.assets.get_mut(old_id).ok_or_else(|| Error::AssetNotFound(old_id.clone()));
        }
        if let Some(existing) = self.assets.get(&new_id) {
            return Err(Error::AlreadyExists(existing.file().to_owned()));
        }
        let mut asset = self
            .assets
            .remove(old_id)
            .ok_or_else(|| Error::AssetNotFound(old_id.clone()))?;
        trace!("Rekeying asset '{}' from '{old_id}' to '{new_id}'", asset.name());
        asset.meta_mut().set_id(new_id.clone());
        Ok(self.assets.entry(new_id).or_insert(asset))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &AssetId> {
        self.assets.keys()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
