use std::collections::BTreeSet;

use crate::AssetId;

/// Tracks which assets have to be written to disk.
///
/// An asset is either new (created but never saved), modified (saved and changed since) or clean.
/// It is never in both sets.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirtyState {
    new: BTreeSet<AssetId>,
    modified: BTreeSet<AssetId>,
}

impl DirtyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_new(&mut self, id: AssetId) {
        self.modified.remove(&id);
        self.new.insert(id);
    }

    /// Does nothing for assets that are new.
    pub fn mark_modified(&mut self, id: AssetId) {
        if !self.new.contains(&id) {
            self.modified.insert(id);
        }
    }

    pub fn is_new(&self, id: &AssetId) -> bool {
        self.new.contains(id)
    }

    pub fn is_modified(&self, id: &AssetId) -> bool {
        self.modified.contains(id)
    }

    pub fn new_assets(&self) -> &BTreeSet<AssetId> {
        &self.new
    }

    pub fn modified_assets(&self) -> &BTreeSet<AssetId> {
        &self.modified
    }

    pub fn clear_new(&mut self) {
        self.new.clear();
    }

    pub fn clear_modified(&mut self) {
        self.modified.clear();
    }

    /// Forgets the asset in both sets.
    pub fn remove(&mut self, id: &AssetId) {
        self.new.remove(id);
        self.modified.remove(id);
    }

    pub fn rekey(&mut self, old_id: &AssetId, new_id: AssetId) {
        if self.new.remove(old_id) {
            self.new.insert(new_id);
        } else if self.modified.remove(old_id) {
            self.modified.insert(new_id);
        }
    }
}
