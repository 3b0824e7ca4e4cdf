//! The search-index boundary.
//!
//! Works, file sets and collections are persisted and indexed elsewhere;
//! manifests are always built from the already-committed documents this
//! boundary returns. [`Index`] is the lookup contract, [`MemoryIndex`] an
//! implementation over an in-process snapshot (also the test double).

use failure::Fail;
use plinth_error::ApiError;
use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path, sync::Arc};

use crate::models::{Collection, FileSet, Member, Resource};

pub type SharedIndex = Arc<dyn Index>;

pub type FindResourceResult<T> = Result<T, FindResourceError>;

/// Read-only lookup of committed repository state.
pub trait Index: Send + Sync {
    /// Find a work by its identifier.
    fn resource(&self, id: &str) -> FindResourceResult<Resource>;

    /// Find a file set by its identifier.
    fn file_set(&self, id: &str) -> FindResourceResult<FileSet>;

    /// All collections, unfiltered. Callers apply their own ability.
    fn collections(&self) -> FindResourceResult<Vec<Collection>>;

    /// Resolve a work's ordered member references.
    ///
    /// References the index no longer knows about are skipped, preserving
    /// the order of the rest.
    fn members(&self, resource: &Resource)
    -> FindResourceResult<Vec<Member>> {
        let mut members = Vec::with_capacity(resource.member_ids.len());

        for id in &resource.member_ids {
            if let Ok(fs) = self.file_set(id) {
                members.push(Member::FileSet(fs));
            } else if let Ok(work) = self.resource(id) {
                members.push(Member::Work(work));
            }
        }

        Ok(members)
    }

    /// A work's representative file set, if it has one.
    ///
    /// Falls back to the first file-set member when no representative is
    /// designated.
    fn representative(&self, resource: &Resource)
    -> FindResourceResult<Option<FileSet>> {
        if let Some(ref id) = resource.representative_id {
            if let Ok(fs) = self.file_set(id) {
                return Ok(Some(fs));
            }
        }

        Ok(self.members(resource)?
            .into_iter()
            .find_map(|member| match member {
                Member::FileSet(fs) => Some(fs),
                Member::Work(_) => None,
            }))
    }
}

#[derive(ApiError, Debug, Fail)]
pub enum FindResourceError {
    /// No document with the given identifier.
    #[fail(display = "No such resource")]
    #[api(code = "resource:not-found", status = "NOT_FOUND")]
    NotFound,
    /// The index itself failed to answer.
    #[fail(display = "Search index error: {}", _0)]
    #[api(internal)]
    Index(String),
}

/// An [`Index`] over documents held in memory.
///
/// The server preloads it from a JSON snapshot; tests populate it directly.
#[derive(Default)]
pub struct MemoryIndex {
    resources: HashMap<String, Resource>,
    file_sets: HashMap<String, FileSet>,
    collections: Vec<Collection>,
}

/// On-disk shape of an index snapshot.
#[derive(Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub file_sets: Vec<FileSet>,
    #[serde(default)]
    pub collections: Vec<Collection>,
}

impl MemoryIndex {
    pub fn new() -> MemoryIndex {
        MemoryIndex::default()
    }

    /// Load a snapshot file.
    pub fn load<P: AsRef<Path>>(path: P)
    -> Result<MemoryIndex, LoadSnapshotError> {
        let data = fs::read(path).map_err(LoadSnapshotError::Read)?;
        let snapshot = serde_json::from_slice(&data)
            .map_err(LoadSnapshotError::Parse)?;

        Ok(MemoryIndex::from_snapshot(snapshot))
    }

    pub fn from_snapshot(snapshot: Snapshot) -> MemoryIndex {
        let mut index = MemoryIndex::new();

        for resource in snapshot.resources {
            index.add_resource(resource);
        }
        for file_set in snapshot.file_sets {
            index.add_file_set(file_set);
        }
        for collection in snapshot.collections {
            index.add_collection(collection);
        }

        index
    }

    pub fn add_resource(&mut self, resource: Resource) {
        self.resources.insert(resource.id.clone(), resource);
    }

    pub fn add_file_set(&mut self, file_set: FileSet) {
        self.file_sets.insert(file_set.id.clone(), file_set);
    }

    pub fn add_collection(&mut self, collection: Collection) {
        self.collections.push(collection);
    }
}

impl Index for MemoryIndex {
    fn resource(&self, id: &str) -> FindResourceResult<Resource> {
        self.resources.get(id)
            .cloned()
            .ok_or(FindResourceError::NotFound)
    }

    fn file_set(&self, id: &str) -> FindResourceResult<FileSet> {
        self.file_sets.get(id)
            .cloned()
            .ok_or(FindResourceError::NotFound)
    }

    fn collections(&self) -> FindResourceResult<Vec<Collection>> {
        Ok(self.collections.clone())
    }
}

#[derive(Debug, Fail)]
pub enum LoadSnapshotError {
    #[fail(display = "Cannot read index snapshot: {}", _0)]
    Read(#[cause] std::io::Error),
    #[fail(display = "Invalid index snapshot: {}", _0)]
    Parse(#[cause] serde_json::Error),
}
