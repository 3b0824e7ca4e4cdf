//! Canonical URLs for repository documents.
//!
//! Construction is pure: the same (resource, endpoint, protocol) triple
//! always yields the same string. The only recoverable failure is a missing
//! host configuration.

use failure::Fail;
use plinth_error::ApiError;
use plinth_models::{Config, Index, Protocol, Resource, ResourceType};

/// Raised when URLs are requested before the repository host has been
/// configured.
#[derive(ApiError, Debug, Fail)]
#[api(internal)]
#[fail(display = "repository host is not configured")]
pub struct HostUnsetError;

pub type PathResult = Result<String, HostUnsetError>;

/// Resolver for the URLs belonging to one resource.
#[derive(Clone, Copy, Debug)]
pub struct DocumentPath<'a> {
    resource: &'a Resource,
    protocol: Protocol,
}

impl<'a> DocumentPath<'a> {
    pub fn new(resource: &'a Resource, protocol: Protocol)
    -> DocumentPath<'a> {
        DocumentPath { resource, protocol }
    }

    /// `{protocol}://{host}/concern/{type_path}/{id}/manifest`
    pub fn manifest(&self) -> PathResult {
        Ok(format!(
            "{}/concern/{}/{}/manifest",
            self.root()?,
            self.resource.resource_type.type_path(),
            self.resource.id,
        ))
    }

    /// Location of the resource's PDF rendition in the given quality.
    pub fn pdf(&self, quality: &str) -> PathResult {
        Ok(format!(
            "{}/concern/{}/{}/pdf?pdf_quality={}",
            self.root()?,
            self.resource.resource_type.type_path(),
            self.resource.id,
            quality,
        ))
    }

    /// Download location for one of the resource's files.
    pub fn download(&self, file_set_id: &str) -> PathResult {
        Ok(format!("{}/downloads/{}", self.root()?, file_set_id))
    }

    /// Thumbnail of the resource's representative image.
    ///
    /// Map sets don't contain image files directly; their thumbnail is found
    /// through the designated thumbnail work and that work's own
    /// representative file set. Absent representatives yield `None`, never
    /// an error.
    pub fn thumbnail(&self, index: &dyn Index) -> Option<String> {
        let file_set = self.representative(index)?;
        let path = self.download(&file_set.id).ok()?;
        Some(format!("{}?file=thumbnail", path))
    }

    /// IIIF image-service info document of the representative file set.
    pub fn iiif(&self, index: &dyn Index) -> Option<String> {
        let file_set = self.representative(index)?;
        let service = file_set.service_url?;
        Some(format!("{}/info.json", service))
    }

    /// Manifest location, as an option for discovery documents. Absent when
    /// the resource has nothing to render.
    pub fn iiif_manifest(&self, index: &dyn Index) -> Option<String> {
        self.representative(index)?;
        self.manifest().ok()
    }

    fn representative(&self, index: &dyn Index)
    -> Option<plinth_models::FileSet> {
        if self.resource.resource_type == ResourceType::MapSet {
            let id = self.resource.thumbnail_id.as_ref()?;
            let work = index.resource(id).ok()?;
            index.representative(&work).ok()?
        } else {
            index.representative(self.resource).ok()?
        }
    }

    fn root(&self) -> PathResult {
        host_root(self.protocol)
    }
}

/// `{protocol}://{host}/collections/manifest`
pub fn collections_manifest(protocol: Protocol) -> PathResult {
    Ok(format!("{}/collections/manifest", host_root(protocol)?))
}

/// Manifest location of a single collection.
pub fn collection_manifest(id: &str, protocol: Protocol) -> PathResult {
    Ok(format!("{}/collections/{}/manifest", host_root(protocol)?, id))
}

fn host_root(protocol: Protocol) -> PathResult {
    let domain = Config::try_domain().ok_or(HostUnsetError)?;
    Ok(format!("{}://{}", protocol, domain))
}
