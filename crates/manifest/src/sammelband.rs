//! Composite (Sammelband) manifests.
//!
//! A Sammelband aggregates heterogeneous member works. Its manifest lists
//! one reference per member work, each pointing at that work's own
//! manifest; member bodies are never inlined.

use plinth_models::{Index, Member, Protocol, Resource};

use crate::{
    BuildManifestError,
    builder::descriptive_metadata,
    document::{Manifest, ManifestRef, PRESENTATION_CONTEXT},
    paths::DocumentPath,
};

pub struct SammelbandManifestBuilder<'a> {
    index: &'a dyn Index,
    protocol: Protocol,
}

impl<'a> SammelbandManifestBuilder<'a> {
    pub fn new(index: &'a dyn Index, protocol: Protocol)
    -> SammelbandManifestBuilder<'a> {
        SammelbandManifestBuilder { index, protocol }
    }

    pub fn build(&self, resource: &Resource)
    -> Result<Manifest, BuildManifestError> {
        let members = self.index.members(resource)?;

        if members.is_empty() {
            return Err(BuildManifestError::Empty);
        }

        let manifest_id = DocumentPath::new(resource, self.protocol)
            .manifest()?;

        let mut manifests = Vec::new();
        for work in members.iter().filter_map(Member::as_work) {
            manifests.push(ManifestRef {
                id: DocumentPath::new(work, self.protocol).manifest()?,
                document_type: "sc:Manifest",
                label: work.first_title().to_string(),
            });
        }

        Ok(Manifest {
            context: PRESENTATION_CONTEXT,
            id: manifest_id,
            document_type: "sc:Manifest",
            label: resource.first_title().to_string(),
            metadata: descriptive_metadata(resource),
            viewing_hint: Some("individuals".to_string()),
            viewing_direction: None,
            sequences: Vec::new(),
            structures: Vec::new(),
            manifests,
        })
    }
}
