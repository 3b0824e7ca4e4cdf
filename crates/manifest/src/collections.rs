//! The manifest of all collections.

use plinth_models::{Ability, Collection, Index, Protocol};

use crate::{
    BuildManifestError,
    document::{
        CollectionManifest,
        CollectionRef,
        MetadataEntry,
        PRESENTATION_CONTEXT,
    },
    paths,
};

/// Builds the one-level listing of every collection the caller may read.
///
/// Sub-collections appear as metadata summaries only; nothing at this level
/// embeds a work manifest.
pub struct AllCollectionsManifestBuilder<'a> {
    index: &'a dyn Index,
    ability: &'a Ability,
    protocol: Protocol,
}

impl<'a> AllCollectionsManifestBuilder<'a> {
    pub fn new(
        index: &'a dyn Index,
        ability: &'a Ability,
        protocol: Protocol,
    ) -> AllCollectionsManifestBuilder<'a> {
        AllCollectionsManifestBuilder { index, ability, protocol }
    }

    pub fn build(&self) -> Result<CollectionManifest, BuildManifestError> {
        let visible = self.index.collections()?
            .into_iter()
            .filter(|collection| self.ability.can_read_collection(collection))
            .collect::<Vec<_>>();

        if visible.is_empty() {
            return Err(BuildManifestError::Empty);
        }

        let mut collections = Vec::with_capacity(visible.len());
        for collection in &visible {
            collections.push(CollectionRef {
                id: paths::collection_manifest(
                    &collection.id, self.protocol)?,
                document_type: "sc:Collection",
                label: collection.first_title().to_string(),
                metadata: collection_metadata(collection),
            });
        }

        Ok(CollectionManifest {
            context: PRESENTATION_CONTEXT,
            id: paths::collections_manifest(self.protocol)?,
            document_type: "sc:Collection",
            label: "Collections",
            collections,
        })
    }
}

fn collection_metadata(collection: &Collection) -> Vec<MetadataEntry> {
    let mut metadata = vec![MetadataEntry {
        label: "Title",
        value: collection.title.clone(),
    }];

    if !collection.description.is_empty() {
        metadata.push(MetadataEntry {
            label: "Description",
            value: collection.description.clone(),
        });
    }

    metadata
}
