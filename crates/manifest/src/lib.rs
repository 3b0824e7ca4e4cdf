//! IIIF Presentation API manifests for repository works.
//!
//! Manifests are never persisted: every build starts from the committed
//! snapshot the search index returns, so values are always fresh.

use failure::Fail;
use plinth_error::ApiError;
use plinth_macros::From;
use plinth_models::{
    FindResourceError,
    Index,
    Member,
    Protocol,
    Resource,
    ResourceType,
};
use std::collections::HashSet;

mod builder;
mod collections;
mod sammelband;

pub mod document;
pub mod paths;

pub use self::{
    builder::ManifestBuilder,
    collections::AllCollectionsManifestBuilder,
    document::{CollectionManifest, Manifest},
    paths::{DocumentPath, HostUnsetError},
    sammelband::SammelbandManifestBuilder,
};

#[derive(ApiError, Debug, Fail, From)]
pub enum BuildManifestError {
    /// The work has no members to present. Distinct from a missing work;
    /// the request boundary turns it into a 404.
    #[fail(display = "Manifest has no content")]
    #[api(code = "manifest:empty", status = "NOT_FOUND")]
    Empty,
    /// The work (or one of its parts) could not be looked up.
    #[fail(display = "{}", _0)]
    Find(#[cause] #[from] FindResourceError),
    /// URL construction failed.
    #[fail(display = "{}", _0)]
    Host(#[cause] #[from] HostUnsetError),
}

/// How a work presents, computed from its member composition at call time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResourceKind {
    /// A homogeneous work: one flat run of canvases.
    Simple,
    /// Members of more than one kind: presented as a Sammelband.
    Composite,
    /// Map sets always present as composites, whatever their members.
    MapSet,
}

impl ResourceKind {
    pub fn classify(resource: &Resource, members: &[Member])
    -> ResourceKind {
        if resource.resource_type == ResourceType::MapSet {
            return ResourceKind::MapSet;
        }

        let kinds = members.iter()
            .map(Member::kind)
            .collect::<HashSet<_>>();

        if kinds.len() > 1 {
            ResourceKind::Composite
        } else {
            ResourceKind::Simple
        }
    }
}

/// Build the manifest for a work, selecting the strategy its member
/// composition calls for.
pub fn build_manifest(
    index: &dyn Index,
    resource: &Resource,
    protocol: Protocol,
) -> Result<Manifest, BuildManifestError> {
    let members = index.members(resource)?;

    match ResourceKind::classify(resource, &members) {
        ResourceKind::Simple =>
            ManifestBuilder::new(index, protocol).build(resource),
        ResourceKind::Composite | ResourceKind::MapSet =>
            SammelbandManifestBuilder::new(index, protocol).build(resource),
    }
}

#[cfg(test)]
mod tests {
    use plinth_models::{
        Ability,
        Collection,
        Config,
        FileSet,
        LogicalOrder,
        MemoryIndex,
        OrderNode,
        Resource,
        ResourceType,
        Role,
        User,
        Visibility,
        WorkflowState,
    };
    use serde_json::{Value, json};

    use super::*;

    fn configure() {
        let config: &'static Config = Box::leak(Box::new(Config::default()));
        config.register("plinth.test");
    }

    fn work(id: &str, ty: ResourceType) -> Resource {
        Resource {
            id: id.to_string(),
            resource_type: ty,
            title: vec![format!("Work {}", id)],
            creator: vec![],
            description: vec![],
            date_created: vec![],
            rights_statement: vec![],
            depositor: None,
            identifier: vec![],
            workflow_state: Some(WorkflowState::Complete),
            visibility: Visibility::Public,
            pdf_type: vec![],
            viewing_hint: None,
            viewing_direction: None,
            member_ids: vec![],
            representative_id: None,
            thumbnail_id: None,
            logical_order: None,
        }
    }

    fn page(id: &str) -> FileSet {
        FileSet {
            id: id.to_string(),
            title: vec![format!("Page {}", id)],
            mime_type: Some("image/tiff".to_string()),
            geo_mime_type: None,
            width: Some(600),
            height: Some(800),
            service_url: Some(
                format!("https://images.plinth.test/iiif/{}", id)),
            depositor: None,
            visibility: Visibility::Public,
        }
    }

    fn simple_book(id: &str, pages: &[&str]) -> (MemoryIndex, Resource) {
        let mut index = MemoryIndex::new();
        let mut book = work(id, ResourceType::ScannedResource);

        for page_id in pages {
            index.add_file_set(page(page_id));
            book.member_ids.push(page_id.to_string());
        }

        index.add_resource(book.clone());
        (index, book)
    }

    #[test]
    fn manifest_id_follows_protocol() {
        configure();
        let (index, book) = simple_book("test2", &["p1"]);

        let manifest = build_manifest(&index, &book, Protocol::Http).unwrap();
        assert_eq!(
            manifest.id,
            "http://plinth.test/concern/scanned_resources/test2/manifest",
        );

        let manifest = build_manifest(&index, &book, Protocol::Https).unwrap();
        assert!(manifest.id.starts_with("https://"));
    }

    #[test]
    fn one_canvas_per_member() {
        configure();
        let (index, book) = simple_book("book", &["p1", "p2", "p3"]);

        let manifest = build_manifest(&index, &book, Protocol::Http).unwrap();
        assert_eq!(manifest.sequences.len(), 1);

        let canvases = &manifest.sequences[0].canvases;
        assert_eq!(canvases.len(), 3);
        assert_eq!(
            canvases[0].id,
            "http://plinth.test/concern/scanned_resources/book/manifest\
             /canvas/p1",
        );
        assert_eq!(canvases[0].width, Some(600));
        assert_eq!(canvases[0].height, Some(800));

        let service = canvases[0].images[0].resource.service.as_ref()
            .unwrap();
        assert_eq!(service.id, "https://images.plinth.test/iiif/p1");
    }

    #[test]
    fn empty_works_never_produce_documents() {
        configure();
        let (index, book) = simple_book("empty", &[]);

        match build_manifest(&index, &book, Protocol::Http) {
            Err(BuildManifestError::Empty) => (),
            other => panic!("expected Empty, got {:?}", other.map(|m| m.id)),
        }
    }

    #[test]
    fn viewing_attributes_are_never_defaulted() {
        configure();
        let (index, mut book) = simple_book("hints", &["p1"]);

        let manifest = ManifestBuilder::new(&index, Protocol::Http)
            .build(&book)
            .unwrap();
        let value = serde_json::to_value(&manifest).unwrap();
        assert!(value.get("viewingHint").is_none());
        assert!(value.get("viewingDirection").is_none());

        book.viewing_hint = Some("paged".to_string());
        book.viewing_direction = Some("right-to-left".to_string());
        let manifest = ManifestBuilder::new(&index, Protocol::Http)
            .build(&book)
            .unwrap();
        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(value["viewingHint"], json!("paged"));
        assert_eq!(value["viewingDirection"], json!("right-to-left"));
    }

    #[test]
    fn pdf_link_defaults_to_gray() {
        configure();
        let (index, book) = simple_book("pdfless", &["p1"]);

        let manifest = build_manifest(&index, &book, Protocol::Http).unwrap();
        let rendering = manifest.sequences[0].rendering.as_ref().unwrap();
        assert_eq!(
            rendering.id,
            "http://plinth.test/concern/scanned_resources/pdfless/pdf\
             ?pdf_quality=gray",
        );
        assert_eq!(rendering.label, "Download as PDF");
        assert_eq!(rendering.format, "application/pdf");
    }

    #[test]
    fn pdf_link_uses_declared_quality() {
        configure();
        let (index, mut book) = simple_book("colorful", &["p1"]);
        book.pdf_type = vec!["color".to_string()];

        let manifest = build_manifest(&index, &book, Protocol::Http).unwrap();
        let rendering = manifest.sequences[0].rendering.as_ref().unwrap();
        assert!(rendering.id.ends_with("pdf_quality=color"));
    }

    #[test]
    fn no_rendering_when_pdf_disabled() {
        configure();
        let (index, mut book) = simple_book("nopdf", &["p1"]);
        book.pdf_type = vec!["none".to_string()];

        let manifest = build_manifest(&index, &book, Protocol::Http).unwrap();
        let value = serde_json::to_value(&manifest).unwrap();
        assert!(
            find_key(&value, "rendering").is_none(),
            "rendering leaked into {}", value,
        );
    }

    #[test]
    fn building_twice_is_deterministic() {
        configure();
        let (mut index, mut book) = simple_book("stable", &["p1", "p2"]);
        book.logical_order = Some(LogicalOrder {
            nodes: vec![OrderNode::Group {
                label: "Chapter 1".to_string(),
                nodes: vec![
                    OrderNode::Proxy { proxy: "p1".to_string() },
                    OrderNode::Proxy { proxy: "p2".to_string() },
                ],
            }],
        });
        index.add_resource(book.clone());

        let first = serde_json::to_string(
            &build_manifest(&index, &book, Protocol::Https).unwrap())
            .unwrap();
        let second = serde_json::to_string(
            &build_manifest(&index, &book, Protocol::Https).unwrap())
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn logical_order_becomes_ranges() {
        configure();
        let (mut index, mut book) = simple_book(
            "structured", &["p1", "p2", "p3"]);
        book.logical_order = Some(LogicalOrder {
            nodes: vec![OrderNode::Group {
                label: "Volume".to_string(),
                nodes: vec![
                    OrderNode::Proxy { proxy: "p1".to_string() },
                    OrderNode::Group {
                        label: "Appendix".to_string(),
                        nodes: vec![
                            OrderNode::Proxy { proxy: "p2".to_string() },
                            // Dangling references are dropped.
                            OrderNode::Proxy { proxy: "gone".to_string() },
                        ],
                    },
                ],
            }],
        });
        index.add_resource(book.clone());

        let manifest = build_manifest(&index, &book, Protocol::Http).unwrap();
        assert_eq!(manifest.structures.len(), 2);

        let volume = &manifest.structures[0];
        assert_eq!(volume.label, "Volume");
        assert_eq!(volume.canvases.len(), 1);
        assert_eq!(volume.ranges, [manifest.structures[1].id.clone()]);

        let appendix = &manifest.structures[1];
        assert_eq!(appendix.label, "Appendix");
        assert_eq!(
            appendix.canvases,
            ["http://plinth.test/concern/scanned_resources/structured\
              /manifest/canvas/p2"],
        );
    }

    #[test]
    fn homogeneous_members_dispatch_to_plain_builder() {
        configure();
        let mut index = MemoryIndex::new();

        let mut volume_a = work("vol-a", ResourceType::ScannedResource);
        volume_a.member_ids = vec!["a1".to_string()];
        volume_a.representative_id = Some("a1".to_string());
        index.add_file_set(page("a1"));
        index.add_resource(volume_a.clone());

        let mut volume_b = work("vol-b", ResourceType::ScannedResource);
        volume_b.member_ids = vec!["b1".to_string()];
        volume_b.representative_id = Some("b1".to_string());
        index.add_file_set(page("b1"));
        index.add_resource(volume_b.clone());

        let mut parent = work("parent", ResourceType::MultiVolumeWork);
        parent.member_ids =
            vec!["vol-a".to_string(), "vol-b".to_string()];
        index.add_resource(parent.clone());

        let members = index.members(&parent).unwrap();
        assert_eq!(
            ResourceKind::classify(&parent, &members),
            ResourceKind::Simple,
        );

        // Both volumes render as canvases through their representatives.
        let manifest = build_manifest(
            &index, &parent, Protocol::Http).unwrap();
        assert_eq!(manifest.sequences[0].canvases.len(), 2);
        assert!(manifest.manifests.is_empty());
    }

    #[test]
    fn mixed_members_dispatch_to_sammelband() {
        configure();
        let mut index = MemoryIndex::new();

        let volume = work("volume", ResourceType::ScannedResource);
        index.add_resource(volume.clone());
        let map = work("map", ResourceType::ImageWork);
        index.add_resource(map.clone());

        let mut parent = work("parent", ResourceType::MultiVolumeWork);
        parent.member_ids = vec!["volume".to_string(), "map".to_string()];
        index.add_resource(parent.clone());

        let members = index.members(&parent).unwrap();
        assert_eq!(
            ResourceKind::classify(&parent, &members),
            ResourceKind::Composite,
        );

        let manifest = build_manifest(
            &index, &parent, Protocol::Http).unwrap();
        assert_eq!(manifest.viewing_hint.as_deref(), Some("individuals"));
        assert_eq!(manifest.manifests.len(), 2);
        assert_eq!(
            manifest.manifests[0].id,
            "http://plinth.test/concern/scanned_resources/volume/manifest",
        );
        assert!(manifest.sequences.is_empty());
    }

    #[test]
    fn map_sets_always_dispatch_to_sammelband() {
        configure();
        let mut index = MemoryIndex::new();

        let sheet = work("sheet", ResourceType::ImageWork);
        index.add_resource(sheet.clone());

        let mut map_set = work("atlas", ResourceType::MapSet);
        map_set.member_ids = vec!["sheet".to_string()];
        index.add_resource(map_set.clone());

        let members = index.members(&map_set).unwrap();
        assert_eq!(
            ResourceKind::classify(&map_set, &members),
            ResourceKind::MapSet,
        );

        let manifest = build_manifest(
            &index, &map_set, Protocol::Http).unwrap();
        assert_eq!(manifest.manifests.len(), 1);
    }

    #[test]
    fn map_set_thumbnail_resolves_through_thumbnail_work() {
        configure();
        let mut index = MemoryIndex::new();

        index.add_file_set(page("sheet-1"));
        let mut sheet = work("sheet", ResourceType::ImageWork);
        sheet.member_ids = vec!["sheet-1".to_string()];
        sheet.representative_id = Some("sheet-1".to_string());
        index.add_resource(sheet.clone());

        let mut map_set = work("atlas", ResourceType::MapSet);
        map_set.member_ids = vec!["sheet".to_string()];
        map_set.thumbnail_id = Some("sheet".to_string());
        index.add_resource(map_set.clone());

        let path = DocumentPath::new(&map_set, Protocol::Http);
        assert_eq!(
            path.thumbnail(&index).as_deref(),
            Some("http://plinth.test/downloads/sheet-1?file=thumbnail"),
        );
        assert_eq!(
            path.iiif(&index).as_deref(),
            Some("https://images.plinth.test/iiif/sheet-1/info.json"),
        );
        assert_eq!(
            path.iiif_manifest(&index).as_deref(),
            Some("http://plinth.test/concern/map_sets/atlas/manifest"),
        );
    }

    #[test]
    fn paths_absent_without_representative() {
        configure();
        let map_set = work("bare-atlas", ResourceType::MapSet);
        let index = MemoryIndex::new();

        let path = DocumentPath::new(&map_set, Protocol::Http);
        assert!(path.thumbnail(&index).is_none());
        assert!(path.iiif(&index).is_none());
        assert!(path.iiif_manifest(&index).is_none());
    }

    #[test]
    fn collections_listing_filters_by_ability() {
        configure();
        let mut index = MemoryIndex::new();
        index.add_collection(Collection {
            id: "open".to_string(),
            title: vec!["Test Collection".to_string()],
            description: vec![],
            visibility: Visibility::Public,
        });
        index.add_collection(Collection {
            id: "closed".to_string(),
            title: vec!["Staff Only".to_string()],
            description: vec![],
            visibility: Visibility::Private,
        });

        let anonymous = Ability::anonymous();
        let manifest = AllCollectionsManifestBuilder::new(
            &index, &anonymous, Protocol::Http).build().unwrap();
        assert_eq!(
            manifest.id, "http://plinth.test/collections/manifest");
        assert_eq!(manifest.collections.len(), 1);
        assert_eq!(manifest.collections[0].label, "Test Collection");
        assert!(!manifest.collections[0].metadata.is_empty());

        let value = serde_json::to_value(&manifest).unwrap();
        assert!(value.get("manifests").is_none());
        assert!(value.get("viewingHint").is_none());
        assert!(value.get("viewingDirection").is_none());

        let curator = Ability::new(Some(User {
            login: "curator".to_string(),
            role: Role::Curator,
        }));
        let manifest = AllCollectionsManifestBuilder::new(
            &index, &curator, Protocol::Http).build().unwrap();
        assert_eq!(manifest.collections.len(), 2);
    }

    #[test]
    fn collections_listing_empty_when_none_visible() {
        configure();
        let mut index = MemoryIndex::new();
        index.add_collection(Collection {
            id: "closed".to_string(),
            title: vec!["Staff Only".to_string()],
            description: vec![],
            visibility: Visibility::Private,
        });

        let anonymous = Ability::anonymous();
        match AllCollectionsManifestBuilder::new(
            &index, &anonymous, Protocol::Http).build()
        {
            Err(BuildManifestError::Empty) => (),
            other => panic!(
                "expected Empty, got {:?}", other.map(|m| m.id)),
        }
    }

    /// Depth-first search for a key anywhere in a JSON tree.
    fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
        match value {
            Value::Object(map) => map.get(key).or_else(|| {
                map.values().find_map(|value| find_key(value, key))
            }),
            Value::Array(items) =>
                items.iter().find_map(|value| find_key(value, key)),
            _ => None,
        }
    }
}
