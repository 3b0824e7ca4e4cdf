//! IIIF Presentation API document shapes.
//!
//! Serialization order is fixed by field order, so building the same
//! snapshot twice yields byte-identical JSON.

use serde::Serialize;

pub const PRESENTATION_CONTEXT: &str =
    "http://iiif.io/api/presentation/2/context.json";
pub const IMAGE_CONTEXT: &str = "http://iiif.io/api/image/2/context.json";
pub const IMAGE_PROFILE: &str = "http://iiif.io/api/image/2/level2.json";

/// A work's manifest: metadata plus one canvas per page, and, for composite
/// works, references to member manifests.
#[derive(Clone, Debug, Serialize)]
pub struct Manifest {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub document_type: &'static str,
    pub label: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<MetadataEntry>,
    #[serde(rename = "viewingHint", skip_serializing_if = "Option::is_none")]
    pub viewing_hint: Option<String>,
    #[serde(
        rename = "viewingDirection",
        skip_serializing_if = "Option::is_none",
    )]
    pub viewing_direction: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sequences: Vec<Sequence>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub structures: Vec<Range>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub manifests: Vec<ManifestRef>,
}

/// A descriptive label/value pair.
#[derive(Clone, Debug, Serialize)]
pub struct MetadataEntry {
    pub label: &'static str,
    pub value: Vec<String>,
}

/// The ordered run of canvases of a manifest.
#[derive(Clone, Debug, Serialize)]
pub struct Sequence {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub document_type: &'static str,
    /// Alternate representation of the whole sequence, e.g. a PDF download.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendering: Option<Rendering>,
    pub canvases: Vec<Canvas>,
}

/// One renderable page.
#[derive(Clone, Debug, Serialize)]
pub struct Canvas {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub document_type: &'static str,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub images: Vec<ImageAnnotation>,
}

/// The painting annotation placing an image on its canvas.
#[derive(Clone, Debug, Serialize)]
pub struct ImageAnnotation {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub document_type: &'static str,
    pub motivation: &'static str,
    pub resource: ImageResource,
    pub on: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ImageResource {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub document_type: &'static str,
    pub format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<ImageService>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ImageService {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
    pub profile: &'static str,
}

/// Alternate-format link attached to a sequence.
#[derive(Clone, Debug, Serialize)]
pub struct Rendering {
    #[serde(rename = "@id")]
    pub id: String,
    pub label: &'static str,
    pub format: &'static str,
}

/// A node of the logical structure, referencing canvases and child ranges
/// by id.
#[derive(Clone, Debug, Serialize)]
pub struct Range {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub document_type: &'static str,
    pub label: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub canvases: Vec<String>,
}

/// Reference to a member work's own manifest; the body is never inlined.
#[derive(Clone, Debug, Serialize)]
pub struct ManifestRef {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub document_type: &'static str,
    pub label: String,
}

/// The one-level manifest of all visible collections.
///
/// Deliberately has no `manifests`, `viewingHint` or `viewingDirection`
/// fields: none of them mean anything at this aggregate level.
#[derive(Clone, Debug, Serialize)]
pub struct CollectionManifest {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub document_type: &'static str,
    pub label: &'static str,
    pub collections: Vec<CollectionRef>,
}

/// Metadata summary of one collection; never a full manifest.
#[derive(Clone, Debug, Serialize)]
pub struct CollectionRef {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub document_type: &'static str,
    pub label: String,
    pub metadata: Vec<MetadataEntry>,
}
