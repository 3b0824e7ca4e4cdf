use serde::{Deserialize, Serialize};

/// Snapshot of a repository work, as read back from the search index.
///
/// Works are created and mutated elsewhere; everything in this process
/// treats them as immutable, already-committed state.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Resource {
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default)]
    pub creator: Vec<String>,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub date_created: Vec<String>,
    #[serde(default)]
    pub rights_statement: Vec<String>,
    /// Login of the user who deposited this work.
    #[serde(default)]
    pub depositor: Option<String>,
    /// Minted external identifiers (ARKs). Once one exists the work is
    /// considered permanently citable.
    #[serde(default)]
    pub identifier: Vec<String>,
    /// Review/publication stage, owned by the external workflow engine.
    #[serde(default)]
    pub workflow_state: Option<WorkflowState>,
    #[serde(default)]
    pub visibility: Visibility,
    /// PDF rendering policy; the first element (`"color"`, `"gray"` or
    /// `"none"`) determines the active policy.
    #[serde(default)]
    pub pdf_type: Vec<String>,
    #[serde(default)]
    pub viewing_hint: Option<String>,
    #[serde(default)]
    pub viewing_direction: Option<String>,
    /// Ordered member references (file sets or other works).
    #[serde(default)]
    pub member_ids: Vec<String>,
    /// File set used for thumbnails and image-service lookups.
    #[serde(default)]
    pub representative_id: Option<String>,
    /// Map sets don't contain image files directly; they designate a member
    /// *work* whose representative provides the thumbnail.
    #[serde(default)]
    pub thumbnail_id: Option<String>,
    /// Structure saved by the structure editor, if any.
    #[serde(default)]
    pub logical_order: Option<LogicalOrder>,
}

impl Resource {
    /// Is the active PDF policy one that permits a PDF download at all?
    pub fn pdf_allowed(&self) -> bool {
        match self.pdf_type.first().map(String::as_str) {
            Some("color") | Some("gray") => true,
            _ => false,
        }
    }

    /// Is the active PDF policy exactly colour?
    pub fn color_pdf_allowed(&self) -> bool {
        self.pdf_type.len() == 1 && self.pdf_type[0] == "color"
    }

    /// Has an external identifier been minted for this work?
    pub fn has_external_identifier(&self) -> bool {
        !self.identifier.is_empty()
    }

    pub fn first_title(&self) -> &str {
        self.title.first().map(String::as_str).unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ResourceType {
    ScannedResource,
    MultiVolumeWork,
    EphemeraFolder,
    EphemeraBox,
    ImageWork,
    VectorWork,
    RasterWork,
    MapSet,
}

impl ResourceType {
    /// Path segment under `/concern/` for works of this type.
    pub fn type_path(self) -> &'static str {
        match self {
            ResourceType::ScannedResource => "scanned_resources",
            ResourceType::MultiVolumeWork => "multi_volume_works",
            ResourceType::EphemeraFolder => "ephemera_folders",
            ResourceType::EphemeraBox => "ephemera_boxes",
            ResourceType::ImageWork => "image_works",
            ResourceType::VectorWork => "vector_works",
            ResourceType::RasterWork => "raster_works",
            ResourceType::MapSet => "map_sets",
        }
    }

    /// Find the type matching a `/concern/` path segment.
    pub fn from_type_path(path: &str) -> Option<ResourceType> {
        static ALL: [ResourceType; 8] = [
            ResourceType::ScannedResource,
            ResourceType::MultiVolumeWork,
            ResourceType::EphemeraFolder,
            ResourceType::EphemeraBox,
            ResourceType::ImageWork,
            ResourceType::VectorWork,
            ResourceType::RasterWork,
            ResourceType::MapSet,
        ];

        ALL.iter().cloned().find(|ty| ty.type_path() == path)
    }

    pub fn is_ephemera(self) -> bool {
        match self {
            ResourceType::EphemeraFolder | ResourceType::EphemeraBox => true,
            _ => false,
        }
    }

    pub fn is_geo(self) -> bool {
        match self {
            ResourceType::ImageWork
            | ResourceType::VectorWork
            | ResourceType::RasterWork
            | ResourceType::MapSet => true,
            _ => false,
        }
    }
}

/// Review/publication stage of a work.
///
/// Transitions happen in the external workflow engine; this system only ever
/// reads the current stage.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Pending,
    MetadataReview,
    FinalReview,
    Complete,
    Takedown,
    Flagged,
    NeedsQa,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Authenticated,
    Private,
}

impl Default for Visibility {
    fn default() -> Visibility {
        Visibility::Private
    }
}

/// Structure tree saved by the structure editor.
///
/// Nodes either proxy a member of the work or group other nodes under
/// a label.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct LogicalOrder {
    #[serde(default)]
    pub nodes: Vec<OrderNode>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OrderNode {
    Proxy {
        proxy: String,
    },
    Group {
        label: String,
        #[serde(default)]
        nodes: Vec<OrderNode>,
    },
}
