//! Assembly of a single work's manifest.

use plinth_models::{
    FileSet,
    Index,
    LogicalOrder,
    Member,
    OrderNode,
    Protocol,
    Resource,
};
use std::collections::HashSet;

use crate::{
    BuildManifestError,
    document::{
        Canvas,
        ImageAnnotation,
        ImageResource,
        ImageService,
        Manifest,
        MetadataEntry,
        Range,
        Rendering,
        Sequence,
        IMAGE_CONTEXT,
        IMAGE_PROFILE,
        PRESENTATION_CONTEXT,
    },
    paths::DocumentPath,
};

/// Builds a flat manifest: one canvas per ordered member.
pub struct ManifestBuilder<'a> {
    index: &'a dyn Index,
    protocol: Protocol,
}

impl<'a> ManifestBuilder<'a> {
    pub fn new(index: &'a dyn Index, protocol: Protocol)
    -> ManifestBuilder<'a> {
        ManifestBuilder { index, protocol }
    }

    pub fn build(&self, resource: &Resource)
    -> Result<Manifest, BuildManifestError> {
        let members = self.index.members(resource)?;

        if members.is_empty() {
            return Err(BuildManifestError::Empty);
        }

        let paths = DocumentPath::new(resource, self.protocol);
        let manifest_id = paths.manifest()?;

        let mut canvases = Vec::with_capacity(members.len());
        for member in &members {
            if let Some(canvas) = self.canvas(&manifest_id, member)? {
                canvases.push(canvas);
            }
        }

        let mut sequence = Sequence {
            id: format!("{}/sequence/normal", manifest_id),
            document_type: "sc:Sequence",
            rendering: None,
            canvases,
        };
        sequence.rendering = pdf_rendering(resource, &paths);

        let structures = match resource.logical_order {
            Some(ref order) =>
                structures(&manifest_id, order, &sequence.canvases),
            None => Vec::new(),
        };

        Ok(Manifest {
            context: PRESENTATION_CONTEXT,
            id: manifest_id,
            document_type: "sc:Manifest",
            label: resource.first_title().to_string(),
            metadata: descriptive_metadata(resource),
            viewing_hint: resource.viewing_hint.clone(),
            viewing_direction: resource.viewing_direction.clone(),
            sequences: vec![sequence],
            structures,
            manifests: Vec::new(),
        })
    }

    /// One canvas per member. A file set paints itself; a member work is
    /// represented by its representative file set. Members with nothing to
    /// paint are skipped.
    fn canvas(&self, manifest_id: &str, member: &Member)
    -> Result<Option<Canvas>, BuildManifestError> {
        let source = match member {
            Member::FileSet(fs) => Some(fs.clone()),
            Member::Work(work) => self.index.representative(work)?,
        };

        let source = match source {
            Some(source) => source,
            None => return Ok(None),
        };

        let label = match member {
            Member::FileSet(fs) =>
                fs.title.first().cloned().unwrap_or_default(),
            Member::Work(work) => work.first_title().to_string(),
        };

        let canvas_id = format!("{}/canvas/{}", manifest_id, member.id());

        Ok(Some(Canvas {
            id: canvas_id.clone(),
            document_type: "sc:Canvas",
            label,
            width: source.width,
            height: source.height,
            images: vec![image_annotation(&canvas_id, &source)],
        }))
    }
}

fn image_annotation(canvas_id: &str, source: &FileSet) -> ImageAnnotation {
    let (resource_id, service) = match source.service_url {
        Some(ref service) => (
            format!("{}/full/full/0/default.jpg", service),
            Some(ImageService {
                context: IMAGE_CONTEXT,
                id: service.clone(),
                profile: IMAGE_PROFILE,
            }),
        ),
        None => (format!("{}/original", source.id), None),
    };

    ImageAnnotation {
        id: format!("{}/image", canvas_id),
        document_type: "oa:Annotation",
        motivation: "sc:painting",
        resource: ImageResource {
            id: resource_id,
            document_type: "dctypes:Image",
            format: "image/jpeg",
            width: source.width,
            height: source.height,
            service,
        },
        on: canvas_id.to_string(),
    }
}

pub(crate) fn descriptive_metadata(resource: &Resource)
-> Vec<MetadataEntry> {
    let fields: [(&'static str, &Vec<String>); 5] = [
        ("Creator", &resource.creator),
        ("Description", &resource.description),
        ("Date Created", &resource.date_created),
        ("Rights Statement", &resource.rights_statement),
        ("Identifier", &resource.identifier),
    ];

    fields.iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|&(label, value)| MetadataEntry {
            label,
            value: value.clone(),
        })
        .collect()
}

/// Attach a "Download as PDF" link to the sequence.
///
/// The link appears only when the work has members, a sequence exists, and
/// the PDF policy is not an explicit `["none"]`. An unset policy downloads
/// in gray. A failure to build the URL only drops the link.
fn pdf_rendering(resource: &Resource, paths: &DocumentPath)
-> Option<Rendering> {
    if resource.pdf_type.first().map(String::as_str) == Some("none") {
        return None;
    }

    let quality = resource.pdf_type.first()
        .map(String::as_str)
        .unwrap_or("gray");

    let path = match paths.pdf(quality) {
        Ok(path) => path,
        Err(_) => return None,
    };

    Some(Rendering {
        id: path,
        label: "Download as PDF",
        format: "application/pdf",
    })
}

/// Render a logical order as a list of ranges, in pre-order.
///
/// Every group node becomes a range; its direct proxy children become
/// canvas references, its direct group children child ranges. Proxies that
/// don't correspond to an emitted canvas are dropped.
fn structures(manifest_id: &str, order: &LogicalOrder, canvases: &[Canvas])
-> Vec<Range> {
    let known = canvases.iter()
        .map(|canvas| canvas.id.as_str())
        .collect::<HashSet<_>>();

    let mut walker = RangeWalker {
        manifest_id,
        known,
        ranges: Vec::new(),
        next: 0,
    };

    for node in &order.nodes {
        if let OrderNode::Group { label, nodes } = node {
            walker.walk(label, nodes);
        }
    }

    walker.ranges
}

struct RangeWalker<'a> {
    manifest_id: &'a str,
    known: HashSet<&'a str>,
    ranges: Vec<Range>,
    next: usize,
}

impl<'a> RangeWalker<'a> {
    fn walk(&mut self, label: &str, nodes: &[OrderNode]) -> String {
        let id = format!("{}/range/r{}", self.manifest_id, self.next);
        self.next += 1;

        // Reserve this range's pre-order position before descending.
        let position = self.ranges.len();
        self.ranges.push(Range {
            id: id.clone(),
            document_type: "sc:Range",
            label: label.to_string(),
            ranges: Vec::new(),
            canvases: Vec::new(),
        });

        let mut canvases = Vec::new();
        let mut children = Vec::new();

        for node in nodes {
            match node {
                OrderNode::Proxy { proxy } => {
                    let canvas = format!(
                        "{}/canvas/{}", self.manifest_id, proxy);
                    if self.known.contains(canvas.as_str()) {
                        canvases.push(canvas);
                    }
                }
                OrderNode::Group { label, nodes } =>
                    children.push(self.walk(label, nodes)),
            }
        }

        self.ranges[position].ranges = children;
        self.ranges[position].canvases = canvases;

        id
    }
}
