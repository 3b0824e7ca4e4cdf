use serde::{Deserialize, Serialize};

use super::Visibility;

/// Mime types marking a file set as external bibliographic metadata rather
/// than repository content. Such files are downloadable by anyone.
const EXTERNAL_METADATA_MIME_TYPES: [&str; 2] = [
    "application/xml; schema=fgdc",
    "application/xml; schema=iso19139",
];

/// A leaf member of a work: one digital file.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FileSet {
    pub id: String,
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub geo_mime_type: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Base URL of the IIIF image service holding this file's tiles.
    #[serde(default)]
    pub service_url: Option<String>,
    #[serde(default)]
    pub depositor: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
}

impl FileSet {
    /// Is this file external metadata (e.g. an FGDC record) rather than
    /// scanned content?
    pub fn external_metadata(&self) -> bool {
        match self.geo_mime_type {
            Some(ref mime) =>
                EXTERNAL_METADATA_MIME_TYPES.contains(&mime.as_str()),
            None => false,
        }
    }
}
