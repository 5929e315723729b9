use serde::{Deserialize, Serialize};

/// An image in the upload store, as listed for the editor's image library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    /// Root-relative reference usable as an `img` source, `/uploads/<name>`.
    pub src: String,
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Lowercase extension including the dot, e.g. `.png`.
    #[serde(rename = "type")]
    pub extension: String,
    /// Upload time as seconds since the Unix epoch.
    pub uploaded_at: u64,
}
