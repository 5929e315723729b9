//! Rewrites upload-relative image references for delivery.
//!
//! The editor stores images as `src="/uploads/<file>"`. A mail client cannot resolve that
//! path, so before sending every such reference is rewritten with one of three
//! strategies. References to files missing from the upload store are logged and left
//! untouched; they never fail the render.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::model::image::UploadedImage;
use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Component as PathComponent, Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::UNIX_EPOCH;
use std::{fmt, fs, io};

static UPLOAD_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"src=["']/uploads/([^"']+)["']"#).expect("upload src pattern is valid")
});

/// Extensions listed by [`UploadStore::list_images`].
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// How upload references are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageStrategy {
    /// `src="<base>/uploads/<file>"`.
    AbsoluteUrl,
    /// The file's bytes embedded as a base64 data URI.
    InlineData,
    /// A `cid:` reference backed by an inline attachment.
    ContentId,
}

impl FromStr for ImageStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absolute" | "url" => Ok(ImageStrategy::AbsoluteUrl),
            "inline" | "base64" => Ok(ImageStrategy::InlineData),
            "cid" => Ok(ImageStrategy::ContentId),
            other => Err(format!(
                "unknown image strategy '{}', expected absolute, inline or cid",
                other
            )),
        }
    }
}

impl fmt::Display for ImageStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImageStrategy::AbsoluteUrl => "absolute",
            ImageStrategy::InlineData => "inline",
            ImageStrategy::ContentId => "cid",
        })
    }
}

/// An inline attachment referenced from the markup as `cid:<cid>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CidAttachment {
    pub filename: String,
    pub path: PathBuf,
    pub cid: String,
}

/// Read access to the directory uploads are stored in.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of an existing upload. Names that could escape the store (absolute
    /// paths, `..` segments) are treated as missing.
    pub fn locate(&self, filename: &str) -> Option<PathBuf> {
        let relative = Path::new(filename);
        let contained = relative
            .components()
            .all(|part| matches!(part, PathComponent::Normal(_)));
        if !contained {
            return None;
        }
        let path = self.root.join(relative);
        path.is_file().then_some(path)
    }

    /// Image files directly inside the store, newest first. A missing directory lists
    /// nothing.
    pub fn list_images(&self) -> io::Result<Vec<UploadedImage>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut images = Vec::new();
        for entry in entries {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            let Some(extension) = Path::new(&name)
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase)
            else {
                continue;
            };
            if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
                continue;
            }
            let uploaded_at = metadata
                .created()
                .or_else(|_| metadata.modified())
                .ok()
                .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
                .map(|age| age.as_secs())
                .unwrap_or_default();
            images.push(UploadedImage {
                src: format!("/uploads/{}", name),
                name,
                size: metadata.len(),
                extension: format!(".{}", extension),
                uploaded_at,
            });
        }

        images.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(images)
    }
}

/// Markup after image rewriting, with any attachments the rewrite produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedImages {
    pub html: String,
    pub attachments: Vec<CidAttachment>,
}

#[derive(Debug, Clone)]
pub struct ImageResolver {
    strategy: ImageStrategy,
    uploads: UploadStore,
    base_url: String,
}

impl ImageResolver {
    pub fn new(strategy: ImageStrategy, uploads: UploadStore, base_url: impl Into<String>) -> Self {
        Self {
            strategy,
            uploads,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn strategy(&self) -> ImageStrategy {
        self.strategy
    }

    /// Rewrites every upload reference in `html` according to the strategy.
    pub fn resolve(&self, html: &str) -> ResolvedImages {
        match self.strategy {
            ImageStrategy::AbsoluteUrl => ResolvedImages {
                html: self.to_absolute(html),
                attachments: Vec::new(),
            },
            ImageStrategy::InlineData => ResolvedImages {
                html: self.to_data_uris(html),
                attachments: Vec::new(),
            },
            ImageStrategy::ContentId => self.to_content_ids(html),
        }
    }

    fn to_absolute(&self, html: &str) -> String {
        UPLOAD_SRC
            .replace_all(html, |caps: &Captures| {
                format!("src=\"{}/uploads/{}\"", self.base_url, &caps[1])
            })
            .into_owned()
    }

    fn to_data_uris(&self, html: &str) -> String {
        UPLOAD_SRC
            .replace_all(html, |caps: &Captures| {
                let filename = unescape_attribute(&caps[1]);
                let Some(path) = self.locate_or_warn(&filename) else {
                    return caps[0].to_string();
                };
                match fs::read(&path) {
                    Ok(bytes) => {
                        log::debug!("Embedded image {} as data URI", filename);
                        format!(
                            "src=\"data:{};base64,{}\"",
                            data_uri_mime(&filename),
                            STANDARD.encode(bytes)
                        )
                    }
                    Err(e) => {
                        log::warn!("Could not read image {}: {}", path.display(), e);
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
    }

    fn to_content_ids(&self, html: &str) -> ResolvedImages {
        let mut attachments: Vec<CidAttachment> = Vec::new();
        let mut by_filename: HashMap<String, String> = HashMap::new();

        let html = UPLOAD_SRC
            .replace_all(html, |caps: &Captures| {
                let filename = unescape_attribute(&caps[1]);
                if let Some(cid) = by_filename.get(&filename) {
                    return format!("src=\"cid:{}\"", cid);
                }
                let Some(path) = self.locate_or_warn(&filename) else {
                    return caps[0].to_string();
                };
                let cid = format!("image{}", attachments.len() + 1);
                log::debug!("Attached {} as cid:{}", filename, cid);
                by_filename.insert(filename.clone(), cid.clone());
                attachments.push(CidAttachment {
                    filename,
                    path,
                    cid: cid.clone(),
                });
                format!("src=\"cid:{}\"", cid)
            })
            .into_owned();

        ResolvedImages { html, attachments }
    }

    fn locate_or_warn(&self, filename: &str) -> Option<PathBuf> {
        let found = self.uploads.locate(filename);
        if found.is_none() {
            log::warn!(
                "Image file not found: {}",
                self.uploads.root().join(filename).display()
            );
        }
        found
    }
}

/// Reverses the compiler's attribute escaping so the name matches the file on disk.
fn unescape_attribute(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// MIME type for a data URI: PNG, GIF and WebP by extension, JPEG otherwise.
pub fn data_uri_mime(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn uploads_with(files: &[(&str, &[u8])]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, bytes) in files {
            fs::write(dir.path().join(name), bytes).unwrap();
        }
        dir
    }

    fn resolver(strategy: ImageStrategy, dir: &TempDir) -> ImageResolver {
        ImageResolver::new(strategy, UploadStore::new(dir.path()), "https://mail.example.com/")
    }

    #[test]
    fn absolute_strategy_prefixes_base_url() {
        let dir = uploads_with(&[]);
        let resolved = resolver(ImageStrategy::AbsoluteUrl, &dir)
            .resolve(r#"<img src='/uploads/a.png' /><img src="https://cdn/x.png" />"#);
        assert_eq!(
            resolved.html,
            r#"<img src="https://mail.example.com/uploads/a.png" /><img src="https://cdn/x.png" />"#
        );
        assert!(resolved.attachments.is_empty());
    }

    #[test]
    fn inline_strategy_embeds_bytes() {
        let dir = uploads_with(&[("dot.gif", b"GIF89a")]);
        let resolved =
            resolver(ImageStrategy::InlineData, &dir).resolve(r#"<img src="/uploads/dot.gif" />"#);
        assert_eq!(
            resolved.html,
            r#"<img src="data:image/gif;base64,R0lGODlh" />"#
        );
    }

    #[test]
    fn content_id_strategy_attaches_existing_files_once() {
        let dir = uploads_with(&[("photo.png", b"\x89PNG")]);
        let html = r#"<img src="/uploads/photo.png" /><img src="/uploads/photo.png" />"#;
        let resolved = resolver(ImageStrategy::ContentId, &dir).resolve(html);

        assert_eq!(
            resolved.html,
            r#"<img src="cid:image1" /><img src="cid:image1" />"#
        );
        assert_eq!(resolved.attachments.len(), 1);
        assert_eq!(resolved.attachments[0].filename, "photo.png");
        assert_eq!(resolved.attachments[0].cid, "image1");
        assert_eq!(resolved.attachments[0].path, dir.path().join("photo.png"));
    }

    #[test]
    fn escaped_filenames_resolve_to_the_stored_file() {
        let dir = uploads_with(&[("a&b.png", b"\x89PNG")]);
        let html = r#"<img src="/uploads/a&amp;b.png" />"#;

        let cid = resolver(ImageStrategy::ContentId, &dir).resolve(html);
        assert_eq!(cid.html, r#"<img src="cid:image1" />"#);
        assert_eq!(cid.attachments[0].filename, "a&b.png");

        let inline = resolver(ImageStrategy::InlineData, &dir).resolve(html);
        assert!(inline.html.starts_with(r#"<img src="data:image/png;base64,"#));
    }

    #[test]
    fn lists_images_newest_first() {
        let dir = uploads_with(&[
            ("a.png", b"1234".as_slice()),
            ("notes.txt", b"x".as_slice()),
            ("logo.SVG", b"<svg/>".as_slice()),
        ]);
        fs::create_dir(dir.path().join("thumbs.png")).unwrap();

        let mut images = UploadStore::new(dir.path()).list_images().unwrap();
        images.sort_by(|a, b| a.name.cmp(&b.name));
        let names: Vec<&str> = images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "logo.SVG"]);
        assert_eq!(images[0].src, "/uploads/a.png");
        assert_eq!(images[0].size, 4);
        assert_eq!(images[1].extension, ".svg");

        let missing = UploadStore::new(dir.path().join("nowhere"));
        assert!(missing.list_images().unwrap().is_empty());
    }

    #[test]
    fn missing_files_are_left_unrewritten() {
        let dir = uploads_with(&[("b.jpg", b"jpeg")]);
        let html = r#"<img src="/uploads/missing.png" /><img src="/uploads/b.jpg" />"#;
        let resolved = resolver(ImageStrategy::ContentId, &dir).resolve(html);
        assert_eq!(
            resolved.html,
            r#"<img src="/uploads/missing.png" /><img src="cid:image1" />"#
        );
        assert_eq!(resolved.attachments.len(), 1);

        let inline = resolver(ImageStrategy::InlineData, &dir).resolve(r#"src="/uploads/missing.png""#);
        assert_eq!(inline.html, r#"src="/uploads/missing.png""#);
    }

    #[test]
    fn refuses_paths_outside_the_store() {
        let dir = uploads_with(&[("a.png", b"x")]);
        let store = UploadStore::new(dir.path().join("nested"));
        fs::create_dir(store.root()).unwrap();
        assert!(store.locate("../a.png").is_none());
        assert!(UploadStore::new(dir.path()).locate("a.png").is_some());
    }

    #[test]
    fn mime_falls_back_to_jpeg() {
        assert_eq!(data_uri_mime("a.PNG"), "image/png");
        assert_eq!(data_uri_mime("a.webp"), "image/webp");
        assert_eq!(data_uri_mime("a.bmp"), "image/jpeg");
        assert_eq!(data_uri_mime("noext"), "image/jpeg");
    }

    #[test]
    fn parses_strategy_names() {
        assert_eq!("cid".parse::<ImageStrategy>(), Ok(ImageStrategy::ContentId));
        assert_eq!("Absolute".parse::<ImageStrategy>(), Ok(ImageStrategy::AbsoluteUrl));
        assert_eq!("inline".parse::<ImageStrategy>(), Ok(ImageStrategy::InlineData));
        assert!("smoke".parse::<ImageStrategy>().is_err());
    }
}
