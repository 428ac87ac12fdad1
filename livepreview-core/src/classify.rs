use serde::{Deserialize, Serialize};

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "svg", "webp", "bmp", "ico", "avif",
];
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];
const HTML_EXTENSIONS: &[&str] = &["html", "htm", "xhtml"];
const PDF_EXTENSIONS: &[&str] = &["pdf"];

/// The kinds of file the live preview panel knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Image,
    Markdown,
    Html,
    Pdf,
}

/// Return everything after the last `.` in `path`, or `""` when there is none.
///
/// The case of the extension is preserved; comparisons against it should be
/// case-insensitive.
pub fn extension_of(path: &str) -> &str {
    path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}

fn has_extension(path: &str, extensions: &[&str]) -> bool {
    let ext = extension_of(path);
    extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
}

pub fn is_image(path: &str) -> bool {
    has_extension(path, IMAGE_EXTENSIONS)
}

pub fn is_markdown(path: &str) -> bool {
    has_extension(path, MARKDOWN_EXTENSIONS)
}

pub fn is_html(path: &str) -> bool {
    has_extension(path, HTML_EXTENSIONS)
}

pub fn is_pdf(path: &str) -> bool {
    has_extension(path, PDF_EXTENSIONS)
}

/// Determine which preview renderer, if any, handles `path`.
pub fn classify(path: &str) -> Option<FileKind> {
    if is_image(path) {
        Some(FileKind::Image)
    } else if is_markdown(path) {
        Some(FileKind::Markdown)
    } else if is_html(path) {
        Some(FileKind::Html)
    } else if is_pdf(path) {
        Some(FileKind::Pdf)
    } else {
        None
    }
}

/// Check whether a file path is a previewable type (image, markdown, HTML or PDF).
pub fn is_previewable(path: &str) -> bool {
    classify(path).is_some()
}
