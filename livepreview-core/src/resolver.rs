use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

use crate::classify;
use crate::config::PreviewConfig;
use crate::platform::PlatformFlags;
use crate::urls;

// ---------------------------------------------------------------------------
// Host collaborators
// ---------------------------------------------------------------------------

/// Project tree state owned by the host editor.
#[allow(async_fn_in_trait)]
pub trait ProjectProvider {
    /// Absolute path of the open project's root directory.
    async fn project_root(&self) -> Result<String, String>;
    /// Full path of the item selected in the project tree, if any.
    async fn selected_item(&self) -> Result<Option<String>, String>;
}

/// Open-document state owned by the host editor.
#[allow(async_fn_in_trait)]
pub trait DocumentProvider {
    /// Full path of the file backing the focused document, if one is open.
    async fn current_document_file(&self) -> Result<Option<String>, String>;
}

/// The running live-preview server session.
pub trait LivePreviewSession {
    /// Prefix that, followed by an absolute project path, addresses that path
    /// through the preview server.
    fn live_preview_base_url(&self) -> String;
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoPreviewReason {
    /// No file is open or selected, or its type cannot be previewed.
    NothingToPreview,
    /// The platform cannot host live previews at all.
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PreviewOutcome {
    Previewable {
        url: String,
        /// Project-relative path, or the URL itself for remote files.
        file_path: String,
        full_path: String,
        is_markdown: bool,
        is_html: bool,
    },
    NotPreviewable {
        /// Splash page to show instead of a preview.
        url: String,
        reason: NoPreviewReason,
    },
}

impl PreviewOutcome {
    /// The URL the preview frame should load.
    pub fn url(&self) -> &str {
        match self {
            PreviewOutcome::Previewable { url, .. } | PreviewOutcome::NotPreviewable { url, .. } => {
                url
            }
        }
    }

    pub fn is_previewable(&self) -> bool {
        matches!(self, PreviewOutcome::Previewable { .. })
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Works out what the live preview panel should show for the current file.
pub struct PreviewResolver<'a, P, D, S> {
    config: &'a PreviewConfig,
    platform: PlatformFlags,
    project: &'a P,
    documents: &'a D,
    session: &'a S,
}

impl<'a, P, D, S> PreviewResolver<'a, P, D, S>
where
    P: ProjectProvider,
    D: DocumentProvider,
    S: LivePreviewSession,
{
    pub fn new(
        config: &'a PreviewConfig,
        platform: PlatformFlags,
        project: &'a P,
        documents: &'a D,
        session: &'a S,
    ) -> Self {
        Self {
            config,
            platform,
            project,
            documents,
            session,
        }
    }

    /// Resolve the preview for the open document, or for the selected project
    /// item when no document is open.
    ///
    /// Errors from the host collaborators are returned unchanged.
    pub async fn resolve_preview(&self) -> Result<PreviewOutcome, String> {
        if !self.platform.is_live_preview_supported() {
            log::debug!("Live preview unsupported on {:?}", self.platform);
            return Ok(PreviewOutcome::NotPreviewable {
                url: urls::live_preview_unsupported_url(self.config),
                reason: NoPreviewReason::Unsupported,
            });
        }

        let project_root = self.project.project_root().await?;
        let project_root_url = format!("{}{}", self.session.live_preview_base_url(), project_root);

        let full_path = match self.current_file().await? {
            Some(path) => path,
            None => {
                log::debug!("No open document or selected item to preview");
                return Ok(self.nothing_to_preview());
            }
        };

        if !classify::is_previewable(&full_path) {
            log::debug!("Not a previewable file: {}", full_path);
            return Ok(self.nothing_to_preview());
        }

        let (file_path, url) = if is_http_url(&full_path) {
            (full_path.clone(), full_path.clone())
        } else {
            let relative = relative_path(&project_root, &full_path);
            let url = format!("{}{}", project_root_url, relative);
            (relative, url)
        };

        log::debug!("Previewing {} at {}", full_path, url);
        Ok(PreviewOutcome::Previewable {
            url,
            file_path,
            is_markdown: classify::is_markdown(&full_path),
            is_html: classify::is_html(&full_path),
            full_path,
        })
    }

    async fn current_file(&self) -> Result<Option<String>, String> {
        if let Some(path) = self.documents.current_document_file().await? {
            return Ok(Some(path));
        }
        self.project.selected_item().await
    }

    fn nothing_to_preview(&self) -> PreviewOutcome {
        PreviewOutcome::NotPreviewable {
            url: urls::no_preview_url(self.config),
            reason: NoPreviewReason::NothingToPreview,
        }
    }
}

fn is_http_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

/// Path of `target` relative to the directory `from`, `/`-separated.
///
/// Both paths are normalized first; `..` segments are emitted when `target`
/// lies outside `from`.
fn relative_path(from: &str, target: &str) -> String {
    let from = normalized_segments(from);
    let target = normalized_segments(target);

    let common = from
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    parts.extend(std::iter::repeat("..").take(from.len() - common));
    parts.extend(target[common..].iter().copied());
    parts.join("/")
}

fn normalized_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(s) => {
                if let Some(s) = s.to_str() {
                    segments.push(s);
                }
            }
            Component::ParentDir => {
                segments.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    segments
}
