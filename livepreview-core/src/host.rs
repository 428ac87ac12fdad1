use serde::{Deserialize, Serialize};

use crate::config::PreviewConfig;
use crate::platform::PlatformFlags;
use crate::resolver::{DocumentProvider, LivePreviewSession, PreviewResolver, ProjectProvider};

/// Plain-data view of the host editor's state at the moment of a lookup.
///
/// Hosts that cannot implement the collaborator traits directly (for example
/// across the C ABI) send one of these as JSON instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSnapshot {
    pub platform: PlatformFlags,
    pub project_root: String,
    pub current_document: Option<String>,
    pub selected_item: Option<String>,
    pub live_preview_base_url: String,
}

impl HostSnapshot {
    pub fn resolver<'a>(
        &'a self,
        config: &'a PreviewConfig,
    ) -> PreviewResolver<'a, HostSnapshot, HostSnapshot, HostSnapshot> {
        PreviewResolver::new(config, self.platform, self, self, self)
    }
}

impl ProjectProvider for HostSnapshot {
    async fn project_root(&self) -> Result<String, String> {
        Ok(self.project_root.clone())
    }

    async fn selected_item(&self) -> Result<Option<String>, String> {
        Ok(self.selected_item.clone())
    }
}

impl DocumentProvider for HostSnapshot {
    async fn current_document_file(&self) -> Result<Option<String>, String> {
        Ok(self.current_document.clone())
    }
}

impl LivePreviewSession for HostSnapshot {
    fn live_preview_base_url(&self) -> String {
        self.live_preview_base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_from_partial_json() {
        let snapshot: HostSnapshot = serde_json::from_str(
            r#"{"project_root": "/proj/", "selected_item": "/proj/a.md",
                "platform": {"is_desktop_shell": true}}"#,
        )
        .unwrap();
        assert_eq!(snapshot.project_root, "/proj/");
        assert_eq!(snapshot.current_document, None);
        assert_eq!(snapshot.selected_item.as_deref(), Some("/proj/a.md"));
        assert!(snapshot.platform.is_desktop_shell);
        assert_eq!(snapshot.live_preview_base_url, "");
    }

    #[tokio::test]
    async fn snapshot_answers_as_collaborators() {
        let snapshot = HostSnapshot {
            current_document: Some("/proj/index.html".to_string()),
            live_preview_base_url: "http://preview.test".to_string(),
            ..HostSnapshot::default()
        };
        assert_eq!(
            snapshot.current_document_file().await.unwrap().as_deref(),
            Some("/proj/index.html")
        );
        assert_eq!(snapshot.selected_item().await.unwrap(), None);
        assert_eq!(snapshot.live_preview_base_url(), "http://preview.test");
    }
}
