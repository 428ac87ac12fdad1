use serde::{Deserialize, Serialize};

/// Facts about the runtime the editor is hosted in, supplied by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformFlags {
    /// Running inside the native desktop shell rather than a browser tab.
    pub is_desktop_shell: bool,
    pub is_desktop_safari: bool,
    pub is_mobile_ios: bool,
}

impl PlatformFlags {
    pub fn desktop_shell() -> Self {
        Self {
            is_desktop_shell: true,
            ..Self::default()
        }
    }

    /// Whether live previews may be shown on this platform.
    ///
    /// Previews are sandboxed on a separate origin through a service worker in a
    /// third-party frame. Safari (desktop and iOS) disables service workers in
    /// that context, and serving previews from the editor's own origin would let
    /// previewed pages run with its privileges, so previews are turned off there.
    /// The desktop shell has its own sandbox and is always supported.
    pub fn is_live_preview_supported(&self) -> bool {
        self.is_desktop_shell || !(self.is_desktop_safari || self.is_mobile_ios)
    }
}
