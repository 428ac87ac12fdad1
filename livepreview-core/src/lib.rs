pub mod classify;
pub mod config;
pub mod host;
pub mod platform;
pub mod resolver;
pub mod strings;
pub mod urls;

pub use classify::{extension_of, is_image, is_previewable, FileKind};
pub use config::PreviewConfig;
pub use host::HostSnapshot;
pub use platform::PlatformFlags;
pub use resolver::{NoPreviewReason, PreviewOutcome, PreviewResolver};
pub use urls::{no_preview_url, page_loader_url};
