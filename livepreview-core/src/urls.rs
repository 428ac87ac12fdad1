use serde::Serialize;

use crate::config::PreviewConfig;

const NO_PREVIEW_PAGE: &str = "assets/phoenix-splash/no-preview.html";
const UNSUPPORTED_PAGE: &str = "assets/phoenix-splash/live-preview-error.html";
const PAGE_LOADER: &str = "pageLoader.html";

/// Payload the no-preview splash page reads from its `jsonInput` parameter.
#[derive(Serialize)]
struct SplashMessage<'a> {
    heading: &'a str,
    details: &'a str,
}

/// URL of the splash page shown when there is nothing to preview.
pub fn no_preview_url(config: &PreviewConfig) -> String {
    let message = SplashMessage {
        heading: &config.strings.no_preview_heading,
        details: &config.strings.no_preview_details,
    };
    let json = match serde_json::to_string(&message) {
        Ok(j) => j,
        Err(e) => {
            log::error!("JSON serialization failed: {}", e);
            String::from("{}")
        }
    };
    format!(
        "{}{}?jsonInput={}",
        config.asset_base_url,
        NO_PREVIEW_PAGE,
        encode_uri_component(&json)
    )
}

/// URL of the splash page shown when the platform cannot host live previews.
pub fn live_preview_unsupported_url(config: &PreviewConfig) -> String {
    format!(
        "{}{}?mainHeading={}&mainSpan={}",
        config.asset_base_url,
        UNSUPPORTED_PAGE,
        encode_uri_component(&config.strings.unsupported_main_heading),
        encode_uri_component(&config.strings.unsupported_main_span)
    )
}

/// URL of the loader page that opens `url` and reports back over the
/// configured broadcast channel.
pub fn page_loader_url(config: &PreviewConfig, url: &str) -> String {
    format!(
        "{}{}?broadcastChannel={}&URL={}",
        config.static_server_base_url,
        PAGE_LOADER,
        config.broadcast_channel_id,
        encode_uri_component(url)
    )
}

/// Percent-encode `input` for use as a single query parameter value.
///
/// Everything except ASCII alphanumerics and `- _ . ! ~ * ' ( )` is encoded
/// as UTF-8 bytes with uppercase hex digits.
pub fn encode_uri_component(input: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut out = String::with_capacity(input.len());
    for &b in input.as_bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(b as char),
            _ => {
                out.push('%');
                out.push(HEX[(b >> 4) as usize] as char);
                out.push(HEX[(b & 0x0f) as usize] as char);
            }
        }
    }
    out
}
