//! C-compatible FFI wrappers around livepreview-core.
//!
//! All functions use C strings for input/output and JSON encoding for
//! complex types. Callers must free returned strings with
//! `livepreview_free_string`.
//!
//! All extern "C" functions are wrapped in `ffi_catch` so Rust panics never
//! cross the FFI boundary. Panic payloads are logged before returning the
//! fallback value.
#![allow(clippy::not_unsafe_ptr_arg_deref)]

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::OnceLock;
use tokio::runtime::{Builder, Runtime};

use livepreview_core::{classify, urls, HostSnapshot, PreviewConfig};

/// Run `f` inside `catch_unwind`, logging the panic payload before returning the
/// fallback value.
fn ffi_catch<T>(fallback: T, f: impl FnOnce() -> T + std::panic::UnwindSafe) -> T {
    match catch_unwind(f) {
        Ok(v) => v,
        Err(payload) => {
            let msg = if let Some(s) = payload.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic payload".to_string()
            };
            log::error!("FFI panic caught: {}", msg);
            fallback
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read a C string argument. `Ok(None)` for null, `Err` for invalid UTF-8.
fn to_rust_str(ptr: *const c_char) -> Result<Option<String>, String> {
    if ptr.is_null() {
        return Ok(None);
    }
    // SAFETY: Caller guarantees `ptr` is a valid, null-terminated C string
    // whose memory remains valid for the duration of this call.
    match unsafe { CStr::from_ptr(ptr) }.to_str() {
        Ok(s) => Ok(Some(s.to_string())),
        Err(e) => Err(format!("argument is not valid UTF-8: {}", e)),
    }
}

/// 1/0 for a classification result, -1 for a null path, -2 for a non-UTF-8 path.
fn classification_code(path: *const c_char, check: fn(&str) -> bool) -> i32 {
    match to_rust_str(path) {
        Ok(Some(path)) => check(&path) as i32,
        Ok(None) => -1,
        Err(e) => {
            log::warn!("Cannot classify path: {}", e);
            -2
        }
    }
}

fn to_c_string(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cs) => cs.into_raw(),
        Err(_) => {
            log::warn!(
                "String contains interior NUL bytes, sanitizing ({} chars)",
                s.len()
            );
            let sanitized: String = s.chars().filter(|&c| c != '\0').collect();
            CString::new(sanitized).unwrap_or_default().into_raw()
        }
    }
}

fn error_json(message: &str) -> *mut c_char {
    to_c_string(&serde_json::json!({ "error": message }).to_string())
}

/// Parse the host-supplied config, or load it from disk when none is given.
fn config_from_json(
    config_json: *const c_char,
    project_root: Option<&str>,
) -> Result<PreviewConfig, String> {
    let json = match to_rust_str(config_json)? {
        Some(json) => json,
        None => return Ok(PreviewConfig::load(project_root)),
    };
    serde_json::from_str(&json).map_err(|e| format!("Invalid config JSON: {}", e))
}

fn runtime() -> Option<&'static Runtime> {
    static RUNTIME: OnceLock<Option<Runtime>> = OnceLock::new();
    RUNTIME
        .get_or_init(|| match Builder::new_current_thread().build() {
            Ok(rt) => Some(rt),
            Err(e) => {
                log::error!("Failed to create Tokio runtime for live preview: {}", e);
                None
            }
        })
        .as_ref()
}

// ---------------------------------------------------------------------------
// Memory management and logging
// ---------------------------------------------------------------------------

/// Free a string previously returned by a `livepreview_*` function.
#[no_mangle]
pub extern "C" fn livepreview_free_string(s: *mut c_char) {
    ffi_catch(
        (),
        AssertUnwindSafe(|| {
            if !s.is_null() {
                // SAFETY: `s` was previously returned by `CString::into_raw` from
                // one of the `livepreview_*` functions, so it is valid to reclaim it.
                unsafe {
                    drop(CString::from_raw(s));
                }
            }
        }),
    );
}

/// Install the `RUST_LOG`-driven logger. Safe to call more than once.
#[no_mangle]
pub extern "C" fn livepreview_init_logging() {
    ffi_catch(
        (),
        AssertUnwindSafe(|| {
            if env_logger::try_init().is_err() {
                log::debug!("Logger already initialized");
            }
        }),
    );
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Return the extension of `path` (text after the last `.`), possibly empty.
///
/// Returns null if `path` is null or not valid UTF-8. The caller must free the
/// returned string with `livepreview_free_string`.
#[no_mangle]
pub extern "C" fn livepreview_extension_of(path: *const c_char) -> *mut c_char {
    ffi_catch(
        std::ptr::null_mut(),
        AssertUnwindSafe(|| match to_rust_str(path) {
            Ok(Some(path)) => to_c_string(classify::extension_of(&path)),
            Ok(None) => std::ptr::null_mut(),
            Err(e) => {
                log::warn!("Cannot take extension: {}", e);
                std::ptr::null_mut()
            }
        }),
    )
}

/// Returns 1 if `path` can be live previewed, 0 if not, -1 if `path` is null,
/// -2 if it is not valid UTF-8.
#[no_mangle]
pub extern "C" fn livepreview_is_previewable(path: *const c_char) -> i32 {
    ffi_catch(
        -1,
        AssertUnwindSafe(|| classification_code(path, classify::is_previewable)),
    )
}

/// Returns 1 if `path` is an image, 0 if not, -1 if `path` is null, -2 if it is
/// not valid UTF-8.
#[no_mangle]
pub extern "C" fn livepreview_is_image(path: *const c_char) -> i32 {
    ffi_catch(
        -1,
        AssertUnwindSafe(|| classification_code(path, classify::is_image)),
    )
}

// ---------------------------------------------------------------------------
// URLs
// ---------------------------------------------------------------------------

/// Build the no-preview splash URL.
///
/// `config_json` may be null to use the config on disk. Returns the URL or a
/// JSON `{"error": ...}` object. The caller must free the returned string with
/// `livepreview_free_string`.
#[no_mangle]
pub extern "C" fn livepreview_no_preview_url(config_json: *const c_char) -> *mut c_char {
    ffi_catch(
        std::ptr::null_mut(),
        AssertUnwindSafe(|| match config_from_json(config_json, None) {
            Ok(config) => to_c_string(&urls::no_preview_url(&config)),
            Err(e) => error_json(&e),
        }),
    )
}

/// Build the page-loader URL for `url`.
///
/// `config_json` may be null to use the config on disk. Returns null if `url`
/// is null, or `{"error": ...}` if an argument is not valid UTF-8. The caller
/// must free the returned string with `livepreview_free_string`.
#[no_mangle]
pub extern "C" fn livepreview_page_loader_url(
    config_json: *const c_char,
    url: *const c_char,
) -> *mut c_char {
    ffi_catch(
        std::ptr::null_mut(),
        AssertUnwindSafe(|| {
            let url = match to_rust_str(url) {
                Ok(Some(s)) => s,
                Ok(None) => return std::ptr::null_mut(),
                Err(e) => return error_json(&e),
            };
            match config_from_json(config_json, None) {
                Ok(config) => to_c_string(&urls::page_loader_url(&config, &url)),
                Err(e) => error_json(&e),
            }
        }),
    )
}

// ---------------------------------------------------------------------------
// Preview resolution
// ---------------------------------------------------------------------------

/// Resolve what the live preview panel should show.
///
/// `host_json` is a `HostSnapshot` object. `config_json` may be null to load
/// the global config plus the project's `.livepreview.json`.
///
/// Returns a JSON `PreviewOutcome`, or `{"error": ...}` on failure.
/// The caller must free the returned string with `livepreview_free_string`.
#[no_mangle]
pub extern "C" fn livepreview_resolve_preview(
    config_json: *const c_char,
    host_json: *const c_char,
) -> *mut c_char {
    ffi_catch(
        std::ptr::null_mut(),
        AssertUnwindSafe(|| {
            let host_json = match to_rust_str(host_json) {
                Ok(Some(s)) => s,
                Ok(None) => return error_json("host snapshot is missing"),
                Err(e) => return error_json(&format!("Invalid host snapshot: {}", e)),
            };
            let host: HostSnapshot = match serde_json::from_str(&host_json) {
                Ok(h) => h,
                Err(e) => return error_json(&format!("Invalid host snapshot JSON: {}", e)),
            };
            let config = match config_from_json(config_json, Some(&host.project_root)) {
                Ok(c) => c,
                Err(e) => return error_json(&e),
            };
            let runtime = match runtime() {
                Some(rt) => rt,
                None => return error_json("async runtime unavailable"),
            };

            match runtime.block_on(host.resolver(&config).resolve_preview()) {
                Ok(outcome) => match serde_json::to_string(&outcome) {
                    Ok(json) => to_c_string(&json),
                    Err(e) => {
                        log::error!("JSON serialization failed: {}", e);
                        error_json(&format!("serialization failed: {}", e))
                    }
                },
                Err(e) => {
                    log::warn!("Live preview resolution failed: {}", e);
                    error_json(&e)
                }
            }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Take ownership of a string returned across the FFI and free it.
    fn take(ptr: *mut c_char) -> String {
        assert!(!ptr.is_null());
        let s = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
        livepreview_free_string(ptr);
        s
    }

    fn config_json() -> CString {
        CString::new(
            serde_json::json!({
                "asset_base_url": "https://editor.test/",
                "static_server_base_url": "https://static.test/",
                "broadcast_channel_id": "chan-1"
            })
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn extension_of_round_trips_through_c() {
        let path = CString::new("photo.PNG").unwrap();
        assert_eq!(take(livepreview_extension_of(path.as_ptr())), "PNG");
        assert!(livepreview_extension_of(std::ptr::null()).is_null());
    }

    #[test]
    fn classification_flags() {
        let pdf = CString::new("x.pdf").unwrap();
        let exe = CString::new("x.exe").unwrap();
        assert_eq!(livepreview_is_previewable(pdf.as_ptr()), 1);
        assert_eq!(livepreview_is_previewable(exe.as_ptr()), 0);
        assert_eq!(livepreview_is_previewable(std::ptr::null()), -1);
        assert_eq!(livepreview_is_image(pdf.as_ptr()), 0);
    }

    #[test]
    fn page_loader_url_uses_supplied_config() {
        let config = config_json();
        let url = CString::new("http://a/b").unwrap();
        let result = take(livepreview_page_loader_url(config.as_ptr(), url.as_ptr()));
        assert_eq!(
            result,
            "https://static.test/pageLoader.html?broadcastChannel=chan-1&URL=http%3A%2F%2Fa%2Fb"
        );
    }

    #[test]
    fn invalid_config_reports_error() {
        let config = CString::new("{ nope").unwrap();
        let result = take(livepreview_no_preview_url(config.as_ptr()));
        let value: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert!(value["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid config JSON"));
    }

    #[test]
    fn resolve_preview_returns_outcome_json() {
        let config = config_json();
        let host = CString::new(
            serde_json::json!({
                "project_root": "/proj/",
                "current_document": "/proj/readme.md",
                "live_preview_base_url": "http://localhost:8000/vfs"
            })
            .to_string(),
        )
        .unwrap();
        let result = take(livepreview_resolve_preview(config.as_ptr(), host.as_ptr()));
        let value: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(value["type"], "Previewable");
        assert_eq!(value["file_path"], "readme.md");
        assert_eq!(value["url"], "http://localhost:8000/vfs/proj/readme.md");
        assert_eq!(value["is_markdown"], true);
        assert_eq!(value["is_html"], false);
    }

    #[test]
    fn non_utf8_arguments_are_not_reported_as_null() {
        let bad = CString::new(vec![b'x', b'.', 0xff, 0xfe]).unwrap();
        assert_eq!(livepreview_is_previewable(bad.as_ptr()), -2);
        assert_eq!(livepreview_is_image(bad.as_ptr()), -2);
        assert!(livepreview_extension_of(bad.as_ptr()).is_null());

        let config = config_json();
        let result = take(livepreview_resolve_preview(config.as_ptr(), bad.as_ptr()));
        let value: serde_json::Value = serde_json::from_str(&result).unwrap();
        let error = value["error"].as_str().unwrap();
        assert!(error.starts_with("Invalid host snapshot"), "{}", error);
        assert!(error.contains("UTF-8"), "{}", error);

        let result = take(livepreview_no_preview_url(bad.as_ptr()));
        let value: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert!(value["error"].as_str().unwrap().contains("UTF-8"));
    }

    #[test]
    fn resolve_preview_without_host_is_an_error() {
        let config = config_json();
        let result = take(livepreview_resolve_preview(config.as_ptr(), std::ptr::null()));
        let value: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(value["error"], "host snapshot is missing");
    }
}
