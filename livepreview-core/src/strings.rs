use serde::{Deserialize, Serialize};

/// User-facing text embedded in the splash page URLs.
///
/// Hosts replace these with their localized table; any key missing from the
/// supplied JSON keeps its English default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Strings {
    pub no_preview_heading: String,
    pub no_preview_details: String,
    pub unsupported_main_heading: String,
    pub unsupported_main_span: String,
}

impl Default for Strings {
    fn default() -> Self {
        Strings {
            no_preview_heading: String::from("Nothing to preview!"),
            no_preview_details: String::from(
                "Please select an HTML, Markdown, image or PDF file to preview",
            ),
            unsupported_main_heading: String::from(
                "Uh Oh! <br>Your current browser doesn't support live preview.",
            ),
            unsupported_main_span: String::from(
                "Get the best live preview experience by using the desktop app or a browser \
                 other than Safari.",
            ),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct StringsOverrides {
    pub no_preview_heading: Option<String>,
    pub no_preview_details: Option<String>,
    pub unsupported_main_heading: Option<String>,
    pub unsupported_main_span: Option<String>,
}

impl Strings {
    pub(crate) fn apply(&mut self, overrides: StringsOverrides) {
        if let Some(v) = overrides.no_preview_heading {
            self.no_preview_heading = v;
        }
        if let Some(v) = overrides.no_preview_details {
            self.no_preview_details = v;
        }
        if let Some(v) = overrides.unsupported_main_heading {
            self.unsupported_main_heading = v;
        }
        if let Some(v) = overrides.unsupported_main_span {
            self.unsupported_main_span = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let strings: Strings =
            serde_json::from_str(r#"{"no_preview_heading": "Rien à afficher"}"#).unwrap();
        assert_eq!(strings.no_preview_heading, "Rien à afficher");
        assert_eq!(strings.no_preview_details, Strings::default().no_preview_details);
    }

    #[test]
    fn apply_only_touches_given_fields() {
        let mut strings = Strings::default();
        strings.apply(StringsOverrides {
            unsupported_main_span: Some("span".to_string()),
            ..StringsOverrides::default()
        });
        assert_eq!(strings.unsupported_main_span, "span");
        assert_eq!(
            strings.unsupported_main_heading,
            Strings::default().unsupported_main_heading
        );
    }
}
