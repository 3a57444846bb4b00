//! Configuration management for the annotator

use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct AnnotatorConfig {
    pub marker: MarkerSpec,
    pub log_filter: String,
}

/// How marker containers look in markup.
///
/// Used both when writing highlights out and when reading markup back in:
/// any element matching the tag and carrying the class is treated as a marker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarkerSpec {
    pub tag: String,
    pub class: String,
}

impl Default for MarkerSpec {
    fn default() -> Self {
        Self {
            tag: "span".to_string(),
            class: "annotator-hl".to_string(),
        }
    }
}

impl MarkerSpec {
    /// Check whether an element with this tag and class attribute is a marker
    pub fn matches(&self, tag: &str, class_attr: Option<&str>) -> bool {
        tag.eq_ignore_ascii_case(&self.tag)
            && class_attr
                .map(|classes| classes.split_whitespace().any(|c| c == self.class))
                .unwrap_or(false)
    }
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        AnnotatorConfig {
            marker: MarkerSpec::default(),
            log_filter: "annotator=info".to_string(),
        }
    }
}

impl AnnotatorConfig {
    pub fn from_env() -> Self {
        let defaults = AnnotatorConfig::default();
        AnnotatorConfig {
            marker: MarkerSpec {
                tag: env::var("ANNOTATOR_MARKER_TAG").unwrap_or(defaults.marker.tag),
                class: env::var("ANNOTATOR_MARKER_CLASS").unwrap_or(defaults.marker.class),
            },
            log_filter: env::var("ANNOTATOR_LOG").unwrap_or(defaults.log_filter),
        }
    }
}
