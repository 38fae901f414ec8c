//! File kind definitions.

use std::path::Path;

use crate::config::WatchConfig;

/// Kind of a project file, decides what a change to it triggers and
/// whether serving it injects the live reload script and stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// HTML document: reload only, injected when served
    Markup,
    /// Stylesheet source: recompile, then reload or error
    Style,
    /// Script (the compiler config among them): recompile, then reload or error
    Script,
    /// Anything else: no action
    Other,
}

impl FileKind {
    /// Classify a path by extension (case-insensitive).
    pub fn classify(path: &Path, watch: &WatchConfig) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Self::Other;
        };
        let ext = ext.to_ascii_lowercase();
        let contains = |list: &[String]| list.iter().any(|e| e.eq_ignore_ascii_case(&ext));

        if contains(&watch.markup) {
            Self::Markup
        } else if contains(&watch.style) {
            Self::Style
        } else if contains(&watch.script) {
            Self::Script
        } else {
            Self::Other
        }
    }

    /// Whether a change to this kind of file requires recompiling the stylesheet.
    #[inline]
    pub const fn needs_compile(self) -> bool {
        matches!(self, Self::Style | Self::Script)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Markup => "markup",
            Self::Style => "style",
            Self::Script => "script",
            Self::Other => "other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(name: &str) -> FileKind {
        FileKind::classify(Path::new(name), &WatchConfig::default())
    }

    #[test]
    fn test_classify_defaults() {
        assert_eq!(kind("index.html"), FileKind::Markup);
        assert_eq!(kind("about.htm"), FileKind::Markup);
        assert_eq!(kind("style.css"), FileKind::Style);
        assert_eq!(kind("tailwind.js"), FileKind::Script);
        assert_eq!(kind("README.md"), FileKind::Other);
        assert_eq!(kind("Makefile"), FileKind::Other);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(kind("INDEX.HTML"), FileKind::Markup);
        assert_eq!(kind("Style.CSS"), FileKind::Style);
    }

    #[test]
    fn test_classify_uses_suffix_only() {
        // `.css.bak` is an editor artifact, not a stylesheet
        assert_eq!(kind("style.css.bak"), FileKind::Other);
        assert_eq!(kind("page.html.swp"), FileKind::Other);
    }

    #[test]
    fn test_classify_custom_lists() {
        let mut watch = WatchConfig::default();
        watch.style.push("pcss".into());
        watch.script.clear();
        assert_eq!(
            FileKind::classify(Path::new("main.pcss"), &watch),
            FileKind::Style
        );
        assert_eq!(
            FileKind::classify(Path::new("tailwind.js"), &watch),
            FileKind::Other
        );
    }

    #[test]
    fn test_needs_compile() {
        assert!(FileKind::Style.needs_compile());
        assert!(FileKind::Script.needs_compile());
        assert!(!FileKind::Markup.needs_compile());
        assert!(!FileKind::Other.needs_compile());
    }
}
