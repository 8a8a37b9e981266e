// linework: a constrained-subset SVG to vector-geometry converter.
//
// The crate reads markup (string, reader, or file) and produces an
// immutable geometry tree plus the viewport sizing derived from the root
// element's width/height/viewBox. Every failure mode — unreadable source,
// malformed XML, malformed attributes — degrades to an empty group rather
// than surfacing an error; callers only ever observe geometry present or
// geometry empty.

mod attr;
mod diag;
mod error;
mod geometry;
mod interpret;
mod path_data;
mod transform;
mod types;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use diag::DiagnosticsLog;

pub use error::LineworkError;
pub use geometry::{
    EllipseGeometry, FillRule, Geometry, Group, LineGeometry, PathGeometry, PolygonGeometry,
    PolylineGeometry, RectGeometry,
};
pub use interpret::{Artwork, Viewport};
pub use path_data::PathSeg;
pub use transform::{Matrix, Transform, TransformOp, parse_transform};
pub use types::{Point, Rect};

/// A configured converter. `Linework::new()` is the zero-configuration
/// path; the builder adds opt-in diagnostics.
pub struct Linework {
    diagnostics: Option<Arc<DiagnosticsLog>>,
}

impl std::fmt::Debug for Linework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linework")
            .field("diagnostics", &self.diagnostics.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LineworkBuilder {
    diagnostics_path: Option<PathBuf>,
}

impl LineworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // Enable parse diagnostics to a JSONL file: one summary line per load
    // with counters for dropped elements, rejected attributes, and
    // structural failures.
    pub fn diagnostics_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.diagnostics_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<Linework, LineworkError> {
        let diagnostics = match self.diagnostics_path {
            Some(path) => {
                if path.as_os_str().is_empty() {
                    return Err(LineworkError::InvalidConfiguration(
                        "diagnostics_log requires a non-empty path".to_string(),
                    ));
                }
                Some(Arc::new(DiagnosticsLog::create(path)?))
            }
            None => None,
        };
        Ok(Linework { diagnostics })
    }
}

impl Linework {
    pub fn new() -> Self {
        Self { diagnostics: None }
    }

    pub fn builder() -> LineworkBuilder {
        LineworkBuilder::new()
    }

    /// Convert markup held in memory.
    pub fn parse_str(&self, text: &str) -> Artwork {
        let diag = self.diagnostics.as_deref();
        let text = text.trim_start_matches('\u{feff}');

        let mut options = roxmltree::ParsingOptions::default();
        // Documents with internal DTDs parse; external entities are never
        // resolved.
        options.allow_dtd = true;

        let artwork = match roxmltree::Document::parse_with_options(text, options) {
            Ok(doc) => interpret::interpret_document(doc.root_element(), diag),
            Err(_) => {
                if let Some(d) = diag {
                    d.count(diag::REJECTED_DOCUMENT);
                }
                Artwork::empty()
            }
        };

        if let Some(d) = diag {
            d.emit_summary("load");
        }
        artwork
    }

    /// Convert markup from a byte stream. The stream is consumed whole; a
    /// read or decode failure yields the empty artwork.
    pub fn load(&self, mut reader: impl Read) -> Artwork {
        let mut bytes = Vec::new();
        if reader.read_to_end(&mut bytes).is_err() {
            return self.unreadable();
        }
        match String::from_utf8(bytes) {
            Ok(text) => self.parse_str(&text),
            Err(_) => self.unreadable(),
        }
    }

    /// Convert markup from a file. A missing or unreadable file yields the
    /// empty artwork; the handle is released before returning.
    pub fn load_path(&self, path: impl AsRef<Path>) -> Artwork {
        match std::fs::File::open(path) {
            Ok(file) => self.load(file),
            Err(_) => self.unreadable(),
        }
    }

    fn unreadable(&self) -> Artwork {
        if let Some(d) = self.diagnostics.as_deref() {
            d.count(diag::UNREADABLE_SOURCE);
            d.emit_summary("load");
        }
        Artwork::empty()
    }
}

impl Default for Linework {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert markup held in memory with the default configuration.
pub fn parse_str(text: &str) -> Artwork {
    Linework::new().parse_str(text)
}

/// Convert markup from a byte stream with the default configuration.
pub fn load(reader: impl Read) -> Artwork {
    Linework::new().load(reader)
}

/// Convert markup from a file with the default configuration.
pub fn load_path(path: impl AsRef<Path>) -> Artwork {
    Linework::new().load_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_xml_yields_the_empty_artwork() {
        let artwork = parse_str("<svg><rect</svg>");
        assert_eq!(artwork, Artwork::empty());
        assert!(artwork.root.as_group().unwrap().children.is_empty());
    }

    #[test]
    fn empty_input_yields_the_empty_artwork() {
        assert_eq!(parse_str(""), Artwork::empty());
        assert_eq!(parse_str("   "), Artwork::empty());
    }

    #[test]
    fn non_utf8_bytes_yield_the_empty_artwork() {
        let artwork = load(&[0xff, 0xfe, 0x00, 0x41][..]);
        assert_eq!(artwork, Artwork::empty());
    }

    #[test]
    fn missing_file_yields_the_empty_artwork() {
        let artwork = load_path("/nonexistent/linework/fixture.svg");
        assert_eq!(artwork, Artwork::empty());
    }

    #[test]
    fn utf8_bom_is_tolerated() {
        let artwork = parse_str("\u{feff}<svg viewBox=\"0 0 10 10\"/>");
        assert_eq!(artwork.viewport.width, Some(10.0));
    }

    #[test]
    fn internal_dtd_documents_parse() {
        let artwork = parse_str(
            r#"<?xml version="1.0"?>
<!DOCTYPE svg [<!ENTITY marker "unused">]>
<svg viewBox="0 0 10 10"><rect x="1" y="1" width="2" height="2"/></svg>"#,
        );
        assert_eq!(artwork.viewport.width, Some(10.0));
        assert_eq!(artwork.root.as_group().unwrap().children.len(), 1);
    }

    #[test]
    fn end_to_end_tree_shape() {
        let artwork = parse_str(
            r#"<svg width="220" height="120" viewBox="0 0 220 120">
                 <g transform="translate(8,8)">
                   <rect x="0" y="0" width="204" height="104"/>
                   <circle cx="56" cy="60" r="24"/>
                   <path d="M96 82 L118 34 L140 82 Z"/>
                 </g>
                 <line x1="0" y1="0" x2="220" y2="120"/>
                 <desc>ignored</desc>
               </svg>"#,
        );

        assert_eq!(artwork.viewport.width, Some(220.0));
        assert_eq!(artwork.viewport.scale, (1.0, 1.0));

        let root = artwork.root.as_group().unwrap();
        assert_eq!(root.children.len(), 2);

        let inner = root.children[0].as_group().unwrap();
        assert_eq!(inner.children.len(), 3);
        assert_eq!(
            root.children[0].transform().unwrap().ops,
            vec![TransformOp::Translate { dx: 8.0, dy: 8.0 }]
        );

        let Geometry::Line(ref line) = root.children[1] else {
            panic!("expected line");
        };
        assert_eq!(line.p1, Point::new(0.0, 120.0));
        assert_eq!(line.p2, Point::new(220.0, 120.0));
    }

    #[test]
    fn builder_rejects_an_empty_diagnostics_path() {
        let err = Linework::builder().diagnostics_log("").build().unwrap_err();
        assert!(matches!(err, LineworkError::InvalidConfiguration(_)));
    }

    #[test]
    fn diagnostics_count_dropped_and_unsupported_nodes() {
        let path = std::env::temp_dir().join("linework_diag_load_test.jsonl");
        let converter = Linework::builder()
            .diagnostics_log(&path)
            .build()
            .unwrap();

        let artwork = converter.parse_str(
            r#"<svg>
                 <rect x="0" y="0" width="1" height="1"/>
                 <rect x="0" y="0" width="broken" height="1"/>
                 <text>hi</text>
                 <circle cx="0" cy="0" r="1" transform="bogus"/>
               </svg>"#,
        );
        // Diagnostics never change the geometry result.
        assert_eq!(artwork.root.as_group().unwrap().children.len(), 2);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"element.dropped\":1"));
        assert!(written.contains("\"element.unsupported\":1"));
        assert!(written.contains("\"transform.unmatched\":1"));
        let _ = std::fs::remove_file(&path);
    }
}
