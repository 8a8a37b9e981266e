use crate::attr::{parse_points, parse_rect, parse_scalar};
use crate::diag::{self, DiagnosticsLog};
use crate::geometry::{
    EllipseGeometry, Geometry, Group, LineGeometry, PathGeometry, PolygonGeometry,
    PolylineGeometry, RectGeometry,
};
use crate::path_data::parse_path_data;
use crate::transform::parse_transform;
use crate::types::{Point, Rect};

// Opinionated SVG 1.1-ish subset interpreter.
//
// Goal: turn the shapes exported by design tools into a plain geometry tree.
// Attribute cleanup is tolerant and every malformed piece drops silently;
// callers never see a parse error.
//
// Supported:
// - <svg> root with width/height/viewBox (nested <svg> groups like <g>)
// - <g> grouping
// - <path d="..."> (strict path grammar; quadratics/arcs normalize to cubics)
// - <rect>, <circle>, <ellipse>, <line>, <polyline>, <polygon>
// - a single transform="func(args)" per element
//
// Not supported (dropped silently): <text>, <use>, <defs>, gradients,
// clip-paths, style/CSS, and everything else.

/// Viewport sizing derived from the top-level `svg` element. Dimensions are
/// `None` when the markup never declared them.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub view_box: Option<Rect>,
    pub view_box_width: Option<f32>,
    pub view_box_height: Option<f32>,
    pub translate: Point,
    pub scale: (f32, f32),
    pub clip: Option<Rect>,
}

impl Viewport {
    pub fn identity() -> Self {
        Self {
            width: None,
            height: None,
            view_box: None,
            view_box_width: None,
            view_box_height: None,
            translate: Point::ZERO,
            scale: (1.0, 1.0),
            clip: None,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::identity()
    }
}

/// The result of one load: the geometry tree plus the root viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Artwork {
    pub root: Geometry,
    pub viewport: Viewport,
}

impl Artwork {
    /// The degraded result every failure path collapses to: an empty
    /// nonzero group under an identity viewport.
    pub fn empty() -> Self {
        Self {
            root: Geometry::empty_group(),
            viewport: Viewport::identity(),
        }
    }
}

// The viewport dimensions are the viewBox's right/bottom edges, not its
// spans, and the scale divides those edges by the spans.
pub(crate) fn resolve_viewport(
    width: Option<f32>,
    height: Option<f32>,
    view_box: Option<Rect>,
) -> Viewport {
    let Some(vb) = view_box else {
        return Viewport {
            width,
            height,
            ..Viewport::identity()
        };
    };
    let edge_x = vb.right();
    let edge_y = vb.bottom();
    Viewport {
        width: Some(edge_x),
        height: Some(edge_y),
        view_box: Some(vb),
        view_box_width: Some(vb.width),
        view_box_height: Some(vb.height),
        translate: Point::new(-vb.x, -vb.y),
        scale: (edge_x / vb.width, edge_y / vb.height),
        clip: Some(vb),
    }
}

pub(crate) fn interpret_document(
    root: roxmltree::Node<'_, '_>,
    diag: Option<&DiagnosticsLog>,
) -> Artwork {
    let viewport = if root.tag_name().name().eq_ignore_ascii_case("svg") {
        resolve_viewport(
            parse_scalar(root.attribute("width")),
            parse_scalar(root.attribute("height")),
            parse_rect(root.attribute("viewBox")),
        )
    } else {
        Viewport::identity()
    };

    let root_geometry =
        interpret_node(root, viewport.view_box, diag).unwrap_or_else(Geometry::empty_group);

    Artwork {
        root: root_geometry,
        viewport,
    }
}

// Recursive dispatch on the lower-cased tag name. `view_box` is the current
// viewBox context, threaded as a parameter so separate loads can never
// interfere; an `svg` element replaces it for its own subtree.
pub(crate) fn interpret_node(
    node: roxmltree::Node<'_, '_>,
    view_box: Option<Rect>,
    diag: Option<&DiagnosticsLog>,
) -> Option<Geometry> {
    let tag = node.tag_name().name().to_ascii_lowercase();
    let mut result = match tag.as_str() {
        "svg" => {
            let nested = parse_rect(node.attribute("viewBox"));
            Some(Geometry::Group(group_of_children(node, nested, diag)))
        }
        "g" => Some(Geometry::Group(group_of_children(node, view_box, diag))),
        // The path arm returns off the first `d` attribute, before the
        // shared transform-attachment step below; path nodes never carry a
        // transform.
        "path" => return path_geometry(node, diag),
        "line" => line_geometry(node).map(Geometry::Line),
        "rect" => rect_geometry(node).map(Geometry::Rect),
        "ellipse" => ellipse_geometry(node).map(Geometry::Ellipse),
        "circle" => circle_geometry(node).map(Geometry::Ellipse),
        "polyline" => points_geometry(node).map(|points| {
            Geometry::Polyline(PolylineGeometry {
                points,
                transform: None,
            })
        }),
        "polygon" => points_geometry(node).map(|points| {
            Geometry::Polygon(PolygonGeometry {
                points,
                transform: None,
            })
        }),
        _ => {
            if let Some(d) = diag {
                d.count(diag::UNSUPPORTED_ELEMENT);
            }
            return None;
        }
    };

    match &mut result {
        Some(geometry) => {
            let raw = node.attribute("transform");
            let transform = parse_transform(raw);
            if let Some(d) = diag {
                if raw.is_some_and(|r| !r.is_empty()) && transform.is_identity() {
                    d.count(diag::UNMATCHED_TRANSFORM);
                }
            }
            geometry.set_transform(transform);
        }
        None => {
            if let Some(d) = diag {
                d.count(diag::DROPPED_ELEMENT);
            }
        }
    }

    result
}

fn group_of_children(
    node: roxmltree::Node<'_, '_>,
    view_box: Option<Rect>,
    diag: Option<&DiagnosticsLog>,
) -> Group {
    let mut children = Vec::new();
    for child in node.children().filter(|n| n.is_element()) {
        if let Some(geometry) = interpret_node(child, view_box, diag) {
            children.push(geometry);
        }
    }
    Group {
        children,
        ..Group::default()
    }
}

fn path_geometry(
    node: roxmltree::Node<'_, '_>,
    diag: Option<&DiagnosticsLog>,
) -> Option<Geometry> {
    for attr in node.attributes() {
        if attr.name() == "d" {
            if attr.value().is_empty() {
                continue;
            }
            return match parse_path_data(attr.value()) {
                Some(segs) => Some(Geometry::Path(PathGeometry {
                    segs,
                    transform: None,
                })),
                None => {
                    if let Some(d) = diag {
                        d.count(diag::REJECTED_PATH_DATA);
                        d.count(diag::DROPPED_ELEMENT);
                    }
                    None
                }
            };
        }
    }
    if let Some(d) = diag {
        d.count(diag::DROPPED_ELEMENT);
    }
    None
}

fn line_geometry(node: roxmltree::Node<'_, '_>) -> Option<LineGeometry> {
    let x1 = parse_scalar(node.attribute("x1"))?;
    // y1 must parse for the node to survive, but both endpoints take y2.
    parse_scalar(node.attribute("y1"))?;
    let x2 = parse_scalar(node.attribute("x2"))?;
    let y2 = parse_scalar(node.attribute("y2"))?;
    Some(LineGeometry {
        p1: Point::new(x1, y2),
        p2: Point::new(x2, y2),
        transform: None,
    })
}

fn rect_geometry(node: roxmltree::Node<'_, '_>) -> Option<RectGeometry> {
    let x = parse_scalar(node.attribute("x"))?;
    let y = parse_scalar(node.attribute("y"))?;
    let width = parse_scalar(node.attribute("width"))?;
    let height = parse_scalar(node.attribute("height"))?;
    Some(RectGeometry {
        rect: Rect::new(x, y, width, height),
        transform: None,
    })
}

fn ellipse_geometry(node: roxmltree::Node<'_, '_>) -> Option<EllipseGeometry> {
    let cx = parse_scalar(node.attribute("cx"))?;
    let cy = parse_scalar(node.attribute("cy"))?;
    let rx = parse_scalar(node.attribute("rx"))?;
    let ry = parse_scalar(node.attribute("ry"))?;
    Some(EllipseGeometry {
        center: Point::new(cx, cy),
        rx,
        ry,
        transform: None,
    })
}

fn circle_geometry(node: roxmltree::Node<'_, '_>) -> Option<EllipseGeometry> {
    let cx = parse_scalar(node.attribute("cx"))?;
    let cy = parse_scalar(node.attribute("cy"))?;
    let r = parse_scalar(node.attribute("r"))?;
    Some(EllipseGeometry {
        center: Point::new(cx, cy),
        rx: r,
        ry: r,
        transform: None,
    })
}

fn points_geometry(node: roxmltree::Node<'_, '_>) -> Option<Vec<Point>> {
    let raw = node.attribute("points")?;
    if raw.is_empty() {
        return None;
    }
    parse_points(raw)
}
