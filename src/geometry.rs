use crate::path_data::PathSeg;
use crate::transform::Transform;
use crate::types::{Point, Rect};

/// Rule deciding a composite shape's interior when child outlines overlap.
/// Groups produced by the interpreter always use `NonZero`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// One node of the geometry tree. Only `Group` has children; every other
/// variant is a leaf. Each payload carries the transform parsed off its
/// source element (`None` only where the element kind never attaches one).
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Group(Group),
    Path(PathGeometry),
    Line(LineGeometry),
    Rect(RectGeometry),
    Ellipse(EllipseGeometry),
    Polyline(PolylineGeometry),
    Polygon(PolygonGeometry),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    pub children: Vec<Geometry>,
    pub fill_rule: FillRule,
    pub transform: Option<Transform>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathGeometry {
    pub segs: Vec<PathSeg>,
    pub transform: Option<Transform>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineGeometry {
    pub p1: Point,
    pub p2: Point,
    pub transform: Option<Transform>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectGeometry {
    pub rect: Rect,
    pub transform: Option<Transform>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EllipseGeometry {
    pub center: Point,
    pub rx: f32,
    pub ry: f32,
    pub transform: Option<Transform>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolylineGeometry {
    pub points: Vec<Point>,
    pub transform: Option<Transform>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonGeometry {
    pub points: Vec<Point>,
    pub transform: Option<Transform>,
}

impl Geometry {
    pub fn empty_group() -> Geometry {
        Geometry::Group(Group::default())
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Geometry::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn transform(&self) -> Option<&Transform> {
        match self {
            Geometry::Group(g) => g.transform.as_ref(),
            Geometry::Path(g) => g.transform.as_ref(),
            Geometry::Line(g) => g.transform.as_ref(),
            Geometry::Rect(g) => g.transform.as_ref(),
            Geometry::Ellipse(g) => g.transform.as_ref(),
            Geometry::Polyline(g) => g.transform.as_ref(),
            Geometry::Polygon(g) => g.transform.as_ref(),
        }
    }

    pub(crate) fn set_transform(&mut self, transform: Transform) {
        let slot = match self {
            Geometry::Group(g) => &mut g.transform,
            Geometry::Path(g) => &mut g.transform,
            Geometry::Line(g) => &mut g.transform,
            Geometry::Rect(g) => &mut g.transform,
            Geometry::Ellipse(g) => &mut g.transform,
            Geometry::Polyline(g) => &mut g.transform,
            Geometry::Polygon(g) => &mut g.transform,
        };
        *slot = Some(transform);
    }

    /// Fill/hit-test outline of a leaf as path segments. Groups have no
    /// outline of their own.
    pub fn outline(&self) -> Option<Vec<PathSeg>> {
        match self {
            Geometry::Group(_) => None,
            Geometry::Path(g) => Some(g.segs.clone()),
            Geometry::Line(g) => Some(g.outline()),
            Geometry::Rect(g) => Some(g.outline()),
            Geometry::Ellipse(g) => Some(g.outline()),
            Geometry::Polyline(g) => Some(g.outline()),
            Geometry::Polygon(g) => Some(g.outline()),
        }
    }
}

impl LineGeometry {
    pub fn outline(&self) -> Vec<PathSeg> {
        vec![PathSeg::MoveTo(self.p1), PathSeg::LineTo(self.p2)]
    }
}

impl RectGeometry {
    pub fn outline(&self) -> Vec<PathSeg> {
        let r = self.rect;
        vec![
            PathSeg::MoveTo(Point::new(r.x, r.y)),
            PathSeg::LineTo(Point::new(r.right(), r.y)),
            PathSeg::LineTo(Point::new(r.right(), r.bottom())),
            PathSeg::LineTo(Point::new(r.x, r.bottom())),
            PathSeg::Close,
        ]
    }
}

impl EllipseGeometry {
    // Four cubic Beziers, one per quadrant.
    pub fn outline(&self) -> Vec<PathSeg> {
        let k = 0.5522847498f32;
        let (cx, cy) = (self.center.x, self.center.y);
        let (rx, ry) = (self.rx, self.ry);
        let ox = rx * k;
        let oy = ry * k;
        vec![
            PathSeg::MoveTo(Point::new(cx + rx, cy)),
            PathSeg::CurveTo(
                Point::new(cx + rx, cy + oy),
                Point::new(cx + ox, cy + ry),
                Point::new(cx, cy + ry),
            ),
            PathSeg::CurveTo(
                Point::new(cx - ox, cy + ry),
                Point::new(cx - rx, cy + oy),
                Point::new(cx - rx, cy),
            ),
            PathSeg::CurveTo(
                Point::new(cx - rx, cy - oy),
                Point::new(cx - ox, cy - ry),
                Point::new(cx, cy - ry),
            ),
            PathSeg::CurveTo(
                Point::new(cx + ox, cy - ry),
                Point::new(cx + rx, cy - oy),
                Point::new(cx + rx, cy),
            ),
            PathSeg::Close,
        ]
    }
}

impl PolylineGeometry {
    pub fn outline(&self) -> Vec<PathSeg> {
        poly_outline(&self.points, false)
    }
}

impl PolygonGeometry {
    pub fn outline(&self) -> Vec<PathSeg> {
        poly_outline(&self.points, true)
    }
}

fn poly_outline(points: &[Point], close: bool) -> Vec<PathSeg> {
    let Some((first, rest)) = points.split_first() else {
        return Vec::new();
    };
    let mut segs = Vec::with_capacity(points.len() + 1);
    segs.push(PathSeg::MoveTo(*first));
    for p in rest {
        segs.push(PathSeg::LineTo(*p));
    }
    if close {
        segs.push(PathSeg::Close);
    }
    segs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_outline_is_a_closed_loop() {
        let rect = RectGeometry {
            rect: Rect::new(1.0, 2.0, 10.0, 20.0),
            transform: None,
        };
        let segs = rect.outline();
        assert_eq!(segs.len(), 5);
        assert_eq!(segs[0], PathSeg::MoveTo(Point::new(1.0, 2.0)));
        assert_eq!(segs[2], PathSeg::LineTo(Point::new(11.0, 22.0)));
        assert_eq!(segs[4], PathSeg::Close);
    }

    #[test]
    fn ellipse_outline_starts_on_the_positive_x_axis() {
        let ellipse = EllipseGeometry {
            center: Point::new(5.0, 5.0),
            rx: 3.0,
            ry: 2.0,
            transform: None,
        };
        let segs = ellipse.outline();
        assert_eq!(segs[0], PathSeg::MoveTo(Point::new(8.0, 5.0)));
        assert_eq!(segs.len(), 6);
        assert_eq!(segs[5], PathSeg::Close);
    }

    #[test]
    fn polygon_closes_and_polyline_stays_open() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 8.0),
        ];
        let polygon = PolygonGeometry {
            points: points.clone(),
            transform: None,
        };
        let polyline = PolylineGeometry {
            points,
            transform: None,
        };
        assert_eq!(polygon.outline().last(), Some(&PathSeg::Close));
        assert_eq!(
            polyline.outline().last(),
            Some(&PathSeg::LineTo(Point::new(5.0, 8.0)))
        );
    }

    #[test]
    fn group_has_no_outline() {
        assert_eq!(Geometry::empty_group().outline(), None);
    }
}
