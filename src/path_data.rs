use crate::types::Point;

// SVG path-data grammar. Quadratics and elliptical arcs normalize to cubic
// Beziers so downstream consumers only ever see four segment kinds.
//
// Unlike the attribute parsers, this grammar is strict: path data must open
// with a moveto, every command must receive complete argument groups, and
// any byte outside the grammar fails the whole attribute. The interpreter
// turns that failure into an absent node.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSeg {
    MoveTo(Point),
    LineTo(Point),
    CurveTo(Point, Point, Point),
    Close,
}

pub(crate) fn parse_path_data(d: &str) -> Option<Vec<PathSeg>> {
    let mut scan = Scanner::new(d);
    let mut segs: Vec<PathSeg> = Vec::new();
    let mut cmd: u8 = 0;
    let mut cur = Point::ZERO;
    let mut subpath_start = Point::ZERO;
    let mut prev_cubic_ctrl: Option<Point> = None;
    let mut prev_quad_ctrl: Option<Point> = None;

    scan.skip_separators();
    if scan.at_end() {
        return None;
    }

    loop {
        scan.skip_separators();
        if scan.at_end() {
            break;
        }

        let next = scan.peek();
        if next.is_ascii_alphabetic() {
            scan.bump();
            if cmd == 0 && !matches!(next, b'M' | b'm') {
                return None;
            }
            cmd = next;
        } else if cmd == 0 {
            // Coordinates before any command.
            return None;
        } else {
            // Implicit repetition: extra pairs after a moveto are linetos;
            // nothing may trail a closepath.
            cmd = match cmd {
                b'M' => b'L',
                b'm' => b'l',
                b'Z' | b'z' => return None,
                other => other,
            };
        }

        let rel = cmd.is_ascii_lowercase();
        match cmd {
            b'M' | b'm' => {
                let p = scan.point(rel, cur)?;
                segs.push(PathSeg::MoveTo(p));
                cur = p;
                subpath_start = p;
                prev_cubic_ctrl = None;
                prev_quad_ctrl = None;
            }
            b'L' | b'l' => {
                let p = scan.point(rel, cur)?;
                segs.push(PathSeg::LineTo(p));
                cur = p;
                prev_cubic_ctrl = None;
                prev_quad_ctrl = None;
            }
            b'H' | b'h' => {
                let x = scan.number()?;
                let x = if rel { cur.x + x } else { x };
                cur = Point::new(x, cur.y);
                segs.push(PathSeg::LineTo(cur));
                prev_cubic_ctrl = None;
                prev_quad_ctrl = None;
            }
            b'V' | b'v' => {
                let y = scan.number()?;
                let y = if rel { cur.y + y } else { y };
                cur = Point::new(cur.x, y);
                segs.push(PathSeg::LineTo(cur));
                prev_cubic_ctrl = None;
                prev_quad_ctrl = None;
            }
            b'C' | b'c' => {
                let c1 = scan.point(rel, cur)?;
                let c2 = scan.point(rel, cur)?;
                let end = scan.point(rel, cur)?;
                segs.push(PathSeg::CurveTo(c1, c2, end));
                cur = end;
                prev_cubic_ctrl = Some(c2);
                prev_quad_ctrl = None;
            }
            b'S' | b's' => {
                let c2 = scan.point(rel, cur)?;
                let end = scan.point(rel, cur)?;
                let c1 = match prev_cubic_ctrl {
                    Some(prev) => Point::new(2.0 * cur.x - prev.x, 2.0 * cur.y - prev.y),
                    None => cur,
                };
                segs.push(PathSeg::CurveTo(c1, c2, end));
                cur = end;
                prev_cubic_ctrl = Some(c2);
                prev_quad_ctrl = None;
            }
            b'Q' | b'q' => {
                let q = scan.point(rel, cur)?;
                let end = scan.point(rel, cur)?;
                let (c1, c2) = quad_to_cubic(cur, q, end);
                segs.push(PathSeg::CurveTo(c1, c2, end));
                cur = end;
                prev_quad_ctrl = Some(q);
                prev_cubic_ctrl = Some(c2);
            }
            b'T' | b't' => {
                let end = scan.point(rel, cur)?;
                let q = match prev_quad_ctrl {
                    Some(prev) => Point::new(2.0 * cur.x - prev.x, 2.0 * cur.y - prev.y),
                    None => cur,
                };
                let (c1, c2) = quad_to_cubic(cur, q, end);
                segs.push(PathSeg::CurveTo(c1, c2, end));
                cur = end;
                prev_quad_ctrl = Some(q);
                prev_cubic_ctrl = Some(c2);
            }
            b'A' | b'a' => {
                let rx = scan.number()?;
                let ry = scan.number()?;
                let rotation = scan.number()?;
                let large_arc = scan.flag()?;
                let sweep = scan.flag()?;
                let end = scan.point(rel, cur)?;
                let curves = arc_to_cubics(cur, rx, ry, rotation, large_arc, sweep, end);
                prev_cubic_ctrl = curves.iter().rev().find_map(|seg| {
                    if let PathSeg::CurveTo(_, c2, _) = *seg {
                        Some(c2)
                    } else {
                        None
                    }
                });
                segs.extend(curves);
                cur = end;
                prev_quad_ctrl = None;
            }
            b'Z' | b'z' => {
                segs.push(PathSeg::Close);
                cur = subpath_start;
                prev_cubic_ctrl = None;
                prev_quad_ctrl = None;
            }
            _ => return None,
        }
    }

    Some(segs)
}

fn quad_to_cubic(from: Point, ctrl: Point, to: Point) -> (Point, Point) {
    let c1 = Point::new(
        from.x + (2.0 / 3.0) * (ctrl.x - from.x),
        from.y + (2.0 / 3.0) * (ctrl.y - from.y),
    );
    let c2 = Point::new(
        to.x + (2.0 / 3.0) * (ctrl.x - to.x),
        to.y + (2.0 / 3.0) * (ctrl.y - to.y),
    );
    (c1, c2)
}

// Elliptical arc -> cubic Beziers, split into <= 90 degree slices.
// Center parameterization per the SVG 1.1 implementation notes.
fn arc_to_cubics(
    from: Point,
    rx_in: f32,
    ry_in: f32,
    x_axis_rotation_deg: f32,
    large_arc: bool,
    sweep: bool,
    to: Point,
) -> Vec<PathSeg> {
    use std::f32::consts::PI;

    let mut rx = rx_in.abs();
    let mut ry = ry_in.abs();
    if rx == 0.0 || ry == 0.0 || from == to {
        return vec![PathSeg::LineTo(to)];
    }

    let phi = x_axis_rotation_deg.to_radians();
    let sin_phi = libm::sinf(phi);
    let cos_phi = libm::cosf(phi);

    let dx2 = (from.x - to.x) / 2.0;
    let dy2 = (from.y - to.y) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    // Scale radii up when they cannot span the endpoints.
    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = libm::sqrtf(lambda);
        rx *= s;
        ry *= s;
    }

    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let x1p2 = x1p * x1p;
    let y1p2 = y1p * y1p;
    let num = rx2 * ry2 - rx2 * y1p2 - ry2 * x1p2;
    let den = rx2 * y1p2 + ry2 * x1p2;
    let mut coef = 0.0;
    if den != 0.0 {
        let sign = if large_arc == sweep { -1.0 } else { 1.0 };
        coef = sign * libm::sqrtf((num / den).max(0.0));
    }
    let cxp = coef * (rx * y1p / ry);
    let cyp = coef * (-ry * x1p / rx);

    let cx = cos_phi * cxp - sin_phi * cyp + (from.x + to.x) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (from.y + to.y) / 2.0;

    fn angle(ux: f32, uy: f32, vx: f32, vy: f32) -> f32 {
        let dot = ux * vx + uy * vy;
        let det = ux * vy - uy * vx;
        libm::atan2f(det, dot)
    }

    let ux = (x1p - cxp) / rx;
    let uy = (y1p - cyp) / ry;
    let vx = (-x1p - cxp) / rx;
    let vy = (-y1p - cyp) / ry;

    let mut theta = angle(1.0, 0.0, ux, uy);
    let mut dtheta = angle(ux, uy, vx, vy);
    if !sweep && dtheta > 0.0 {
        dtheta -= 2.0 * PI;
    } else if sweep && dtheta < 0.0 {
        dtheta += 2.0 * PI;
    }

    let slices = libm::ceilf(dtheta.abs() / (PI / 2.0)).max(1.0) as i32;
    let delta = dtheta / (slices as f32);

    // Map a unit-circle point onto the rotated, translated ellipse.
    let place = |x: f32, y: f32| -> Point {
        let x = rx * x;
        let y = ry * y;
        Point::new(
            cx + cos_phi * x - sin_phi * y,
            cy + sin_phi * x + cos_phi * y,
        )
    };

    let mut out = Vec::with_capacity(slices as usize);
    for _ in 0..slices {
        let t1 = theta;
        let t2 = theta + delta;
        let k = (4.0 / 3.0) * libm::tanf((t2 - t1) / 4.0);

        let s1 = libm::sinf(t1);
        let c1 = libm::cosf(t1);
        let s2 = libm::sinf(t2);
        let c2 = libm::cosf(t2);

        out.push(PathSeg::CurveTo(
            place(c1 - k * s1, s1 + k * c1),
            place(c2 + k * s2, s2 - k * c2),
            place(c2, s2),
        ));
        theta = t2;
    }
    out
}

struct Scanner<'a> {
    bytes: &'a [u8],
    i: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            i: 0,
        }
    }

    fn skip_separators(&mut self) {
        while self.i < self.bytes.len() {
            match self.bytes[self.i] {
                b' ' | b'\n' | b'\r' | b'\t' | b',' => self.i += 1,
                _ => break,
            }
        }
    }

    fn at_end(&self) -> bool {
        self.i >= self.bytes.len()
    }

    fn peek(&self) -> u8 {
        self.bytes[self.i]
    }

    fn bump(&mut self) {
        self.i += 1;
    }

    fn number(&mut self) -> Option<f32> {
        self.skip_separators();
        let start = self.i;
        let mut has_digits = false;

        if self.i < self.bytes.len() && matches!(self.bytes[self.i], b'+' | b'-') {
            self.i += 1;
        }
        while self.i < self.bytes.len() && self.bytes[self.i].is_ascii_digit() {
            self.i += 1;
            has_digits = true;
        }
        if self.i < self.bytes.len() && self.bytes[self.i] == b'.' {
            self.i += 1;
            while self.i < self.bytes.len() && self.bytes[self.i].is_ascii_digit() {
                self.i += 1;
                has_digits = true;
            }
        }
        if has_digits && self.i < self.bytes.len() && matches!(self.bytes[self.i], b'e' | b'E') {
            let mark = self.i;
            self.i += 1;
            if self.i < self.bytes.len() && matches!(self.bytes[self.i], b'+' | b'-') {
                self.i += 1;
            }
            let mut exp_digits = false;
            while self.i < self.bytes.len() && self.bytes[self.i].is_ascii_digit() {
                self.i += 1;
                exp_digits = true;
            }
            if !exp_digits {
                self.i = mark;
            }
        }

        if !has_digits {
            self.i = start;
            return None;
        }

        std::str::from_utf8(&self.bytes[start..self.i])
            .ok()?
            .parse::<f32>()
            .ok()
    }

    fn point(&mut self, rel: bool, cur: Point) -> Option<Point> {
        let x = self.number()?;
        let y = self.number()?;
        let p = Point::new(x, y);
        Some(if rel { cur.offset(p) } else { p })
    }

    // Arc flags are a single literal 0 or 1, which allows the compact
    // "01" form with no separator.
    fn flag(&mut self) -> Option<bool> {
        self.skip_separators();
        if self.at_end() {
            return None;
        }
        match self.bytes[self.i] {
            b'0' => {
                self.i += 1;
                Some(false)
            }
            b'1' => {
                self.i += 1;
                Some(true)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_moveto_lineto_close() {
        let segs = parse_path_data("M 0 0 L 10 0 L 10 10 Z").unwrap();
        assert_eq!(segs, vec![
            PathSeg::MoveTo(Point::new(0.0, 0.0)),
            PathSeg::LineTo(Point::new(10.0, 0.0)),
            PathSeg::LineTo(Point::new(10.0, 10.0)),
            PathSeg::Close,
        ]);
    }

    #[test]
    fn implicit_linetos_after_moveto() {
        let segs = parse_path_data("M 0 0 10 10 20 0").unwrap();
        assert_eq!(segs, vec![
            PathSeg::MoveTo(Point::new(0.0, 0.0)),
            PathSeg::LineTo(Point::new(10.0, 10.0)),
            PathSeg::LineTo(Point::new(20.0, 0.0)),
        ]);
    }

    #[test]
    fn relative_commands_accumulate() {
        let segs = parse_path_data("m 1 1 l 2 0 v 3 h -2 z").unwrap();
        assert_eq!(segs, vec![
            PathSeg::MoveTo(Point::new(1.0, 1.0)),
            PathSeg::LineTo(Point::new(3.0, 1.0)),
            PathSeg::LineTo(Point::new(3.0, 4.0)),
            PathSeg::LineTo(Point::new(1.0, 4.0)),
            PathSeg::Close,
        ]);
    }

    #[test]
    fn cubic_and_smooth_cubic() {
        let segs = parse_path_data("M 0 0 C 1 2 3 4 5 6 S 9 10 11 12").unwrap();
        assert_eq!(segs.len(), 3);
        // The smooth control point reflects the previous second control.
        assert_eq!(
            segs[2],
            PathSeg::CurveTo(
                Point::new(7.0, 8.0),
                Point::new(9.0, 10.0),
                Point::new(11.0, 12.0)
            )
        );
    }

    #[test]
    fn quadratic_normalizes_to_cubic() {
        let segs = parse_path_data("M 0 0 Q 3 0 3 3").unwrap();
        assert_eq!(segs.len(), 2);
        let PathSeg::CurveTo(c1, c2, end) = segs[1] else {
            panic!("expected curve");
        };
        assert!((c1.x - 2.0).abs() < 1e-5 && c1.y.abs() < 1e-5);
        assert!((c2.x - 3.0).abs() < 1e-5 && (c2.y - 1.0).abs() < 1e-5);
        assert_eq!(end, Point::new(3.0, 3.0));
    }

    #[test]
    fn arcs_normalize_to_cubics() {
        let segs = parse_path_data("M 0 0 A 5 5 0 0 1 10 0").unwrap();
        assert!(segs.len() >= 2);
        assert!(segs[1..].iter().all(|s| matches!(s, PathSeg::CurveTo(..))));
        // The last curve must land on the arc endpoint.
        let PathSeg::CurveTo(_, _, end) = segs[segs.len() - 1] else {
            panic!("expected curve");
        };
        assert!((end.x - 10.0).abs() < 1e-3);
        assert!(end.y.abs() < 1e-3);
    }

    #[test]
    fn compact_arc_flags_parse_without_separators() {
        assert!(parse_path_data("M10 10 A5 5 0 01 20 20").is_some());
    }

    #[test]
    fn degenerate_arc_radii_become_a_lineto() {
        let segs = parse_path_data("M 0 0 A 0 5 0 0 1 10 0").unwrap();
        assert_eq!(segs[1], PathSeg::LineTo(Point::new(10.0, 0.0)));
    }

    #[test]
    fn must_open_with_a_moveto() {
        assert_eq!(parse_path_data("L 10 10"), None);
        assert_eq!(parse_path_data("10 20"), None);
    }

    #[test]
    fn rejects_incomplete_argument_groups() {
        assert_eq!(parse_path_data("M 0 0 L 5"), None);
        assert_eq!(parse_path_data("M 0"), None);
        assert_eq!(parse_path_data("M 0 0 C 1 2 3 4 5"), None);
    }

    #[test]
    fn rejects_unknown_commands_and_stray_bytes() {
        assert_eq!(parse_path_data("M 0 0 X 1 1"), None);
        assert_eq!(parse_path_data("M 0 0 L 1 1 #"), None);
        assert_eq!(parse_path_data(""), None);
        assert_eq!(parse_path_data("   "), None);
    }

    #[test]
    fn rejects_coordinates_after_closepath() {
        assert_eq!(parse_path_data("M 0 0 L 1 1 Z 5 5"), None);
    }

    #[test]
    fn closepath_resets_the_current_point() {
        let segs = parse_path_data("M 1 1 L 2 2 Z l 1 0").unwrap();
        assert_eq!(segs[3], PathSeg::LineTo(Point::new(2.0, 1.0)));
    }
}
