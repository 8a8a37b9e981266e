// Affine transform primitives and the `transform` attribute grammar.
//
// The attribute parser deliberately recognizes a single `name(args)` call
// per attribute — the first one in the string — even though SVG allows a
// space-separated chain. Unmatched or unrecognized input yields an empty
// (identity) transform, never an error.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Matrix {
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn translate(tx: f32, ty: f32) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: tx,
            f: ty,
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn rotate(deg: f32) -> Self {
        let rad = deg.to_radians();
        let s = libm::sinf(rad);
        let c = libm::cosf(rad);
        Self {
            a: c,
            b: s,
            c: -s,
            d: c,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn skew_x(deg: f32) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: libm::tanf(deg.to_radians()),
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn skew_y(deg: f32) -> Self {
        Self {
            a: 1.0,
            b: libm::tanf(deg.to_radians()),
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn mul(self, other: Self) -> Self {
        // [self] * [other]
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn apply(self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }
}

/// One atomic 2D transform. Angles are in degrees, as written in markup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformOp {
    Matrix {
        a: f32,
        b: f32,
        c: f32,
        d: f32,
        e: f32,
        f: f32,
    },
    Translate {
        dx: f32,
        dy: f32,
    },
    Scale {
        sx: f32,
        sy: f32,
    },
    Rotate {
        angle: f32,
        cx: f32,
        cy: f32,
    },
    SkewX {
        angle: f32,
    },
    SkewY {
        angle: f32,
    },
}

impl TransformOp {
    pub fn to_matrix(self) -> Matrix {
        match self {
            TransformOp::Matrix { a, b, c, d, e, f } => Matrix { a, b, c, d, e, f },
            TransformOp::Translate { dx, dy } => Matrix::translate(dx, dy),
            TransformOp::Scale { sx, sy } => Matrix::scale(sx, sy),
            TransformOp::Rotate { angle, cx, cy } => Matrix::translate(cx, cy)
                .mul(Matrix::rotate(angle))
                .mul(Matrix::translate(-cx, -cy)),
            TransformOp::SkewX { angle } => Matrix::skew_x(angle),
            TransformOp::SkewY { angle } => Matrix::skew_y(angle),
        }
    }
}

/// An ordered transform list. Empty means identity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transform {
    pub ops: Vec<TransformOp>,
}

impl Transform {
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    // Ops compose in listed order: the first op reaches the geometry first.
    pub fn to_matrix(&self) -> Matrix {
        self.ops
            .iter()
            .fold(Matrix::identity(), |acc, op| op.to_matrix().mul(acc))
    }
}

pub fn parse_transform(raw: Option<&str>) -> Transform {
    let mut out = Transform::default();
    let Some(raw) = raw else { return out };
    if raw.is_empty() {
        return out;
    }

    let Some((name, args)) = first_function_call(raw) else {
        return out;
    };
    let values = parse_arg_list(args);

    match name {
        "matrix" => {
            if let [a, b, c, d, e, f] = values[..] {
                out.ops.push(TransformOp::Matrix { a, b, c, d, e, f });
            }
        }
        "translate" => match values[..] {
            [dx] => out.ops.push(TransformOp::Translate { dx, dy: 0.0 }),
            [dx, dy] => out.ops.push(TransformOp::Translate { dx, dy }),
            _ => {}
        },
        "scale" => match values[..] {
            [sx] => out.ops.push(TransformOp::Scale { sx, sy: 0.0 }),
            [sx, sy] => out.ops.push(TransformOp::Scale { sx, sy }),
            _ => {}
        },
        "rotate" => match values[..] {
            [angle] => out.ops.push(TransformOp::Rotate {
                angle,
                cx: 0.0,
                cy: 0.0,
            }),
            [angle, cx, cy] => out.ops.push(TransformOp::Rotate { angle, cx, cy }),
            _ => {}
        },
        "skewX" => {
            if let [angle] = values[..] {
                out.ops.push(TransformOp::SkewX { angle });
            }
        }
        "skewY" => {
            if let [angle] = values[..] {
                out.ops.push(TransformOp::SkewY { angle });
            }
        }
        _ => {}
    }

    out
}

// First `name(args)` occurrence. The name runs from just past the previous
// `)` (or the string start) to the `(`, un-trimmed; args are the non-empty
// run up to the next `)`. Leading whitespace therefore spoils the name,
// which is part of the preserved grammar.
fn first_function_call(s: &str) -> Option<(&str, &str)> {
    let mut search_from = 0;
    loop {
        let open = search_from + s[search_from..].find('(')?;
        let name_start = s[..open].rfind(')').map(|i| i + 1).unwrap_or(0);
        if name_start == open {
            search_from = open + 1;
            continue;
        }
        let close = s[open + 1..].find(')')? + open + 1;
        if close == open + 1 {
            search_from = open + 1;
            continue;
        }
        return Some((&s[name_start..open], &s[open + 1..close]));
    }
}

// Args split on spaces and commas only; fragments keep any other whitespace
// and get trimmed just before the number parse.
fn parse_arg_list(args: &str) -> Vec<f32> {
    let mut out = Vec::new();
    for token in args.split([' ', ',']).filter(|t| !t.is_empty()) {
        match token.trim().parse::<f32>() {
            Ok(v) => out.push(v),
            Err(_) => return Vec::new(),
        }
    }
    out
}
