use crate::types::{Point, Rect};

// Tolerant attribute parsing. Markup in the wild carries units, stray
// characters, and locale junk inside numeric attributes; every parser here
// scrubs first and treats anything still unparseable as "attribute not
// specified". Nothing in this module can fail loudly.

pub(crate) fn parse_scalar(raw: Option<&str>) -> Option<f32> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }
    let scrubbed: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect();
    scrubbed.parse::<f32>().ok()
}

// Rect-shaped attributes (viewBox) keep spaces as separators but lose
// everything else, commas included. Exactly four values make a rect;
// negative spans are rejected.
pub(crate) fn parse_rect(raw: Option<&str>) -> Option<Rect> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }
    let scrubbed: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ' ' | '.' | '-'))
        .collect();

    let mut values = [0.0f32; 4];
    let mut count = 0usize;
    for token in scrubbed.split(' ').filter(|t| !t.is_empty()) {
        if count == 4 {
            return None;
        }
        values[count] = token.parse::<f32>().ok()?;
        count += 1;
    }
    if count != 4 {
        return None;
    }
    let (x, y, width, height) = (values[0], values[1], values[2], values[3]);
    if width < 0.0 || height < 0.0 {
        return None;
    }
    Some(Rect::new(x, y, width, height))
}

// Point lists for polyline/polygon are strict: every fragment must be a
// number and they must pair up, otherwise the whole attribute is rejected.
pub(crate) fn parse_points(raw: &str) -> Option<Vec<Point>> {
    let mut numbers = Vec::new();
    for token in raw
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        numbers.push(token.parse::<f32>().ok()?);
    }
    if numbers.is_empty() || numbers.len() % 2 != 0 {
        return None;
    }
    Some(
        numbers
            .chunks(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect(),
    )
}
