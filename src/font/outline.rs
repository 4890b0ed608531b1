//! SVG path-data parsing, transformation and flattening.
//!
//! Parses the `d` attribute grammar (absolute and relative moveto, lineto,
//! curveto, arc and closepath commands) into an absolute segment list that
//! can be affine-transformed exactly and flattened to straight segments for
//! outline compilation. Arcs are converted to cubic segments on parse.

use crate::error::{IconError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One absolute segment following the current point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line(Point),
    Quad(Point, Point),
    Cubic(Point, Point, Point),
}

/// A single subpath: a start point plus its segments.
///
/// Subpaths are treated as closed for flattening; glyph contours are
/// implicitly closed.
#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    pub start: Point,
    pub segments: Vec<Segment>,
}

/// A parsed path, in the source coordinate system.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    pub subpaths: Vec<Subpath>,
}

impl Outline {
    /// Parse SVG path data into an outline.
    pub fn parse(data: &str) -> Result<Self> {
        Parser::new(data).run()
    }

    /// Append another outline's subpaths.
    pub fn extend(&mut self, other: Outline) {
        self.subpaths.extend(other.subpaths);
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    /// Apply `x' = sx * x + tx`, `y' = sy * y + ty` to every point.
    ///
    /// Diagonal affine maps transform curve control points exactly, so
    /// curves survive the viewBox-to-em-square mapping without loss.
    pub fn scale_translate(&mut self, sx: f32, sy: f32, tx: f32, ty: f32) {
        let map = |p: &mut Point| {
            p.x = sx * p.x + tx;
            p.y = sy * p.y + ty;
        };
        for subpath in &mut self.subpaths {
            map(&mut subpath.start);
            for segment in &mut subpath.segments {
                match segment {
                    Segment::Line(p) => map(p),
                    Segment::Quad(c, p) => {
                        map(c);
                        map(p);
                    }
                    Segment::Cubic(c1, c2, p) => {
                        map(c1);
                        map(c2);
                        map(p);
                    }
                }
            }
        }
    }

    /// Serialize back to path data (M/L/Q/C/Z commands).
    pub fn to_path_data(&self) -> String {
        let mut out = String::new();
        for subpath in &self.subpaths {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&format!(
                "M{} {}",
                fmt_coord(subpath.start.x),
                fmt_coord(subpath.start.y)
            ));
            for segment in &subpath.segments {
                match segment {
                    Segment::Line(p) => {
                        out.push_str(&format!("L{} {}", fmt_coord(p.x), fmt_coord(p.y)));
                    }
                    Segment::Quad(c, p) => {
                        out.push_str(&format!(
                            "Q{} {} {} {}",
                            fmt_coord(c.x),
                            fmt_coord(c.y),
                            fmt_coord(p.x),
                            fmt_coord(p.y)
                        ));
                    }
                    Segment::Cubic(c1, c2, p) => {
                        out.push_str(&format!(
                            "C{} {} {} {} {} {}",
                            fmt_coord(c1.x),
                            fmt_coord(c1.y),
                            fmt_coord(c2.x),
                            fmt_coord(c2.y),
                            fmt_coord(p.x),
                            fmt_coord(p.y)
                        ));
                    }
                }
            }
            out.push('Z');
        }
        out
    }

    /// Flatten every subpath to a closed polyline.
    ///
    /// Curves are sampled with a step count proportional to their control
    /// polygon length, clamped to [2, 24]. Degenerate contours (fewer than
    /// three points) are dropped.
    pub fn flatten(&self) -> Vec<Vec<Point>> {
        let mut contours = Vec::new();

        for subpath in &self.subpaths {
            let mut points = vec![subpath.start];
            let mut current = subpath.start;

            for segment in &subpath.segments {
                match *segment {
                    Segment::Line(p) => {
                        points.push(p);
                        current = p;
                    }
                    Segment::Quad(c, p) => {
                        let steps = curve_steps(&[current, c, p]);
                        for i in 1..=steps {
                            let t = i as f32 / steps as f32;
                            points.push(quad_at(current, c, p, t));
                        }
                        current = p;
                    }
                    Segment::Cubic(c1, c2, p) => {
                        let steps = curve_steps(&[current, c1, c2, p]);
                        for i in 1..=steps {
                            let t = i as f32 / steps as f32;
                            points.push(cubic_at(current, c1, c2, p, t));
                        }
                        current = p;
                    }
                }
            }

            // Drop the duplicated closing point if the path returned home.
            if points.len() > 1 {
                let first = points[0];
                let last = points[points.len() - 1];
                if (first.x - last.x).abs() < 0.01 && (first.y - last.y).abs() < 0.01 {
                    points.pop();
                }
            }

            if points.len() >= 3 {
                contours.push(points);
            }
        }

        contours
    }
}

fn quad_at(p0: Point, c: Point, p1: Point, t: f32) -> Point {
    let u = 1.0 - t;
    Point::new(
        u * u * p0.x + 2.0 * u * t * c.x + t * t * p1.x,
        u * u * p0.y + 2.0 * u * t * c.y + t * t * p1.y,
    )
}

fn cubic_at(p0: Point, c1: Point, c2: Point, p1: Point, t: f32) -> Point {
    let u = 1.0 - t;
    Point::new(
        u * u * u * p0.x + 3.0 * u * u * t * c1.x + 3.0 * u * t * t * c2.x + t * t * t * p1.x,
        u * u * u * p0.y + 3.0 * u * u * t * c1.y + 3.0 * u * t * t * c2.y + t * t * t * p1.y,
    )
}

fn curve_steps(points: &[Point]) -> usize {
    let mut length = 0.0;
    for pair in points.windows(2) {
        length += ((pair[1].x - pair[0].x).powi(2) + (pair[1].y - pair[0].y).powi(2)).sqrt();
    }
    ((length / 16.0).ceil() as usize).clamp(2, 24)
}

fn fmt_coord(v: f32) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

// --- Parser ---

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    outline: Outline,
    current: Point,
    start: Point,
    prev_cubic_control: Option<Point>,
    prev_quad_control: Option<Point>,
    open: Option<Subpath>,
    has_moved: bool,
}

impl<'a> Parser<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            bytes: data.as_bytes(),
            pos: 0,
            outline: Outline::default(),
            current: Point::new(0.0, 0.0),
            start: Point::new(0.0, 0.0),
            prev_cubic_control: None,
            prev_quad_control: None,
            open: None,
            has_moved: false,
        }
    }

    fn run(mut self) -> Result<Outline> {
        let mut command: Option<u8> = None;

        loop {
            self.skip_separators();
            let iteration_start = self.pos;
            let Some(&byte) = self.bytes.get(self.pos) else {
                break;
            };

            if byte.is_ascii_alphabetic() {
                command = Some(byte);
                self.pos += 1;
            } else if command.is_none() {
                return Err(self.error("path data does not start with a command"));
            }

            let cmd = command.ok_or_else(|| self.error("missing path command"))?;
            self.apply(cmd)?;

            // A command that consumes no operands (closepath) cannot repeat
            // implicitly; stalling here would loop forever.
            if self.pos == iteration_start {
                return Err(self.error("unexpected input after closepath"));
            }

            // Implicit repetition of moveto continues as lineto.
            if cmd == b'M' {
                command = Some(b'L');
            } else if cmd == b'm' {
                command = Some(b'l');
            }
        }

        self.close_subpath();
        Ok(self.outline)
    }

    fn apply(&mut self, cmd: u8) -> Result<()> {
        let relative = cmd.is_ascii_lowercase();
        match cmd.to_ascii_uppercase() {
            b'M' => {
                let p = self.point(relative)?;
                self.close_subpath();
                self.current = p;
                self.start = p;
                self.open = Some(Subpath {
                    start: p,
                    segments: Vec::new(),
                });
                self.has_moved = true;
                self.reset_controls();
            }
            b'L' => {
                let p = self.point(relative)?;
                self.line_to(p)?;
            }
            b'H' => {
                let x = self.number()?;
                let x = if relative { self.current.x + x } else { x };
                let p = Point::new(x, self.current.y);
                self.line_to(p)?;
            }
            b'V' => {
                let y = self.number()?;
                let y = if relative { self.current.y + y } else { y };
                let p = Point::new(self.current.x, y);
                self.line_to(p)?;
            }
            b'C' => {
                let c1 = self.point(relative)?;
                let c2 = self.point(relative)?;
                let p = self.point(relative)?;
                self.cubic_to(c1, c2, p)?;
            }
            b'S' => {
                let c1 = self.reflect_cubic();
                let c2 = self.point(relative)?;
                let p = self.point(relative)?;
                self.cubic_to(c1, c2, p)?;
            }
            b'Q' => {
                let c = self.point(relative)?;
                let p = self.point(relative)?;
                self.quad_to(c, p)?;
            }
            b'T' => {
                let c = self.reflect_quad();
                let p = self.point(relative)?;
                self.quad_to(c, p)?;
            }
            b'A' => {
                let rx = self.number()?;
                let ry = self.number()?;
                let rotation = self.number()?;
                let large_arc = self.flag()?;
                let sweep = self.flag()?;
                let p = self.point(relative)?;
                self.arc_to(rx, ry, rotation, large_arc, sweep, p)?;
            }
            b'Z' => {
                self.close_subpath();
                self.current = self.start;
                self.reset_controls();
            }
            other => {
                return Err(self.error(&format!(
                    "unsupported path command '{}'",
                    other as char
                )));
            }
        }
        Ok(())
    }

    fn line_to(&mut self, p: Point) -> Result<()> {
        self.segment(Segment::Line(p))?;
        self.current = p;
        self.reset_controls();
        Ok(())
    }

    fn quad_to(&mut self, c: Point, p: Point) -> Result<()> {
        self.segment(Segment::Quad(c, p))?;
        self.current = p;
        self.prev_quad_control = Some(c);
        self.prev_cubic_control = None;
        Ok(())
    }

    fn cubic_to(&mut self, c1: Point, c2: Point, p: Point) -> Result<()> {
        self.segment(Segment::Cubic(c1, c2, p))?;
        self.current = p;
        self.prev_cubic_control = Some(c2);
        self.prev_quad_control = None;
        Ok(())
    }

    /// Convert an elliptical arc to cubic segments (endpoint to center
    /// parameterization per the SVG implementation notes, one cubic per
    /// quarter turn at most).
    fn arc_to(
        &mut self,
        rx: f32,
        ry: f32,
        rotation_deg: f32,
        large_arc: bool,
        sweep: bool,
        end: Point,
    ) -> Result<()> {
        let start = self.current;
        let mut rx = rx.abs();
        let mut ry = ry.abs();

        if rx == 0.0 || ry == 0.0 || (start.x == end.x && start.y == end.y) {
            return self.line_to(end);
        }

        let phi = rotation_deg.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();

        // Step 1: half the vector between endpoints, in the rotated frame.
        let dx = (start.x - end.x) / 2.0;
        let dy = (start.y - end.y) / 2.0;
        let x1p = cos_phi * dx + sin_phi * dy;
        let y1p = -sin_phi * dx + cos_phi * dy;

        // Correct out-of-range radii.
        let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        if lambda > 1.0 {
            let s = lambda.sqrt();
            rx *= s;
            ry *= s;
        }

        // Step 2: center in the rotated frame.
        let num = (rx * rx) * (ry * ry) - (rx * rx) * (y1p * y1p) - (ry * ry) * (x1p * x1p);
        let den = (rx * rx) * (y1p * y1p) + (ry * ry) * (x1p * x1p);
        let mut coef = (num / den).max(0.0).sqrt();
        if large_arc == sweep {
            coef = -coef;
        }
        let cxp = coef * rx * y1p / ry;
        let cyp = -coef * ry * x1p / rx;

        // Step 3: center and angle range in the original frame.
        let cx = cos_phi * cxp - sin_phi * cyp + (start.x + end.x) / 2.0;
        let cy = sin_phi * cxp + cos_phi * cyp + (start.y + end.y) / 2.0;

        let angle = |x: f32, y: f32| (y).atan2(x);
        let theta1 = angle((x1p - cxp) / rx, (y1p - cyp) / ry);
        let theta2 = angle((-x1p - cxp) / rx, (-y1p - cyp) / ry);
        let mut delta = theta2 - theta1;
        if sweep && delta < 0.0 {
            delta += std::f32::consts::TAU;
        } else if !sweep && delta > 0.0 {
            delta -= std::f32::consts::TAU;
        }

        // Split into cubics covering at most 90 degrees each.
        let segments = (delta.abs() / std::f32::consts::FRAC_PI_2).ceil().max(1.0) as usize;
        let step = delta / segments as f32;
        let k = 4.0 / 3.0 * (step / 4.0).tan();

        let point_at = |theta: f32| {
            let (sin_t, cos_t) = theta.sin_cos();
            Point::new(
                cx + rx * cos_t * cos_phi - ry * sin_t * sin_phi,
                cy + rx * cos_t * sin_phi + ry * sin_t * cos_phi,
            )
        };
        let derivative_at = |theta: f32| {
            let (sin_t, cos_t) = theta.sin_cos();
            Point::new(
                -rx * sin_t * cos_phi - ry * cos_t * sin_phi,
                -rx * sin_t * sin_phi + ry * cos_t * cos_phi,
            )
        };

        let mut theta = theta1;
        for _ in 0..segments {
            let next = theta + step;
            let p0 = point_at(theta);
            let p1 = point_at(next);
            let d0 = derivative_at(theta);
            let d1 = derivative_at(next);
            let c1 = Point::new(p0.x + k * d0.x, p0.y + k * d0.y);
            let c2 = Point::new(p1.x - k * d1.x, p1.y - k * d1.y);
            self.cubic_to(c1, c2, p1)?;
            theta = next;
        }

        self.current = end;
        Ok(())
    }

    fn segment(&mut self, segment: Segment) -> Result<()> {
        match &mut self.open {
            Some(subpath) => subpath.segments.push(segment),
            None if self.has_moved => {
                // After a closepath, drawing continues in a new subpath
                // from the current point.
                self.open = Some(Subpath {
                    start: self.current,
                    segments: vec![segment],
                });
            }
            None => return Err(self.error("drawing command before any moveto")),
        }
        Ok(())
    }

    fn close_subpath(&mut self) {
        if let Some(subpath) = self.open.take() {
            if !subpath.segments.is_empty() {
                self.outline.subpaths.push(subpath);
            }
        }
    }

    fn reflect_cubic(&self) -> Point {
        match self.prev_cubic_control {
            Some(c) => Point::new(2.0 * self.current.x - c.x, 2.0 * self.current.y - c.y),
            None => self.current,
        }
    }

    fn reflect_quad(&self) -> Point {
        match self.prev_quad_control {
            Some(c) => Point::new(2.0 * self.current.x - c.x, 2.0 * self.current.y - c.y),
            None => self.current,
        }
    }

    fn reset_controls(&mut self) {
        self.prev_cubic_control = None;
        self.prev_quad_control = None;
    }

    fn point(&mut self, relative: bool) -> Result<Point> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(if relative {
            Point::new(self.current.x + x, self.current.y + y)
        } else {
            Point::new(x, y)
        })
    }

    fn number(&mut self) -> Result<f32> {
        self.skip_separators();
        let begin = self.pos;

        if matches!(self.bytes.get(self.pos), Some(b'+') | Some(b'-')) {
            self.pos += 1;
        }
        while matches!(self.bytes.get(self.pos), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.bytes.get(self.pos) == Some(&b'.') {
            self.pos += 1;
            while matches!(self.bytes.get(self.pos), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.bytes.get(self.pos), Some(b'e') | Some(b'E')) {
            self.pos += 1;
            if matches!(self.bytes.get(self.pos), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            while matches!(self.bytes.get(self.pos), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
        }

        let text = std::str::from_utf8(&self.bytes[begin..self.pos]).unwrap_or("");
        text.parse::<f32>()
            .map_err(|_| self.error("expected a number"))
    }

    /// Arc flags are single characters and may be run together ("11").
    fn flag(&mut self) -> Result<bool> {
        self.skip_separators();
        match self.bytes.get(self.pos) {
            Some(b'0') => {
                self.pos += 1;
                Ok(false)
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(true)
            }
            _ => Err(self.error("expected an arc flag")),
        }
    }

    fn skip_separators(&mut self) {
        while matches!(
            self.bytes.get(self.pos),
            Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | Some(b',')
        ) {
            self.pos += 1;
        }
    }

    fn error(&self, message: &str) -> IconError {
        IconError::FontBuild {
            message: format!("{} at offset {}", message, self.pos),
            help: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_triangle() {
        let outline = Outline::parse("M0 0 L10 0 L10 10 Z").unwrap();
        assert_eq!(outline.subpaths.len(), 1);
        assert_eq!(outline.subpaths[0].start, Point::new(0.0, 0.0));
        assert_eq!(outline.subpaths[0].segments.len(), 2);
    }

    #[test]
    fn test_parse_relative_and_shorthand() {
        let outline = Outline::parse("m10 10 h20 v20 h-20 z").unwrap();
        let segments = &outline.subpaths[0].segments;
        assert_eq!(segments[0], Segment::Line(Point::new(30.0, 10.0)));
        assert_eq!(segments[1], Segment::Line(Point::new(30.0, 30.0)));
        assert_eq!(segments[2], Segment::Line(Point::new(10.0, 30.0)));
    }

    #[test]
    fn test_parse_implicit_lineto_after_moveto() {
        let outline = Outline::parse("M0 0 10 0 10 10 Z").unwrap();
        assert_eq!(outline.subpaths[0].segments.len(), 2);
    }

    #[test]
    fn test_parse_curves() {
        let outline = Outline::parse("M0 0 C0 10 10 10 10 0 Q15 -5 20 0 Z").unwrap();
        let segments = &outline.subpaths[0].segments;
        assert!(matches!(segments[0], Segment::Cubic(..)));
        assert!(matches!(segments[1], Segment::Quad(..)));
    }

    #[test]
    fn test_parse_smooth_reflection() {
        let outline = Outline::parse("M0 0 C0 10 10 10 10 0 S20 -10 20 0 Z").unwrap();
        // S reflects the previous cubic control around the current point.
        match outline.subpaths[0].segments[1] {
            Segment::Cubic(c1, _, _) => assert_eq!(c1, Point::new(10.0, -10.0)),
            ref other => panic!("expected cubic, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_arc_becomes_cubics() {
        let outline = Outline::parse("M0 0 A10 10 0 0 1 20 0 Z").unwrap();
        assert!(outline.subpaths[0]
            .segments
            .iter()
            .all(|s| matches!(s, Segment::Cubic(..))));
        // A half circle needs at least two quarter-turn cubics.
        assert!(outline.subpaths[0].segments.len() >= 2);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Outline::parse("L10 10").is_err());
        assert!(Outline::parse("M0 0 X5").is_err());
        assert!(Outline::parse("wat").is_err());
        assert!(Outline::parse("M0 0 L1 1 Z 5").is_err());
    }

    #[test]
    fn test_parse_negative_and_compact_numbers() {
        let outline = Outline::parse("M1.5-2.5L-3 4Z").unwrap();
        assert_eq!(outline.subpaths[0].start, Point::new(1.5, -2.5));
        assert_eq!(
            outline.subpaths[0].segments[0],
            Segment::Line(Point::new(-3.0, 4.0))
        );
    }

    #[test]
    fn test_scale_translate_flips_y() {
        let mut outline = Outline::parse("M0 0 L10 0 L10 10 Z").unwrap();
        outline.scale_translate(1.0, -1.0, 0.0, 100.0);
        assert_eq!(outline.subpaths[0].start, Point::new(0.0, 100.0));
        assert_eq!(
            outline.subpaths[0].segments[1],
            Segment::Line(Point::new(10.0, 90.0))
        );
    }

    #[test]
    fn test_to_path_data_round_trips() {
        let original = Outline::parse("M0 0 L10 0 Q15 5 10 10 Z").unwrap();
        let reparsed = Outline::parse(&original.to_path_data()).unwrap();
        assert_eq!(original, reparsed);
    }

    #[test]
    fn test_flatten_polygon() {
        let outline = Outline::parse("M0 0 L10 0 L10 10 L0 10 Z").unwrap();
        let contours = outline.flatten();
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 4);
    }

    #[test]
    fn test_flatten_drops_degenerate_contours() {
        let outline = Outline::parse("M0 0 L10 0 Z").unwrap();
        assert!(outline.flatten().is_empty());
    }

    #[test]
    fn test_flatten_samples_curves() {
        let outline = Outline::parse("M0 0 C0 100 100 100 100 0 Z").unwrap();
        let contours = outline.flatten();
        assert_eq!(contours.len(), 1);
        assert!(contours[0].len() > 4);
    }
}
