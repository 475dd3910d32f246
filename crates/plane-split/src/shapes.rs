//! Small polygon builders and point helpers used by tests and the visualizer.

use nalgebra::Point3;

/// Axis-aligned square of side `d` in the XY plane, counter-clockwise from the origin.
pub fn square_xy(d: f64) -> Vec<Point3<f64>> {
    vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(d, 0.0, 0.0),
        Point3::new(d, d, 0.0),
        Point3::new(0.0, d, 0.0),
    ]
}

/// Comb-shaped polygon in the XY plane with `teeth` unit-wide teeth.
///
/// The base spans `y = 0..1`, each tooth reaches up to `y = 2`, and the
/// teeth are separated by unit-wide gaps. A cut at `y = 1.5` yields one
/// fragment per tooth above and a single fragment below. `comb(2)` is a
/// U shape.
pub fn comb(teeth: usize) -> Vec<Point3<f64>> {
    let teeth = teeth.max(1);
    let width = (2 * teeth - 1) as f64;

    let mut points = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(width, 0.0, 0.0)];
    for i in (0..teeth).rev() {
        let left = (2 * i) as f64;
        points.push(Point3::new(left + 1.0, 2.0, 0.0));
        points.push(Point3::new(left, 2.0, 0.0));
        if i > 0 {
            points.push(Point3::new(left, 1.0, 0.0));
            points.push(Point3::new(left - 1.0, 1.0, 0.0));
        }
    }
    points
}

/// Moves the z coordinate of successive points alternately to `+d` and `-d`.
///
/// Turns a flat ring into a zig-zag one, which is useful for exercising the
/// support plane's tolerance widening.
pub fn alternate_z(mut points: Vec<Point3<f64>>, d: f64) -> Vec<Point3<f64>> {
    for (i, p) in points.iter_mut().enumerate() {
        p.z = if i % 2 == 0 { d } else { -d };
    }
    points
}

/// Replaces `-0.0` coordinates with `0.0` so points compare and print stably.
pub fn elide_negative_zero(p: Point3<f64>) -> Point3<f64> {
    p.map(|c| if c == 0.0 { 0.0 } else { c })
}
