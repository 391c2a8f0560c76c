//! Minimal 3-vector arithmetic on `[f64; 3]`.

/// A point or vector in 3-D space.
pub type Point3 = [f64; 3];

#[inline]
pub fn sub(a: Point3, b: Point3) -> Point3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn add(a: Point3, b: Point3) -> Point3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn scale(a: Point3, s: f64) -> Point3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub fn dot(a: Point3, b: Point3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross(a: Point3, b: Point3) -> Point3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn norm(a: Point3) -> f64 {
    dot(a, a).sqrt()
}

#[inline]
pub fn distance(a: Point3, b: Point3) -> f64 {
    norm(sub(a, b))
}

/// Weighted sum `Σ wᵢ·pᵢ` of a point set (shape-function interpolation).
pub fn combine(points: &[Point3], weights: &[f64]) -> Point3 {
    points
        .iter()
        .zip(weights)
        .fold([0.0; 3], |acc, (p, &w)| add(acc, scale(*p, w)))
}

/// Arithmetic mean of a point set.
pub fn centroid(points: &[Point3]) -> Point3 {
    if points.is_empty() {
        return [0.0; 3];
    }
    scale(
        points.iter().fold([0.0; 3], |acc, p| add(acc, *p)),
        1.0 / points.len() as f64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_is_affine_interpolation() {
        let p = combine(&[[0.0, 0.0, 0.0], [2.0, 4.0, 6.0]], &[0.75, 0.25]);
        assert_eq!(p, [0.5, 1.0, 1.5]);
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_eq!(cross([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
        assert_eq!(distance([1.0, 2.0, 2.0], [0.0; 3]), 3.0);
        assert_eq!(centroid(&[[0.0; 3], [2.0, 2.0, 2.0]]), [1.0, 1.0, 1.0]);
    }
}
