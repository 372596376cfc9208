//! Ramer–Douglas–Peucker polyline simplification over `[time, value]` points.

fn distances(points: &[[f64; 2]], start: [f64; 2], end: [f64; 2]) -> Vec<f64> {
    if start == end {
        return points
            .iter()
            .map(|p| ((p[0] - start[0]).powi(2) + (p[1] - start[1]).powi(2)).sqrt())
            .collect();
    }
    let chord = [end[0] - start[0], end[1] - start[1]];
    let length = (chord[0].powi(2) + chord[1].powi(2)).sqrt();
    points
        .iter()
        .map(|p| {
            let cross = chord[0] * (start[1] - p[1]) - chord[1] * (start[0] - p[0]);
            cross.abs() / length
        })
        .collect()
}

/// Drops every point that lies within `epsilon` of the chord of its segment.
/// The first and last points are always kept.
pub fn simplify(points: &[[f64; 2]], epsilon: f64) -> Vec<[f64; 2]> {
    match points.len() {
        0 => Vec::new(),
        1 => vec![points[0]],
        _ => reduce(points, epsilon),
    }
}

fn reduce(points: &[[f64; 2]], epsilon: f64) -> Vec<[f64; 2]> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let start = points[0];
    let end = points[points.len() - 1];
    let dists = distances(points, start, end);

    let mut index = 0;
    let mut dmax = f64::NEG_INFINITY;
    for (idx, dist) in dists.iter().enumerate() {
        if *dist > dmax {
            dmax = *dist;
            index = idx;
        }
    }

    let interior = index > 0 && index < points.len() - 1;
    if interior && dmax > epsilon {
        let mut left = reduce(&points[..=index], epsilon);
        let right = reduce(&points[index..], epsilon);
        left.pop();
        left.extend(right);
        left
    } else {
        vec![start, end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_chord_uses_distance_to_start() {
        let points = [[0.0, 0.0], [3.0, 4.0], [0.0, 0.0]];
        assert_eq!(distances(&points, points[0], points[2]), vec![0.0, 5.0, 0.0]);
        assert_eq!(simplify(&points, 4.9).len(), 3);
        assert_eq!(simplify(&points, 5.0).len(), 2);
    }

    #[test]
    fn perpendicular_distance() {
        let points = [[0.0, 0.0], [1.0, 2.0], [2.0, 0.0]];
        let dists = distances(&points, points[0], points[2]);
        assert_eq!(dists[1], 2.0);
    }

    #[test]
    fn negative_epsilon_keeps_endpoints_only() {
        let points = [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]];
        assert_eq!(simplify(&points, -1.0), vec![[0.0, 0.0], [2.0, 2.0]]);
    }
}
