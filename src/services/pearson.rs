use crate::models::Score;

/// Pearson correlation coefficient of paired scores
///
/// Returns `None` when the correlation is undefined: no pairs at all, or one side
/// gave the same score to every shared item (zero variance). The result is only
/// brought back into `[-1, 1]` when floating-point error pushes it past the bound.
pub fn pearson(pairs: &[(Score, Score)]) -> Option<f64> {
    if pairs.is_empty() {
        return None;
    }

    let n = pairs.len() as f64;
    let (sum_x, sum_y) = pairs.iter().fold((0.0, 0.0), |(sx, sy), &(x, y)| {
        (sx + f64::from(x), sy + f64::from(y))
    });
    let mean_x = sum_x / n;
    let mean_y = sum_y / n;

    let (covariance, var_x, var_y) =
        pairs
            .iter()
            .fold((0.0, 0.0, 0.0), |(cov, vx, vy), &(x, y)| {
                let dx = f64::from(x) - mean_x;
                let dy = f64::from(y) - mean_y;
                (cov + dx * dy, vx + dx * dx, vy + dy * dy)
            });

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some((covariance / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}
