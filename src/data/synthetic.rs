use rand::Rng;

/// Generates `n` samples of 2D "two blobs" data with binary targets.
///
/// Class 0 is centered at (0.3, 0.3), class 1 at (0.7, 0.7); the blobs are
/// far enough apart to be linearly separable.
pub fn two_blobs(n: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut rng = rand::thread_rng();
    let centers = [(0.3f64, 0.3f64), (0.7f64, 0.7f64)];
    let mut inputs = Vec::with_capacity(n);
    let mut targets = Vec::with_capacity(n);
    for i in 0..n {
        let class = i % 2;
        let (cx, cy) = centers[class];
        let x = (cx + rng.gen_range(-0.1..0.1)).clamp(0.0, 1.0);
        let y = (cy + rng.gen_range(-0.1..0.1)).clamp(0.0, 1.0);
        inputs.push(vec![x, y]);
        targets.push(class as f64);
    }
    (inputs, targets)
}

/// Generates `n` samples of `y = slope·x + intercept` with uniform noise,
/// x drawn from [0, 1).
pub fn noisy_line(n: usize, slope: f64, intercept: f64, noise: f64) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut rng = rand::thread_rng();
    let mut inputs = Vec::with_capacity(n);
    let mut targets = Vec::with_capacity(n);
    for _ in 0..n {
        let x: f64 = rng.gen_range(0.0..1.0);
        let y = slope * x + intercept + rng.gen_range(-noise..=noise);
        inputs.push(vec![x]);
        targets.push(y);
    }
    (inputs, targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blobs_are_in_range_and_balanced() {
        let (inputs, targets) = two_blobs(100);
        assert_eq!(inputs.len(), 100);
        assert_eq!(targets.len(), 100);
        assert!(inputs
            .iter()
            .all(|p| p.iter().all(|&v| (0.0..=1.0).contains(&v))));
        let positives = targets.iter().filter(|&&t| t == 1.0).count();
        assert_eq!(positives, 50);
    }

    #[test]
    fn noisy_line_stays_near_the_line() {
        let (inputs, targets) = noisy_line(50, 2.0, -1.0, 0.05);
        for (x, y) in inputs.iter().zip(targets.iter()) {
            assert!((y - (2.0 * x[0] - 1.0)).abs() <= 0.05 + 1e-12);
        }
    }
}
