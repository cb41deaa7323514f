pub trait Curve {
    fn value(&self, x: f64) -> f64;

    fn derivative(&self, x: f64) -> f64;

    /// Evaluates the curve at `n + 1` evenly spaced parameters `i / n` of the
    /// unit interval, endpoints included. `n == 0` yields the single value at 0.
    fn sample(&self, n: usize) -> Vec<f64> {
        if n == 0 {
            return vec![self.value(0.0)];
        }
        (0..=n)
            .map(|i| self.value(i as f64 / n as f64))
            .collect()
    }
}
