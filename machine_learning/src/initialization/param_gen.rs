/// Produces the initial values of a model's parameters, a bounded amount at a time.
pub trait ParamGen {
    /// Draws up to `n` values.
    ///
    /// # Returns
    /// Fewer than `n` values when the generator runs dry part way through, `None` once it has
    /// nothing left to give.
    fn sample(&mut self, n: usize) -> Option<Vec<f32>>;
}
