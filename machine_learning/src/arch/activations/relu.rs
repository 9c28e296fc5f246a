/// Rectified linear unit, `max(0, z)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Relu;

impl Relu {
    pub fn f(&self, z: f32) -> f32 {
        z.max(0.)
    }

    /// The derivative at zero is taken as zero.
    pub fn df(&self, z: f32) -> f32 {
        if z > 0. { 1. } else { 0. }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_negatives() {
        assert_eq!(Relu.f(-3.), 0.);
        assert_eq!(Relu.f(2.5), 2.5);
        assert_eq!(Relu.df(-1.), 0.);
        assert_eq!(Relu.df(0.), 0.);
        assert_eq!(Relu.df(4.), 1.);
    }
}
