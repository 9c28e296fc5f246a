/// Logistic function scaled by `amp`, `amp / (1 + e^-z)`.
#[derive(Clone, Debug, Default)]
pub struct Sigmoid {
    amp: f32,
}

impl Sigmoid {
    pub fn new(amp: f32) -> Self {
        Self { amp }
    }

    pub fn amp(&self) -> f32 {
        self.amp
    }

    pub fn f(&self, z: f32) -> f32 {
        self.amp * logistic(z)
    }

    /// Written in terms of the unscaled output, stays finite when `z` saturates.
    pub fn df(&self, z: f32) -> f32 {
        let s = logistic(z);
        self.amp * s * (1. - s)
    }
}

fn logistic(z: f32) -> f32 {
    1. / (1. + (-z).exp())
}
