use super::Activation;

/// The hyperbolic tangent.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tanh;

impl Tanh {
    pub fn new() -> Self {
        Self
    }
}

impl Activation for Tanh {
    fn f(&self, z: f64) -> f64 {
        z.tanh()
    }

    fn df(&self, z: f64) -> f64 {
        let t = z.tanh();
        1. - t * t
    }
}
