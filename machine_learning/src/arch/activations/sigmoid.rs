use super::Activation;

/// The logistic function, `1 / (1 + e^-z)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sigmoid;

impl Sigmoid {
    pub fn new() -> Self {
        Self
    }
}

impl Activation for Sigmoid {
    fn f(&self, z: f64) -> f64 {
        // Split on the sign so `exp` never overflows.
        if z >= 0. {
            1. / (1. + (-z).exp())
        } else {
            let e = z.exp();
            e / (1. + e)
        }
    }

    fn df(&self, z: f64) -> f64 {
        let s = self.f(z);
        s * (1. - s)
    }
}
