use crate::tensor::Tensor;

/// Adam optimizer over `(parameter, gradient)` pairs.
///
/// Moment buffers are allocated lazily on the first step, so the optimizer
/// can be constructed before the network's parameter list is known. The
/// pairs must be passed in the same order on every step.
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    t: u32,
    m: Vec<Vec<f32>>,
    v: Vec<Vec<f32>>,
}

impl Adam {
    #[must_use]
    pub fn new(lr: f32) -> Self {
        Self {
            lr,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            t: 0,
            m: Vec::new(),
            v: Vec::new(),
        }
    }

    /// Applies one bias-corrected Adam update in place.
    pub fn step(&mut self, params: &mut [(&mut Tensor, &Tensor)]) {
        if self.m.is_empty() {
            self.m = params.iter().map(|(p, _)| vec![0.0; p.len()]).collect();
            self.v = params.iter().map(|(p, _)| vec![0.0; p.len()]).collect();
        }
        self.t += 1;
        #[allow(clippy::cast_possible_wrap)]
        let t = self.t as i32;
        for ((p, g), (m_vec, v_vec)) in params
            .iter_mut()
            .zip(self.m.iter_mut().zip(self.v.iter_mut()))
        {
            for i in 0..p.len() {
                m_vec[i] = self.beta1 * m_vec[i] + (1.0 - self.beta1) * g.data[i];
                v_vec[i] = self.beta2 * v_vec[i] + (1.0 - self.beta2) * g.data[i] * g.data[i];
                let m_hat = m_vec[i] / (1.0 - self.beta1.powi(t));
                let v_hat = v_vec[i] / (1.0 - self.beta2.powi(t));
                p.data[i] -= self.lr * m_hat / (v_hat.sqrt() + self.eps);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adam_minimizes_a_quadratic() {
        // minimize (x - 3)^2; gradient is 2 (x - 3)
        let mut x = Tensor::from_vec(vec![1], vec![0.0]);
        let mut opt = Adam::new(0.1);
        for _ in 0..500 {
            let grad = Tensor::from_vec(vec![1], vec![2.0 * (x.data[0] - 3.0)]);
            opt.step(&mut [(&mut x, &grad)]);
        }
        assert!((x.data[0] - 3.0).abs() < 1e-2, "converged to {}", x.data[0]);
    }
}
