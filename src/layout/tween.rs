use super::PolarSpan;

/// Symmetric cubic easing, slow at both ends.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Start and end spans for every node of one transition. Given the elapsed
/// fraction in `[0, 1]` it yields the interpolated spans for that frame.
#[derive(Debug, Clone)]
pub struct Tween {
    pub from: Vec<PolarSpan>,
    pub to: Vec<PolarSpan>,
}

impl Tween {
    pub fn new(from: Vec<PolarSpan>, to: Vec<PolarSpan>) -> Self {
        debug_assert_eq!(from.len(), to.len());
        Self { from, to }
    }

    /// Write the eased interpolation at `fraction` into `out`.
    /// At `fraction >= 1` the end spans are copied exactly.
    pub fn apply(&self, fraction: f64, out: &mut [PolarSpan]) {
        if fraction >= 1.0 {
            out.copy_from_slice(&self.to);
            return;
        }
        let t = ease_cubic_in_out(fraction);
        for ((slot, from), to) in out.iter_mut().zip(&self.from).zip(&self.to) {
            *slot = from.lerp(to, t);
        }
    }

    /// Interpolated spans at `fraction`, freshly allocated.
    pub fn at(&self, fraction: f64) -> Vec<PolarSpan> {
        let mut out = self.from.clone();
        self.apply(fraction, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_is_symmetric_and_pinned() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        let a = ease_cubic_in_out(0.2);
        let b = ease_cubic_in_out(0.8);
        assert!((a + b - 1.0).abs() < 1e-12);
        assert!(a < 0.2);
    }

    #[test]
    fn tween_hits_end_exactly() {
        let from = vec![PolarSpan::new(0.0, 1.0, 1.0, 2.0)];
        let to = vec![PolarSpan::new(0.3, 2.9, 0.0, 1.0)];
        let tween = Tween::new(from.clone(), to.clone());
        assert_eq!(tween.at(0.0), from);
        assert_eq!(tween.at(1.0), to);
        let mid = tween.at(0.5)[0];
        assert!(mid.approx_eq(&PolarSpan::new(0.15, 1.95, 0.5, 1.5), 1e-12));
    }
}
