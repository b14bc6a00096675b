//! 帧时间

/// 两帧之间的时间间隔
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Timestep {
    seconds: f32,
}

impl Timestep {
    pub fn new(seconds: f32) -> Self {
        Self { seconds }
    }

    pub fn seconds(&self) -> f32 {
        self.seconds
    }

    pub fn milliseconds(&self) -> f32 {
        self.seconds * 1000.0
    }
}

impl From<f32> for Timestep {
    fn from(seconds: f32) -> Self {
        Self::new(seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units() {
        let step = Timestep::from(0.016);
        assert_eq!(step.seconds(), 0.016);
        assert!((step.milliseconds() - 16.0).abs() < 1e-4);
    }
}
