use nalgebra::Vector3;

use crate::messages::{AccelSample, GyroSample, MagSample};

#[derive(Debug, Clone)]
pub struct AccelReading {
    pub accel_m_s2: Vector3<f32>,
}

impl AccelReading {
    pub fn to_wire(&self) -> AccelSample {
        AccelSample {
            x: self.accel_m_s2.x,
            y: self.accel_m_s2.y,
            z: self.accel_m_s2.z,
        }
    }
}

impl From<AccelSample> for AccelReading {
    fn from(sample: AccelSample) -> Self {
        AccelReading::from(&sample)
    }
}

impl From<&AccelSample> for AccelReading {
    fn from(sample: &AccelSample) -> Self {
        Self {
            accel_m_s2: Vector3::new(sample.x, sample.y, sample.z),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GyroReading {
    pub angvel_rad_s: Vector3<f32>,
}

impl GyroReading {
    pub fn to_wire(&self) -> GyroSample {
        GyroSample {
            x: self.angvel_rad_s.x,
            y: self.angvel_rad_s.y,
            z: self.angvel_rad_s.z,
        }
    }
}

impl From<GyroSample> for GyroReading {
    fn from(sample: GyroSample) -> Self {
        GyroReading::from(&sample)
    }
}

impl From<&GyroSample> for GyroReading {
    fn from(sample: &GyroSample) -> Self {
        Self {
            angvel_rad_s: Vector3::new(sample.x, sample.y, sample.z),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MagReading {
    pub mag_field_b_gauss: Vector3<f32>,
}

impl MagReading {
    pub fn to_wire(&self) -> MagSample {
        MagSample {
            x: self.mag_field_b_gauss.x,
            y: self.mag_field_b_gauss.y,
            z: self.mag_field_b_gauss.z,
        }
    }
}

impl From<MagSample> for MagReading {
    fn from(sample: MagSample) -> Self {
        MagReading::from(&sample)
    }
}

impl From<&MagSample> for MagReading {
    fn from(sample: &MagSample) -> Self {
        Self {
            mag_field_b_gauss: Vector3::new(sample.x, sample.y, sample.z),
        }
    }
}
