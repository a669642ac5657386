use crate::config::TankGeometry;
use crate::sampler::SensorReading;

/// Standard gravity, m/s²
const GRAVITY: f32 = 9.806_65;

/// Values reported for one upload cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankLevel {
    pub depth_m: f32,
    pub pressure_kpa: f32,
    pub volume_liters: f32,
    pub voltage: f32,
}

impl TankGeometry {
    /// Liquid column height producing `pressure_kpa` at the transducer.
    pub fn depth_m(&self, pressure_kpa: f32) -> f32 {
        let weight = self.fluid_density_kg_m3 * GRAVITY;
        if weight <= 0.0 || pressure_kpa <= 0.0 {
            return 0.0;
        }
        pressure_kpa * 1000.0 / weight
    }

    pub fn volume_liters(&self, depth_m: f32) -> f32 {
        if depth_m <= 0.0 || self.area_m2 <= 0.0 {
            return 0.0;
        }
        depth_m * self.area_m2 * 1000.0
    }

    pub fn level(&self, reading: &SensorReading) -> TankLevel {
        let depth_m = self.depth_m(reading.pressure_kpa);
        TankLevel {
            depth_m,
            pressure_kpa: reading.pressure_kpa,
            volume_liters: self.volume_liters(depth_m),
            voltage: reading.voltage,
        }
    }
}
