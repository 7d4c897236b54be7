use tracing::warn;
use uom::si::{
    f64::{Length, ThermodynamicTemperature, Time},
    heat_flux_density::watt_per_square_meter,
    heat_transfer::watt_per_square_meter_kelvin,
    length::meter,
    mass_density::kilogram_per_cubic_meter,
    specific_heat_capacity::kilojoule_per_kilogram_kelvin,
    thermal_conductivity::watt_per_meter_kelvin,
    thermodynamic_temperature::kelvin,
    time::second,
};

use crate::{BoundaryCondition, NodeProperties, NodeType, Sides};

/// Largest Fourier number for which the explicit interior update is stable.
pub const MAX_STABLE_TAU: f64 = 0.25;

/// A single cell of the grid.
///
/// Properties are stored as plain magnitudes in the working units of the
/// stepping formulas:
///
/// | Field   | Unit         |
/// |---------|--------------|
/// | `e_gen` | W/m²         |
/// | `h`     | W/(m²·K)     |
/// | `k`     | W/(m·K)      |
/// | `p`     | kg/m³        |
/// | `c_p`   | kJ/(kg·K)    |
/// | `t`     | K            |
/// | `a`     | k / (p·c_p)  |
/// | `tau`   | a·dT / L²    |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub(crate) e_gen: f64,
    pub(crate) h: f64,
    pub(crate) k: f64,
    pub(crate) p: f64,
    pub(crate) c_p: f64,
    pub(crate) t: f64,
    pub(crate) a: f64,
    pub(crate) tau: f64,
    pub(crate) time_step: f64,
    pub(crate) spacing: f64,
    pub(crate) node_type: NodeType,
    pub(crate) boundary: Sides<BoundaryCondition>,
}

/// Result of the explicit-scheme stability check for a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stability {
    Stable,

    /// The Fourier number reached [`MAX_STABLE_TAU`].
    ///
    /// `max_time_step` is the bound `L² / (4·a)` in seconds.
    Unstable { tau: f64, max_time_step: f64 },
}

impl Node {
    /// Creates a `Body` node with all faces set to conduction.
    ///
    /// Derives the thermal diffusivity and the Fourier number for the given
    /// time step and node spacing.
    /// Parameters that violate the stability limit are reported with a
    /// warning; the node is still created.
    #[must_use]
    pub fn new(properties: &NodeProperties, time_step: Time, spacing: Length) -> Self {
        let dt = time_step.get::<second>();
        let l = spacing.get::<meter>();

        let k = properties.conductivity.get::<watt_per_meter_kelvin>();
        let p = properties.density.get::<kilogram_per_cubic_meter>();
        let c_p = properties
            .specific_heat
            .get::<kilojoule_per_kilogram_kelvin>();

        let a = k / (p * c_p);
        let tau = a * dt / (l * l);

        let node = Self {
            e_gen: properties.heat_generation.get::<watt_per_square_meter>(),
            h: properties
                .convection_coefficient
                .get::<watt_per_square_meter_kelvin>(),
            k,
            p,
            c_p,
            t: properties.initial_temperature.get::<kelvin>(),
            a,
            tau,
            time_step: dt,
            spacing: l,
            node_type: NodeType::Body,
            boundary: Sides::from_value(BoundaryCondition::Conduction),
        };

        if let Stability::Unstable { tau, max_time_step } = node.stability() {
            warn!(
                tau,
                max_time_step_s = max_time_step,
                time_step_s = dt,
                "unstable simulation parameters: Fourier number must stay below {MAX_STABLE_TAU}"
            );
        }

        node
    }

    /// Returns whether the node satisfies the explicit stability limit.
    ///
    /// Requires both `tau < 0.25` and `dT < L² / (4·a)`.
    #[must_use]
    pub fn stability(&self) -> Stability {
        let max_time_step = self.spacing * self.spacing / (4.0 * self.a);
        if self.tau >= MAX_STABLE_TAU || self.time_step >= max_time_step {
            Stability::Unstable {
                tau: self.tau,
                max_time_step,
            }
        } else {
            Stability::Stable
        }
    }

    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.stability() == Stability::Stable
    }

    /// Current temperature.
    #[must_use]
    pub fn temperature(&self) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<kelvin>(self.t)
    }

    /// Current temperature in kelvin.
    #[must_use]
    pub fn temperature_k(&self) -> f64 {
        self.t
    }

    /// Heat generation in W/m².
    #[must_use]
    pub fn e_gen(&self) -> f64 {
        self.e_gen
    }

    /// Convection coefficient in W/(m²·K).
    #[must_use]
    pub fn h(&self) -> f64 {
        self.h
    }

    /// Thermal conductivity in W/(m·K).
    #[must_use]
    pub fn k(&self) -> f64 {
        self.k
    }

    /// Density in kg/m³.
    #[must_use]
    pub fn p(&self) -> f64 {
        self.p
    }

    /// Specific heat in kJ/(kg·K).
    #[must_use]
    pub fn c_p(&self) -> f64 {
        self.c_p
    }

    /// Thermal diffusivity `k / (p·c_p)`.
    #[must_use]
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Fourier number `a·dT / L²`.
    #[must_use]
    pub fn tau(&self) -> f64 {
        self.tau
    }

    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    #[must_use]
    pub fn boundary_conditions(&self) -> Sides<BoundaryCondition> {
        self.boundary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::f64::{MassDensity, SpecificHeatCapacity, ThermalConductivity};

    fn dt(value: f64) -> Time {
        Time::new::<second>(value)
    }

    fn l(value: f64) -> Length {
        Length::new::<meter>(value)
    }

    #[test]
    fn derives_diffusivity_and_fourier_number() {
        let props = NodeProperties::default();
        let node = Node::new(&props, dt(0.01), l(0.01));

        let a = 15.0 / (1000.0 * 4.184);
        assert_relative_eq!(node.a(), a, epsilon = 1e-12);
        assert_relative_eq!(node.tau(), a * 0.01 / (0.01 * 0.01), epsilon = 1e-12);
        assert_relative_eq!(node.temperature_k(), 400.0);
    }

    #[test]
    fn new_node_is_body_with_conduction_on_every_face() {
        let node = Node::new(&NodeProperties::default(), dt(0.01), l(0.01));

        assert_eq!(node.node_type(), NodeType::Body);
        assert_eq!(
            node.boundary_conditions(),
            Sides::from_value(BoundaryCondition::Conduction)
        );
    }

    #[test]
    fn default_properties_exceed_stability_limit() {
        // tau = (15 / 4184) * 0.01 / 1e-4 ≈ 0.358
        let node = Node::new(&NodeProperties::default(), dt(0.01), l(0.01));

        assert!(!node.is_stable());
        let Stability::Unstable { tau, max_time_step } = node.stability() else {
            panic!("expected an unstable node");
        };
        assert_relative_eq!(tau, node.tau());
        assert_relative_eq!(max_time_step, 1e-4 / (4.0 * node.a()), epsilon = 1e-12);
    }

    #[test]
    fn small_time_step_is_stable() {
        let node = Node::new(&NodeProperties::default(), dt(0.001), l(0.01));

        assert!(node.tau() < MAX_STABLE_TAU);
        assert_eq!(node.stability(), Stability::Stable);
    }

    #[test]
    fn stability_limit_is_exclusive() {
        // a = 1, L = 1 -> tau = dt, limit at dt = 0.25.
        let props = NodeProperties {
            conductivity: ThermalConductivity::new::<watt_per_meter_kelvin>(1.0),
            density: MassDensity::new::<kilogram_per_cubic_meter>(1.0),
            specific_heat: SpecificHeatCapacity::new::<kilojoule_per_kilogram_kelvin>(1.0),
            ..NodeProperties::default()
        };

        assert!(!Node::new(&props, dt(0.25), l(1.0)).is_stable());
        assert!(Node::new(&props, dt(0.2499), l(1.0)).is_stable());
    }
}
