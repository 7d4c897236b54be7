use uom::si::{
    f64::{
        HeatFluxDensity, HeatTransfer, Length, MassDensity, SpecificHeatCapacity,
        ThermalConductivity, ThermodynamicTemperature, Time,
    },
    heat_flux_density::watt_per_square_meter,
    heat_transfer::watt_per_square_meter_kelvin,
    length::meter,
    mass_density::kilogram_per_cubic_meter,
    specific_heat_capacity::kilojoule_per_kilogram_kelvin,
    thermal_conductivity::watt_per_meter_kelvin,
    thermodynamic_temperature::kelvin,
    time::second,
};

use crate::ConfigError;

/// Material properties and initial state shared by every node of a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeProperties {
    /// Heat generated within the node, per unit face area.
    pub heat_generation: HeatFluxDensity,

    /// Convection coefficient used when this node is the far side of a
    /// convective face.
    pub convection_coefficient: HeatTransfer,

    pub conductivity: ThermalConductivity,
    pub density: MassDensity,
    pub specific_heat: SpecificHeatCapacity,
    pub initial_temperature: ThermodynamicTemperature,
}

impl Default for NodeProperties {
    fn default() -> Self {
        Self {
            heat_generation: HeatFluxDensity::new::<watt_per_square_meter>(0.0),
            convection_coefficient: HeatTransfer::new::<watt_per_square_meter_kelvin>(80.0),
            conductivity: ThermalConductivity::new::<watt_per_meter_kelvin>(15.0),
            density: MassDensity::new::<kilogram_per_cubic_meter>(1000.0),
            specific_heat: SpecificHeatCapacity::new::<kilojoule_per_kilogram_kelvin>(4.184),
            initial_temperature: ThermodynamicTemperature::new::<kelvin>(400.0),
        }
    }
}

/// Everything needed to build and run one grid simulation.
///
/// `nodes_x` is the extent of the first grid index `i` and `nodes_y` the
/// extent of the second index `j`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub nodes_x: usize,
    pub nodes_y: usize,

    /// Temperature of the surroundings, applied to every `Env` node.
    pub ambient_temperature: ThermodynamicTemperature,

    /// Default properties for every node.
    pub node: NodeProperties,

    pub time_step: Time,

    /// Distance between adjacent nodes, identical in both directions.
    pub node_spacing: Length,

    /// Number of update steps, which fixes the size of the history tensor.
    pub num_steps: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            nodes_x: 25,
            nodes_y: 25,
            ambient_temperature: ThermodynamicTemperature::new::<kelvin>(293.0),
            node: NodeProperties::default(),
            time_step: Time::new::<second>(0.01),
            node_spacing: Length::new::<meter>(0.01),
            num_steps: 100,
        }
    }
}

impl SimulationConfig {
    /// Checks that the grid is non-empty and the physical inputs are usable.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nodes_x == 0 || self.nodes_y == 0 {
            return Err(ConfigError::EmptyGrid {
                nodes_x: self.nodes_x,
                nodes_y: self.nodes_y,
            });
        }

        let node = &self.node;
        positive("time_step", self.time_step.get::<second>())?;
        positive("node_spacing", self.node_spacing.get::<meter>())?;
        positive(
            "conductivity",
            node.conductivity.get::<watt_per_meter_kelvin>(),
        )?;
        positive("density", node.density.get::<kilogram_per_cubic_meter>())?;
        positive(
            "specific_heat",
            node.specific_heat.get::<kilojoule_per_kilogram_kelvin>(),
        )?;
        finite(
            "heat_generation",
            node.heat_generation.get::<watt_per_square_meter>(),
        )?;
        finite(
            "convection_coefficient",
            node.convection_coefficient
                .get::<watt_per_square_meter_kelvin>(),
        )?;
        finite(
            "initial_temperature",
            node.initial_temperature.get::<kelvin>(),
        )?;
        finite(
            "ambient_temperature",
            self.ambient_temperature.get::<kelvin>(),
        )?;

        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { name, value })
    }
}
