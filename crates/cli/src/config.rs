//! TOML configuration file.
//!
//! Quantities are plain numbers whose field names carry their unit:
//!
//! ```toml
//! [grid]
//! nodes_x = 25
//! nodes_y = 25
//! num_steps = 100
//! time_step_s = 0.01
//! node_spacing_m = 0.01
//! ambient_temperature_k = 293.0
//!
//! [node]
//! heat_generation_w_per_m2 = 0.0
//! convection_coefficient_w_per_m2_k = 80.0
//! conductivity_w_per_m_k = 15.0
//! density_kg_per_m3 = 1000.0
//! specific_heat_kj_per_kg_k = 4.184
//! initial_temperature_k = 400.0
//! ```
//!
//! Missing sections and fields take the library defaults.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use heatgrid_core::{NodeProperties, SimulationConfig};
use serde::Deserialize;
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

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub grid: GridSection,
    pub node: NodeSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridSection {
    pub nodes_x: usize,
    pub nodes_y: usize,
    pub num_steps: usize,
    pub time_step_s: f64,
    pub node_spacing_m: f64,
    pub ambient_temperature_k: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeSection {
    pub heat_generation_w_per_m2: f64,
    pub convection_coefficient_w_per_m2_k: f64,
    pub conductivity_w_per_m_k: f64,
    pub density_kg_per_m3: f64,
    pub specific_heat_kj_per_kg_k: f64,
    pub initial_temperature_k: f64,
}

impl Default for GridSection {
    fn default() -> Self {
        let config = SimulationConfig::default();
        Self {
            nodes_x: config.nodes_x,
            nodes_y: config.nodes_y,
            num_steps: config.num_steps,
            time_step_s: config.time_step.get::<second>(),
            node_spacing_m: config.node_spacing.get::<meter>(),
            ambient_temperature_k: config.ambient_temperature.get::<kelvin>(),
        }
    }
}

impl Default for NodeSection {
    fn default() -> Self {
        let node = NodeProperties::default();
        Self {
            heat_generation_w_per_m2: node.heat_generation.get::<watt_per_square_meter>(),
            convection_coefficient_w_per_m2_k: node
                .convection_coefficient
                .get::<watt_per_square_meter_kelvin>(),
            conductivity_w_per_m_k: node.conductivity.get::<watt_per_meter_kelvin>(),
            density_kg_per_m3: node.density.get::<kilogram_per_cubic_meter>(),
            specific_heat_kj_per_kg_k: node.specific_heat.get::<kilojoule_per_kilogram_kelvin>(),
            initial_temperature_k: node.initial_temperature.get::<kelvin>(),
        }
    }
}

impl ConfigFile {
    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Converts the plain numbers into a typed simulation configuration.
    #[must_use]
    pub fn to_simulation_config(&self) -> SimulationConfig {
        let grid = &self.grid;
        let node = &self.node;

        SimulationConfig {
            nodes_x: grid.nodes_x,
            nodes_y: grid.nodes_y,
            ambient_temperature: ThermodynamicTemperature::new::<kelvin>(
                grid.ambient_temperature_k,
            ),
            node: NodeProperties {
                heat_generation: HeatFluxDensity::new::<watt_per_square_meter>(
                    node.heat_generation_w_per_m2,
                ),
                convection_coefficient: HeatTransfer::new::<watt_per_square_meter_kelvin>(
                    node.convection_coefficient_w_per_m2_k,
                ),
                conductivity: ThermalConductivity::new::<watt_per_meter_kelvin>(
                    node.conductivity_w_per_m_k,
                ),
                density: MassDensity::new::<kilogram_per_cubic_meter>(node.density_kg_per_m3),
                specific_heat: SpecificHeatCapacity::new::<kilojoule_per_kilogram_kelvin>(
                    node.specific_heat_kj_per_kg_k,
                ),
                initial_temperature: ThermodynamicTemperature::new::<kelvin>(
                    node.initial_temperature_k,
                ),
            },
            time_step: Time::new::<second>(grid.time_step_s),
            node_spacing: Length::new::<meter>(grid.node_spacing_m),
            num_steps: grid.num_steps,
        }
    }
}
