//! Explicit finite-difference heat conduction on a 2D grid.
//!
//! A [`Grid`] holds body nodes (the material being analyzed) and environment
//! nodes (ambient surroundings).
//! Each step updates interior nodes with the explicit diffusion stencil and
//! every other node with a flux balance over its four faces, recording the
//! full temperature field in a [`History`].
//!
//! [`Simulation`] wires up the common case: an environment ring around a
//! body, advanced for a fixed number of steps.

mod boundary;
mod config;
mod error;
mod grid;
mod history;
mod node;
mod sides;
mod simulation;
mod step;

pub mod render;

pub use boundary::{BoundaryCondition, NodeType, classify};
pub use config::{NodeProperties, SimulationConfig};
pub use error::{ConfigError, Error, GridError};
pub use grid::Grid;
pub use history::History;
pub use node::{MAX_STABLE_TAU, Node, Stability};
pub use sides::{Direction, Sides};
pub use simulation::Simulation;
