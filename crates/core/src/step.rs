//! Explicit update rules for a single node.
//!
//! All functions read temperatures from the pre-step field and return the
//! node's temperature after one time step.

use crate::{BoundaryCondition, Node};

/// Grid-wide constants used by the update rules, as plain magnitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct StepConstants {
    /// Ambient temperature, in K.
    pub(crate) ambient: f64,

    /// Time step, in s.
    pub(crate) time_step: f64,

    /// Node spacing, in m.
    pub(crate) spacing: f64,
}

/// Returns the next temperature of a node surrounded by body nodes.
///
/// ```text
/// T' = (1 − 4·τ)·T + τ·(T_left + T_bottom + T_right + T_top) + τ·e_gen·L²/k
/// ```
pub(crate) fn interior_temperature(node: &Node, neighbors: [f64; 4], spacing: f64) -> f64 {
    let tau = node.tau;
    let sum: f64 = neighbors.iter().sum();

    (1.0 - 4.0 * tau) * node.t + tau * sum + tau * node.e_gen * spacing * spacing / node.k
}

/// Returns the heat flow into `node` across one face.
///
/// - Conduction: `k · (T_neighbor − T) / 2`
/// - Convection: `h_neighbor · L · (T_ambient − T)`
/// - Insulated: zero
///
/// A face without a neighbor carries no heat whatever its condition.
pub(crate) fn face_flux(
    condition: BoundaryCondition,
    node: &Node,
    neighbor: Option<&Node>,
    constants: &StepConstants,
) -> f64 {
    match (condition, neighbor) {
        (BoundaryCondition::Conduction, Some(neighbor)) => node.k * (neighbor.t - node.t) / 2.0,
        (BoundaryCondition::Convection, Some(neighbor)) => {
            neighbor.h * constants.spacing * (constants.ambient - node.t)
        }
        (BoundaryCondition::Insulated, _) | (_, None) => 0.0,
    }
}

/// Returns the next temperature of a node from its net face heat flow.
///
/// ```text
/// T' = T + (ΣQ + e_gen·L·(L/2)) / (p·(L²/2)·c_p) · dT
/// ```
pub(crate) fn boundary_temperature(node: &Node, net_flux: f64, constants: &StepConstants) -> f64 {
    let l = constants.spacing;
    let generation = node.e_gen * l * (l / 2.0);
    let capacity = node.p * (l * l / 2.0) * node.c_p;

    node.t + (net_flux + generation) / capacity * constants.time_step
}
