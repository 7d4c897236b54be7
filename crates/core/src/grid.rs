use ndarray::{Array2, Zip};
use tracing::{debug, trace};
use uom::si::{
    f64::ThermodynamicTemperature, length::meter, thermodynamic_temperature::kelvin, time::second,
};

use crate::{
    BoundaryCondition, ConfigError, Direction, GridError, History, Node, NodeType,
    SimulationConfig, Sides, boundary,
    step::{self, StepConstants},
};

/// A fixed-size rectangular grid of nodes and its temperature history.
///
/// The grid follows a strict lifecycle:
///
/// 1. [`Grid::new`] builds every node from the default properties.
/// 2. [`Grid::set_node_type`] retypes any number of nodes.
/// 3. [`Grid::generate`] classifies the faces of every node, exactly once.
/// 4. [`Grid::update`] advances one time step, up to `num_steps` times.
///
/// Calling [`Grid::update`] before [`Grid::generate`] leaves every face at
/// its default [`BoundaryCondition::Conduction`]; the results are then not
/// physically meaningful.
#[derive(Debug, Clone)]
pub struct Grid {
    nodes: Array2<Node>,
    history: History,
    current_step: usize,
    constants: StepConstants,
}

impl Grid {
    /// Builds a grid of `Body` nodes with the configured default properties.
    ///
    /// The initial temperature field is recorded as history slot 0.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let shape = (config.nodes_x, config.nodes_y);
        let prototype = Node::new(&config.node, config.time_step, config.node_spacing);
        let nodes = Array2::from_elem(shape, prototype);

        let mut history = History::new(
            config.num_steps,
            config.nodes_x,
            config.nodes_y,
            config.time_step,
        );
        history.record(0, &nodes.map(|node| node.t));

        Ok(Self {
            nodes,
            history,
            current_step: 0,
            constants: StepConstants {
                ambient: config.ambient_temperature.get::<kelvin>(),
                time_step: config.time_step.get::<second>(),
                spacing: config.node_spacing.get::<meter>(),
            },
        })
    }

    /// Returns `(nodes_x, nodes_y)`.
    #[must_use]
    pub fn dim(&self) -> (usize, usize) {
        self.nodes.dim()
    }

    /// Returns the node at `(i, j)`, or `None` if out of range.
    #[must_use]
    pub fn node(&self, i: usize, j: usize) -> Option<&Node> {
        self.nodes.get((i, j))
    }

    /// All nodes, indexed by `[[i, j]]`.
    #[must_use]
    pub fn nodes(&self) -> &Array2<Node> {
        &self.nodes
    }

    /// Number of updates applied so far.
    #[must_use]
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    #[must_use]
    pub fn ambient_temperature(&self) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<kelvin>(self.constants.ambient)
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn into_history(self) -> History {
        self.history
    }

    /// Current temperature of every node, in K.
    #[must_use]
    pub fn temperatures(&self) -> Array2<f64> {
        self.nodes.map(|node| node.t)
    }

    /// Sets the type of node `(i, j)`.
    ///
    /// Marking a node [`NodeType::Env`] also resets its temperature to ambient.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if `(i, j)` is outside the grid.
    pub fn set_node_type(
        &mut self,
        i: usize,
        j: usize,
        node_type: NodeType,
    ) -> Result<(), GridError> {
        let ambient = self.constants.ambient;
        let node = self.node_mut(i, j)?;

        node.node_type = node_type;
        if node_type == NodeType::Env {
            node.t = ambient;
        }
        Ok(())
    }

    /// Overrides one face condition of node `(i, j)`.
    ///
    /// Intended for use after [`Grid::generate`], which would otherwise
    /// overwrite the override.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if `(i, j)` is outside the grid.
    pub fn set_boundary_condition(
        &mut self,
        i: usize,
        j: usize,
        direction: Direction,
        condition: BoundaryCondition,
    ) -> Result<(), GridError> {
        self.node_mut(i, j)?.boundary[direction] = condition;
        Ok(())
    }

    /// Returns the coordinates of the neighbor across `direction`, if it
    /// lies within the grid.
    #[must_use]
    pub fn neighbor(&self, i: usize, j: usize, direction: Direction) -> Option<(usize, usize)> {
        let (di, dj) = direction.offset();
        self.in_bounds(i.checked_add_signed(di)?, j.checked_add_signed(dj)?)
    }

    /// Returns whether `(i, j)` takes the interior update.
    ///
    /// True only when `i > 0`, `j > 0`, and the neighbor across every
    /// [`Direction`] exists and is a `Body` node.
    /// Coordinates whose neighbors fall outside the grid are never internal.
    #[must_use]
    pub fn is_internal(&self, i: usize, j: usize) -> bool {
        if i == 0 || j == 0 {
            return false;
        }

        Direction::ALL.into_iter().all(|direction| {
            self.neighbor(i, j, direction)
                .is_some_and(|index| self.nodes[index].node_type == NodeType::Body)
        })
    }

    /// Classifies the face between `(this_i, this_j)` and a neighbor
    /// coordinate that may lie outside the grid.
    ///
    /// # Panics
    ///
    /// Panics if `(this_i, this_j)` itself is outside the grid.
    #[must_use]
    pub fn classify_boundary(
        &self,
        this_i: usize,
        this_j: usize,
        neighbor_i: isize,
        neighbor_j: isize,
    ) -> BoundaryCondition {
        let neighbor = usize::try_from(neighbor_i)
            .ok()
            .zip(usize::try_from(neighbor_j).ok())
            .and_then(|(ni, nj)| self.in_bounds(ni, nj))
            .map(|index| self.nodes[index].node_type);

        boundary::classify(self.nodes[[this_i, this_j]].node_type, neighbor)
    }

    /// Classifies every face of every node and records the current field as
    /// history slot `current_step`.
    ///
    /// Call once, after all node types are set and before the first update.
    pub fn generate(&mut self) {
        let conditions = Array2::from_shape_fn(self.nodes.dim(), |(i, j)| self.classify_sides(i, j));

        Zip::from(&mut self.nodes)
            .and(&conditions)
            .for_each(|node, &sides| node.boundary = sides);

        let field = self.temperatures();
        self.history.record(self.current_step, &field);
        debug!(
            internal = self.count_internal(),
            "classified node boundary conditions"
        );
    }

    /// Advances every node by one time step.
    ///
    /// New temperatures are computed from the pre-step field, applied
    /// together, and recorded at history slot `current_step`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::HistoryFull`] once `num_steps` updates have been
    /// applied; the grid is left unchanged.
    pub fn update(&mut self) -> Result<(), GridError> {
        let num_steps = self.history.num_steps();
        if self.current_step >= num_steps {
            return Err(GridError::HistoryFull { num_steps });
        }

        let next = Array2::from_shape_fn(self.nodes.dim(), |(i, j)| self.next_temperature(i, j));
        Zip::from(&mut self.nodes)
            .and(&next)
            .for_each(|node, &t| node.t = t);

        self.current_step += 1;
        self.history.record(self.current_step, &next);
        trace!(step = self.current_step, "advanced grid");

        Ok(())
    }

    fn next_temperature(&self, i: usize, j: usize) -> f64 {
        let node = &self.nodes[[i, j]];

        if self.is_internal(i, j) {
            // The top term takes the node's own temperature, not (i, j - 1).
            let neighbors = [
                self.nodes[[i - 1, j]].t,
                self.nodes[[i, j + 1]].t,
                self.nodes[[i + 1, j]].t,
                node.t,
            ];
            step::interior_temperature(node, neighbors, self.constants.spacing)
        } else {
            let net_flux: f64 = node
                .boundary
                .iter()
                .map(|(direction, &condition)| {
                    let neighbor = self
                        .neighbor(i, j, direction)
                        .map(|index| &self.nodes[index]);
                    step::face_flux(condition, node, neighbor, &self.constants)
                })
                .sum();
            step::boundary_temperature(node, net_flux, &self.constants)
        }
    }

    fn classify_sides(&self, i: usize, j: usize) -> Sides<BoundaryCondition> {
        let this = self.nodes[[i, j]].node_type;
        Sides::from_fn(|direction| {
            let neighbor = self
                .neighbor(i, j, direction)
                .map(|index| self.nodes[index].node_type);
            boundary::classify(this, neighbor)
        })
    }

    fn count_internal(&self) -> usize {
        let (nodes_x, nodes_y) = self.dim();
        (0..nodes_x)
            .flat_map(|i| (0..nodes_y).map(move |j| (i, j)))
            .filter(|&(i, j)| self.is_internal(i, j))
            .count()
    }

    fn in_bounds(&self, i: usize, j: usize) -> Option<(usize, usize)> {
        let (nodes_x, nodes_y) = self.dim();
        (i < nodes_x && j < nodes_y).then_some((i, j))
    }

    fn node_mut(&mut self, i: usize, j: usize) -> Result<&mut Node, GridError> {
        let (nodes_x, nodes_y) = self.dim();
        self.nodes.get_mut((i, j)).ok_or(GridError::OutOfBounds {
            i,
            j,
            nodes_x,
            nodes_y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::BoundaryCondition::{Conduction, Convection, Insulated};

    fn config(nodes_x: usize, nodes_y: usize, num_steps: usize) -> SimulationConfig {
        SimulationConfig {
            nodes_x,
            nodes_y,
            num_steps,
            ..SimulationConfig::default()
        }
    }

    /// A grid with its outer ring marked `Env`, not yet generated.
    fn ringed_grid(nodes_x: usize, nodes_y: usize, num_steps: usize) -> Grid {
        let mut grid = Grid::new(&config(nodes_x, nodes_y, num_steps)).unwrap();
        for i in 0..nodes_x {
            for j in 0..nodes_y {
                if i == 0 || j == 0 || i == nodes_x - 1 || j == nodes_y - 1 {
                    grid.set_node_type(i, j, NodeType::Env).unwrap();
                }
            }
        }
        grid
    }

    #[test]
    fn new_grid_records_initial_field() {
        let grid = Grid::new(&config(3, 4, 2)).unwrap();

        assert_eq!(grid.dim(), (3, 4));
        assert_eq!(grid.history().shape(), (3, 3, 4));
        assert!(grid.history().snapshot(0).unwrap().iter().all(|&t| t == 400.0));
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(matches!(
            Grid::new(&config(0, 4, 2)),
            Err(ConfigError::EmptyGrid { .. })
        ));
    }

    #[test]
    fn env_nodes_take_ambient_temperature() {
        let mut grid = Grid::new(&config(3, 3, 1)).unwrap();
        grid.set_node_type(1, 2, NodeType::Env).unwrap();

        let node = grid.node(1, 2).unwrap();
        assert_eq!(node.node_type(), NodeType::Env);
        assert_relative_eq!(node.temperature_k(), 293.0);

        // Retyping back to body keeps the ambient temperature.
        grid.set_node_type(1, 2, NodeType::Body).unwrap();
        assert_relative_eq!(grid.node(1, 2).unwrap().temperature_k(), 293.0);
    }

    #[test]
    fn set_node_type_out_of_bounds_errors() {
        let mut grid = Grid::new(&config(3, 3, 1)).unwrap();
        assert_eq!(
            grid.set_node_type(3, 0, NodeType::Env),
            Err(GridError::OutOfBounds {
                i: 3,
                j: 0,
                nodes_x: 3,
                nodes_y: 3
            })
        );
    }

    #[test]
    fn neighbor_respects_bounds() {
        let grid = Grid::new(&config(3, 3, 1)).unwrap();

        assert_eq!(grid.neighbor(0, 0, Direction::Left), None);
        assert_eq!(grid.neighbor(0, 0, Direction::Top), None);
        assert_eq!(grid.neighbor(0, 0, Direction::Right), Some((1, 0)));
        assert_eq!(grid.neighbor(0, 0, Direction::Bottom), Some((0, 1)));
        assert_eq!(grid.neighbor(2, 2, Direction::Right), None);
        assert_eq!(grid.neighbor(2, 2, Direction::Bottom), None);
    }

    #[test]
    fn border_nodes_are_never_internal() {
        let grid = Grid::new(&config(4, 4, 1)).unwrap();

        for k in 0..4 {
            assert!(!grid.is_internal(0, k));
            assert!(!grid.is_internal(k, 0));
            assert!(!grid.is_internal(3, k));
            assert!(!grid.is_internal(k, 3));
        }
        assert!(grid.is_internal(1, 1));
        assert!(grid.is_internal(2, 2));
    }

    #[test]
    fn out_of_range_coordinates_are_not_internal() {
        let grid = Grid::new(&config(3, 3, 1)).unwrap();
        assert!(!grid.is_internal(3, 1));
        assert!(!grid.is_internal(7, 7));
    }

    #[test]
    fn env_neighbor_prevents_internal() {
        let mut grid = Grid::new(&config(4, 4, 1)).unwrap();
        grid.set_node_type(1, 2, NodeType::Env).unwrap();

        // (1, 2) is the bottom neighbor of (1, 1) and the left of (2, 2).
        assert!(!grid.is_internal(1, 1));
        assert!(!grid.is_internal(2, 2));
        // (2, 1) sees (1, 1), (2, 2), (3, 1), (2, 0).
        assert!(grid.is_internal(2, 1));
    }

    #[test]
    fn classify_boundary_handles_out_of_range_neighbors() {
        let grid = ringed_grid(3, 3, 1);

        assert_eq!(grid.classify_boundary(0, 0, -1, 0), Insulated);
        assert_eq!(grid.classify_boundary(0, 0, 0, -1), Insulated);
        assert_eq!(grid.classify_boundary(2, 2, 3, 2), Insulated);
        assert_eq!(grid.classify_boundary(2, 2, 2, 3), Insulated);
    }

    #[test]
    fn classify_boundary_in_range() {
        let grid = ringed_grid(4, 4, 1);

        // Body to env, env to body, env to env.
        assert_eq!(grid.classify_boundary(1, 1, 0, 1), Convection);
        assert_eq!(grid.classify_boundary(0, 1, 1, 1), Convection);
        assert_eq!(grid.classify_boundary(0, 0, 1, 0), Convection);
        // Body to body.
        assert_eq!(grid.classify_boundary(1, 1, 2, 1), Conduction);
    }

    #[test]
    fn generate_assigns_each_face_independently() {
        let mut grid = ringed_grid(5, 5, 1);
        grid.generate();

        // Body node next to the env ring on its left.
        assert_eq!(
            grid.node(1, 2).unwrap().boundary_conditions(),
            Sides {
                left: Convection,
                bottom: Conduction,
                right: Conduction,
                top: Conduction,
            }
        );

        // Corner env node on the grid edge.
        assert_eq!(
            grid.node(0, 0).unwrap().boundary_conditions(),
            Sides {
                left: Insulated,
                bottom: Convection,
                right: Convection,
                top: Insulated,
            }
        );

        // Fully surrounded body node.
        assert_eq!(
            grid.node(2, 2).unwrap().boundary_conditions(),
            Sides::from_value(Conduction)
        );
    }

    #[test]
    fn generate_records_current_field() {
        let mut grid = ringed_grid(3, 3, 1);
        grid.generate();

        let snapshot = grid.history().snapshot(0).unwrap();
        assert_relative_eq!(snapshot[[0, 0]], 293.0);
        assert_relative_eq!(snapshot[[1, 1]], 400.0);
    }

    #[test]
    fn update_records_each_step() {
        let mut grid = ringed_grid(5, 5, 3);
        grid.generate();

        for step in 1..=3 {
            grid.update().unwrap();
            assert_eq!(grid.current_step(), step);
            assert_eq!(grid.history().snapshot(step).unwrap(), grid.temperatures());
        }
    }

    #[test]
    fn update_past_history_errors_without_changing_state() {
        let mut grid = ringed_grid(3, 3, 1);
        grid.generate();
        grid.update().unwrap();

        let before = grid.temperatures();
        assert_eq!(grid.update(), Err(GridError::HistoryFull { num_steps: 1 }));
        assert_eq!(grid.current_step(), 1);
        assert_eq!(grid.temperatures(), before);
    }

    #[test]
    fn boundary_node_next_to_env_loses_heat() {
        let mut grid = ringed_grid(5, 5, 1);
        grid.generate();
        grid.update().unwrap();

        // Only the left face convects: Q = 80 · 0.01 · (293 − 400).
        let q = 80.0 * 0.01 * (293.0 - 400.0);
        let capacity = 1000.0 * (0.01 * 0.01 / 2.0) * 4.184;
        let expected = 400.0 + q / capacity * 0.01;

        let node = grid.node(1, 2).unwrap();
        assert_relative_eq!(node.temperature_k(), expected, epsilon = 1e-9);
    }

    #[test]
    fn update_uses_pre_step_field() {
        let mut grid = ringed_grid(5, 5, 1);
        grid.generate();
        grid.update().unwrap();

        // (2, 2) is swept after (1, 2) and (2, 1) have cooled, yet it reads
        // their pre-step temperatures and stays put.
        assert_relative_eq!(
            grid.node(2, 2).unwrap().temperature_k(),
            400.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn interior_top_term_uses_own_temperature() {
        let mut grid = Grid::new(&config(3, 3, 1)).unwrap();
        grid.set_node_type(1, 0, NodeType::Env).unwrap();
        grid.set_node_type(1, 0, NodeType::Body).unwrap();
        grid.generate();

        // (1, 0) is the top neighbor of (1, 1) and now sits at 293 K, but the
        // interior rule substitutes the node's own 400 K.
        assert!(grid.is_internal(1, 1));
        grid.update().unwrap();
        assert_relative_eq!(
            grid.node(1, 1).unwrap().temperature_k(),
            400.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn env_nodes_at_ambient_stay_at_ambient() {
        let mut grid = ringed_grid(4, 4, 2);
        grid.generate();
        grid.update().unwrap();
        grid.update().unwrap();

        for (i, j) in [(0, 0), (0, 2), (3, 1), (2, 3)] {
            assert_relative_eq!(
                grid.node(i, j).unwrap().temperature_k(),
                293.0,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn boundary_override_changes_the_flux() {
        let mut grid = ringed_grid(5, 5, 1);
        grid.generate();
        grid.set_boundary_condition(1, 2, Direction::Left, Insulated)
            .unwrap();
        grid.update().unwrap();

        assert_eq!(
            grid.node(1, 2).unwrap().boundary_conditions().left,
            Insulated
        );
        assert_relative_eq!(
            grid.node(1, 2).unwrap().temperature_k(),
            400.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn isolated_uniform_body_stays_constant() {
        let mut grid = Grid::new(&config(6, 4, 5)).unwrap();
        grid.generate();
        for _ in 0..5 {
            grid.update().unwrap();
        }

        for step in 0..=5 {
            let snapshot = grid.history().snapshot(step).unwrap();
            for &t in snapshot {
                assert_relative_eq!(t, 400.0, epsilon = 1e-9);
            }
        }
    }
}
