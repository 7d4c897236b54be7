use std::time::Instant;

use tracing::info;

use crate::{Error, Grid, GridError, History, NodeType, SimulationConfig};

/// Runs a grid whose outer ring is environment and whose inside is body.
///
/// Construction marks every border node `Env` and classifies the grid, so a
/// new simulation is ready to [`run`](Simulation::run).
///
/// ```
/// use heatgrid_core::{Simulation, SimulationConfig};
///
/// let config = SimulationConfig {
///     nodes_x: 5,
///     nodes_y: 5,
///     num_steps: 10,
///     ..SimulationConfig::default()
/// };
///
/// let sim = Simulation::new(&config)?.run()?;
/// assert_eq!(sim.history().shape(), (11, 5, 5));
/// # Ok::<(), heatgrid_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Simulation {
    grid: Grid,
}

impl Simulation {
    /// Builds the grid, marks its border as environment, and generates
    /// boundary conditions.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the configuration is invalid.
    pub fn new(config: &SimulationConfig) -> Result<Self, Error> {
        let mut grid = Grid::new(config)?;

        for (i, j) in border(config.nodes_x, config.nodes_y) {
            grid.set_node_type(i, j, NodeType::Env)?;
        }
        grid.generate();

        Ok(Self { grid })
    }

    /// Applies every remaining update step.
    ///
    /// A fresh simulation advances exactly `num_steps` times.
    ///
    /// # Errors
    ///
    /// Returns a [`GridError`] if an update fails.
    pub fn run(mut self) -> Result<Self, GridError> {
        let (nodes_x, nodes_y) = self.grid.dim();
        let num_steps = self.grid.history().num_steps();
        let start = self.grid.current_step();

        info!(nodes_x, nodes_y, num_steps, start, "running simulation");
        let timer = Instant::now();

        for _ in start..num_steps {
            self.grid.update()?;
        }

        info!(
            elapsed_ms = timer.elapsed().as_millis(),
            steps = num_steps - start,
            "simulation complete"
        );
        Ok(self)
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable access to the grid, for overriding boundary conditions before
    /// running.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    #[must_use]
    pub fn history(&self) -> &History {
        self.grid.history()
    }

    #[must_use]
    pub fn into_history(self) -> History {
        self.grid.into_history()
    }
}

/// Coordinates of the outer ring of a `nodes_x` by `nodes_y` grid.
///
/// Corners appear more than once.
fn border(nodes_x: usize, nodes_y: usize) -> impl Iterator<Item = (usize, usize)> {
    let columns = (0..nodes_y).flat_map(move |j| [(0, j), (nodes_x - 1, j)]);
    let rows = (0..nodes_x).flat_map(move |i| [(i, 0), (i, nodes_y - 1)]);
    columns.chain(rows)
}
