use thiserror::Error;

/// Errors raised when a [`SimulationConfig`](crate::SimulationConfig) is invalid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The grid has no nodes along at least one axis.
    #[error("grid must have at least one node along each axis, got {nodes_x}x{nodes_y}")]
    EmptyGrid { nodes_x: usize, nodes_y: usize },

    /// A quantity that must be strictly positive is zero, negative, or NaN.
    #[error("`{name}` must be finite and greater than zero, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    /// A quantity is infinite or NaN.
    #[error("`{name}` must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },
}

/// Errors raised while operating on a [`Grid`](crate::Grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("node ({i}, {j}) is outside the {nodes_x}x{nodes_y} grid")]
    OutOfBounds {
        i: usize,
        j: usize,
        nodes_x: usize,
        nodes_y: usize,
    },

    /// Every slot of the history tensor has already been written.
    #[error("history is full: all {num_steps} steps have been recorded")]
    HistoryFull { num_steps: usize },
}

/// Any error produced while setting up or running a simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Grid(#[from] GridError),
}
