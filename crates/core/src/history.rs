use ndarray::{Array2, Array3, ArrayView1, ArrayView2, Axis};
use uom::si::f64::Time;

/// Temperature of every node at every recorded step.
///
/// Backed by an array of shape `(num_steps + 1, nodes_x, nodes_y)` that is
/// allocated once when the grid is built.
/// Index `t` along the first axis holds the field after `t` updates, in K.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    temperatures: Array3<f64>,
    time_step: Time,
}

impl History {
    pub(crate) fn new(num_steps: usize, nodes_x: usize, nodes_y: usize, time_step: Time) -> Self {
        Self {
            temperatures: Array3::zeros((num_steps + 1, nodes_x, nodes_y)),
            time_step,
        }
    }

    /// Writes the field recorded after `step` updates.
    ///
    /// # Panics
    ///
    /// Panics if `step` or the field shape is outside the allocated tensor.
    pub(crate) fn record(&mut self, step: usize, field: &Array2<f64>) {
        self.temperatures
            .index_axis_mut(Axis(0), step)
            .assign(field);
    }

    /// Number of recorded slots, including the initial state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.temperatures.len_of(Axis(0))
    }

    /// Always `false`: the initial state occupies the first slot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of update steps the history can hold.
    #[must_use]
    pub fn num_steps(&self) -> usize {
        self.len() - 1
    }

    /// Returns `(num_steps + 1, nodes_x, nodes_y)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize, usize) {
        self.temperatures.dim()
    }

    /// Returns the field after `step` updates, or `None` if out of range.
    #[must_use]
    pub fn snapshot(&self, step: usize) -> Option<ArrayView2<'_, f64>> {
        (step < self.len()).then(|| self.temperatures.index_axis(Axis(0), step))
    }

    /// Returns the temperature of node `(i, j)` at every step.
    #[must_use]
    pub fn node_series(&self, i: usize, j: usize) -> Option<ArrayView1<'_, f64>> {
        let (_, nodes_x, nodes_y) = self.shape();
        (i < nodes_x && j < nodes_y).then(|| {
            self.temperatures
                .index_axis(Axis(2), j)
                .index_axis_move(Axis(1), i)
        })
    }

    /// Simulated time elapsed after `step` updates.
    #[must_use]
    pub fn time_at(&self, step: usize) -> Time {
        #[allow(clippy::cast_precision_loss)]
        let steps = step as f64;
        self.time_step * steps
    }

    /// The full temperature tensor.
    #[must_use]
    pub fn as_array(&self) -> &Array3<f64> {
        &self.temperatures
    }

    #[must_use]
    pub fn into_array(self) -> Array3<f64> {
        self.temperatures
    }
}
