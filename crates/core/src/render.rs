//! Text rendering of a grid for consoles and logs.
//!
//! Each node is drawn as a fixed-width block whose frame shows how the node
//! is updated:
//!
//! - `||==||` interior nodes
//! - `*****` environment nodes
//! - `|--|` every other body node
//!
//! Blocks are laid out with `i` increasing to the right and `j` increasing
//! downward.

use crate::{Grid, NodeType};

/// Frame style of a rendered node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Interior,
    Environment,
    Boundary,
}

impl Frame {
    /// Chooses the frame for node `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `(i, j)` is outside the grid.
    #[must_use]
    pub fn of(grid: &Grid, i: usize, j: usize) -> Self {
        if grid.is_internal(i, j) {
            Frame::Interior
        } else if grid.nodes()[[i, j]].node_type() == NodeType::Env {
            Frame::Environment
        } else {
            Frame::Boundary
        }
    }

    /// Wraps `inner` (already padded to the frame's inner width) in edges.
    fn edge(self, inner: &str) -> String {
        match self {
            Frame::Interior => format!("||{inner}||"),
            Frame::Environment => format!("*{inner}*"),
            Frame::Boundary => format!("|{inner}|"),
        }
    }

    /// Wraps two cells in edges with a divider between them.
    fn split(self, left: &str, right: &str) -> String {
        match self {
            Frame::Interior => format!("||{left:^10}||{right:^11}||"),
            Frame::Environment => format!("*{left:^12}*{right:^12}*"),
            Frame::Boundary => format!("|{left:^12}|{right:^12}|"),
        }
    }

    /// A horizontal rule `width` characters wide.
    fn rule(self, width: usize) -> String {
        match self {
            Frame::Interior => format!("||{}||", "=".repeat(width - 4)),
            Frame::Environment => "*".repeat(width),
            Frame::Boundary => format!("|{}|", "-".repeat(width - 2)),
        }
    }

    /// Width between the outer edges.
    fn inner_width(self, width: usize) -> usize {
        match self {
            Frame::Interior => width - 4,
            Frame::Environment | Frame::Boundary => width - 2,
        }
    }
}

/// Total width of a boundary-condition block.
const CONDITION_WIDTH: usize = 27;

/// Total width of a temperature block.
const TEMPERATURE_WIDTH: usize = 18;

/// Renders the four face conditions of node `(i, j)` as seven lines.
///
/// The top face is drawn first, left and right share the middle line, and
/// the bottom face is drawn last.
///
/// # Panics
///
/// Panics if `(i, j)` is outside the grid.
#[must_use]
pub fn condition_block(grid: &Grid, i: usize, j: usize) -> [String; 7] {
    let frame = Frame::of(grid, i, j);
    let sides = grid.nodes()[[i, j]].boundary_conditions();
    let inner = frame.inner_width(CONDITION_WIDTH);

    let rule = frame.rule(CONDITION_WIDTH);
    let top = frame.edge(&format!("{:^inner$}", sides.top));
    let middle = frame.split(sides.left.as_str(), sides.right.as_str());
    let bottom = frame.edge(&format!("{:^inner$}", sides.bottom));

    [
        rule.clone(),
        top,
        rule.clone(),
        middle,
        rule.clone(),
        bottom,
        rule,
    ]
}

/// Renders the temperature of node `(i, j)` as three lines.
///
/// # Panics
///
/// Panics if `(i, j)` is outside the grid.
#[must_use]
pub fn temperature_block(grid: &Grid, i: usize, j: usize) -> [String; 3] {
    let frame = Frame::of(grid, i, j);
    let inner = frame.inner_width(TEMPERATURE_WIDTH);
    let value = format_temperature(grid.nodes()[[i, j]].temperature_k());

    let rule = frame.rule(TEMPERATURE_WIDTH);
    let body = frame.edge(&format!("{value:^inner$}"));

    [rule.clone(), body, rule]
}

/// Renders the face conditions of every node.
#[must_use]
pub fn conditions(grid: &Grid) -> String {
    layout(grid, condition_block)
}

/// Renders the temperature of every node.
#[must_use]
pub fn temperatures(grid: &Grid) -> String {
    layout(grid, temperature_block)
}

/// Formats a temperature in K rounded to four decimal places.
///
/// Trailing zeros are dropped, so `400.0` renders as `400`.
#[must_use]
pub fn format_temperature(kelvin: f64) -> String {
    let rounded = (kelvin * 1e4).round() / 1e4;
    format!("{rounded}")
}

fn layout<const L: usize>(
    grid: &Grid,
    block: impl Fn(&Grid, usize, usize) -> [String; L],
) -> String {
    let (nodes_x, nodes_y) = grid.dim();
    let mut out = String::new();

    for j in 0..nodes_y {
        let row: Vec<_> = (0..nodes_x).map(|i| block(grid, i, j)).collect();
        for line in 0..L {
            let joined: Vec<&str> = row.iter().map(|b| b[line].as_str()).collect();
            out.push_str(&joined.join(" "));
            out.push('\n');
        }
    }

    out
}
