use std::fmt;

/// Role of a node in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeType {
    /// Surrounding environment, held near the ambient temperature.
    Env,

    /// Material under analysis.
    #[default]
    Body,
}

/// Heat transfer mode at one face of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoundaryCondition {
    /// No heat crosses the face (the neighbor is outside the grid).
    Insulated,

    /// Convection to ambient (this node or the neighbor is `Env`).
    Convection,

    /// Conduction between two body nodes.
    #[default]
    Conduction,
}

impl BoundaryCondition {
    /// Returns the display name of the condition.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BoundaryCondition::Insulated => "Insulated",
            BoundaryCondition::Convection => "Convection",
            BoundaryCondition::Conduction => "Conduction",
        }
    }
}

impl fmt::Display for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            NodeType::Env => "Env",
            NodeType::Body => "Body",
        })
    }
}

/// Classifies the face between a node and its neighbor.
///
/// A missing neighbor (`None`) means the face lies on the edge of the grid.
///
/// - No neighbor: [`BoundaryCondition::Insulated`]
/// - Either side is [`NodeType::Env`]: [`BoundaryCondition::Convection`]
/// - Otherwise: [`BoundaryCondition::Conduction`]
#[must_use]
pub fn classify(this: NodeType, neighbor: Option<NodeType>) -> BoundaryCondition {
    match neighbor {
        None => BoundaryCondition::Insulated,
        Some(NodeType::Env) => BoundaryCondition::Convection,
        Some(NodeType::Body) if this == NodeType::Env => BoundaryCondition::Convection,
        Some(NodeType::Body) => BoundaryCondition::Conduction,
    }
}
