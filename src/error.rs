use crate::graph::NodeId;

/// Setup-time misuse of the canvas.
///
/// Runtime conditions that are part of normal interaction (a handle that has
/// not mounted yet, a drop on an incompatible handle) are not errors and are
/// reported through `Option` and [`ValidationResult`](crate::ValidationResult).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CanvasError {
    /// A handle was mounted for a node the canvas does not know about.
    #[error("node {0} is not mounted on this canvas")]
    NodeNotMounted(NodeId),
    /// Configuration values are out of range.
    #[error("invalid canvas configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = CanvasError::NodeNotMounted(NodeId::from("n7"));
        assert_eq!(err.to_string(), "node n7 is not mounted on this canvas");

        let err = CanvasError::InvalidConfig("wheel_step must be positive, got 0".into());
        assert!(err.to_string().ends_with("wheel_step must be positive, got 0"));
    }
}
