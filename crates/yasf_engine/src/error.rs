//! Error types for scene building and surface evaluation

use thiserror::Error;

/// Errors raised while interpreting a scene description or evaluating
/// a parametric surface.
///
/// Only `UnknownNode` for the root id and `Parse` abort a build; every other
/// kind is recovered by skipping the offending subtree and recording the
/// error in [`RenderGraph::warnings`](crate::scene::RenderGraph::warnings).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// A node id was not present in the scene dictionary
    #[error("node not found: '{0}'")]
    UnknownNode(String),

    /// A NURBS control net has invalid shape or non-positive weights
    #[error("degenerate control net: {0}")]
    DegenerateControlNet(String),

    /// A primitive is missing or has an invalid required parameter
    #[error("malformed {kind} primitive: {reason}")]
    MalformedPrimitive {
        /// Primitive kind ("rectangle", "cylinder", ...)
        kind: &'static str,
        /// What was wrong with the parameter set
        reason: String,
    },

    /// A primitive had neither its own material reference nor an inherited one
    #[error("no material available for '{child}' in node '{node}'")]
    MissingMaterial {
        /// Key of the child entry inside its parent node
        child: String,
        /// Id of the node that declared the child
        node: String,
    },

    /// A child record carried a type string outside the supported set
    #[error("unknown child type for key '{0}'")]
    UnknownChildType(String),

    /// A node reference chain revisited a node already being built
    #[error("cycle detected while building node '{0}'")]
    CycleDetected(String),

    /// A YASF document could not be deserialized
    #[error("failed to parse YASF document: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for SceneError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SceneError::UnknownNode("root".to_string());
        assert_eq!(err.to_string(), "node not found: 'root'");

        let err = SceneError::MalformedPrimitive {
            kind: "cylinder",
            reason: "slices must be at least 3".to_string(),
        };
        assert!(err.to_string().contains("cylinder"));
    }

    #[test]
    fn test_parse_error_from_serde() {
        let bad: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: SceneError = bad.unwrap_err().into();
        assert!(matches!(err, SceneError::Parse(_)));
    }
}
