use thiserror::Error;

/// The error raised while assembling a command grammar.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    /// Two sibling nodes share a name.
    #[error("a node with the name '{0}' already exists.")]
    DuplicateNode(String),

    /// Two sibling nodes are both the default node.
    #[error("a default node already exists.")]
    DuplicateDefaultNode,

    /// A default node was added where only named nodes may go (ex: the dispatcher's root commands).
    #[error("a default node is not allowed here.")]
    DefaultNotAllowed,

    /// A branch-point was declared without any child nodes.
    #[error("a branch-point requires at least one node.")]
    EmptyBranch,

    /// A name is not a valid identifier.
    #[error("the {element} name '{name}' is invalid.")]
    InvalidName {
        /// The kind of grammar element being named (ex: `flag`).
        element: &'static str,
        /// The rejected name.
        name: String,
    },

    /// A shortcut is not a single letter or digit.
    #[error("the shortcut '{0}' is invalid.")]
    InvalidShortcut(char),

    /// Two arguments, flags or switches would write the same context key on one command path.
    #[error("the name '{name}' already exists on the command path '{path}'.")]
    DuplicateName {
        /// The repeated name.
        name: String,
        /// The node names leading to the repeat.
        path: String,
    },

    /// Two flags or switches share a shortcut on one command path.
    #[error("the shortcut '{shortcut}' already exists on the command path '{path}'.")]
    DuplicateShortcut {
        /// The repeated shortcut.
        shortcut: char,
        /// The node names leading to the repeat.
        path: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            BuildError::DuplicateNode("build".to_string()).to_string(),
            "a node with the name 'build' already exists."
        );
        assert_eq!(
            BuildError::InvalidName {
                element: "flag",
                name: "2x".to_string(),
            }
            .to_string(),
            "the flag name '2x' is invalid."
        );
        assert_eq!(
            BuildError::DuplicateShortcut {
                shortcut: 'v',
                path: "build release".to_string(),
            }
            .to_string(),
            "the shortcut 'v' already exists on the command path 'build release'."
        );
    }
}
