use std::collections::{HashSet, VecDeque};

use crate::command::{ArgumentInfo, BuildError, FlagInfo, NodeInfo, SwitchInfo};

/// One positional element of a [`CommandSyntax`].
pub enum SyntaxElement<R> {
    /// An argument slot, consuming one token as its value.
    Argument(ArgumentInfo),
    /// A branch-point, consuming one literal token to choose amongst child nodes.
    Branch(Vec<NodeInfo<R>>),
}

impl<R> SyntaxElement<R> {
    /// Create a branch-point.
    /// Fails if there are no nodes, if two nodes share a name, or if there are multiple default nodes.
    pub fn branch(nodes: Vec<NodeInfo<R>>) -> Result<Self, BuildError> {
        if nodes.is_empty() {
            return Err(BuildError::EmptyBranch);
        }

        let mut names = HashSet::new();

        for info in &nodes {
            if !names.insert(info.name()) {
                return Err(if info.is_default() {
                    BuildError::DuplicateDefaultNode
                } else {
                    BuildError::DuplicateNode(info.name().to_string())
                });
            }
        }

        Ok(SyntaxElement::Branch(nodes))
    }
}

impl<R> std::fmt::Debug for SyntaxElement<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxElement::Argument(info) => f.debug_tuple("Argument").field(info).finish(),
            SyntaxElement::Branch(nodes) => f.debug_tuple("Branch").field(nodes).finish(),
        }
    }
}

impl<R> std::fmt::Display for SyntaxElement<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxElement::Argument(info) => write!(f, "{info}"),
            SyntaxElement::Branch(nodes) => write!(f, "{}", branch_usage(nodes)),
        }
    }
}

/// Render the literals a branch-point accepts (ex: `{build | test | ..}`).
/// A default node is shown as `..`, since any literal selects it.
pub(crate) fn branch_usage<R>(nodes: &[NodeInfo<R>]) -> String {
    let literals: Vec<&str> = nodes
        .iter()
        .map(|info| if info.is_default() { ".." } else { info.name() })
        .collect();
    format!("{{{}}}", literals.join(" | "))
}

/// The grammar of one command node: its positional elements in order, plus the flags and switches it declares.
///
/// Flags and switches declared on a node remain visible to every node beneath it.
pub struct CommandSyntax<R> {
    elements: Vec<SyntaxElement<R>>,
    flags: Vec<FlagInfo>,
    switches: Vec<SwitchInfo>,
}

impl<R> Default for CommandSyntax<R> {
    fn default() -> Self {
        Self {
            elements: Vec::default(),
            flags: Vec::default(),
            switches: Vec::default(),
        }
    }
}

impl<R> std::fmt::Debug for CommandSyntax<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSyntax")
            .field("elements", &self.elements)
            .field("flags", &self.flags)
            .field("switches", &self.switches)
            .finish()
    }
}

impl<R> CommandSyntax<R> {
    /// The positional elements, in declaration order.
    pub fn elements(&self) -> &[SyntaxElement<R>] {
        &self.elements
    }

    /// The flags declared at this level.
    pub fn flags(&self) -> &[FlagInfo] {
        &self.flags
    }

    /// The switches declared at this level.
    pub fn switches(&self) -> &[SwitchInfo] {
        &self.switches
    }

    pub(crate) fn push_element(&mut self, element: SyntaxElement<R>) {
        self.elements.push(element);
    }

    pub(crate) fn push_flag(&mut self, flag: FlagInfo) {
        self.flags.push(flag);
    }

    pub(crate) fn push_switch(&mut self, switch: SwitchInfo) {
        self.switches.push(switch);
    }

    /// Check that along every path through this syntax, no context key and no shortcut repeats.
    /// `path` names the nodes leading here (for error messages).
    pub(crate) fn validate(&self, path: Vec<String>) -> Result<(), BuildError> {
        let mut keys = PathKeys {
            names: HashSet::default(),
            shortcuts: HashSet::default(),
            path,
        };
        keys.enter(self)?;
        validate_path(self.elements.iter().collect(), keys)
    }
}

impl<R> std::fmt::Display for CommandSyntax<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .elements
            .iter()
            .map(|e| e.to_string())
            .chain(self.flags.iter().map(|e| e.to_string()))
            .chain(self.switches.iter().map(|e| e.to_string()))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

#[derive(Clone)]
struct PathKeys {
    names: HashSet<String>,
    shortcuts: HashSet<char>,
    path: Vec<String>,
}

impl PathKeys {
    fn name(&mut self, name: &str) -> Result<(), BuildError> {
        if self.names.insert(name.to_string()) {
            Ok(())
        } else {
            Err(BuildError::DuplicateName {
                name: name.to_string(),
                path: self.path.join(" "),
            })
        }
    }

    fn shortcut(&mut self, shortcut: Option<char>) -> Result<(), BuildError> {
        match shortcut {
            Some(s) if !self.shortcuts.insert(s) => Err(BuildError::DuplicateShortcut {
                shortcut: s,
                path: self.path.join(" "),
            }),
            _ => Ok(()),
        }
    }

    fn enter<R>(&mut self, syntax: &CommandSyntax<R>) -> Result<(), BuildError> {
        for flag in &syntax.flags {
            self.name(flag.name())?;
            self.shortcut(flag.shortcut())?;
        }

        for switch in &syntax.switches {
            self.name(switch.name())?;
            self.shortcut(switch.shortcut())?;
        }

        Ok(())
    }
}

// The pending queue holds the elements still to be walked on this path.
// Entering a child node puts its elements in front of whatever its parent has left.
fn validate_path<R>(
    mut pending: VecDeque<&SyntaxElement<R>>,
    mut keys: PathKeys,
) -> Result<(), BuildError> {
    while let Some(element) = pending.pop_front() {
        match element {
            SyntaxElement::Argument(info) => keys.name(info.name())?,
            SyntaxElement::Branch(nodes) => {
                for info in nodes {
                    let syntax = info.node().syntax();
                    let mut child_keys = keys.clone();
                    child_keys.path.push(info.name().to_string());
                    child_keys.enter(syntax)?;
                    let child_pending = syntax
                        .elements
                        .iter()
                        .chain(pending.iter().copied())
                        .collect();
                    validate_path(child_pending, child_keys)?;
                }

                return Ok(());
            }
        }
    }

    Ok(())
}
