//! The node-creation context stack.
//!
//! One stack is owned by each parser run. Pushing a context makes a node the
//! receiver of subsequently created children; popping it closes the node and
//! attaches it to the context below.

use super::{Node, NodeId, NodeKind};

/// Saved position of the active context, for rewinding a speculative parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextCheckpoint {
    depth: usize,
    children: usize,
}

#[derive(Debug, Default)]
pub struct ContextStack {
    stack: Vec<Node>,
    next_id: u32,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// A detached node with a fresh id.
    pub fn new_node(&mut self, kind: NodeKind) -> Node {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        Node::new(id, kind)
    }

    /// Open a new node of `kind` as the active context.
    pub fn push_context(&mut self, kind: NodeKind) -> &mut Node {
        let node = self.new_node(kind);
        self.push_node(node)
    }

    /// Make a caller-built node the active context.
    pub fn push_node(&mut self, node: Node) -> &mut Node {
        self.stack.push(node);
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Close the active context.
    ///
    /// The node is attached to the new top of the stack; when no parent is
    /// left it is handed back to the caller instead.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    pub fn pop_context(&mut self) -> Option<Node> {
        let Some(node) = self.stack.pop() else {
            panic!("pop_context called on an empty context stack");
        };
        match self.stack.last_mut() {
            Some(parent) => {
                parent.children.push(node);
                None
            }
            None => Some(node),
        }
    }

    /// Attach a leaf to the active context without pushing it.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    pub fn add_child_node(&mut self, node: Node) {
        let Some(parent) = self.stack.last_mut() else {
            panic!("add_child_node called with no active context");
        };
        parent.children.push(node);
    }

    pub fn current(&self) -> Option<&Node> {
        self.stack.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Node> {
        self.stack.last_mut()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn checkpoint(&self) -> ContextCheckpoint {
        ContextCheckpoint {
            depth: self.stack.len(),
            children: self.stack.last().map_or(0, |node| node.children.len()),
        }
    }

    /// Drop every child attached to the active context since `checkpoint`.
    ///
    /// # Panics
    ///
    /// Panics if the stack depth changed since the checkpoint was taken.
    pub fn restore(&mut self, checkpoint: ContextCheckpoint) {
        assert_eq!(
            self.stack.len(),
            checkpoint.depth,
            "context stack depth changed across a rewind"
        );
        if let Some(node) = self.stack.last_mut() {
            node.children.truncate(checkpoint.children);
        }
    }
}
