use crate::ast::node::{Literal, Node, NodeId, NodeKind};

/// Arena-backed predicate tree.
///
/// Owns every node of one parsed predicate. Allocation never frees: nodes
/// detached by a rewrite simply become unreachable from the root and are
/// dropped with the tree at the end of the planning request. All structural
/// queries (children, validation, printing, analysis) walk from [`Self::root`],
/// so garbage nodes are invisible to them.
#[derive(Debug, Clone)]
pub struct QueryTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl QueryTree {
    /// Create a tree holding the empty predicate (a `Script` with no
    /// statement).
    pub fn empty() -> Self {
        QueryTree {
            nodes: vec![Node {
                kind: NodeKind::Script(Vec::new()),
                parent: None,
            }],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Allocate a node and link every child named in `kind` to it.
    ///
    /// Children must already exist in this tree. The new node starts with no
    /// parent; attaching it somewhere (via [`Self::replace_child`],
    /// [`Self::set_kind`], or [`Self::set_statement`]) records the link.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { kind, parent: None });
        for child in self.children(id) {
            self.nodes[child.index()].parent = Some(id);
        }
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Replace a node's kind in place and re-link the children named by the
    /// new kind.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.index()].kind = kind;
        for child in self.children(id) {
            self.nodes[child.index()].parent = Some(id);
        }
    }

    /// Record `parent` as the parent of `child` without touching structure.
    pub fn adopt(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
    }

    /// Child ids of a node, in positional order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match &self.nodes[id.index()].kind {
            NodeKind::Script(stmts) => stmts.clone(),
            NodeKind::And(children) | NodeKind::Or(children) => children.clone(),
            NodeKind::Not(child)
            | NodeKind::Negative(child)
            | NodeKind::Reference(child)
            | NodeKind::ReferenceExpr(child) => vec![*child],
            NodeKind::Comparison { left, right, .. } => vec![*left, *right],
            NodeKind::FunctionCall { args, .. } => args.clone(),
            NodeKind::Assignment { value, .. } => vec![*value],
            NodeKind::Marker { source, .. } => vec![*source],
            NodeKind::Identifier(_) | NodeKind::Literal(_) => Vec::new(),
        }
    }

    /// Swap `old` for `new` in the child slots of `parent` and adopt `new`.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        match &mut self.nodes[parent.index()].kind {
            NodeKind::Script(slots)
            | NodeKind::And(slots)
            | NodeKind::Or(slots)
            | NodeKind::FunctionCall { args: slots, .. } => {
                for slot in slots.iter_mut() {
                    if *slot == old {
                        *slot = new;
                    }
                }
            }
            NodeKind::Not(slot)
            | NodeKind::Negative(slot)
            | NodeKind::Reference(slot)
            | NodeKind::ReferenceExpr(slot)
            | NodeKind::Assignment { value: slot, .. }
            | NodeKind::Marker { source: slot, .. } => {
                if *slot == old {
                    *slot = new;
                }
            }
            NodeKind::Comparison { left, right, .. } => {
                if *left == old {
                    *left = new;
                }
                if *right == old {
                    *right = new;
                }
            }
            NodeKind::Identifier(_) | NodeKind::Literal(_) => {}
        }
        self.adopt(parent, new);
    }

    /// Install `id` as the single statement under the root script.
    pub fn set_statement(&mut self, id: NodeId) {
        let root = self.root;
        self.set_kind(root, NodeKind::Script(vec![id]));
    }

    /// The root script's single statement, if the predicate is non-empty.
    pub fn statement(&self) -> Option<NodeId> {
        match self.kind(self.root) {
            NodeKind::Script(stmts) => stmts.first().copied(),
            _ => None,
        }
    }

    /// Reduce the tree to the empty predicate.
    pub fn clear_statement(&mut self) {
        let root = self.root;
        self.set_kind(root, NodeKind::Script(Vec::new()));
    }

    pub fn is_empty_predicate(&self) -> bool {
        matches!(self.kind(self.root), NodeKind::Script(stmts) if stmts.is_empty())
    }

    /// Skip `Reference`/`ReferenceExpr` wrappers down to the wrapped node.
    pub fn unwrap_grouping(&self, mut id: NodeId) -> NodeId {
        loop {
            match self.kind(id) {
                NodeKind::Reference(child) | NodeKind::ReferenceExpr(child) => id = *child,
                _ => return id,
            }
        }
    }

    /// Wrap a node as `Reference(ReferenceExpr(node))` and return the outer
    /// wrapper.
    pub fn wrap_grouped(&mut self, id: NodeId) -> NodeId {
        let inner = self.alloc(NodeKind::ReferenceExpr(id));
        self.alloc(NodeKind::Reference(inner))
    }

    /// Deep-copy the sub-tree rooted at `id`. The copy's root has no parent.
    pub fn copy_subtree(&mut self, id: NodeId) -> NodeId {
        let kind = match self.kind(id).clone() {
            NodeKind::Script(stmts) => {
                let stmts = stmts.iter().map(|c| self.copy_subtree(*c)).collect();
                NodeKind::Script(stmts)
            }
            NodeKind::And(children) => {
                let children = children.iter().map(|c| self.copy_subtree(*c)).collect();
                NodeKind::And(children)
            }
            NodeKind::Or(children) => {
                let children = children.iter().map(|c| self.copy_subtree(*c)).collect();
                NodeKind::Or(children)
            }
            NodeKind::Not(child) => NodeKind::Not(self.copy_subtree(child)),
            NodeKind::Negative(child) => NodeKind::Negative(self.copy_subtree(child)),
            NodeKind::Reference(child) => NodeKind::Reference(self.copy_subtree(child)),
            NodeKind::ReferenceExpr(child) => NodeKind::ReferenceExpr(self.copy_subtree(child)),
            NodeKind::Comparison { op, left, right } => NodeKind::Comparison {
                op,
                left: self.copy_subtree(left),
                right: self.copy_subtree(right),
            },
            NodeKind::FunctionCall {
                namespace,
                name,
                args,
            } => {
                let args = args.iter().map(|c| self.copy_subtree(*c)).collect();
                NodeKind::FunctionCall {
                    namespace,
                    name,
                    args,
                }
            }
            NodeKind::Assignment { name, value } => NodeKind::Assignment {
                name,
                value: self.copy_subtree(value),
            },
            NodeKind::Marker { kind, source } => NodeKind::Marker {
                kind,
                source: self.copy_subtree(source),
            },
            leaf @ (NodeKind::Identifier(_) | NodeKind::Literal(_)) => leaf,
        };
        self.alloc(kind)
    }

    /// Depth-first pre-order traversal starting at `from`.
    ///
    /// This order is canonical for "first offending node" reporting in
    /// validation errors.
    pub fn preorder(&self, from: NodeId) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![from],
        }
    }

    /// The identifier name at `id`, looking through grouping wrappers.
    pub fn identifier_at(&self, id: NodeId) -> Option<&str> {
        match self.kind(self.unwrap_grouping(id)) {
            NodeKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// The literal at `id`, looking through grouping wrappers.
    pub fn literal_at(&self, id: NodeId) -> Option<&Literal> {
        match self.kind(self.unwrap_grouping(id)) {
            NodeKind::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// For a field-vs-literal comparison (either operand order), the field
    /// name and the literal.
    pub fn comparison_term(&self, id: NodeId) -> Option<(&str, &Literal)> {
        let NodeKind::Comparison { left, right, .. } = self.kind(self.unwrap_grouping(id)) else {
            return None;
        };
        match (self.identifier_at(*left), self.identifier_at(*right)) {
            (Some(field), None) => self.literal_at(*right).map(|lit| (field, lit)),
            (None, Some(field)) => self.literal_at(*left).map(|lit| (field, lit)),
            _ => None,
        }
    }
}

/// Pre-order iterator over reachable nodes. See [`QueryTree::preorder`].
pub struct Preorder<'a> {
    tree: &'a QueryTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let children = self.tree.children(id);
        self.stack.extend(children.into_iter().rev());
        Some(id)
    }
}
