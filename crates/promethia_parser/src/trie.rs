//! Prefix tree over compiled signatures.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Every path from
//! the root spells a signature prefix; a node carries an [`ActionBinding`]
//! when some signature ends there. A node never has two children with the
//! same token.

use promethia_foundation::TokenId;

use crate::action::ActionBinding;
use crate::signature::Signature;

/// Index of a node in a [`SignatureTrie`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node.
    pub const ROOT: NodeId = NodeId(0);

    /// Returns the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One trie node.
#[derive(Clone, Debug)]
pub struct TrieNode {
    /// Token on the edge into this node; `None` at the root
    pub token: Option<TokenId>,
    /// Children in insertion order, keyed by distinct tokens
    pub children: Vec<(TokenId, NodeId)>,
    /// Action bound to the signature ending here
    pub binding: Option<ActionBinding>,
}

impl TrieNode {
    fn new(token: Option<TokenId>) -> Self {
        Self {
            token,
            children: Vec::new(),
            binding: None,
        }
    }

    /// Returns true if this node was reached through a parameter placeholder.
    #[must_use]
    pub fn is_param(&self) -> bool {
        self.token == Some(TokenId::PARAM)
    }
}

/// Arena-backed signature trie.
#[derive(Clone, Debug)]
pub struct SignatureTrie {
    nodes: Vec<TrieNode>,
}

impl Default for SignatureTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureTrie {
    /// Creates a trie holding only the root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::new(None)],
        }
    }

    /// Inserts a signature, creating nodes as needed.
    ///
    /// Returns the binding previously attached to the same signature, which
    /// the new binding replaces.
    pub fn insert(&mut self, signature: &[TokenId], binding: ActionBinding) -> Option<ActionBinding> {
        let mut node = NodeId::ROOT;
        for &token in signature {
            node = match self.advance(node, token) {
                Some(child) => child,
                None => {
                    let child = NodeId(self.nodes.len());
                    self.nodes.push(TrieNode::new(Some(token)));
                    self.nodes[node.0].children.push((token, child));
                    child
                }
            };
        }
        self.nodes[node.0].binding.replace(binding)
    }

    /// Returns the child of `node` reached by `token`.
    #[must_use]
    pub fn advance(&self, node: NodeId, token: TokenId) -> Option<NodeId> {
        self.nodes
            .get(node.0)?
            .children
            .iter()
            .find(|(t, _)| *t == token)
            .map(|&(_, child)| child)
    }

    /// Returns the placeholder child of `node`, if any.
    #[must_use]
    pub fn param_child(&self, node: NodeId) -> Option<NodeId> {
        self.advance(node, TokenId::PARAM)
    }

    /// Returns true if `token` can begin a signature.
    #[must_use]
    pub fn has_root_start(&self, token: TokenId) -> bool {
        !token.is_reserved() && self.advance(NodeId::ROOT, token).is_some()
    }

    /// Returns a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this trie.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id.0]
    }

    /// Returns the binding at a node, if any.
    #[must_use]
    pub fn binding(&self, id: NodeId) -> Option<&ActionBinding> {
        self.nodes.get(id.0)?.binding.as_ref()
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no signature has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Every complete signature with its binding, depth-first in insertion order.
    #[must_use]
    pub fn signatures(&self) -> Vec<(Signature, &ActionBinding)> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        self.collect(NodeId::ROOT, &mut path, &mut out);
        out
    }

    fn collect<'a>(
        &'a self,
        id: NodeId,
        path: &mut Signature,
        out: &mut Vec<(Signature, &'a ActionBinding)>,
    ) {
        let node = &self.nodes[id.0];
        if let Some(binding) = &node.binding {
            out.push((path.clone(), binding));
        }
        for &(token, child) in &node.children {
            path.push(token);
            self.collect(child, path, out);
            path.pop();
        }
    }
}
