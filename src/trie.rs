//! Code trie stored as an index arena. Serves as both the Huffman tree and
//! the decode trie.

use crate::canonical::Code;
use crate::error::MalformedArchive;
use crate::symbol::Symbol;

/// Index of a node inside its [`Trie`].
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(Symbol),
    Branch {
        zero: Option<NodeId>,
        one: Option<NodeId>,
    },
}

#[derive(Debug, Clone)]
pub struct Trie {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Trie {
    /// An empty decode trie: a root branch with no children.
    pub fn new() -> Self {
        Trie {
            nodes: vec![Node::Branch {
                zero: None,
                one: None,
            }],
            root: 0,
        }
    }

    /// Wrap an arena built elsewhere (the Huffman builder).
    ///
    /// `root` must index into `nodes`.
    pub(crate) fn from_arena(nodes: Vec<Node>, root: NodeId) -> Self {
        debug_assert!(root < nodes.len());
        Trie { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Follow one edge from `id`. `None` for leaves and missing children.
    pub fn child(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        match self.nodes[id] {
            Node::Leaf(_) => None,
            Node::Branch { zero, one } => {
                if bit {
                    one
                } else {
                    zero
                }
            }
        }
    }

    /// Insert `symbol` at the end of the path spelled by `code`, creating
    /// branches as needed.
    ///
    /// # Errors
    /// `OversubscribedCodes` if the code is empty, passes through an existing
    /// leaf, or ends on a node that already has descendants.
    pub fn insert(&mut self, code: &Code, symbol: Symbol) -> Result<(), MalformedArchive> {
        if code.is_empty() {
            return Err(MalformedArchive::OversubscribedCodes);
        }

        let mut current = self.root;
        for &bit in code.bits() {
            let next = match self.nodes[current] {
                Node::Leaf(_) => return Err(MalformedArchive::OversubscribedCodes),
                Node::Branch { zero, one } => {
                    if bit {
                        one
                    } else {
                        zero
                    }
                }
            };
            current = match next {
                Some(id) => id,
                None => {
                    let id = self.nodes.len();
                    self.nodes.push(Node::Branch {
                        zero: None,
                        one: None,
                    });
                    if let Node::Branch { zero, one } = &mut self.nodes[current] {
                        if bit {
                            *one = Some(id);
                        } else {
                            *zero = Some(id);
                        }
                    }
                    id
                }
            };
        }

        match self.nodes[current] {
            Node::Branch {
                zero: None,
                one: None,
            } => {
                self.nodes[current] = Node::Leaf(symbol);
                Ok(())
            }
            _ => Err(MalformedArchive::OversubscribedCodes),
        }
    }

    /// Every leaf with the bit path leading to it, zero edges before one
    /// edges.
    ///
    /// Walks with an explicit stack, so near-linear trees are fine.
    #[cfg(test)]
    pub(crate) fn codes(&self) -> Vec<(Symbol, Code)> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root, Code::default())];

        while let Some((id, code)) = stack.pop() {
            match self.nodes[id] {
                Node::Leaf(symbol) => out.push((symbol, code)),
                Node::Branch { zero, one } => {
                    if let Some(one) = one {
                        stack.push((one, code.with_bit(true)));
                    }
                    if let Some(zero) = zero {
                        stack.push((zero, code.with_bit(false)));
                    }
                }
            }
        }
        out
    }

    /// Depth of every leaf, i.e. its code length.
    pub fn leaf_depths(&self) -> Vec<(Symbol, usize)> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root, 0usize)];

        while let Some((id, depth)) = stack.pop() {
            match self.nodes[id] {
                Node::Leaf(symbol) => out.push((symbol, depth)),
                Node::Branch { zero, one } => {
                    stack.extend(one.map(|c| (c, depth + 1)));
                    stack.extend(zero.map(|c| (c, depth + 1)));
                }
            }
        }
        out
    }
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}
