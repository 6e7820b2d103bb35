use std::cmp::Ordering;

use crate::canonical::CanonicalCode;
use crate::error::{Error, Result};
use crate::heap::MinHeap;
use crate::symbol::{Sentinel, Symbol};
use crate::trie::{Node, NodeId, Trie};

/// Occurrence count per symbol for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    counts: Vec<u64>,
}

impl Alphabet {
    pub fn new() -> Self {
        Alphabet {
            counts: vec![0; Symbol::ALPHABET_SIZE],
        }
    }

    /// Statistics for one archive record: the name bytes, the content bytes,
    /// and one occurrence of every sentinel so each stays codeable.
    pub fn for_record(name: &[u8], contents: &[u8]) -> Self {
        let mut alphabet = Alphabet::new();
        alphabet.add_bytes(name);
        alphabet.add_bytes(contents);
        for sentinel in Sentinel::ALL {
            alphabet.add(sentinel.into());
        }
        alphabet
    }

    pub fn add(&mut self, symbol: Symbol) {
        self.counts[symbol.index()] += 1;
    }

    pub fn add_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.counts[b as usize] += 1;
        }
    }

    pub fn count(&self, symbol: Symbol) -> u64 {
        self.counts[symbol.index()]
    }

    /// Symbols with a non-zero count, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .filter_map(|(value, &count)| Symbol::new(value as u16).map(|s| (s, count)))
    }

    /// Number of distinct symbols present.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new()
    }
}

/// Priority queue entry: a subtree keyed by its total weight, ties broken by
/// the smallest symbol beneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Subtree {
    weight: u64,
    min_symbol: Symbol,
    node: NodeId,
}

impl Ord for Subtree {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then(self.min_symbol.cmp(&other.min_symbol))
            .then(self.node.cmp(&other.node))
    }
}

impl PartialOrd for Subtree {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Build the Huffman tree for `alphabet`.
///
/// Repeatedly merges the two lightest subtrees; the first one popped becomes
/// the zero child. Min-symbol tie-breaking makes the shape independent of
/// insertion order.
///
/// # Errors
/// `DegenerateAlphabet` if fewer than two symbols are present.
pub fn build_tree(alphabet: &Alphabet) -> Result<Trie> {
    let distinct = alphabet.distinct();
    if distinct < 2 {
        return Err(Error::DegenerateAlphabet { distinct });
    }

    let mut nodes = Vec::with_capacity(2 * distinct - 1);
    let mut heap = MinHeap::with_capacity(distinct);
    for (symbol, weight) in alphabet.iter() {
        heap.push(Subtree {
            weight,
            min_symbol: symbol,
            node: nodes.len(),
        });
        nodes.push(Node::Leaf(symbol));
    }

    while heap.size() > 1 {
        let (Some(first), Some(second)) = (heap.pop(), heap.pop()) else {
            break;
        };
        let node = nodes.len();
        nodes.push(Node::Branch {
            zero: Some(first.node),
            one: Some(second.node),
        });
        heap.push(Subtree {
            weight: first.weight + second.weight,
            min_symbol: first.min_symbol.min(second.min_symbol),
            node,
        });
    }

    let root = heap
        .pop()
        .map(|s| s.node)
        .ok_or(Error::DegenerateAlphabet { distinct })?;
    Ok(Trie::from_arena(nodes, root))
}

/// Tree construction plus canonical renumbering in one step.
pub fn canonical_code(alphabet: &Alphabet) -> Result<CanonicalCode> {
    let tree = build_tree(alphabet)?;
    CanonicalCode::from_lengths(tree.leaf_depths())
}
