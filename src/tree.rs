//! Prefix-code tree construction
//!
//! Builds the Huffman tree by greedily merging the two lightest nodes of a
//! min-priority queue until a single root remains.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::{debug, trace};

use crate::error::{CodecError, Result};
use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;

/// A node of the code tree.
///
/// A leaf carries a symbol and no children. An internal node carries no
/// symbol, owns exactly two children, and its frequency is their sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode<S: Symbol> {
    pub freq: u64,
    pub symbol: Option<S>,
    pub left: Option<Box<TreeNode<S>>>,
    pub right: Option<Box<TreeNode<S>>>,
}

impl<S: Symbol> TreeNode<S> {
    pub fn leaf(symbol: S, freq: u64) -> Self {
        Self {
            freq,
            symbol: Some(symbol),
            left: None,
            right: None,
        }
    }

    pub fn internal(left: TreeNode<S>, right: TreeNode<S>) -> Self {
        Self {
            freq: left.freq + right.freq,
            symbol: None,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    pub fn freq(&self) -> u64 {
        self.freq
    }

    pub fn symbol(&self) -> Option<S> {
        self.symbol
    }

    pub fn is_leaf(&self) -> bool {
        self.symbol.is_some()
    }

    /// Number of leaves below (and including) this node.
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            return 1;
        }
        self.children().map(TreeNode::leaf_count).sum()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.children()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    fn children(&self) -> impl Iterator<Item = &TreeNode<S>> {
        self.left.iter().chain(self.right.iter()).map(|b| &**b)
    }

    /// Check the structural invariants of the whole subtree.
    pub fn validate(&self) -> Result<()> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match (node.symbol, node.left.as_deref(), node.right.as_deref()) {
                (Some(_), None, None) => {}
                (Some(sym), _, _) => {
                    return Err(CodecError::MalformedTree(format!(
                        "leaf {sym:?} has children"
                    )));
                }
                (None, Some(left), Some(right)) => {
                    if left.freq + right.freq != node.freq {
                        return Err(CodecError::MalformedTree(format!(
                            "internal frequency {} != {} + {}",
                            node.freq, left.freq, right.freq
                        )));
                    }
                    stack.push(left);
                    stack.push(right);
                }
                (None, _, _) => {
                    return Err(CodecError::MalformedTree(
                        "internal node without two children".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Build the code tree for a non-empty frequency table.
///
/// Queue order is `(frequency, sequence)`: leaves get sequence numbers in
/// ascending symbol order and every merged node takes the next one, so equal
/// weights always resolve the same way.
pub fn build_tree<S: Symbol>(freqs: &FrequencyTable<S>) -> Result<TreeNode<S>> {
    if freqs.is_empty() {
        return Err(CodecError::EmptyAlphabet);
    }

    let mut slots: Vec<Option<TreeNode<S>>> = Vec::with_capacity(freqs.len() * 2 - 1);
    let mut heap = BinaryHeap::with_capacity(freqs.len());
    for (sym, freq) in freqs.iter() {
        heap.push(Reverse((freq, slots.len())));
        slots.push(Some(TreeNode::leaf(sym, freq)));
    }

    while heap.len() > 1 {
        let left = pop_lightest(&mut heap, &mut slots)?;
        let right = pop_lightest(&mut heap, &mut slots)?;
        trace!(left = left.freq, right = right.freq, "merging nodes");
        let node = TreeNode::internal(left, right);
        heap.push(Reverse((node.freq, slots.len())));
        slots.push(Some(node));
    }

    let root = pop_lightest(&mut heap, &mut slots)?;
    debug!(
        symbols = freqs.len(),
        depth = root.depth(),
        weight = root.freq,
        "built code tree"
    );
    Ok(root)
}

fn pop_lightest<S: Symbol>(
    heap: &mut BinaryHeap<Reverse<(u64, usize)>>,
    slots: &mut [Option<TreeNode<S>>],
) -> Result<TreeNode<S>> {
    let Reverse((_, idx)) = heap
        .pop()
        .ok_or_else(|| CodecError::MalformedTree("priority queue underflow".into()))?;
    slots[idx]
        .take()
        .ok_or_else(|| CodecError::MalformedTree(format!("node {idx} merged twice")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_for(text: &str) -> TreeNode<char> {
        build_tree(&FrequencyTable::count(text.chars())).unwrap()
    }

    #[test]
    fn test_root_weight_is_input_length() {
        let root = tree_for("AABBBCCCC");
        assert_eq!(root.freq(), 9);
        assert_eq!(root.leaf_count(), 3);
        assert!(!root.is_leaf());
        root.validate().unwrap();
    }

    #[test]
    fn test_lightest_nodes_merge_first() {
        // A:2 and B:3 merge into 5, then C:4 joins on the left.
        let root = tree_for("AABBBCCCC");
        let left = root.left.as_deref().unwrap();
        let right = root.right.as_deref().unwrap();
        assert_eq!(left.symbol(), Some('C'));
        assert_eq!(right.freq(), 5);
        assert_eq!(right.left.as_deref().unwrap().symbol(), Some('A'));
        assert_eq!(right.right.as_deref().unwrap().symbol(), Some('B'));
    }

    #[test]
    fn test_single_symbol_is_bare_leaf() {
        let root = tree_for("aaaa");
        assert!(root.is_leaf());
        assert_eq!(root.symbol(), Some('a'));
        assert_eq!(root.freq(), 4);
        assert_eq!(root.depth(), 0);
    }

    #[test]
    fn test_empty_table() {
        let err = build_tree(&FrequencyTable::<u8>::new()).unwrap_err();
        assert!(matches!(err, CodecError::EmptyAlphabet));
    }

    #[test]
    fn test_ties_are_deterministic() {
        let freqs = FrequencyTable::count(b"abcdefgh".iter().copied());
        let first = build_tree(&freqs).unwrap();
        for _ in 0..10 {
            assert_eq!(build_tree(&freqs).unwrap(), first);
        }
        assert_eq!(first.depth(), 3);
    }

    #[test]
    fn test_validate_rejects_missing_child() {
        let mut root = tree_for("abc");
        root.right = None;
        assert!(matches!(root.validate(), Err(CodecError::MalformedTree(_))));
    }

    #[test]
    fn test_validate_rejects_bad_weight() {
        let mut root = tree_for("abc");
        root.freq += 1;
        assert!(matches!(root.validate(), Err(CodecError::MalformedTree(_))));
    }

    #[test]
    fn test_validate_rejects_leaf_with_child() {
        let mut leaf = TreeNode::leaf(b'x', 1);
        leaf.left = Some(Box::new(TreeNode::leaf(b'y', 1)));
        assert!(matches!(leaf.validate(), Err(CodecError::MalformedTree(_))));
    }
}
