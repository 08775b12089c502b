//! Symbol <-> code mappings derived from a code tree

use std::collections::HashMap;

use tracing::debug;

use crate::error::{CodecError, Result};
use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;
use crate::tree::TreeNode;

/// A code as a bit sequence, root edge first. `false` is a left turn.
pub type Code = Vec<bool>;

/// Render a code as a string of `0` and `1`.
pub fn code_to_string(code: &[bool]) -> String {
    code.iter().map(|&bit| if bit { '1' } else { '0' }).collect()
}

/// Both directions of a prefix-free code, built together from one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable<S: Symbol> {
    encode: HashMap<S, Code>,
    decode: HashMap<Code, S>,
}

impl<S: Symbol> CodeTable<S> {
    /// Walk the tree and assign every leaf its path.
    ///
    /// A tree that is a single leaf has no edges to walk, so its symbol gets
    /// the one-bit code `0`.
    pub fn from_tree(root: &TreeNode<S>) -> Result<Self> {
        let mut table = Self {
            encode: HashMap::new(),
            decode: HashMap::new(),
        };

        if let Some(sym) = root.symbol {
            table.insert(sym, vec![false])?;
            return Ok(table);
        }

        let mut stack: Vec<(&TreeNode<S>, Code)> = vec![(root, Vec::new())];
        while let Some((node, path)) = stack.pop() {
            if let Some(sym) = node.symbol {
                table.insert(sym, path)?;
                continue;
            }
            let (left, right) = match (node.left.as_deref(), node.right.as_deref()) {
                (Some(left), Some(right)) => (left, right),
                _ => {
                    return Err(CodecError::MalformedTree(format!(
                        "internal node at {:?} lacks two children",
                        code_to_string(&path)
                    )));
                }
            };
            let mut right_path = path.clone();
            right_path.push(true);
            stack.push((right, right_path));
            let mut left_path = path;
            left_path.push(false);
            stack.push((left, left_path));
        }

        debug!(
            symbols = table.len(),
            max_code_len = table.max_code_len(),
            "generated code table"
        );
        Ok(table)
    }

    fn insert(&mut self, sym: S, code: Code) -> Result<()> {
        if self.encode.contains_key(&sym) {
            return Err(CodecError::MalformedTree(format!(
                "symbol {sym:?} appears on more than one leaf"
            )));
        }
        self.decode.insert(code.clone(), sym);
        self.encode.insert(sym, code);
        Ok(())
    }

    pub fn code_for(&self, symbol: &S) -> Option<&[bool]> {
        self.encode.get(symbol).map(Vec::as_slice)
    }

    pub fn symbol_for(&self, code: &[bool]) -> Option<S> {
        self.decode.get(code).copied()
    }

    /// Alphabet size.
    pub fn len(&self) -> usize {
        self.encode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encode.is_empty()
    }

    pub fn max_code_len(&self) -> usize {
        self.encode.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (S, &[bool])> {
        let mut entries: Vec<(S, &[bool])> =
            self.encode.iter().map(|(&s, c)| (s, c.as_slice())).collect();
        entries.sort_unstable_by_key(|&(s, _)| s);
        entries.into_iter()
    }

    /// True when no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&Code> = self.encode.values().collect();
        codes.sort();
        // After sorting, a prefix sorts immediately before some code it prefixes.
        codes.windows(2).all(|pair| !pair[1].starts_with(pair[0]))
    }

    /// Sum of frequency x code length over the alphabet.
    pub fn weighted_length(&self, freqs: &FrequencyTable<S>) -> u64 {
        freqs
            .iter()
            .map(|(sym, freq)| freq * self.code_for(&sym).map_or(0, <[bool]>::len) as u64)
            .sum()
    }

    /// Number of payload bits `symbols` would encode to.
    pub fn encoded_bit_len(&self, symbols: &[S]) -> Result<usize> {
        symbols.iter().try_fold(0usize, |acc, sym| {
            self.code_for(sym)
                .map(|code| acc + code.len())
                .ok_or_else(|| CodecError::UnknownSymbol(format!("{sym:?}")))
        })
    }
}
