//! Alphabet symbols accepted by the codec.

use std::fmt::Debug;
use std::hash::Hash;

/// An atomic input unit. Compared by value; `Ord` supplies the leaf
/// insertion order used for deterministic tie-breaking.
pub trait Symbol: Copy + Eq + Ord + Hash + Debug {}

impl Symbol for u8 {}
impl Symbol for char {}
