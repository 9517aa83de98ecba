//! Balanced bit sequences.
//!
//! A tree is written as a sequence over `{0, 1}`: for every child, in order, a
//! `0`, the child's own sequence, then a `1`. Leaves are the empty sequence, so
//! a tree with `n` nodes becomes exactly `2(n - 1)` bits.

use core::fmt;
use core::str::FromStr;
use std::sync::{Arc, LazyLock};

use crate::error::Error;
use crate::tree::TreeView;

const OPEN: bool = false;
const CLOSE: bool = true;

static EMPTY: LazyLock<BalancedSequence> = LazyLock::new(|| BalancedSequence {
    bits: Arc::from(Vec::new()),
});

/// An immutable balanced sequence of bits.
///
/// Equality and hashing look at the bit content only. Cloning shares the
/// underlying buffer, which is allocated at its exact length.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BalancedSequence {
    bits: Arc<[bool]>,
}

impl BalancedSequence {
    /// The empty sequence, shared by every caller.
    pub fn empty() -> Self {
        EMPTY.clone()
    }

    /// Encode the shape of the subtree rooted at `node`.
    ///
    /// Labels are ignored. The traversal uses an explicit stack, so arbitrarily
    /// deep trees are fine.
    pub fn from_tree<T: TreeView>(tree: &T, node: T::Node) -> Self {
        let expected = 2 * tree.subtree_size(node).saturating_sub(1);
        if expected == 0 {
            return Self::empty();
        }

        let mut bits = Vec::with_capacity(expected);
        let mut stack = vec![tree.children(node)];

        while let Some(children) = stack.last_mut() {
            match children.next() {
                Some(child) => {
                    bits.push(OPEN);
                    stack.push(tree.children(child));
                }
                None => {
                    stack.pop();
                    if !stack.is_empty() {
                        bits.push(CLOSE);
                    }
                }
            }
        }

        debug_assert_eq!(
            bits.len(),
            expected,
            "subtree_size disagrees with the children actually visited"
        );
        Self::from_vec(bits)
    }

    fn from_vec(bits: Vec<bool>) -> Self {
        if bits.is_empty() {
            Self::empty()
        } else {
            Self {
                bits: Arc::from(bits),
            }
        }
    }

    fn from_slice(bits: &[bool]) -> Self {
        if bits.is_empty() {
            Self::empty()
        } else {
            Self {
                bits: Arc::from(bits),
            }
        }
    }

    /// Number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether this is the empty sequence.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Number of matched `0`/`1` pairs, i.e. `len() / 2`.
    #[inline]
    pub fn pairs(&self) -> usize {
        self.bits.len() / 2
    }

    /// The raw bits; `false` is `0` (open), `true` is `1` (close).
    pub fn as_bits(&self) -> &[bool] {
        &self.bits
    }

    /// Split into the unique `(head, tail)` such that `self = 0 head 1 tail`.
    ///
    /// Sequences of length 0 and 2 both yield `(empty, empty)`.
    ///
    /// # Panics
    ///
    /// If the sequence is not balanced. Sequences built by this crate always
    /// are.
    pub fn partition(&self) -> (BalancedSequence, BalancedSequence) {
        if self.len() <= 2 {
            return (Self::empty(), Self::empty());
        }

        let close = self.matching_close();
        (
            Self::from_slice(&self.bits[1..close]),
            Self::from_slice(&self.bits[close + 1..]),
        )
    }

    /// Index of the `1` that closes the leading `0`.
    fn matching_close(&self) -> usize {
        let mut depth = 0usize;
        for (index, &bit) in self.bits.iter().enumerate() {
            if bit == OPEN {
                depth += 1;
            } else {
                assert!(depth > 0, "unbalanced sequence {self}");
                depth -= 1;
                if depth == 0 {
                    return index;
                }
            }
        }
        panic!("unbalanced sequence {self}: leading bit is never closed")
    }
}

/// Concatenate two sequences. `concat(empty, empty)` is the shared empty value.
pub fn concat(left: &BalancedSequence, right: &BalancedSequence) -> BalancedSequence {
    if left.is_empty() {
        return right.clone();
    }
    if right.is_empty() {
        return left.clone();
    }

    let mut bits = Vec::with_capacity(left.len() + right.len());
    bits.extend_from_slice(&left.bits);
    bits.extend_from_slice(&right.bits);
    BalancedSequence::from_vec(bits)
}

/// Encode the subtree rooted at `node`. See [`BalancedSequence::from_tree`].
pub fn encode<T: TreeView>(tree: &T, node: T::Node) -> BalancedSequence {
    BalancedSequence::from_tree(tree, node)
}

impl Default for BalancedSequence {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for BalancedSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in self.bits.iter() {
            f.write_str(if bit == CLOSE { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BalancedSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BalancedSequence({self})")
    }
}

impl FromStr for BalancedSequence {
    type Err = Error;

    /// Parse a string of `0`/`1` characters, rejecting anything unbalanced.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bits = Vec::with_capacity(s.len());
        let mut depth = 0usize;

        for (position, c) in s.chars().enumerate() {
            match c {
                '0' => {
                    depth += 1;
                    bits.push(OPEN);
                }
                '1' => {
                    if depth == 0 {
                        return Err(Error::UnmatchedClose { position });
                    }
                    depth -= 1;
                    bits.push(CLOSE);
                }
                _ => return Err(Error::InvalidBit { position }),
            }
        }

        if depth != 0 {
            return Err(Error::UnclosedOpen { open: depth });
        }

        Ok(Self::from_vec(bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tree;
    use facet_testhelpers::test;

    fn seq(s: &str) -> BalancedSequence {
        s.parse().unwrap()
    }

    #[test]
    fn test_leaf_encodes_to_empty() {
        let tree = Tree::new("leaf");
        let encoded = encode(&tree, tree.root);
        assert!(encoded.is_empty());
        assert_eq!(encoded, BalancedSequence::empty());
    }

    #[test]
    fn test_two_leaf_children() {
        let mut tree = Tree::new("class");
        tree.add_child(tree.root, "field");
        tree.add_child(tree.root, "method");
        assert_eq!(encode(&tree, tree.root).to_string(), "0101");
    }

    #[test]
    fn test_nested_child() {
        let mut tree = Tree::new("class");
        let inner = tree.add_child(tree.root, "method");
        tree.add_child(inner, "body");
        assert_eq!(encode(&tree, tree.root).to_string(), "0011");
    }

    #[test]
    fn test_encode_subtree_only() {
        let mut tree = Tree::new("root");
        let a = tree.add_child(tree.root, "a");
        tree.add_child(a, "a1");
        tree.add_child(a, "a2");
        tree.add_child(tree.root, "b");

        assert_eq!(encode(&tree, a).to_string(), "0101");
        assert_eq!(encode(&tree, tree.root).to_string(), "00101101");
    }

    #[test]
    fn test_encoded_length_is_exact() {
        let mut tree = Tree::new(0);
        let mut parent = tree.root;
        for i in 1..10 {
            let child = tree.add_child(parent, i);
            tree.add_child(parent, i * 100);
            parent = child;
        }
        let n = tree.node_count();
        assert_eq!(encode(&tree, tree.root).len(), 2 * (n - 1));
    }

    #[test]
    fn test_partition_small() {
        let (head, tail) = BalancedSequence::empty().partition();
        assert!(head.is_empty() && tail.is_empty());

        let (head, tail) = seq("01").partition();
        assert!(head.is_empty() && tail.is_empty());
    }

    #[test]
    fn test_partition_head_and_tail() {
        let (head, tail) = seq("0011").partition();
        assert_eq!(head.to_string(), "01");
        assert!(tail.is_empty());

        let (head, tail) = seq("0101").partition();
        assert!(head.is_empty());
        assert_eq!(tail.to_string(), "01");

        let (head, tail) = seq("00101101").partition();
        assert_eq!(head.to_string(), "0101");
        assert_eq!(tail.to_string(), "01");
    }

    #[test]
    fn test_partition_reassembles() {
        for text in ["0011", "0101", "001011", "000111", "01001101", "0010110101"] {
            let s = seq(text);
            let (head, tail) = s.partition();
            assert_eq!(format!("0{head}1{tail}"), text);
        }
    }

    #[test]
    fn test_partition_rejects_unbalanced() {
        let broken = BalancedSequence {
            bits: Arc::from(vec![OPEN, OPEN, CLOSE, OPEN]),
        };
        let result = std::panic::catch_unwind(|| broken.partition());
        assert!(result.is_err(), "unbalanced input must not partition");
    }

    #[test]
    fn test_concat() {
        let empty = BalancedSequence::empty();
        assert!(concat(&empty, &empty).is_empty());
        assert_eq!(concat(&seq("01"), &empty), seq("01"));
        assert_eq!(concat(&empty, &seq("0011")), seq("0011"));
        assert_eq!(concat(&seq("01"), &seq("0011")).to_string(), "010011");
    }

    #[test]
    fn test_equality_is_structural() {
        let mut a = Tree::new("x");
        a.add_child(a.root, "y");
        let mut b = Tree::new("something else");
        b.add_child(b.root, "entirely");

        assert_eq!(encode(&a, a.root), encode(&b, b.root));
        assert_eq!(encode(&a, a.root), seq("01"));
        assert_ne!(seq("0101"), seq("0011"));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "0102".parse::<BalancedSequence>(),
            Err(Error::InvalidBit { position: 3 })
        );
        assert_eq!(
            "0110".parse::<BalancedSequence>(),
            Err(Error::UnmatchedClose { position: 2 })
        );
        assert_eq!(
            "0001".parse::<BalancedSequence>(),
            Err(Error::UnclosedOpen { open: 2 })
        );
        assert_eq!("".parse::<BalancedSequence>(), Ok(BalancedSequence::empty()));
    }

    #[test]
    fn test_debug_rendering() {
        assert_eq!(format!("{:?}", seq("0011")), "BalancedSequence(0011)");
        assert_eq!(BalancedSequence::empty().to_string(), "");
    }
}
