// src/cached.rs
use std::collections::HashMap;
use std::hash::Hash;

use tracing::trace;

struct CacheNode<T> {
    /// DP row over reference positions after consuming the path to this node.
    row: Vec<usize>,
    children: HashMap<T, CacheNode<T>>,
}

impl<T> CacheNode<T> {
    fn new(row: Vec<usize>) -> Self {
        CacheNode { row, children: HashMap::new() }
    }
}

/// Word-level edit distance against a fixed reference, memoizing the DP rows
/// of every hypothesis prefix seen so far in a trie.
///
/// Phrase shifting evaluates many candidates that share long prefixes with
/// the current hypothesis, so most calls only recompute the tail.
pub struct CachedEditDistance<T> {
    reference: Vec<T>,
    root: CacheNode<T>,
}

impl<T: Eq + Hash + Clone> CachedEditDistance<T> {
    pub fn new(reference: &[T]) -> Self {
        let first_row: Vec<usize> = (0..=reference.len()).collect();
        CachedEditDistance { reference: reference.to_vec(), root: CacheNode::new(first_row) }
    }

    pub fn reference(&self) -> &[T] {
        &self.reference
    }

    /// Unit-cost edit distance from `hypothesis` to the reference.
    pub fn distance(&mut self, hypothesis: &[T]) -> usize {
        let reference = &self.reference;
        let mut node = &mut self.root;
        let mut computed = 0usize;

        for word in hypothesis {
            let row = if node.children.contains_key(word) {
                Vec::new()
            } else {
                computed += 1;
                next_row(&node.row, word, reference)
            };
            node = node.children.entry(word.clone()).or_insert_with(|| CacheNode::new(row));
        }

        trace!(words = hypothesis.len(), computed, "cached edit distance");
        node.row[reference.len()]
    }
}

fn next_row<T: PartialEq>(previous_row: &[usize], word: &T, reference: &[T]) -> Vec<usize> {
    let mut row = Vec::with_capacity(previous_row.len());
    row.push(previous_row[0] + 1);
    for (j_idx, ref_word) in reference.iter().enumerate() {
        let cost = if word == ref_word { 0 } else { 1 };
        let best = std::cmp::min(
            previous_row[j_idx + 1] + 1,
            std::cmp::min(row[j_idx] + 1, previous_row[j_idx] + cost),
        );
        row.push(best);
    }
    row
}
