//! Prefix tree over lowercased terms, stored as an arena of nodes.
//!
//! Children are kept in a `BTreeMap` so traversal visits them in ascending character
//! order. A term's frequency only ever grows: `insert` keeps the larger value and
//! `record_search` adds one.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use catalog_core::config::TermExtraction;
use catalog_core::Item;

use crate::extract::extract_terms;

type NodeId = usize;

const ROOT: NodeId = 0;

/// Searches shorter than this are not recorded.
pub const MIN_RECORDED_CHARS: usize = 2;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: BTreeMap<char, NodeId>,
    is_end: bool,
    frequency: u64,
}

#[derive(Debug, Clone)]
pub struct AutocompleteTrie {
    nodes: Vec<TrieNode>,
    terms: usize,
}

impl Default for AutocompleteTrie {
    fn default() -> Self {
        Self { nodes: vec![TrieNode::default()], terms: 0 }
    }
}

fn normalize(term: &str) -> String {
    term.trim().to_lowercase()
}

impl AutocompleteTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh trie holding the terms extracted from `items`.
    pub fn build_from(items: &[Item], extraction: TermExtraction) -> Self {
        let mut trie = Self::new();
        for (term, frequency) in extract_terms(items, extraction) {
            trie.insert(&term, frequency);
        }
        trie
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms == 0
    }

    fn walk(&self, term: &str) -> Option<NodeId> {
        term.chars()
            .try_fold(ROOT, |node, ch| self.nodes[node].children.get(&ch).copied())
    }

    fn walk_or_create(&mut self, term: &str) -> NodeId {
        let mut node = ROOT;
        for ch in term.chars() {
            node = match self.nodes[node].children.get(&ch) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node].children.insert(ch, child);
                    child
                }
            };
        }
        node
    }

    pub fn insert(&mut self, term: &str, frequency: u64) {
        let term = normalize(term);
        if term.is_empty() {
            return;
        }
        let id = self.walk_or_create(&term);
        let node = &mut self.nodes[id];
        if !node.is_end {
            node.is_end = true;
            self.terms += 1;
        }
        node.frequency = node.frequency.max(frequency);
    }

    pub fn frequency(&self, term: &str) -> Option<u64> {
        let node = &self.nodes[self.walk(&normalize(term))?];
        node.is_end.then_some(node.frequency)
    }

    /// Bumps a searched term by one, or adds it with frequency 1.
    pub fn record_search(&mut self, query: &str) {
        let query = normalize(query);
        if query.chars().count() < MIN_RECORDED_CHARS {
            return;
        }
        match self.walk(&query) {
            Some(id) if self.nodes[id].is_end => self.nodes[id].frequency += 1,
            _ => self.insert(&query, 1),
        }
    }

    /// Completions of `prefix`, most frequent first. Only the first `limit * 3` terms in
    /// alphabetical walk order are considered.
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<String> {
        let prefix = normalize(prefix);
        if prefix.is_empty() || limit == 0 {
            return Vec::new();
        }
        let Some(start) = self.walk(&prefix) else {
            return Vec::new();
        };
        let mut found = self.collect(start, prefix, Some(limit.saturating_mul(3)));
        found.sort_by_key(|(_, freq)| Reverse(*freq));
        found.into_iter().take(limit).map(|(term, _)| term).collect()
    }

    pub fn popular_terms(&self, limit: usize) -> Vec<(String, u64)> {
        let mut all = self.collect(ROOT, String::new(), None);
        all.sort_by_key(|(_, freq)| Reverse(*freq));
        all.truncate(limit);
        all
    }

    /// Pre-order walk from `start`, children in ascending order, stopping after `cap` terms.
    fn collect(&self, start: NodeId, prefix: String, cap: Option<usize>) -> Vec<(String, u64)> {
        let mut out = Vec::new();
        let mut stack = vec![(start, prefix)];
        while let Some((id, word)) = stack.pop() {
            if cap.is_some_and(|cap| out.len() >= cap) {
                break;
            }
            let node = &self.nodes[id];
            if node.is_end {
                out.push((word.clone(), node.frequency));
            }
            for (&ch, &child) in node.children.iter().rev() {
                let mut next = word.clone();
                next.push(ch);
                stack.push((child, next));
            }
        }
        out
    }
}
