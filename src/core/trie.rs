//! Multi-pattern matching trie with failure ("predecessor") and shortcut links.
//!
//! Keys are added to a [`TrieBuilder`]; [`TrieBuilder::build`] runs the one-time
//! BFS pass that computes predecessor and shortcut links and hands back an
//! immutable [`Trie`]. Because stepping is only possible on a built trie, the
//! links are always valid when read, and the built trie can be shared across
//! threads without locking.
//!
//! Nodes live in an arena and are addressed by [`NodeId`].

use std::collections::{HashMap, VecDeque};

/// Index of a node in the trie arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Whether keys and stepped characters are compared as-is or lowercased.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaseSensitivity {
    #[default]
    Sensitive,
    Insensitive,
}

impl CaseSensitivity {
    pub fn fold(self, c: char) -> char {
        match self {
            CaseSensitivity::Sensitive => c,
            CaseSensitivity::Insensitive => c.to_lowercase().next().unwrap_or(c),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrieNode<T> {
    word: Option<String>,
    successors: HashMap<char, NodeId>,
    predecessor: NodeId,
    shortcut: Option<NodeId>,
    is_terminal: bool,
    can_be_followed_by_whitespace: bool,
    infos: Vec<T>,
}

impl<T> TrieNode<T> {
    fn new(word: Option<String>) -> Self {
        Self {
            word,
            successors: HashMap::new(),
            predecessor: NodeId::ROOT,
            shortcut: None,
            is_terminal: false,
            can_be_followed_by_whitespace: false,
            infos: Vec::new(),
        }
    }

    /// Text spelled by the path from the root to this node (`None` at the root).
    pub fn word(&self) -> Option<&str> {
        self.word.as_deref()
    }

    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    /// Longest proper suffix of this node's word that is also a path from the root.
    pub fn predecessor(&self) -> NodeId {
        self.predecessor
    }

    /// Nearest terminal node on the predecessor chain.
    pub fn shortcut(&self) -> Option<NodeId> {
        self.shortcut
    }

    pub fn successor(&self, c: char) -> Option<NodeId> {
        self.successors.get(&c).copied()
    }

    /// True when a run of whitespace may sit between this node and the next step,
    /// i.e. the word ends in `.` or continues with one.
    pub fn can_be_followed_by_whitespace(&self) -> bool {
        self.can_be_followed_by_whitespace
    }

    /// Payloads bound to this node's key, in insertion order.
    pub fn infos(&self) -> &[T] {
        &self.infos
    }
}

fn step_in<T>(nodes: &[TrieNode<T>], mut current: NodeId, c: char) -> NodeId {
    loop {
        if let Some(next) = nodes[current.index()].successor(c) {
            return next;
        }
        if current == NodeId::ROOT {
            return NodeId::ROOT;
        }
        current = nodes[current.index()].predecessor;
    }
}

/// Mutable half of the trie: accepts keys, then builds the linked [`Trie`].
#[derive(Debug, Clone)]
pub struct TrieBuilder<T> {
    nodes: Vec<TrieNode<T>>,
    case: CaseSensitivity,
    key_count: usize,
}

impl<T> Default for TrieBuilder<T> {
    fn default() -> Self {
        Self::new(CaseSensitivity::default())
    }
}

impl<T> TrieBuilder<T> {
    pub fn new(case: CaseSensitivity) -> Self {
        Self {
            nodes: vec![TrieNode::new(None)],
            case,
            key_count: 0,
        }
    }

    /// Add `key`, creating one node per missing character, and return its
    /// terminal node. Adding the same key twice returns the same node.
    pub fn add(&mut self, key: &str) -> NodeId {
        let mut current = NodeId::ROOT;
        let mut prefix = String::with_capacity(key.len());

        for c in key.chars() {
            prefix.push(c);
            let folded = self.case.fold(c);
            current = match self.nodes[current.index()].successor(folded) {
                Some(next) => next,
                None => {
                    let id = NodeId(self.nodes.len() as u32);
                    self.nodes.push(TrieNode::new(Some(prefix.clone())));
                    self.nodes[current.index()].successors.insert(folded, id);
                    id
                }
            };
        }

        let node = &mut self.nodes[current.index()];
        if !node.is_terminal && current != NodeId::ROOT {
            node.is_terminal = true;
            self.key_count += 1;
        }
        current
    }

    /// Add `key` and attach `info` to its terminal node.
    pub fn add_with_info(&mut self, key: &str, info: T) -> NodeId {
        let id = self.add(key);
        self.nodes[id.index()].infos.push(info);
        id
    }

    /// Number of distinct keys added so far.
    pub fn len(&self) -> usize {
        self.key_count
    }

    pub fn is_empty(&self) -> bool {
        self.key_count == 0
    }

    /// Compute predecessor and shortcut links (BFS, parents before children)
    /// and freeze the trie.
    pub fn build(mut self) -> Trie<T> {
        let mut queue = VecDeque::new();

        let root_children: Vec<NodeId> = self.nodes[0].successors.values().copied().collect();
        for child in root_children {
            let node = &mut self.nodes[child.index()];
            node.predecessor = NodeId::ROOT;
            node.shortcut = None;
            queue.push_back(child);
        }

        while let Some(parent) = queue.pop_front() {
            let parent_predecessor = self.nodes[parent.index()].predecessor;
            let edges: Vec<(char, NodeId)> = self.nodes[parent.index()]
                .successors
                .iter()
                .map(|(c, id)| (*c, *id))
                .collect();

            for (c, child) in edges {
                let z = step_in(&self.nodes, parent_predecessor, c);
                let shortcut = if self.nodes[z.index()].is_terminal {
                    Some(z)
                } else {
                    self.nodes[z.index()].shortcut
                };
                let node = &mut self.nodes[child.index()];
                node.predecessor = z;
                node.shortcut = shortcut;
                queue.push_back(child);
            }
        }

        for node in &mut self.nodes {
            node.can_be_followed_by_whitespace = node.word.as_deref().is_some_and(|w| w.ends_with('.'))
                || node.successors.contains_key(&'.');
        }

        tracing::debug!(
            keys = self.key_count,
            nodes = self.nodes.len(),
            "built trie"
        );

        Trie {
            nodes: self.nodes,
            case: self.case,
            key_count: self.key_count,
        }
    }
}

/// Immutable, fully linked trie. Safe to share between concurrent scans.
#[derive(Debug, Clone)]
pub struct Trie<T> {
    nodes: Vec<TrieNode<T>>,
    case: CaseSensitivity,
    key_count: usize,
}

impl<T> Trie<T> {
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn node(&self, id: NodeId) -> &TrieNode<T> {
        &self.nodes[id.index()]
    }

    pub fn case_sensitivity(&self) -> CaseSensitivity {
        self.case
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.key_count
    }

    pub fn is_empty(&self) -> bool {
        self.key_count == 0
    }

    /// Follow the edge for `c` from `current`, falling back along predecessor
    /// links until some node has a `c` edge; ends at the root otherwise.
    pub fn step(&self, current: NodeId, c: char) -> NodeId {
        step_in(&self.nodes, current, self.case.fold(c))
    }

    /// Exact lookup of a registered key.
    pub fn get(&self, key: &str) -> Option<NodeId> {
        let mut current = NodeId::ROOT;
        for c in key.chars() {
            current = self.node(current).successor(self.case.fold(c))?;
        }
        self.node(current).is_terminal.then_some(current)
    }

    /// All terminal nodes whose key ends at `node`, longest first: the node
    /// itself when terminal, then its shortcut chain.
    pub fn matches_ending_at(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let first = if self.node(node).is_terminal {
            Some(node)
        } else {
            self.node(node).shortcut
        };
        std::iter::successors(first, move |id| self.node(*id).shortcut)
    }
}
