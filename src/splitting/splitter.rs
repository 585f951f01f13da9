use std::time::{Duration, Instant};

use tracing::debug;

use crate::splitting::dictionary::SplitterDict;

/// Pieces shorter than this never become tree nodes; tiny fragments are
/// rarely real words and bloat the tree.
const MIN_COMPOUND_WORD_LENGTH: usize = 4;

/// Inputs longer than this are not worth a tree at all.
const MAX_WORD_LENGTH: usize = 100;

/// Ceiling on dictionary hits per split; enumeration stops when reached.
const MAX_TREE_NODES: usize = 20;

/// Wall-clock budget per split. When it fires mid-recursion the partial
/// tree built so far still yields a usable result.
const CANCEL_SPLITTING_AFTER: Duration = Duration::from_millis(500);

/// Decomposes words that are absent from the vocabulary into known pieces.
pub trait CompoundSplitter: Send + Sync {
    /// The best-scoring decomposition, or empty if the word can't be split.
    fn split(&self, word: &str) -> Vec<String>;
}

/// Builds a forest of candidate splits and selects the best option based
/// on the dictionary's scoring.
pub struct Splitter {
    dict: Box<dyn SplitterDict>,
    cancel_after: Duration,
}

impl Splitter {
    pub fn new(dict: Box<dyn SplitterDict>) -> Self {
        Splitter {
            dict,
            cancel_after: CANCEL_SPLITTING_AFTER,
        }
    }

    #[cfg(test)]
    fn with_deadline(dict: Box<dyn SplitterDict>, cancel_after: Duration) -> Self {
        Splitter { dict, cancel_after }
    }

    /// Left to right, enumerate every dictionary word hiding in the input
    /// and wire it into the forest. Stops once the node budget is used up;
    /// the budget includes the hit that trips it.
    fn find_all_combinations(&self, word: &str, tree: &mut SplitTree, deadline: Instant) {
        let mut nodes_used = 0;
        let boundaries: Vec<usize> = word.char_indices().map(|(at, _)| at).collect();

        for (position, &start) in boundaries.iter().enumerate() {
            let ends = boundaries[position + 1..]
                .iter()
                .copied()
                .chain(std::iter::once(word.len()));

            for end in ends {
                let candidate = &word[start..end];
                if candidate.len() < MIN_COMPOUND_WORD_LENGTH {
                    continue;
                }

                if self.dict.contains(candidate) {
                    nodes_used += 1;
                    if nodes_used == MAX_TREE_NODES {
                        return;
                    }
                    tree.insert(candidate, start, deadline);
                }
            }
        }
    }
}

impl CompoundSplitter for Splitter {
    fn split(&self, word: &str) -> Vec<String> {
        if word.len() > MAX_WORD_LENGTH {
            return Vec::new();
        }

        let deadline = Instant::now() + self.cancel_after;

        let mut tree = SplitTree::default();
        self.find_all_combinations(word, &mut tree, deadline);
        let combinations = tree.phrases(deadline);

        let mut max_score = 0.0;
        let mut max_phrase: Vec<String> = Vec::new();
        for combination in combinations {
            let score = self.dict.score(&combination);
            // initialize from the first candidate even when its score is
            // negative, then let strictly better candidates take over
            if max_phrase.is_empty() || score > max_score {
                max_score = score;
                max_phrase = combination;
            }
        }

        if Instant::now() >= deadline {
            debug!(word, "compound splitting hit its deadline, using partial result");
        }

        max_phrase
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(usize);

/// One recognized piece. `start` is inclusive, `end` exclusive, both byte
/// offsets into the original word.
struct Node {
    name: String,
    start: usize,
    end: usize,
    children: Vec<NodeId>,
}

/// Arena-backed forest of disjoint chains. A path from a root to a leaf is
/// a candidate phrase; children always start at or after their parent's
/// end, so phrases never overlap themselves.
#[derive(Default)]
struct SplitTree {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl SplitTree {
    fn insert(&mut self, name: &str, start: usize, deadline: Instant) {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.to_string(),
            start,
            end: start + name.len(),
            children: Vec::new(),
        });

        let mut appended = false;
        let roots = self.roots.clone();
        for root in roots {
            for leaf in self.leaves_ending_before(root, start, deadline) {
                debug_assert!(start >= self.nodes[leaf.0].end);
                self.nodes[leaf.0].children.push(id);
                appended = true;
            }
        }

        if !appended {
            self.roots.push(id);
        }
    }

    /// The leaves below `node` (or the node itself) that end at or before
    /// `index`, i.e. the spots a piece starting at `index` can attach to.
    /// Returns nothing once the deadline has fired.
    fn leaves_ending_before(&self, node: NodeId, index: usize, deadline: Instant) -> Vec<NodeId> {
        if Instant::now() >= deadline {
            return Vec::new();
        }

        let mut found = Vec::new();
        for &child in &self.nodes[node.0].children {
            if self.nodes[child.0].end > index {
                continue;
            }

            let leaves = self.leaves_ending_before(child, index, deadline);
            if leaves.is_empty() {
                found.push(child);
            } else {
                found.extend(leaves);
            }
        }

        if found.is_empty() && self.nodes[node.0].end <= index {
            found.push(node);
        }

        found
    }

    fn phrases(&self, deadline: Instant) -> Vec<Vec<String>> {
        let mut all = Vec::new();
        for &root in &self.roots {
            all.extend(self.build_names(root, deadline));
        }
        all
    }

    /// All root-to-leaf phrases below `node`. Once the deadline has fired
    /// the recursion collapses to the node itself.
    fn build_names(&self, node: NodeId, deadline: Instant) -> Vec<Vec<String>> {
        let name = &self.nodes[node.0].name;
        if Instant::now() >= deadline {
            return vec![vec![name.clone()]];
        }

        let mut phrases = Vec::new();
        for &child in &self.nodes[node.0].children {
            for child_phrase in self.build_names(child, deadline) {
                let mut phrase = Vec::with_capacity(child_phrase.len() + 1);
                phrase.push(name.clone());
                phrase.extend(child_phrase);
                phrases.push(phrase);
            }
        }

        if phrases.is_empty() {
            phrases.push(vec![name.clone()]);
        }

        phrases
    }
}
