use std::iter;

use tracing::debug;

use super::{
    same, DataType, DicType, Dictionary, Matching, WordHit, WordStream, FULL_WORD_FREQ_MULTIPLIER,
    INCLUDE_TYPED_WORD_IF_VALID, MAXIMUM_BIGRAM_FREQUENCY, MAX_WORD_FREQUENCY, MAX_WORD_LENGTH,
};
use crate::composer::{KeyCode, WordComposer, NOT_A_CODE};
use crate::normalize::to_lower_case;

const QUOTE: char = '\'';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NextWordId(u32);

#[derive(Debug)]
struct Node {
    /// Character as inserted; reconstructed words keep case and accents.
    code: char,
    /// `to_lower_case(code)`, compared against the composer's folded codes.
    folded: char,
    frequency: u8,
    terminal: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    ngrams: Option<NextWordId>,
}

#[derive(Debug)]
struct NextWord {
    word: NodeId,
    frequency: u8,
    next: Option<NextWordId>,
}

/// In-memory trie dictionary with bigram successor lists.
///
/// Nodes live in one arena and refer to each other by index; `parent` is
/// only followed upward to rebuild a word.
#[derive(Debug)]
pub struct ExpandableDictionary {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    next_words: Vec<NextWord>,
    dic_type: DicType,
    word_count: usize,
    bigram_threshold: u32,
}

impl ExpandableDictionary {
    pub fn new(dic_type: DicType) -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            next_words: Vec::new(),
            dic_type,
            word_count: 0,
            bigram_threshold: 0,
        }
    }

    pub fn dic_type(&self) -> DicType {
        self.dic_type
    }

    /// Add `frequency` to `word`, creating it if needed. The stored value
    /// saturates at 255. Characters past `MAX_WORD_LENGTH` are ignored.
    pub fn add_word(&mut self, word: &str, frequency: u32) {
        if let Some(id) = self.insert(word) {
            let node = self.node_mut(id);
            let total = u32::from(node.frequency)
                .saturating_add(frequency)
                .min(MAX_WORD_FREQUENCY);
            node.frequency = total as u8;
        }
    }

    /// Stored frequency of an exact word, or `None` if absent.
    pub fn word_frequency(&self, word: &str) -> Option<u32> {
        self.find_word(word)
            .map(|id| u32::from(self.node(id).frequency))
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    pub fn clear(&mut self) {
        debug!(dic_type = ?self.dic_type, words = self.word_count, "clearing dictionary");
        self.nodes.clear();
        self.roots.clear();
        self.next_words.clear();
        self.word_count = 0;
    }

    /// Only report bigram successors whose frequency reached `threshold`.
    pub fn set_bigram_threshold(&mut self, threshold: u32) {
        self.bigram_threshold = threshold;
    }

    /// Accumulate `frequency` on the (previous → next) association, capped at
    /// 127. Both words are created if missing. Returns `true` when a new
    /// successor entry was recorded.
    pub fn add_bigram(&mut self, previous: &str, next: &str, frequency: u32) -> bool {
        self.update_bigram(previous, next, |old| old.saturating_add(frequency), frequency)
    }

    /// Like [`add_bigram`](Self::add_bigram) but replaces the frequency.
    pub fn set_bigram(&mut self, previous: &str, next: &str, frequency: u32) -> bool {
        self.update_bigram(previous, next, |_| frequency, frequency)
    }

    /// Frequency recorded for (previous → next), if any.
    pub fn bigram_frequency(&self, previous: &str, next: &str) -> Option<u32> {
        let first = self.find_word(previous)?;
        let second = self.find_word(next)?;
        self.successors(first)
            .find(|nw| nw.word == second)
            .map(|nw| u32::from(nw.frequency))
    }

    /// Fuzzy lookup as a lazy iterator over hits.
    pub fn lookup<'a>(&'a self, composer: &'a WordComposer, matching: Matching) -> Words<'a> {
        Words::new(self, composer, matching)
    }

    fn update_bigram(
        &mut self,
        previous: &str,
        next: &str,
        merge: impl Fn(u32) -> u32,
        initial: u32,
    ) -> bool {
        let (Some(first), Some(second)) = (self.insert(previous), self.insert(next)) else {
            return false;
        };

        let mut cursor = self.node(first).ngrams;
        while let Some(id) = cursor {
            let entry = &mut self.next_words[id.0 as usize];
            if entry.word == second {
                entry.frequency = merge(u32::from(entry.frequency)).min(MAXIMUM_BIGRAM_FREQUENCY) as u8;
                return false;
            }
            cursor = entry.next;
        }

        let id = NextWordId(self.next_words.len() as u32);
        let head = self.node(first).ngrams;
        self.next_words.push(NextWord {
            word: second,
            frequency: initial.min(MAXIMUM_BIGRAM_FREQUENCY) as u8,
            next: head,
        });
        self.node_mut(first).ngrams = Some(id);
        true
    }

    /// Walk/create the path for `word` and mark its last node terminal.
    fn insert(&mut self, word: &str) -> Option<NodeId> {
        let mut parent: Option<NodeId> = None;
        for c in word.chars().take(MAX_WORD_LENGTH) {
            let siblings = match parent {
                Some(p) => &self.node(p).children,
                None => &self.roots,
            };
            let existing = siblings.iter().copied().find(|&id| self.node(id).code == c);
            let id = match existing {
                Some(id) => id,
                None => self.push_node(c, parent),
            };
            parent = Some(id);
        }
        let id = parent?;
        let node = self.node_mut(id);
        if !node.terminal {
            node.terminal = true;
            node.frequency = 0;
            self.word_count += 1;
        }
        Some(id)
    }

    fn push_node(&mut self, code: char, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            code,
            folded: to_lower_case(code),
            frequency: 0,
            terminal: false,
            parent,
            children: Vec::new(),
            ngrams: None,
        });
        match parent {
            Some(p) => self.node_mut(p).children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    fn find_word(&self, word: &str) -> Option<NodeId> {
        let mut siblings = &self.roots;
        let mut found = None;
        for c in word.chars() {
            let id = siblings.iter().copied().find(|&id| self.node(id).code == c)?;
            siblings = &self.node(id).children;
            found = Some(id);
        }
        found.filter(|&id| self.node(id).terminal)
    }

    fn successors(&self, id: NodeId) -> impl Iterator<Item = &NextWord> + '_ {
        iter::successors(self.node(id).ngrams, |&nw| self.next_words[nw.0 as usize].next)
            .map(|nw| &self.next_words[nw.0 as usize])
    }

    fn path(&self, id: NodeId) -> Vec<char> {
        let mut chars: Vec<char> = iter::successors(Some(id), |&n| self.node(n).parent)
            .map(|n| self.node(n).code)
            .collect();
        chars.reverse();
        chars
    }

    fn word_of(&self, id: NodeId) -> String {
        self.path(id).into_iter().collect()
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }
}

impl Dictionary for ExpandableDictionary {
    fn words<'a>(&'a self, composer: &'a WordComposer, matching: Matching) -> WordStream<'a> {
        Box::new(self.lookup(composer, matching))
    }

    fn bigrams<'a>(&'a self, previous: &'a str) -> WordStream<'a> {
        let Some(first) = self.find_word(previous) else {
            return Box::new(iter::empty());
        };
        let threshold = self.bigram_threshold;
        Box::new(
            self.successors(first)
                .filter(move |nw| u32::from(nw.frequency) >= threshold)
                .map(move |nw| WordHit {
                    word: self.word_of(nw.word),
                    frequency: u32::from(nw.frequency),
                    dic_type: self.dic_type,
                    data_type: DataType::Bigram,
                }),
        )
    }

    fn is_valid_word(&self, word: &str) -> bool {
        self.find_word(word).is_some()
    }

    fn word_count(&self) -> usize {
        self.word_count
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Visit {
        node: NodeId,
        depth: usize,
        completion: bool,
        snr: u32,
        input: usize,
    },
    Emit {
        node: NodeId,
        frequency: u32,
    },
}

/// Depth-first fuzzy walk over the trie, driven by the composer's frames.
///
/// The first pass follows every alternate of every frame; a primary
/// character doubles the running score, an alternate keeps it. Reaching the
/// last frame on a terminal node reports the word with the full-word bonus,
/// and everything below is reported as a completion. With `Matching::Fuzzy`
/// one more pass per frame lets the trie consume a letter at that depth
/// without consuming input, so omitted letters are recovered. Exploration
/// never goes deeper than three times the typed length.
pub struct Words<'a> {
    dict: &'a ExpandableDictionary,
    composer: &'a WordComposer,
    input_len: usize,
    max_depth: usize,
    use_alternates: bool,
    skip_passes: bool,
    skip_pos: Option<usize>,
    next_skip: usize,
    stack: Vec<Step>,
    pending: Vec<Step>,
}

impl<'a> Words<'a> {
    fn new(dict: &'a ExpandableDictionary, composer: &'a WordComposer, matching: Matching) -> Self {
        let input_len = composer.size();
        let mut words = Self {
            dict,
            composer,
            input_len,
            max_depth: input_len * 3,
            use_alternates: matching != Matching::Prefix,
            skip_passes: matching == Matching::Fuzzy,
            skip_pos: None,
            next_skip: 0,
            stack: Vec::new(),
            pending: Vec::new(),
        };
        if input_len == 0 || input_len >= MAX_WORD_LENGTH {
            words.skip_passes = false;
        } else {
            words.start_pass(None);
        }
        words
    }

    fn start_pass(&mut self, skip_pos: Option<usize>) {
        self.skip_pos = skip_pos;
        self.stack.extend(self.dict.roots.iter().rev().map(|&node| Step::Visit {
            node,
            depth: 0,
            completion: false,
            snr: 1,
            input: 0,
        }));
    }

    fn next_pass(&mut self) -> bool {
        if !self.skip_passes || self.next_skip >= self.input_len {
            return false;
        }
        let pos = self.next_skip;
        self.next_skip += 1;
        self.start_pass(Some(pos));
        true
    }

    fn matches_typed(&self, node: NodeId) -> bool {
        match self.composer.typed_word() {
            Some(typed) => same(&self.dict.path(node), typed),
            None => false,
        }
    }

    fn visit(&mut self, node: NodeId, depth: usize, completion: bool, snr: u32, input: usize) {
        if depth > self.max_depth {
            return;
        }
        let dict = self.dict;
        let n = dict.node(node);
        let frequency = u32::from(n.frequency);
        let completion = completion || input >= self.input_len;

        if completion {
            if n.terminal {
                self.pending.push(Step::Emit {
                    node,
                    frequency: frequency.saturating_mul(snr),
                });
            }
            self.push_children(&n.children, depth + 1, true, snr, input);
            return;
        }

        let composer = self.composer;
        let codes = composer.codes_at(input);
        let primary = codes.first().copied().unwrap_or(NOT_A_CODE);
        if (n.code == QUOTE && primary != QUOTE as KeyCode) || self.skip_pos == Some(depth) {
            self.push_children(&n.children, depth + 1, false, snr, input);
            return;
        }

        let alternates = if self.skip_pos.is_some() || !self.use_alternates {
            1
        } else {
            codes.len()
        };
        for (j, &code) in codes.iter().take(alternates).enumerate() {
            if code < 0 {
                break;
            }
            if code != n.folded as KeyCode && code != n.code as KeyCode {
                continue;
            }
            let snr = snr.saturating_mul(if j == 0 { 2 } else { 1 });
            if input + 1 == self.input_len {
                if n.terminal && (INCLUDE_TYPED_WORD_IF_VALID || !self.matches_typed(node)) {
                    let mut score = frequency.saturating_mul(snr);
                    if self.skip_pos.is_none() {
                        score = score.saturating_mul(FULL_WORD_FREQ_MULTIPLIER);
                    }
                    self.pending.push(Step::Emit {
                        node,
                        frequency: score,
                    });
                }
                self.push_children(&n.children, depth + 1, true, snr, input + 1);
            } else {
                self.push_children(&n.children, depth + 1, false, snr, input + 1);
            }
        }
    }

    fn push_children(
        &mut self,
        children: &[NodeId],
        depth: usize,
        completion: bool,
        snr: u32,
        input: usize,
    ) {
        self.pending
            .extend(children.iter().map(|&node| Step::Visit {
                node,
                depth,
                completion,
                snr,
                input,
            }));
    }
}

impl Iterator for Words<'_> {
    type Item = WordHit;

    fn next(&mut self) -> Option<WordHit> {
        loop {
            let Some(step) = self.stack.pop() else {
                if self.next_pass() {
                    continue;
                }
                return None;
            };
            match step {
                Step::Emit { node, frequency } => {
                    return Some(WordHit {
                        word: self.dict.word_of(node),
                        frequency,
                        dic_type: self.dict.dic_type,
                        data_type: DataType::Unigram,
                    });
                }
                Step::Visit {
                    node,
                    depth,
                    completion,
                    snr,
                    input,
                } => {
                    self.visit(node, depth, completion, snr, input);
                    // Keep depth-first order: first pending step runs next.
                    self.stack.extend(self.pending.drain(..).rev());
                }
            }
        }
    }
}
