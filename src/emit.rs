use rustfst::StateId;
use std::collections::HashSet;
use std::fmt;

use crate::error::Result;
use crate::rule::Rule;
use crate::score::ScoredRule;
use crate::weights::WeightTable;

/// Start and final state shared by every rule
pub const HUB_STATE: StateId = 0;
/// Weight on every arc of a multi-token path after the first
pub const CONTINUATION_WEIGHT: f64 = 1.0;
/// Empty symbol in AT&T text
pub const EPS_SYMBOL: &str = "<eps>";

/// Arc label: either a word or the empty symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArcLabel {
    Eps,
    Word(String),
}

impl ArcLabel {
    pub fn word(word: &str) -> Self {
        ArcLabel::Word(word.to_string())
    }

    pub fn as_str(&self) -> &str {
        match self {
            ArcLabel::Eps => EPS_SYMBOL,
            ArcLabel::Word(word) => word,
        }
    }
}

impl fmt::Display for ArcLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One transition of the output transducer
#[derive(Debug, Clone, PartialEq)]
pub struct ArcRecord {
    pub from: StateId,
    pub to: StateId,
    pub ilabel: ArcLabel,
    pub olabel: ArcLabel,
    pub weight: f64,
}

/// Hands out fresh intermediate state IDs for one sentence.  Never
/// reset between rules, so paths from different rules cannot share
/// states.
#[derive(Debug, Default)]
pub struct StateAllocator {
    last: StateId,
}

impl StateAllocator {
    pub fn new() -> Self {
        Self { last: HUB_STATE }
    }

    /// Allocate the next state
    pub fn next_state(&mut self) -> StateId {
        self.last += 1;
        self.last
    }

    /// Highest state allocated so far (the hub if none)
    pub fn last_state(&self) -> StateId {
        self.last
    }
}

/// Arc records for one sentence, in generation order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArcList {
    pub arcs: Vec<ArcRecord>,
    /// Number of states referenced, hub included
    pub num_states: usize,
}

/// Builds the arc list for one sentence's phrase table.
#[derive(Debug)]
pub struct ArcEmitter<'a> {
    states: &'a mut StateAllocator,
    arcs: Vec<ArcRecord>,
}

impl<'a> ArcEmitter<'a> {
    pub fn new(states: &'a mut StateAllocator) -> Self {
        Self {
            states,
            arcs: Vec::new(),
        }
    }

    fn push(&mut self, from: StateId, to: StateId, ilabel: ArcLabel, olabel: ArcLabel, weight: f64) {
        self.arcs.push(ArcRecord {
            from,
            to,
            ilabel,
            olabel,
            weight,
        });
    }

    /// Emit the arcs for a scored rule.
    ///
    /// A one-to-one rule is a single loop on the hub.  Anything else is a
    /// chain from the hub back to the hub which first reads the source
    /// tokens (writing nothing) then writes the target tokens (reading
    /// nothing).  The whole rule weight sits on the first arc.
    pub fn emit_rule(&mut self, scored: &ScoredRule) {
        let ScoredRule { rule, weight } = *scored;
        if rule.is_single_token() {
            self.push(
                HUB_STATE,
                HUB_STATE,
                ArcLabel::word(&rule.source[0]),
                ArcLabel::word(&rule.target[0]),
                weight,
            );
            return;
        }
        let mut current = HUB_STATE;
        for (i, word) in rule.source.iter().enumerate() {
            let next = self.states.next_state();
            let arc_weight = if i == 0 { weight } else { CONTINUATION_WEIGHT };
            self.push(current, next, ArcLabel::word(word), ArcLabel::Eps, arc_weight);
            current = next;
        }
        let last_index = rule.target.len() - 1;
        for (j, word) in rule.target.iter().enumerate() {
            let next = if j == last_index {
                HUB_STATE
            } else {
                self.states.next_state()
            };
            self.push(current, next, ArcLabel::Eps, ArcLabel::word(word), CONTINUATION_WEIGHT);
            current = next;
        }
    }

    /// Emit a pass-through loop for each sentence word no rule covers
    pub fn emit_oov(&mut self, sentence: &str, covered: &HashSet<&str>, pass_through: f64) {
        for word in sentence.split_whitespace() {
            if !covered.contains(word) {
                log::debug!("no rule for {:?}, passing through", word);
                self.push(HUB_STATE, HUB_STATE, ArcLabel::word(word), ArcLabel::word(word), pass_through);
            }
        }
    }

    pub fn finish(self) -> ArcList {
        ArcList {
            arcs: self.arcs,
            num_states: self.states.last_state() as usize + 1,
        }
    }
}

/// Words appearing in the source phrase of any rule
pub fn coverage(rules: &[Rule]) -> HashSet<&str> {
    rules
        .iter()
        .flat_map(|rule| rule.source_text.split_whitespace())
        .collect()
}

/// Convert one sentence's phrase table into transducer arcs.
///
/// Fails on the first rule that cannot be scored; nothing is returned
/// for the sentence in that case.
pub fn phrasetable_to_fst(sentence: &str, rules: &[Rule], weights: &WeightTable) -> Result<ArcList> {
    weights.glue()?;
    weights.word_penalty()?;
    let pass_through = weights.pass_through()?;

    let mut states = StateAllocator::new();
    let mut emitter = ArcEmitter::new(&mut states);
    for rule in rules {
        let scored = ScoredRule::new(rule, weights)?;
        log::trace!("{:?} => {:?}: {}", rule.source, rule.target, scored.weight);
        emitter.emit_rule(&scored);
    }
    let covered = coverage(rules);
    emitter.emit_oov(sentence, &covered, pass_through);
    let arcs = emitter.finish();
    log::debug!(
        "{} rules => {} arcs over {} states",
        rules.len(),
        arcs.arcs.len(),
        arcs.num_states
    );
    Ok(arcs)
}
