use std::collections::BTreeMap;
use std::f64::consts::LN_10;

use crate::error::Result;
use crate::rule::Rule;
use crate::weights::{WeightTable, GLUE, WORD_PENALTY};

/// A rule together with its log-linear score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRule<'a> {
    pub rule: &'a Rule,
    pub weight: f64,
}

/// Word penalty for a target phrase of `len` tokens.  The coefficient
/// is on a natural-log scale, output weights are base-10.
fn word_penalty(len: usize, coefficient: f64) -> f64 {
    -(1.0 / LN_10) * len as f64 * coefficient
}

/// Log-linear score of a rule.
///
/// One term per feature name, `value * weight`, with the last value
/// winning when a name repeats.  The `Glue` and `WordPenalty` terms are
/// then set to the glue weight and the word penalty, replacing any rule
/// feature of the same name.  Terms are summed in name order so output
/// is reproducible to the bit.
pub fn score(rule: &Rule, weights: &WeightTable) -> Result<f64> {
    let mut terms: BTreeMap<&str, f64> = BTreeMap::new();
    for feature in &rule.features {
        terms.insert(&feature.name, feature.value * weights.feature(&feature.name)?);
    }
    terms.insert(GLUE, weights.glue()?);
    terms.insert(
        WORD_PENALTY,
        word_penalty(rule.target.len(), weights.word_penalty()?),
    );
    Ok(terms.values().sum())
}

impl<'a> ScoredRule<'a> {
    pub fn new(rule: &'a Rule, weights: &WeightTable) -> Result<Self> {
        Ok(ScoredRule {
            rule,
            weight: score(rule, weights)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;

    const EPSILON: f64 = 1e-9;

    fn weights() -> WeightTable {
        [("Glue", 1.0), ("WordPenalty", 1.0), ("PassThrough", 10.0)]
            .into_iter()
            .collect()
    }

    #[test]
    fn it_scores_a_rule() {
        let rule = Rule::parse("X|||the cat|||le chat|||Glue=1.0 WordPenalty=0.5|||X").unwrap();
        let weight = score(&rule, &weights()).unwrap();
        // Both features are replaced by the glue and penalty terms
        let expected = 1.0 - 2.0 / LN_10;
        assert!((weight - expected).abs() < EPSILON, "{} != {}", weight, expected);
    }

    #[test]
    fn it_penalizes_long_targets_without_features() {
        let rule = Rule::parse("X|||a|||x y z||||||X").unwrap();
        let mut weights = weights();
        weights.insert("Glue", 0.5);
        weights.insert("WordPenalty", -2.0);
        let weight = score(&rule, &weights).unwrap();
        let expected = 3.0 * 2.0 / LN_10 + 0.5;
        assert!((weight - expected).abs() < EPSILON);
    }

    #[test]
    fn feature_order_does_not_matter() {
        let mut weights = weights();
        weights.insert("A", 0.25);
        weights.insert("B", -3.0);
        let ab = Rule::parse("X|||a|||b|||A=2 B=0.5|||X").unwrap();
        let ba = Rule::parse("X|||a|||b|||B=0.5 A=2|||X").unwrap();
        let ab = score(&ab, &weights).unwrap();
        let ba = score(&ba, &weights).unwrap();
        assert!((ab - ba).abs() < EPSILON);
    }

    #[test]
    fn repeated_features_keep_the_last_value() {
        let mut weights = weights();
        weights.insert("A", 1.0);
        let rule = Rule::parse("X|||a|||b|||A=1 A=2|||X").unwrap();
        let weight = score(&rule, &weights).unwrap();
        let expected = 2.0 + 1.0 - 1.0 / LN_10;
        assert!((weight - expected).abs() < EPSILON, "{} != {}", weight, expected);
    }

    #[test]
    fn it_fails_on_unknown_features() {
        let rule = Rule::parse("X|||a|||b|||CountEF=1|||X").unwrap();
        assert!(matches!(
            score(&rule, &weights()),
            Err(ConvertError::UnknownFeature { name }) if name == "CountEF"
        ));
    }

    #[test]
    fn it_fails_on_missing_glue() {
        let rule = Rule::parse("X|||a|||b||||||X").unwrap();
        let weights: WeightTable = [("WordPenalty", 1.0)].into_iter().collect();
        assert!(matches!(
            ScoredRule::new(&rule, &weights),
            Err(ConvertError::MissingWeightKey { name }) if name == "Glue"
        ));
    }
}
