// src/character.rs
//! CharacTER: character-level translation edit rate.
//!
//! Hypothesis phrases are first shifted at word level, greedily, while that
//! lowers the word edit distance to the reference. The shifted hypothesis is
//! then compared to the reference character by character, and every kept
//! shift adds the average word length of the phrase it moved to the edit
//! count.

use tracing::debug;

use crate::cached::CachedEditDistance;
use crate::levenshtein::edit_cost;

/// A phrase that occurs at `hyp_start` in the hypothesis and at a different
/// position `ref_start` in the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhraseMatch {
    pub hyp_start: usize,
    pub ref_start: usize,
    pub len: usize,
}

/// Every position pair `(i, j)`, `i != j`, where the hypothesis and the
/// reference share a word, with the longest common run starting there.
pub fn phrase_matches<'a, T: PartialEq>(
    hypothesis: &'a [T],
    reference: &'a [T],
) -> impl Iterator<Item = PhraseMatch> + 'a {
    (0..hypothesis.len())
        .flat_map(move |i| (0..reference.len()).map(move |j| (i, j)))
        .filter(move |&(i, j)| i != j && hypothesis[i] == reference[j])
        .map(move |(i, j)| {
            let len = hypothesis[i..]
                .iter()
                .zip(&reference[j..])
                .take_while(|(h, r)| h == r)
                .count();
            PhraseMatch { hyp_start: i, ref_start: j, len }
        })
}

/// Moves `hypothesis[m.hyp_start..m.hyp_start + m.len]` so it starts at
/// `m.ref_start` among the remaining words, or at the end if that is past them.
pub fn apply_shift<T: Clone>(hypothesis: &[T], m: PhraseMatch) -> Vec<T> {
    let phrase_end = m.hyp_start + m.len;
    let mut shifted: Vec<T> = Vec::with_capacity(hypothesis.len());
    shifted.extend_from_slice(&hypothesis[..m.hyp_start]);
    shifted.extend_from_slice(&hypothesis[phrase_end..]);
    let at = m.ref_start.min(shifted.len());
    shifted.splice(at..at, hypothesis[m.hyp_start..phrase_end].iter().cloned());
    shifted
}

/// One candidate phrase shift: the phrase moved, the resulting words and how
/// much the word edit distance to the reference went down.
#[derive(Debug, Clone, PartialEq)]
pub struct Shift<'w> {
    pub gain: i64,
    pub phrase: PhraseMatch,
    pub words: Vec<&'w str>,
}

/// Tries every phrase shift and returns the one that lowers the word edit
/// distance the most. Ties go to the greater word list. `None` when the
/// hypothesis shares no word with the reference at a different position.
///
/// `cache` must have been built for `reference`.
pub fn best_shift<'w>(
    hypothesis: &[&'w str],
    reference: &[&'w str],
    cache: &mut CachedEditDistance<&'w str>,
) -> Option<Shift<'w>> {
    let before = cache.distance(hypothesis) as i64;

    let mut best: Option<Shift<'w>> = None;
    for phrase in phrase_matches(hypothesis, reference) {
        let words = apply_shift(hypothesis, phrase);
        let gain = before - cache.distance(&words) as i64;
        let replace = match &best {
            None => true,
            Some(b) => (gain, &words) >= (b.gain, &b.words),
        };
        if replace {
            best = Some(Shift { gain, phrase, words });
        }
    }
    best
}

/// Average character length of the words of `phrase` within `words`.
pub(crate) fn phrase_cost(words: &[&str], phrase: PhraseMatch) -> f64 {
    let chars: usize = words[phrase.hyp_start..phrase.hyp_start + phrase.len]
        .iter()
        .map(|w| w.chars().count())
        .sum();
    chars as f64 / phrase.len as f64
}

/// Hypothesis words after greedy phrase shifting, with the summed cost of the
/// shifts that were kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Shifted<'w> {
    pub words: Vec<&'w str>,
    pub cost: f64,
}

/// Applies [`best_shift`] for as long as it strictly lowers the word edit
/// distance. Every kept shift costs the average character length of the
/// phrase it moved; a round without gain leaves the words untouched.
pub fn shift_until_stable<'w>(hypothesis: &[&'w str], reference: &[&'w str]) -> Shifted<'w> {
    let mut cache = CachedEditDistance::new(reference);
    let mut words = hypothesis.to_vec();
    let mut cost = 0.0;
    let mut rounds = 0usize;
    while let Some(shift) = best_shift(&words, reference, &mut cache) {
        rounds += 1;
        if shift.gain <= 0 {
            break;
        }
        cost += phrase_cost(&words, shift.phrase);
        words = shift.words;
    }
    debug!(rounds, words = words.len(), cost, "phrase shifting finished");
    Shifted { words, cost }
}

/// CharacTER score of one sentence pair given as word lists.
///
/// Normalized by the character length of the shifted hypothesis, so an empty
/// hypothesis yields `inf` (or `NaN` against an empty reference).
pub fn character_edit_rate(hypothesis: &[&str], reference: &[&str]) -> f64 {
    let shifted = shift_until_stable(hypothesis, reference);

    let shifted_chars: Vec<char> = shifted.words.join(" ").chars().collect();
    let ref_chars: Vec<char> = reference.join(" ").chars().collect();
    let edits = edit_cost(&shifted_chars, &ref_chars) as f64 + shifted.cost;
    edits / shifted_chars.len() as f64
}

/// [`character_edit_rate`] on two whitespace-delimited sentences.
pub fn sentence_edit_rate(hypothesis: &str, reference: &str) -> f64 {
    let hyp_words: Vec<&str> = hypothesis.split_whitespace().collect();
    let ref_words: Vec<&str> = reference.split_whitespace().collect();
    character_edit_rate(&hyp_words, &ref_words)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn matches_skip_aligned_positions() {
        let hyp = ["a", "b", "c"];
        let found: Vec<PhraseMatch> = phrase_matches(&hyp, &hyp).collect();
        assert!(found.is_empty());
    }

    #[test]
    fn matches_extend_to_longest_run() {
        let hyp = ["x", "a", "b", "c"];
        let reference = ["a", "b", "c", "y"];
        let found: Vec<PhraseMatch> = phrase_matches(&hyp, &reference).collect();
        assert_eq!(
            found,
            vec![
                PhraseMatch { hyp_start: 1, ref_start: 0, len: 3 },
                PhraseMatch { hyp_start: 2, ref_start: 1, len: 2 },
                PhraseMatch { hyp_start: 3, ref_start: 2, len: 1 },
            ]
        );
    }

    #[test]
    fn shift_moves_phrase() {
        let hyp = ["c", "d", "a", "b"];
        let m = PhraseMatch { hyp_start: 2, ref_start: 0, len: 2 };
        assert_eq!(apply_shift(&hyp, m), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn shift_past_end_appends() {
        let hyp = ["a", "b", "c"];
        let m = PhraseMatch { hyp_start: 0, ref_start: 5, len: 1 };
        assert_eq!(apply_shift(&hyp, m), vec!["b", "c", "a"]);
    }

    #[test]
    fn best_shift_without_candidates() {
        let reference = ["x", "y"];
        let mut cache = CachedEditDistance::new(&reference);
        assert_eq!(best_shift(&["a", "b"], &reference, &mut cache), None);
    }

    #[test]
    fn best_shift_reports_moved_phrase() {
        let reference = ["a", "b", "c", "d"];
        let mut cache = CachedEditDistance::new(&reference);
        let shift = best_shift(&["c", "d", "a", "b"], &reference, &mut cache).unwrap();
        assert_eq!(shift.words, vec!["a", "b", "c", "d"]);
        assert_eq!(shift.gain, 4);
        assert_eq!(shift.phrase.len, 2);
    }

    #[test]
    fn swapped_words_are_shifted_back() {
        let shifted = shift_until_stable(&["b", "a"], &["a", "b"]);
        assert_eq!(shifted.words, vec!["a", "b"]);
        assert_eq!(shifted.cost, 1.0);
    }

    #[test]
    fn losing_shifts_are_not_kept() {
        // Every candidate here raises the distance.
        let shifted = shift_until_stable(&["a", "b", "a"], &["a", "b", "a"]);
        assert_eq!(shifted, Shifted { words: vec!["a", "b", "a"], cost: 0.0 });
        assert_eq!(sentence_edit_rate("a b a", "a b a"), 0.0);
    }

    #[test]
    fn repeated_words_do_not_add_to_shift_cost() {
        let with_repeat = shift_until_stable(&["a", "b", "a", "y", "x"], &["a", "b", "a", "x", "y"]);
        assert_eq!(with_repeat.words, vec!["a", "b", "a", "x", "y"]);
        assert_eq!(with_repeat.cost, 1.0);

        let without_repeat = shift_until_stable(&["c", "d", "a", "y", "x"], &["c", "d", "a", "x", "y"]);
        assert_eq!(without_repeat.cost, 1.0);
        assert!(close(sentence_edit_rate("a b a y x", "a b a x y"), 1.0 / 9.0));
    }

    #[test]
    fn phrase_cost_averages_word_length() {
        let words = ["ab", "abcd", "c"];
        assert_eq!(phrase_cost(&words, PhraseMatch { hyp_start: 0, ref_start: 1, len: 2 }), 3.0);
        assert_eq!(phrase_cost(&words, PhraseMatch { hyp_start: 2, ref_start: 0, len: 1 }), 1.0);
    }

    #[test]
    fn reordered_clause_pays_one_phrase_shift() {
        // "the cat sat" moves as one phrase: 3 characters on average, over 22.
        let shifted = shift_until_stable(
            &["on", "the", "mat", "the", "cat", "sat"],
            &["the", "cat", "sat", "on", "the", "mat"],
        );
        assert_eq!(shifted.words, vec!["the", "cat", "sat", "on", "the", "mat"]);
        assert_eq!(shifted.cost, 3.0);
        assert!(close(sentence_edit_rate("on the mat the cat sat", "the cat sat on the mat"), 3.0 / 22.0));
    }

    #[test]
    fn repeated_word_without_gain_is_left_in_place() {
        // Shifting the second "the" never helps, so only "dog" -> "cow" counts.
        assert!(close(sentence_edit_rate("the cat the dog", "the cat the cow"), 2.0 / 15.0));
    }

    #[test]
    fn extra_leading_word_is_not_shifted() {
        // Deleting "x " is cheaper than any reordering of the repeated "a".
        assert!(close(sentence_edit_rate("x a b a", "a b a"), 2.0 / 7.0));
    }

    #[test]
    fn identical_sentences_score_zero() {
        assert_eq!(sentence_edit_rate("the cat sat", "the cat sat"), 0.0);
    }

    #[test]
    fn swapped_words_pay_shift_cost_only() {
        // "a b" after one shift, plus the moved word "b" (1 char), over 3 chars.
        assert!(close(sentence_edit_rate("b a", "a b"), 1.0 / 3.0));
    }

    #[test]
    fn single_character_typo() {
        assert!(close(sentence_edit_rate("cat", "hat"), 1.0 / 3.0));
    }

    #[test]
    fn counts_unicode_scalars() {
        assert!(close(sentence_edit_rate("café", "cafe"), 0.25));
    }

    #[test]
    fn empty_hypothesis_is_not_finite() {
        assert!(sentence_edit_rate("", "a b").is_infinite());
        assert!(sentence_edit_rate("", "").is_nan());
    }
}
