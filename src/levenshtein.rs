// src/levenshtein.rs

/// Marks a cell of the working row that has not been filled yet. Larger than
/// any reachable path cost.
const UNFILLED: f32 = f32::MAX;

/// Per-token costs of the three edit operations.
///
/// Insertion consumes a hypothesis token, deletion consumes a reference token.
pub trait EditCosts<T> {
    fn insertion(&self, hyp_token: &T) -> f32;
    fn deletion(&self, ref_token: &T) -> f32;
    fn substitution(&self, hyp_token: &T, ref_token: &T) -> f32;
}

/// Unit insertion and deletion, free match, unit mismatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitCosts;

impl<T: PartialEq> EditCosts<T> for UnitCosts {
    #[inline]
    fn insertion(&self, _: &T) -> f32 { 1.0 }
    #[inline]
    fn deletion(&self, _: &T) -> f32 { 1.0 }
    #[inline]
    fn substitution(&self, hyp_token: &T, ref_token: &T) -> f32 {
        if hyp_token == ref_token { 0.0 } else { 1.0 }
    }
}

/// Minimum cost of turning `hypothesis` into `reference` under `costs`.
///
/// Rows are indexed by hypothesis prefix length; one row is produced per
/// reference token, so working space is two rows of `hypothesis.len() + 1`.
pub fn edit_cost_with<T, C>(hypothesis: &[T], reference: &[T], costs: &C) -> f32
where
    C: EditCosts<T> + ?Sized,
{
    let width = hypothesis.len() + 1;

    let mut previous_row: Vec<f32> = Vec::with_capacity(width);
    previous_row.push(0.0);
    for (i_idx, token) in hypothesis.iter().enumerate() {
        previous_row.push(previous_row[i_idx] + costs.insertion(token));
    }
    let mut current_row: Vec<f32> = vec![UNFILLED; width];

    for ref_token in reference {
        current_row[0] = previous_row[0] + costs.deletion(ref_token);
        for i_idx in 1..width {
            let hyp_token = &hypothesis[i_idx - 1];
            current_row[i_idx] = (current_row[i_idx - 1] + costs.insertion(hyp_token))
                .min(previous_row[i_idx - 1] + costs.substitution(hyp_token, ref_token))
                .min(previous_row[i_idx] + costs.deletion(ref_token));
        }
        std::mem::swap(&mut previous_row, &mut current_row);
        current_row.fill(UNFILLED);
    }
    previous_row[width - 1]
}

/// Raw unit-cost Levenshtein distance between two token sequences.
pub fn edit_cost<T: PartialEq>(hypothesis: &[T], reference: &[T]) -> f32 {
    edit_cost_with(hypothesis, reference, &UnitCosts)
}

/// Unit-cost edit distance divided by `normalizer`.
///
/// The normalizer is not checked: zero gives `inf`, or `NaN` when the two
/// sequences are identical.
pub fn distance(hypothesis: &[u64], reference: &[u64], normalizer: i32) -> f32 {
    edit_cost(hypothesis, reference) / normalizer as f32
}
