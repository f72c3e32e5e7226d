use serde::Serialize;

/// Tax per marginal rate, ordered ascending by rate.
///
/// Keyed by the rate value itself: recording an amount for a rate that is
/// already present replaces the earlier amount instead of adding to it. Two
/// brackets sharing a rate therefore collapse into one entry holding the
/// later bracket's tax. Use [`TaxResult::contributions`] when every bracket
/// has to be accounted for.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Breakdown {
    entries: Vec<(f64, f64)>,
}

impl Breakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the amount for `rate`, overwriting any previous amount.
    pub fn insert(
        &mut self,
        rate: f64,
        amount: f64,
    ) {
        match self
            .entries
            .binary_search_by(|(existing, _)| existing.total_cmp(&rate))
        {
            Ok(pos) => self.entries[pos].1 = amount,
            Err(pos) => self.entries.insert(pos, (rate, amount)),
        }
    }

    pub fn get(
        &self,
        rate: f64,
    ) -> Option<f64> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == rate)
            .map(|&(_, amount)| amount)
    }

    /// `(rate, amount)` pairs, lowest rate first.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|&(_, amount)| amount).sum()
    }
}

/// Tax contributed by one bracket of the set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BracketContribution {
    /// Position of the bracket in the sorted [`BracketSet`](crate::BracketSet).
    pub bracket_index: usize,
    pub rate: f64,
    pub upper_bound: Option<f64>,
    /// Portion of income that fell inside this bracket.
    pub taxable_amount: f64,
    pub tax: f64,
}

/// Outcome of applying a bracket set to an income.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaxResult {
    pub total_tax: f64,
    pub breakdown: Breakdown,
    /// One record per contributing bracket, in bracket order.
    pub contributions: Vec<BracketContribution>,
}
