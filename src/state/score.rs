/// Linear score decay: each revealed rung costs one point, floored at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRule {
    max_score: u32,
}

impl ScoreRule {
    /// Build a rule awarding `max_score` points at the hardest rung.
    pub fn new(max_score: u32) -> Self {
        Self { max_score }
    }

    /// Points awarded at the hardest rung.
    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    /// Score for a guess made while rung `index` is the clearest one visible.
    pub fn score_for(&self, index: usize) -> u32 {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.max_score.saturating_sub(index)
    }
}
