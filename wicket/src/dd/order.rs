/// Slack signs of the current generators on one candidate constraint.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct SlackCounts {
    pub positive: usize,
    pub negative: usize,
    pub zero: usize,
}

/// Strategy deciding which remaining constraint is processed next.
pub trait SelectionRule {
    /// Whether [`SelectionRule::prefers`] looks at the counts at all.
    fn needs_counts(&self) -> bool {
        true
    }

    /// `true` when `candidate` strictly beats `incumbent`; ties keep the incumbent.
    fn prefers(&self, candidate: &SlackCounts, incumbent: &SlackCounts) -> bool;

    /// First best candidate in iteration order.
    fn select(&self, candidates: impl IntoIterator<Item = (usize, SlackCounts)>) -> Option<usize> {
        let mut best: Option<(usize, SlackCounts)> = None;
        for (index, counts) in candidates {
            match &best {
                Some((_, incumbent)) if !self.prefers(&counts, incumbent) => {}
                _ => best = Some((index, counts)),
            }
        }
        best.map(|(index, _)| index)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ConstraintOrder {
    /// Lowest remaining index.
    MinIndex,
    /// Most generators already tight on the constraint.
    #[default]
    MaxIntersection,
    /// Most generators cut off by the constraint.
    MaxCutoff,
    /// Fewest generators cut off by the constraint.
    MinCutoff,
}

impl SelectionRule for ConstraintOrder {
    #[inline]
    fn needs_counts(&self) -> bool {
        !matches!(self, ConstraintOrder::MinIndex)
    }

    #[inline]
    fn prefers(&self, candidate: &SlackCounts, incumbent: &SlackCounts) -> bool {
        match self {
            ConstraintOrder::MinIndex => false,
            ConstraintOrder::MaxIntersection => candidate.zero > incumbent.zero,
            ConstraintOrder::MaxCutoff => candidate.negative > incumbent.negative,
            ConstraintOrder::MinCutoff => candidate.negative < incumbent.negative,
        }
    }
}

impl ConstraintOrder {
    pub const ALL: [ConstraintOrder; 4] = [
        ConstraintOrder::MinIndex,
        ConstraintOrder::MaxIntersection,
        ConstraintOrder::MaxCutoff,
        ConstraintOrder::MinCutoff,
    ];
}
