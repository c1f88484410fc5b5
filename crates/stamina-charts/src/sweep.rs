use serde::Serialize;
use stamina_core::pool::CardPool;

/// The three heatmaps produced by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    MaxTurns,
    DamagePreferHand,
    DamageFromDiscard,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [
        ChartKind::MaxTurns,
        ChartKind::DamagePreferHand,
        ChartKind::DamageFromDiscard,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::MaxTurns => "Optimizing turns",
            ChartKind::DamagePreferHand => "Preventing damage",
            ChartKind::DamageFromDiscard => "Preventing damage from discard",
        }
    }

    pub fn value_label(self) -> &'static str {
        match self {
            ChartKind::MaxTurns => "max turns",
            ChartKind::DamagePreferHand | ChartKind::DamageFromDiscard => "turns lost",
        }
    }

    pub fn file_stem(self) -> &'static str {
        match self {
            ChartKind::MaxTurns => "turns",
            ChartKind::DamagePreferHand => "damage",
            ChartKind::DamageFromDiscard => "damage_from_discard",
        }
    }
}

/// One evaluated grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepCell {
    pub hand: u32,
    pub discard: u32,
    pub value: Option<u32>,
}

/// Metric values for every (hand, discard) pair up to the configured bound.
///
/// Cells whose combined pool exceeds the bound, and cells where the metric
/// has no defined value (too few cards to pay its cost), hold `None` and
/// render as masked.
pub struct SweepGrid {
    chart: ChartKind,
    max_cards: u32,
    values: Vec<Option<u32>>,
}

impl SweepGrid {
    /// Evaluate the chart metric over the full grid, hand-major.
    pub fn compute(chart: ChartKind, max_cards: u32) -> Self {
        let side = (max_cards + 1) as usize;
        let mut values = Vec::with_capacity(side * side);
        for hand in 0..=max_cards {
            for discard in 0..=max_cards {
                values.push(evaluate(chart, max_cards, hand, discard));
            }
        }
        Self {
            chart,
            max_cards,
            values,
        }
    }

    pub fn chart(&self) -> ChartKind {
        self.chart
    }

    pub fn max_cards(&self) -> u32 {
        self.max_cards
    }

    /// Cells per axis.
    pub fn side(&self) -> u32 {
        self.max_cards + 1
    }

    pub fn value(&self, hand: u32, discard: u32) -> Option<u32> {
        if hand > self.max_cards || discard > self.max_cards {
            return None;
        }
        let idx = (hand * self.side() + discard) as usize;
        self.values[idx]
    }

    /// Iterate all cells in the order they were computed.
    pub fn cells(&self) -> impl Iterator<Item = SweepCell> + '_ {
        let side = self.side();
        self.values.iter().enumerate().map(move |(idx, value)| {
            let idx = idx as u32;
            SweepCell {
                hand: idx / side,
                discard: idx % side,
                value: *value,
            }
        })
    }

    /// Largest unmasked value, if any cell survived masking.
    pub fn max_value(&self) -> Option<u32> {
        self.values.iter().flatten().copied().max()
    }

    pub fn masked_cells(&self) -> usize {
        self.values.iter().filter(|value| value.is_none()).count()
    }

    pub fn cell_count(&self) -> usize {
        self.values.len()
    }
}

fn evaluate(chart: ChartKind, max_cards: u32, hand: u32, discard: u32) -> Option<u32> {
    if hand + discard > max_cards {
        return None;
    }
    let pool = CardPool::new(hand, discard);
    match chart {
        ChartKind::MaxTurns => Some(pool.max_turns()),
        ChartKind::DamagePreferHand => pool.turns_lost().ok(),
        ChartKind::DamageFromDiscard => pool.turns_lost_from_discard().ok(),
    }
}
