//! Bubble colors and the initial board layouts.
//!
//! Bubbles are plain values owned by grid cells. When 3+ of the same color are
//! connected, they pop!

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::hex::GridPos;

/// The different bubble colors. A board plays with the first `colors` of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BubbleColor {
    #[default]
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl BubbleColor {
    /// Get all possible bubble colors.
    pub const ALL: [BubbleColor; 6] = [
        BubbleColor::Red,
        BubbleColor::Blue,
        BubbleColor::Green,
        BubbleColor::Yellow,
        BubbleColor::Purple,
        BubbleColor::Orange,
    ];

    /// The first `count` colors, clamped to the available set.
    pub fn palette(count: usize) -> &'static [BubbleColor] {
        &Self::ALL[..count.min(Self::ALL.len())]
    }

    /// Draw a color uniformly from `palette`, which must not be empty.
    pub fn random_from(rng: &mut impl Rng, palette: &[BubbleColor]) -> Self {
        debug_assert!(!palette.is_empty(), "cannot draw from an empty palette");
        palette[rng.random_range(0..palette.len())]
    }
}

/// A bubble placed on the board before the first shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedBubble {
    pub col: i32,
    pub row: i32,
    pub color: BubbleColor,
}

impl SeedBubble {
    pub const fn new(col: i32, row: i32, color: BubbleColor) -> Self {
        Self { col, row, color }
    }

    pub fn pos(&self) -> GridPos {
        GridPos::new(self.col, self.row)
    }
}

/// How the board is filled at the start of a game.
///
/// Positions outside the board are produced as-is; the board skips them when seeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutStrategy {
    /// Fill the top `rows` rows, at most `max_columns` bubbles per row, with random colors.
    Random { rows: i32, max_columns: i32 },
    /// Fill the top `rows` rows, row `r` entirely with `colors[r % colors.len()]`.
    Stripes { rows: i32, colors: Vec<BubbleColor> },
    /// Exactly these bubbles.
    Explicit { bubbles: Vec<SeedBubble> },
}

impl Default for LayoutStrategy {
    fn default() -> Self {
        LayoutStrategy::Random {
            rows: 4,
            max_columns: 9,
        }
    }
}

impl LayoutStrategy {
    /// Produce the seed bubbles for a board `bubbles_per_row` wide and `rows_on_board` tall.
    pub fn generate(
        &self,
        bubbles_per_row: i32,
        rows_on_board: i32,
        palette: &[BubbleColor],
        rng: &mut impl Rng,
    ) -> Vec<SeedBubble> {
        match self {
            LayoutStrategy::Random { rows, max_columns } => {
                let columns = (*max_columns).min(bubbles_per_row);
                (0..(*rows).min(rows_on_board))
                    .flat_map(|row| (0..columns).map(move |col| (col, row)))
                    .map(|(col, row)| {
                        SeedBubble::new(col, row, BubbleColor::random_from(&mut *rng, palette))
                    })
                    .collect()
            }
            LayoutStrategy::Stripes { rows, colors } => {
                if colors.is_empty() {
                    return Vec::new();
                }
                (0..(*rows).min(rows_on_board))
                    .flat_map(|row| {
                        let color = colors[row as usize % colors.len()];
                        (0..bubbles_per_row).map(move |col| SeedBubble::new(col, row, color))
                    })
                    .collect()
            }
            LayoutStrategy::Explicit { bubbles } => bubbles.clone(),
        }
    }
}
