use std::collections::HashSet;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use super::card::{Card, Visibility};
use crate::error::GameError;

#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    columns: usize,
    cards: Vec<Card>,
}

impl Board {
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub(crate) fn set_visibility(&mut self, index: usize, visibility: Visibility) {
        if let Some(card) = self.cards.get_mut(index) {
            card.visibility = visibility;
        }
    }

    /// Indices of cards that are face up but not yet matched, in grid order.
    pub fn revealed_indices(&self) -> Vec<usize> {
        self.cards
            .iter()
            .filter(|c| c.visibility == Visibility::Revealed)
            .map(|c| c.index)
            .collect()
    }

    pub fn hidden_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_flippable()).count()
    }

    pub fn all_matched(&self) -> bool {
        self.cards.iter().all(|c| c.visibility == Visibility::Matched)
    }
}

/// Checks that a `columns x rows` grid can be filled with pairs from `pool`.
pub fn check_layout(columns: usize, rows: usize, pool: &[String]) -> Result<usize, GameError> {
    if columns == 0 || rows == 0 {
        return Err(GameError::EmptyBoard { columns, rows });
    }
    let Some(total) = columns.checked_mul(rows) else {
        return Err(GameError::TooLarge { columns, rows });
    };
    if total % 2 != 0 {
        return Err(GameError::OddCardCount { columns, rows });
    }
    let pairs = total / 2;
    if pairs > pool.len() {
        return Err(GameError::PoolTooSmall {
            pairs,
            pool_size: pool.len(),
        });
    }
    let mut seen = HashSet::with_capacity(pool.len());
    for symbol in pool {
        if !seen.insert(symbol.as_str()) {
            return Err(GameError::DuplicateSymbol(symbol.clone()));
        }
    }
    Ok(pairs)
}

/// Draws `columns * rows / 2` distinct symbols from `pool`, duplicates them
/// and shuffles the result into grid order (left-to-right, top-to-bottom).
pub fn generate<R: Rng + ?Sized>(
    columns: usize,
    rows: usize,
    pool: &[String],
    rng: &mut R,
) -> Result<Board, GameError> {
    let pairs = check_layout(columns, rows, pool)?;

    let picks: Vec<&String> = pool.choose_multiple(rng, pairs).collect();
    let mut symbols: Vec<&String> = picks.iter().chain(picks.iter()).copied().collect();
    symbols.shuffle(rng);

    let cards = symbols
        .into_iter()
        .enumerate()
        .map(|(index, symbol)| Card::hidden(index, symbol.as_str()))
        .collect();

    Ok(Board { columns, cards })
}

#[cfg(test)]
pub(crate) fn from_symbols(columns: usize, symbols: &[&str]) -> Board {
    Board {
        columns,
        cards: symbols
            .iter()
            .enumerate()
            .map(|(index, symbol)| Card::hidden(index, *symbol))
            .collect(),
    }
}
