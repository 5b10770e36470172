use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, DECK_SIZE};

/// Колода карт — упорядоченный список индексов 0..51.
///
/// Движок колодой НЕ владеет: раздачу делает внешний оракул.
/// Здесь колода нужна локальному оракулу (infra) и тестам.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    /// Стандартная 52-карточная колода в каноническом порядке индексов.
    pub fn standard_52() -> Self {
        let cards = (0..DECK_SIZE).map(Card).collect();
        Deck { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Взять одну карту сверху колоды.
    pub fn draw_one(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Взять n карт сверху.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        let mut taken = Vec::with_capacity(n);
        for _ in 0..n {
            if let Some(card) = self.cards.pop() {
                taken.push(card);
            } else {
                break;
            }
        }
        taken
    }
}
