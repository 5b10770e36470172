use serde::{Deserialize, Serialize};

use crate::domain::card::Rank;
use crate::domain::hand::HandCategory;

/// Упакованная сила руки, сравнимая как целое число.
///
/// Схема кодирования (u32):
///   [категория:4 бита][r0:4][r1:4][r2:4][r3:4][r4:4]
/// Rank: 2..14 (2..A) влазит в 4 бита.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct HandRank(pub u32);

impl HandRank {
    /// Собрать HandRank из категории и 5 рангов (от старшего к младшему).
    pub fn from_category_and_ranks(category: HandCategory, ranks: [Rank; 5]) -> Self {
        let cat_bits = (category.as_u8() as u32) & 0x0F;
        let r0 = ranks[0] as u32;
        let r1 = ranks[1] as u32;
        let r2 = ranks[2] as u32;
        let r3 = ranks[3] as u32;
        let r4 = ranks[4] as u32;

        let value = (cat_bits << 20) | (r0 << 16) | (r1 << 12) | (r2 << 8) | (r3 << 4) | r4;

        HandRank(value)
    }

    /// Вытащить категорию из HandRank.
    pub fn category(&self) -> HandCategory {
        let cat_id = ((self.0 >> 20) & 0x0F) as u8;
        HandCategory::from_u8(cat_id).unwrap_or(HandCategory::HighCard)
    }
}

/// Человеческое описание руки по категории.
pub fn describe_hand(rank: HandRank) -> String {
    match rank.category() {
        HandCategory::HighCard => "High card".to_string(),
        HandCategory::OnePair => "One pair".to_string(),
        HandCategory::TwoPair => "Two pair".to_string(),
        HandCategory::ThreeOfAKind => "Three of a kind".to_string(),
        HandCategory::Straight => "Straight".to_string(),
        HandCategory::Flush => "Flush".to_string(),
        HandCategory::FullHouse => "Full house".to_string(),
        HandCategory::FourOfAKind => "Four of a kind".to_string(),
        HandCategory::StraightFlush => "Straight flush".to_string(),
    }
}
