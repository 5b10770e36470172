use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::player::Seat;
use crate::domain::SeatIndex;

use crate::engine::side_pots::{compute_side_pots, pot_entries, SidePot};

/// Разбивка банка на слои на момент границы
/// (фолд, олл-ин, конец улицы, шоудаун).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotBreakdown {
    pub total: Chips,
    pub layers: Vec<SidePot>,
}

impl PotBreakdown {
    /// Пересчитать слои из текущих вкладов мест.
    pub fn from_seats(seats: &[Option<Seat>]) -> Self {
        let layers = compute_side_pots(&pot_entries(seats));
        let total = layers.iter().map(|p| p.amount).sum();
        Self { total, layers }
    }

    /// Максимум, который это место может получить по всем слоям,
    /// где оно участвует.
    pub fn eligible_total_for(&self, seat: SeatIndex) -> Chips {
        self.layers
            .iter()
            .filter(|p| p.eligible_seats.contains(&seat))
            .map(|p| p.amount)
            .sum()
    }

    /// Участвует ли место хоть в одном слое.
    pub fn is_eligible_anywhere(&self, seat: SeatIndex) -> bool {
        self.layers.iter().any(|p| p.eligible_seats.contains(&seat))
    }
}
