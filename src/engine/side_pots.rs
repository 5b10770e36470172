use serde::{Deserialize, Serialize};

use crate::domain::player::Seat;
use crate::domain::{chips::Chips, SeatIndex};

/// Слой банка: часть, на которую претендуют только некоторые игроки.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidePot {
    pub amount: Chips,
    /// Кто может выиграть этот слой. Сфолдившие сюда не попадают никогда,
    /// хотя их фишки в сумме слоя участвуют.
    pub eligible_seats: Vec<SeatIndex>,
}

/// Вклад одного места в банк.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PotEntry {
    pub seat: SeatIndex,
    pub contributed: Chips,
    /// Претендует ли место на банк (не сфолдило).
    pub contends: bool,
}

/// Снять PotEntry со всех мест стола (нулевые вклады отбрасываются).
pub fn pot_entries(seats: &[Option<Seat>]) -> Vec<PotEntry> {
    seats
        .iter()
        .filter_map(|s| s.as_ref())
        .filter(|s| !s.total_contributed.is_zero())
        .map(|s| PotEntry {
            seat: s.seat_index,
            contributed: s.total_contributed,
            contends: s.is_in_hand(),
        })
        .collect()
}

/// Посчитать слои банка из вкладов.
///
/// Алгоритм: отличные друг от друга ненулевые уровни вкладов по возрастанию;
/// слой уровня L получает `(L - предыдущий) × число внёсших не меньше L`
/// фишек, а претендуют на него только не сфолдившие с вкладом >= L.
/// Это воспроизводит корректные сайд-поты при многосторонних олл-инах.
pub fn compute_side_pots(entries: &[PotEntry]) -> Vec<SidePot> {
    let mut sorted: Vec<PotEntry> = entries
        .iter()
        .copied()
        .filter(|e| !e.contributed.is_zero())
        .collect();

    if sorted.is_empty() {
        return Vec::new();
    }

    sorted.sort_by_key(|e| e.contributed.0);

    let mut pots = Vec::new();
    let mut prev_level = Chips::ZERO;

    for &PotEntry { contributed, .. } in sorted.iter() {
        if contributed == prev_level {
            continue;
        }
        let level_diff = contributed - prev_level;

        // Все, кто внёс не меньше этого уровня, финансируют слой...
        let funders = sorted
            .iter()
            .filter(|e| e.contributed >= contributed)
            .count() as u64;

        // ...но претендуют только не сфолдившие.
        let mut eligible: Vec<SeatIndex> = sorted
            .iter()
            .filter(|e| e.contends && e.contributed >= contributed)
            .map(|e| e.seat)
            .collect();
        eligible.sort_unstable();

        pots.push(SidePot {
            amount: Chips(level_diff.0 * funders),
            eligible_seats: eligible,
        });

        prev_level = contributed;
    }

    pots
}
