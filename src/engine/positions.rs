use crate::domain::player::SeatStatus;
use crate::domain::{SeatIndex, Table};

/// Собрать занятые места по кругу, начиная с seat (включительно).
pub fn collect_occupied_seats_from(table: &Table, start: SeatIndex) -> Vec<SeatIndex> {
    let max = table.max_seats() as usize;
    let mut seats = Vec::new();

    if max == 0 {
        return seats;
    }

    let mut idx = start as usize;
    for _ in 0..max {
        if idx < table.seats.len() && table.seats[idx].is_some() {
            seats.push(idx as SeatIndex);
        }
        idx = (idx + 1) % max;
    }

    seats
}

/// Собрать места, способные действовать (Active), по кругу с `start` включительно.
/// Порядок мест фиксируется при посадке; фолды и олл-ины пропускаются.
pub fn collect_actionable_from(table: &Table, start: SeatIndex) -> Vec<SeatIndex> {
    collect_occupied_seats_from(table, start)
        .into_iter()
        .filter(|&seat| {
            table
                .seat(seat)
                .map(|s| matches!(s.status, SeatStatus::Active))
                .unwrap_or(false)
        })
        .collect()
}

/// Следующее активное место строго по часовой после `from`;
/// None, если действовать больше некому.
pub fn next_actor(table: &Table, from: SeatIndex) -> Option<SeatIndex> {
    let max = table.max_seats();
    if max == 0 {
        return None;
    }
    let start = (from + 1) % max;
    collect_actionable_from(table, start)
        .into_iter()
        .find(|&s| s != from)
}

/// Следующая позиция дилера:
/// - первая раздача — первое играющее место от нуля;
/// - дальше — следующее играющее по кругу от текущей кнопки.
///
/// Вызывается после сброса статусов мест к новой раздаче.
pub fn next_dealer(table: &Table) -> Option<SeatIndex> {
    if table.hand_number == 0 {
        collect_actionable_from(table, 0).first().copied()
    } else {
        let start = (table.dealer_seat + 1) % table.max_seats();
        collect_actionable_from(table, start).first().copied()
    }
}
