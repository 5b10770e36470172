use serde::{Deserialize, Serialize};

use crate::domain::SeatIndex;

/// Состояние раунда ставок на текущей улице.
///
/// Целевая ставка улицы хранится на самом столе (`Table::current_bet`);
/// здесь — очередь ходящих и правила открытия/закрытия торговли.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BettingState {
    /// Seat последнего агрессора (blind/raise/all-in сверх ставки).
    pub last_aggressor: Option<SeatIndex>,
    /// Очередь ходящих (по кругу): кто ещё должен сделать действие.
    pub to_act: Vec<SeatIndex>,
    /// Сколько действий уже применено на этой улице.
    pub acted_this_street: u8,
    /// Торговля закрыта неполным олл-ином: уже уравнявшие могут
    /// только call/fold, рейз запрещён.
    pub raise_closed: bool,
}

impl BettingState {
    pub fn new(to_act: Vec<SeatIndex>) -> Self {
        Self {
            last_aggressor: None,
            to_act,
            acted_this_street: 0,
            raise_closed: false,
        }
    }

    /// Удалить seat из очереди to_act, если он там есть.
    pub fn mark_acted(&mut self, seat: SeatIndex) {
        self.to_act.retain(|s| *s != seat);
    }

    /// Полноценный рейз: очередь перезапускается (все снова должны ответить),
    /// торговля снова открыта.
    pub fn on_raise(&mut self, seat: SeatIndex, new_to_act: Vec<SeatIndex>) {
        self.last_aggressor = Some(seat);
        self.to_act = new_to_act;
        self.raise_closed = false;
    }

    /// Неполный олл-ин сверх ставки: остальные должны ответить на новую
    /// цифру, но торговля для уже уравнявших не переоткрывается.
    pub fn on_short_all_in(&mut self, seat: SeatIndex, new_to_act: Vec<SeatIndex>) {
        self.last_aggressor = Some(seat);
        self.to_act = new_to_act;
        self.raise_closed = true;
    }

    /// Раунд ставок завершён, когда очередь пуста.
    pub fn is_round_complete(&self) -> bool {
        self.to_act.is_empty()
    }
}
