use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::table::SeatIndex;
use crate::domain::PlayerId;

/// Максимальная длина чат-сообщения, которое храним за местом.
pub const MAX_CHAT_BYTES: usize = 64;

/// Статус игрока в контексте текущей раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SeatStatus {
    /// Игрок активен и может действовать.
    Active,
    /// Игрок сфолдил; его вклад остаётся в банке, стек заморожен.
    Folded,
    /// Игрок в олл-ине: участвует в банке, но больше не ходит.
    AllIn,
    /// Сидит за столом, но в раздаче не участвует (пустой стек).
    SittingOut,
}

/// Состояние одного места за столом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    pub player_id: PlayerId,
    pub seat_index: SeatIndex,
    /// Текущий стек.
    pub stack: Chips,
    /// Ставка на текущей улице.
    pub street_bet: Chips,
    /// Сколько всего внесено в банк за раздачу (для сайд-потов).
    pub total_contributed: Chips,
    pub status: SeatStatus,
    /// Монотонный счётчик применённых действий — основа ключей
    /// идемпотентности (hand_number, player_id, seq).
    pub action_seq: u64,
    /// Остаток персонального таймбанка в секундах.
    pub time_bank_secs: u64,
    /// Последняя эмодзи-реакция (0 = нет).
    pub last_reaction: u8,
    pub last_reaction_ts: u64,
    /// Последнее чат-сообщение (обрезается до MAX_CHAT_BYTES).
    pub last_message: String,
    pub last_message_ts: u64,
}

impl Seat {
    pub fn new(player_id: PlayerId, seat_index: SeatIndex, stack: Chips, time_bank_secs: u64) -> Self {
        Self {
            player_id,
            seat_index,
            stack,
            street_bet: Chips::ZERO,
            total_contributed: Chips::ZERO,
            status: SeatStatus::Active,
            action_seq: 0,
            time_bank_secs,
            last_reaction: 0,
            last_reaction_ts: 0,
            last_message: String::new(),
            last_message_ts: 0,
        }
    }

    /// Участвует ли место в банке текущей раздачи.
    pub fn is_in_hand(&self) -> bool {
        matches!(self.status, SeatStatus::Active | SeatStatus::AllIn)
    }

    /// Может ли место сейчас совершать действия.
    pub fn can_act(&self) -> bool {
        matches!(self.status, SeatStatus::Active)
    }

    /// Перенести из стека не более `amount` в ставку улицы и общий вклад.
    /// Возвращает фактически внесённое. Если списан весь стек —
    /// место переходит в AllIn.
    pub fn commit_up_to(&mut self, amount: Chips) -> Chips {
        let paid = if self.stack < amount { self.stack } else { amount };
        self.stack -= paid;
        self.street_bet += paid;
        self.total_contributed += paid;
        if self.stack.is_zero() && self.is_in_hand() {
            self.status = SeatStatus::AllIn;
        }
        paid
    }

    /// Сброс ставки улицы на границе улиц; общий вклад не трогаем.
    pub fn reset_street_bet(&mut self) {
        self.street_bet = Chips::ZERO;
    }

    /// Подготовка места к новой раздаче. Стек переносится как есть,
    /// пустой стек выводит игрока из раздачи.
    pub fn reset_for_new_hand(&mut self) {
        self.street_bet = Chips::ZERO;
        self.total_contributed = Chips::ZERO;
        self.status = if self.stack.is_zero() {
            SeatStatus::SittingOut
        } else {
            SeatStatus::Active
        };
    }
}
