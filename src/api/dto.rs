use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::{GameResult, Phase};
use crate::domain::player::SeatStatus;
use crate::domain::{HandNumber, PlayerId, TableId};
use crate::engine::side_pots::SidePot;

/// DTO игрока за столом.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeatDto {
    pub player_id: PlayerId,
    pub display_name: String,
    pub seat_index: u8,
    pub stack: Chips,
    pub street_bet: Chips,
    pub total_contributed: Chips,
    pub status: SeatStatus,
    /// Счётчик применённых действий: клиент строит из него ключ
    /// идемпотентности следующего запроса.
    pub action_seq: u64,
    pub time_bank_secs: u64,
    pub last_reaction: u8,
    pub last_message: String,
}

/// Полный снимок стола для наблюдателей.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableSnapshotDto {
    pub table_id: TableId,
    pub name: String,
    pub creator: PlayerId,
    pub phase: Phase,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub min_seats: u8,
    pub max_seats: u8,
    pub pot: Chips,
    pub current_bet: Chips,
    pub dealer_seat: u8,
    pub current_turn: Option<u8>,
    pub hand_number: HandNumber,
    /// Борд; невскрытые слоты — None.
    pub board: [Option<Card>; 5],
    pub side_pots: Vec<SidePot>,
    /// Сколько действий применено на этой улице / сколько мест ещё должно
    /// сходить.
    pub players_acted: u8,
    pub players_to_act: u8,
    /// Раздача ждёт колбэк оракула: действия временно запрещены.
    pub awaiting_oracle: bool,
    pub last_action_ts: u64,
    pub seats: Vec<SeatDto>,
    /// Последний зафиксированный итог (если был).
    pub latest_result: Option<GameResult>,
}

/// Короткая строка лобби.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableSummaryDto {
    pub table_id: TableId,
    pub name: String,
    pub phase: Phase,
    pub seated: u8,
    pub max_seats: u8,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub hand_number: HandNumber,
}

/// Ответ API на команду.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CommandResponse {
    /// Успешно, без дополнительных данных.
    Accepted,

    /// Повторная доставка: состояние не менялось, это не ошибка.
    DuplicateIgnored,

    /// Создан новый стол.
    TableCreated { table_id: TableId },

    /// Обновлённый снимок стола после мутации.
    Snapshot(TableSnapshotDto),
}
