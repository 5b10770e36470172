use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Phase;
use crate::domain::player::Seat;
use crate::domain::{HandNumber, PlayerId, TableId};

/// Индекс места за столом (0..max_seats-1).
pub type SeatIndex = u8;

/// Жёсткий потолок мест (как в исходном контракте).
pub const MAX_SEATS: u8 = 6;

/// Лимит длины имени стола в байтах.
pub const MAX_NAME_BYTES: usize = 32;

/// Токен-гейт: чтобы сесть за стол, нужно предъявить баланс минта.
/// Саму проверку баланса делает кошелёк/транспорт — движок сравнивает
/// только предъявленную цифру с порогом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenGate {
    pub mint: String,
    pub min_balance: u64,
}

/// Конфиг стола: блайнды, границы мест, стартовый стек, таймер хода.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableConfig {
    /// Имя стола (не больше MAX_NAME_BYTES байт).
    pub name: String,
    pub small_blind: Chips,
    /// По соглашению big = 2×small, но движок этого не требует.
    pub big_blind: Chips,
    pub min_seats: u8,
    pub max_seats: u8,
    /// Стек, который получает игрок при посадке.
    pub starting_stack: Chips,
    /// Базовое время на ход (сек) до начала списания таймбанка.
    pub turn_seconds: u64,
    /// Стартовый таймбанк каждого игрока (сек).
    pub time_bank_secs: u64,
    pub token_gate: Option<TokenGate>,
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.len() > MAX_NAME_BYTES {
            return Err(format!(
                "name: {} байт, лимит {}",
                self.name.len(),
                MAX_NAME_BYTES
            ));
        }
        if self.small_blind.is_zero() || self.big_blind.is_zero() {
            return Err("блайнды должны быть > 0".into());
        }
        if self.min_seats < 2 || self.min_seats > self.max_seats {
            return Err(format!(
                "границы мест: min={}, max={}",
                self.min_seats, self.max_seats
            ));
        }
        if self.max_seats > MAX_SEATS {
            return Err(format!("max_seats {} > {}", self.max_seats, MAX_SEATS));
        }
        if self.starting_stack.is_zero() {
            return Err("starting_stack должен быть > 0".into());
        }
        Ok(())
    }
}

/// Основное состояние стола.
///
/// Инварианты: `pot == сумме слоёв side_pots` после их фиксации;
/// `dealer_seat < max_seats`; `current_turn == None`, когда действовать некому.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub id: TableId,
    pub creator: PlayerId,
    pub config: TableConfig,

    pub phase: Phase,

    /// Места за столом: индекс вектора = SeatIndex, None — пусто.
    pub seats: Vec<Option<Seat>>,

    /// Общие карты. None — слот ещё не вскрыт оракулом.
    pub board: [Option<Card>; 5],

    pub dealer_seat: SeatIndex,

    /// Чей сейчас ход; None — никто действовать не может.
    pub current_turn: Option<SeatIndex>,

    /// Номер текущей раздачи; растёт на каждом перезапуске.
    pub hand_number: HandNumber,

    /// Текущий общий банк.
    pub pot: Chips,

    /// Ставка, до которой нужно дотянуться на этой улице.
    pub current_bet: Chips,

    /// Момент последнего применённого действия (unix-секунды).
    pub last_action_ts: u64,
}

impl Table {
    /// Создать пустой стол в фазе Waiting.
    pub fn new(id: TableId, creator: PlayerId, config: TableConfig, created_at: u64) -> Self {
        let seats = vec![None; config.max_seats as usize];
        Self {
            id,
            creator,
            config,
            phase: Phase::Waiting,
            seats,
            board: [None; 5],
            dealer_seat: 0,
            current_turn: None,
            hand_number: 0,
            pot: Chips::ZERO,
            current_bet: Chips::ZERO,
            last_action_ts: created_at,
        }
    }

    pub fn max_seats(&self) -> u8 {
        self.config.max_seats
    }

    pub fn seated_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    /// Сколько мест готово играть новую раздачу (стек > 0).
    pub fn playable_count(&self) -> usize {
        self.seats
            .iter()
            .filter_map(|s| s.as_ref())
            .filter(|s| !s.stack.is_zero())
            .count()
    }

    pub fn is_seat_empty(&self, index: SeatIndex) -> bool {
        self.seats
            .get(index as usize)
            .map(|s| s.is_none())
            .unwrap_or(true)
    }

    pub fn seat(&self, index: SeatIndex) -> Option<&Seat> {
        self.seats.get(index as usize).and_then(|s| s.as_ref())
    }

    pub fn seat_mut(&mut self, index: SeatIndex) -> Option<&mut Seat> {
        self.seats.get_mut(index as usize).and_then(|s| s.as_mut())
    }

    /// Найти место игрока по его идентификатору.
    pub fn seat_of_player(&self, player_id: PlayerId) -> Option<SeatIndex> {
        self.seats.iter().enumerate().find_map(|(idx, s)| {
            s.as_ref()
                .filter(|seat| seat.player_id == player_id)
                .map(|_| idx as SeatIndex)
        })
    }

    /// Сколько претендентов на банк осталось (не сфолдили).
    pub fn contender_count(&self) -> usize {
        self.seats
            .iter()
            .filter_map(|s| s.as_ref())
            .filter(|s| s.is_in_hand())
            .count()
    }

    /// Суммарные фишки стола: стеки + банк. Константа в пределах раздачи.
    pub fn total_chips(&self) -> Chips {
        let stacks: Chips = self
            .seats
            .iter()
            .filter_map(|s| s.as_ref())
            .map(|s| s.stack)
            .sum();
        stacks + self.pot
    }
}
