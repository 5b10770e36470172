use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::card::Card;
use crate::domain::hand::{GameResult, Phase};
use crate::domain::player::{Seat, MAX_CHAT_BYTES};
use crate::domain::table::{Table, TableConfig};
use crate::domain::{HandNumber, PlayerId, SeatIndex, TableId};
use crate::engine::actions::SubmittedAction;
use crate::engine::errors::EngineError;
use crate::engine::game_loop::{self, ActionOutcome, AdvanceOutcome, HandEngine};
use crate::engine::oracle::{
    apply_community_cards, apply_settlement, DealOracle, RevealOutcome, SettlementOutcome,
    ShowdownSubmission,
};

/// Ошибки уровня реестра столов (над движком одной раздачи).
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Стол {0} не найден")]
    TableNotFound(TableId),

    #[error("Стол {0} уже существует")]
    TableAlreadyExists(TableId),

    #[error("На столе {0} нет активной раздачи")]
    NoActiveHand(TableId),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Агрегат одного стола: доменное состояние, активная раздача и
/// append-only история результатов.
///
/// Это единица взаимного исключения: любая мутация идёт через &mut
/// на весь агрегат, разные столы полностью независимы.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableAggregate {
    pub table: Table,
    pub hand: Option<HandEngine>,
    pub results: Vec<GameResult>,
}

impl TableAggregate {
    fn new(table: Table) -> Self {
        Self {
            table,
            hand: None,
            results: Vec::new(),
        }
    }

    /// Последний зафиксированный итог (если был).
    pub fn latest_result(&self) -> Option<&GameResult> {
        self.results.last()
    }
}

/// Реестр столов — точка входа для внешних вызовов.
///
/// Держит все агрегаты по TableId и отображаемые имена игроков.
pub struct TableRegistry {
    tables: HashMap<TableId, TableAggregate>,
    names: HashMap<PlayerId, String>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            names: HashMap::new(),
        }
    }

    /// Создать стол. Идентификатор выбирает вызывающий (infra::IdGenerator).
    pub fn create_table(
        &mut self,
        table_id: TableId,
        creator: PlayerId,
        config: TableConfig,
        now: u64,
    ) -> Result<(), RegistryError> {
        if self.tables.contains_key(&table_id) {
            return Err(RegistryError::TableAlreadyExists(table_id));
        }
        config
            .validate()
            .map_err(EngineError::InvalidConfig)?;

        let table = Table::new(table_id, creator, config, now);
        self.tables.insert(table_id, TableAggregate::new(table));
        Ok(())
    }

    /// Посадить игрока. Только в фазе Waiting; место должно быть свободно;
    /// токен-гейт, если он задан, требует предъявленного баланса.
    pub fn join_table(
        &mut self,
        table_id: TableId,
        player_id: PlayerId,
        seat_index: SeatIndex,
        display_name: String,
        token_balance: Option<u64>,
        now: u64,
    ) -> Result<(), RegistryError> {
        let agg = self
            .tables
            .get_mut(&table_id)
            .ok_or(RegistryError::TableNotFound(table_id))?;
        let table = &mut agg.table;

        if table.phase != Phase::Waiting {
            return Err(EngineError::WrongPhase.into());
        }
        if seat_index >= table.max_seats() {
            return Err(EngineError::InvalidSeat(seat_index).into());
        }
        if table.seated_count() >= table.max_seats() as usize {
            return Err(EngineError::TableFull.into());
        }
        if !table.is_seat_empty(seat_index) {
            return Err(EngineError::SeatTaken(seat_index).into());
        }
        if table.seat_of_player(player_id).is_some() {
            return Err(EngineError::AlreadySeated(player_id).into());
        }
        if let Some(gate) = &table.config.token_gate {
            let balance = token_balance.ok_or(EngineError::TokenGateRequired)?;
            if balance < gate.min_balance {
                return Err(EngineError::InsufficientTokens.into());
            }
        }

        let seat = Seat::new(
            player_id,
            seat_index,
            table.config.starting_stack,
            table.config.time_bank_secs,
        );
        table.seats[seat_index as usize] = Some(seat);
        table.last_action_ts = now;

        self.names.insert(player_id, display_name);
        Ok(())
    }

    /// Запустить раздачу (из Waiting) или перезапустить стол на новую
    /// раздачу (из Complete). Доступно только создателю.
    pub fn start_game<O: DealOracle>(
        &mut self,
        table_id: TableId,
        caller: PlayerId,
        now: u64,
        oracle: &mut O,
    ) -> Result<(), RegistryError> {
        let agg = self
            .tables
            .get_mut(&table_id)
            .ok_or(RegistryError::TableNotFound(table_id))?;
        if agg.table.creator != caller {
            return Err(EngineError::NotCreator(caller).into());
        }

        let engine = game_loop::start_hand(&mut agg.table, now)?;
        agg.hand = Some(engine);

        // Если после блайндов действовать некому (оба блайнда в олл-ине),
        // улица завершена сразу — запрашиваем флоп.
        if let Some(engine) = agg.hand.as_mut() {
            if game_loop::is_street_complete(&agg.table, engine) {
                agg.table.current_turn = None;
                game_loop::advance_street(&mut agg.table, engine, oracle);
            }
        }
        Ok(())
    }

    /// Действие игрока в раздаче.
    pub fn submit_action<O: DealOracle>(
        &mut self,
        table_id: TableId,
        action: SubmittedAction,
        now: u64,
        oracle: &mut O,
    ) -> Result<ActionOutcome, RegistryError> {
        let agg = self
            .tables
            .get_mut(&table_id)
            .ok_or(RegistryError::TableNotFound(table_id))?;
        let engine = agg
            .hand
            .as_mut()
            .ok_or(RegistryError::NoActiveHand(table_id))?;
        Ok(game_loop::apply_action(
            &mut agg.table,
            engine,
            action,
            now,
            oracle,
        )?)
    }

    /// Ручной запрос перехода улицы (роль «advancer» = создатель стола).
    pub fn request_street_advance<O: DealOracle>(
        &mut self,
        table_id: TableId,
        caller: PlayerId,
        oracle: &mut O,
    ) -> Result<AdvanceOutcome, RegistryError> {
        let agg = self
            .tables
            .get_mut(&table_id)
            .ok_or(RegistryError::TableNotFound(table_id))?;
        if agg.table.creator != caller {
            return Err(EngineError::NotCreator(caller).into());
        }
        let engine = agg
            .hand
            .as_mut()
            .ok_or(RegistryError::NoActiveHand(table_id))?;
        Ok(game_loop::request_street_advance(
            &mut agg.table,
            engine,
            oracle,
        )?)
    }

    /// Колбэк оракула: вскрытые карты борда.
    pub fn submit_revealed_cards<O: DealOracle>(
        &mut self,
        table_id: TableId,
        hand_number: HandNumber,
        slots: &[u8],
        values: &[u8],
        oracle: &mut O,
    ) -> Result<RevealOutcome, RegistryError> {
        let cards: Vec<Card> = values
            .iter()
            .map(|&v| Card::from_index(v).ok_or(EngineError::InvalidCardValue(v)))
            .collect::<Result<_, _>>()?;

        let agg = self
            .tables
            .get_mut(&table_id)
            .ok_or(RegistryError::TableNotFound(table_id))?;
        let engine = agg
            .hand
            .as_mut()
            .ok_or(RegistryError::NoActiveHand(table_id))?;
        Ok(apply_community_cards(
            &mut agg.table,
            engine,
            hand_number,
            slots,
            &cards,
            oracle,
        )?)
    }

    /// Колбэк оракула: итог шоудауна.
    pub fn submit_showdown(
        &mut self,
        table_id: TableId,
        submission: ShowdownSubmission,
        now: u64,
    ) -> Result<SettlementOutcome, RegistryError> {
        let agg = self
            .tables
            .get_mut(&table_id)
            .ok_or(RegistryError::TableNotFound(table_id))?;
        let engine = agg
            .hand
            .as_mut()
            .ok_or(RegistryError::NoActiveHand(table_id))?;
        Ok(apply_settlement(
            &mut agg.table,
            engine,
            &mut agg.results,
            submission,
            now,
        )?)
    }

    /// Сфолдить текущего актёра по истёкшему таймеру. Доступно любому:
    /// проверка срока — внутри движка.
    pub fn force_fold<O: DealOracle>(
        &mut self,
        table_id: TableId,
        now: u64,
        oracle: &mut O,
    ) -> Result<ActionOutcome, RegistryError> {
        let agg = self
            .tables
            .get_mut(&table_id)
            .ok_or(RegistryError::TableNotFound(table_id))?;
        let engine = agg
            .hand
            .as_mut()
            .ok_or(RegistryError::NoActiveHand(table_id))?;
        Ok(game_loop::force_fold(&mut agg.table, engine, now, oracle)?)
    }

    /// Аварийный возврат вкладов зависшей раздачи (только создатель).
    pub fn force_refund(
        &mut self,
        table_id: TableId,
        caller: PlayerId,
        now: u64,
    ) -> Result<(), RegistryError> {
        let agg = self
            .tables
            .get_mut(&table_id)
            .ok_or(RegistryError::TableNotFound(table_id))?;
        if agg.table.creator != caller {
            return Err(EngineError::NotCreator(caller).into());
        }
        let engine = agg
            .hand
            .as_mut()
            .ok_or(RegistryError::NoActiveHand(table_id))?;
        Ok(game_loop::force_refund(&mut agg.table, engine, now)?)
    }

    /// Эмодзи-реакция игрока (чистое состояние места, раздачу не трогает).
    pub fn submit_reaction(
        &mut self,
        table_id: TableId,
        player_id: PlayerId,
        reaction: u8,
        now: u64,
    ) -> Result<(), RegistryError> {
        let agg = self
            .tables
            .get_mut(&table_id)
            .ok_or(RegistryError::TableNotFound(table_id))?;
        let seat_idx = agg
            .table
            .seat_of_player(player_id)
            .ok_or(EngineError::PlayerNotAtTable(player_id))?;
        if let Some(seat) = agg.table.seat_mut(seat_idx) {
            seat.last_reaction = reaction;
            seat.last_reaction_ts = now;
        }
        Ok(())
    }

    /// Чат-сообщение игрока; обрезается до MAX_CHAT_BYTES по границе символа.
    pub fn send_chat_message(
        &mut self,
        table_id: TableId,
        player_id: PlayerId,
        text: String,
        now: u64,
    ) -> Result<(), RegistryError> {
        let agg = self
            .tables
            .get_mut(&table_id)
            .ok_or(RegistryError::TableNotFound(table_id))?;
        let seat_idx = agg
            .table
            .seat_of_player(player_id)
            .ok_or(EngineError::PlayerNotAtTable(player_id))?;
        if let Some(seat) = agg.table.seat_mut(seat_idx) {
            seat.last_message = truncate_chat(&text);
            seat.last_message_ts = now;
        }
        Ok(())
    }

    pub fn has_table(&self, table_id: TableId) -> bool {
        self.tables.contains_key(&table_id)
    }

    pub fn table(&self, table_id: TableId) -> Option<&Table> {
        self.tables.get(&table_id).map(|agg| &agg.table)
    }

    pub fn hand_engine(&self, table_id: TableId) -> Option<&HandEngine> {
        self.tables.get(&table_id).and_then(|agg| agg.hand.as_ref())
    }

    pub fn results(&self, table_id: TableId) -> Option<&[GameResult]> {
        self.tables.get(&table_id).map(|agg| agg.results.as_slice())
    }

    pub fn aggregate(&self, table_id: TableId) -> Option<&TableAggregate> {
        self.tables.get(&table_id)
    }

    /// Все идентификаторы столов (отсортированы для детерминизма).
    pub fn table_ids(&self) -> Vec<TableId> {
        let mut ids: Vec<TableId> = self.tables.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Отображаемое имя игрока (если регистрировалось при посадке).
    pub fn display_name(&self, player_id: PlayerId) -> Option<&str> {
        self.names.get(&player_id).map(|s| s.as_str())
    }
}

impl Default for TableRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate_chat(text: &str) -> String {
    if text.len() <= MAX_CHAT_BYTES {
        return text.to_string();
    }
    let mut end = MAX_CHAT_BYTES;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}
