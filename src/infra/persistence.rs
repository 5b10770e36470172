use std::collections::HashMap;

use crate::domain::hand::GameResult;
use crate::domain::table::Table;
use crate::domain::TableId;
use crate::engine::game_loop::HandEngine;

/// Абстракция хранилища стола.
///
/// В репликационном режиме вместо этого используются Views из `state.rs`,
/// но эта абстракция удобна:
/// - для юнит- и интеграционных тестов движка,
/// - для оффчейн-сервисов (lobby-сервер, наблюдатели).
pub trait HoldemStorage {
    /// Загрузить стол.
    fn load_table(&self, id: TableId) -> Option<Table>;

    /// Сохранить стол.
    fn save_table(&mut self, table: &Table);

    /// Загрузить активную раздачу для стола (если она есть).
    fn load_active_hand(&self, table_id: TableId) -> Option<HandEngine>;

    /// Сохранить / очистить активную раздачу.
    fn save_active_hand(&mut self, table_id: TableId, hand: Option<&HandEngine>);

    /// Вся история результатов стола (append-only, по номеру раздачи).
    fn load_results(&self, table_id: TableId) -> Vec<GameResult>;

    /// Дописать зафиксированный итог.
    fn append_result(&mut self, table_id: TableId, result: &GameResult);
}

/// Простая in-memory реализация для тестов и локального запуска.
#[derive(Debug, Default)]
pub struct InMemoryHoldemStorage {
    tables: HashMap<TableId, Table>,
    active_hands: HashMap<TableId, HandEngine>,
    results: HashMap<TableId, Vec<GameResult>>,
}

impl InMemoryHoldemStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HoldemStorage for InMemoryHoldemStorage {
    fn load_table(&self, id: TableId) -> Option<Table> {
        self.tables.get(&id).cloned()
    }

    fn save_table(&mut self, table: &Table) {
        self.tables.insert(table.id, table.clone());
    }

    fn load_active_hand(&self, table_id: TableId) -> Option<HandEngine> {
        self.active_hands.get(&table_id).cloned()
    }

    fn save_active_hand(&mut self, table_id: TableId, hand: Option<&HandEngine>) {
        if let Some(engine) = hand {
            self.active_hands.insert(table_id, engine.clone());
        } else {
            self.active_hands.remove(&table_id);
        }
    }

    fn load_results(&self, table_id: TableId) -> Vec<GameResult> {
        self.results.get(&table_id).cloned().unwrap_or_default()
    }

    fn append_result(&mut self, table_id: TableId, result: &GameResult) {
        self.results
            .entry(table_id)
            .or_default()
            .push(result.clone());
    }
}
