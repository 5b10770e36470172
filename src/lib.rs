//! Движок стола безлимитного холдема с внешним оракулом раздачи.
//!
//! Здесь описываем ABI (Operation / Message / Query / Response) и
//! связываем contract/service с нашим HoldemState. Сам движок —
//! обычный Rust без рантайма: карты вскрывает и шоудаун считает
//! внешний оракул, движок проверяет форму ответов и сохранение фишек.

pub mod api;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;
pub mod state;

use linera_sdk::linera_base_types::{ContractAbi, ServiceAbi};
use serde::{Deserialize, Serialize};

use crate::api::{Command, Query, QueryResponse};
use crate::state::HoldemState;

/// Операции (внешние команды), которые модуль принимает.
///
/// Для простоты: одна операция = одна команда из api::Command.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum HoldemOperation {
    Command(Command),
}

/// Сообщения между приложениями.
/// Пока не нужны – оставим пустой enum.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum HoldemMessage {}

/// Запросы к сервису (read-only).
pub type HoldemQuery = Query;

/// Ответы на запросы.
pub type HoldemResponse = QueryResponse;

/// ABI для контракта и сервиса.
#[derive(Clone, Debug)]
pub struct HoldemAbi;

impl ContractAbi for HoldemAbi {
    type Operation = HoldemOperation;
    type Response = ();
}

impl ServiceAbi for HoldemAbi {
    type Query = HoldemQuery;
    type QueryResponse = HoldemResponse;
}

/// Экспортируем тип состояния для contract.rs и service.rs.
pub type Storage = HoldemState;
