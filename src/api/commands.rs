use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::{HandNumber, PlayerId, TableId};
use crate::engine::actions::SubmittedAction;
use crate::engine::oracle::{DealOracle, ShowdownSubmission};
use crate::engine::registry::TableRegistry;
use crate::engine::{ActionOutcome, AdvanceOutcome, RevealOutcome, SettlementOutcome};

use super::dto::CommandResponse;
use super::errors::ApiError;
use super::queries::build_table_snapshot;

/// Команда верхнего уровня.
///
/// Эти команды превращаются в операции (`HoldemOperation`),
/// которые контрактный слой экспонирует наружу.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Command {
    /// Создать новый стол.
    CreateTable(CreateTableCommand),

    /// Операция над существующим столом.
    TableCommand(TableCommand),
}

/// Команда создания стола.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateTableCommand {
    /// Идентификатор нового стола.
    pub table_id: TableId,
    /// Кто создаёт (он же получает роль «advancer»).
    pub creator: PlayerId,
    /// Имя стола (до 32 байт).
    pub name: String,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub min_seats: u8,
    pub max_seats: u8,
    pub starting_stack: Chips,
    pub turn_seconds: u64,
    pub time_bank_secs: u64,
    /// Токен-гейт, если стол закрытый.
    pub token_gate: Option<TokenGateApi>,
}

/// Внешнее представление токен-гейта (API-слой).
///
/// В домене маппится в `domain::table::TokenGate` (см. infra::mapping).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenGateApi {
    pub mint: String,
    pub min_balance: u64,
}

/// Команды, которые относятся к существующему столу.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum TableCommand {
    /// Посадить игрока за стол.
    JoinTable(JoinTableCommand),

    /// Запустить раздачу / перезапустить стол на новую раздачу.
    StartGame(StartGameCommand),

    /// Действие игрока в раздаче.
    SubmitAction(SubmitActionCommand),

    /// Ручной запрос перехода улицы (привилегированный, идемпотентный).
    RequestStreetAdvance(RequestStreetAdvanceCommand),

    /// Колбэк оракула: вскрытые карты борда.
    SubmitRevealedCards(SubmitRevealedCardsCommand),

    /// Колбэк оракула: итог шоудауна.
    SubmitShowdown(SubmitShowdownCommand),

    /// Сфолдить текущего актёра по истёкшему таймеру.
    ForceFold(ForceFoldCommand),

    /// Аварийный возврат вкладов зависшей раздачи.
    ForceRefund(ForceRefundCommand),

    /// Эмодзи-реакция.
    SubmitReaction(SubmitReactionCommand),

    /// Чат-сообщение.
    SendChatMessage(SendChatMessageCommand),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JoinTableCommand {
    pub table_id: TableId,
    pub player_id: PlayerId,
    pub seat_index: u8,
    pub display_name: String,
    /// Предъявленный баланс токена для закрытых столов.
    pub token_balance: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StartGameCommand {
    pub table_id: TableId,
    pub caller: PlayerId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitActionCommand {
    pub table_id: TableId,
    pub action: SubmittedAction,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RequestStreetAdvanceCommand {
    pub table_id: TableId,
    pub caller: PlayerId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitRevealedCardsCommand {
    pub table_id: TableId,
    pub hand_number: HandNumber,
    /// Индексы слотов борда (0..4) и значения карт (0..51), параллельно.
    pub slots: Vec<u8>,
    pub values: Vec<u8>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitShowdownCommand {
    pub table_id: TableId,
    pub submission: ShowdownSubmission,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForceFoldCommand {
    pub table_id: TableId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForceRefundCommand {
    pub table_id: TableId,
    pub caller: PlayerId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitReactionCommand {
    pub table_id: TableId,
    pub player_id: PlayerId,
    pub reaction: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SendChatMessageCommand {
    pub table_id: TableId,
    pub player_id: PlayerId,
    pub message: String,
}

/// Применить команду к реестру столов.
///
/// Единая точка входа для контрактного слоя и dev-CLI: разбирает команду,
/// зовёт реестр и переводит исход в CommandResponse / ApiError.
pub fn apply_command<O: DealOracle>(
    registry: &mut TableRegistry,
    command: Command,
    now: u64,
    oracle: &mut O,
) -> Result<CommandResponse, ApiError> {
    match command {
        Command::CreateTable(cmd) => {
            let table_id = cmd.table_id;
            let config = crate::infra::mapping::table_config_from_api(&cmd);
            registry.create_table(table_id, cmd.creator, config, now)?;
            Ok(CommandResponse::TableCreated { table_id })
        }

        Command::TableCommand(table_cmd) => match table_cmd {
            TableCommand::JoinTable(cmd) => {
                registry.join_table(
                    cmd.table_id,
                    cmd.player_id,
                    cmd.seat_index,
                    cmd.display_name,
                    cmd.token_balance,
                    now,
                )?;
                Ok(CommandResponse::Accepted)
            }

            TableCommand::StartGame(cmd) => {
                registry.start_game(cmd.table_id, cmd.caller, now, oracle)?;
                Ok(CommandResponse::Accepted)
            }

            TableCommand::SubmitAction(cmd) => {
                let outcome = registry.submit_action(cmd.table_id, cmd.action, now, oracle)?;
                Ok(match outcome {
                    ActionOutcome::Applied => snapshot_response(registry, cmd.table_id),
                    ActionOutcome::Duplicate => CommandResponse::DuplicateIgnored,
                })
            }

            TableCommand::RequestStreetAdvance(cmd) => {
                let outcome =
                    registry.request_street_advance(cmd.table_id, cmd.caller, oracle)?;
                Ok(match outcome {
                    AdvanceOutcome::Requested => CommandResponse::Accepted,
                    AdvanceOutcome::AlreadyPending => CommandResponse::DuplicateIgnored,
                })
            }

            TableCommand::SubmitRevealedCards(cmd) => {
                let outcome = registry.submit_revealed_cards(
                    cmd.table_id,
                    cmd.hand_number,
                    &cmd.slots,
                    &cmd.values,
                    oracle,
                )?;
                Ok(match outcome {
                    RevealOutcome::Applied => snapshot_response(registry, cmd.table_id),
                    RevealOutcome::Duplicate => CommandResponse::DuplicateIgnored,
                })
            }

            TableCommand::SubmitShowdown(cmd) => {
                let outcome = registry.submit_showdown(cmd.table_id, cmd.submission, now)?;
                Ok(match outcome {
                    SettlementOutcome::Settled => snapshot_response(registry, cmd.table_id),
                    SettlementOutcome::AlreadySettled => CommandResponse::DuplicateIgnored,
                })
            }

            TableCommand::ForceFold(cmd) => {
                let outcome = registry.force_fold(cmd.table_id, now, oracle)?;
                Ok(match outcome {
                    ActionOutcome::Applied => snapshot_response(registry, cmd.table_id),
                    ActionOutcome::Duplicate => CommandResponse::DuplicateIgnored,
                })
            }

            TableCommand::ForceRefund(cmd) => {
                registry.force_refund(cmd.table_id, cmd.caller, now)?;
                Ok(CommandResponse::Accepted)
            }

            TableCommand::SubmitReaction(cmd) => {
                registry.submit_reaction(cmd.table_id, cmd.player_id, cmd.reaction, now)?;
                Ok(CommandResponse::Accepted)
            }

            TableCommand::SendChatMessage(cmd) => {
                registry.send_chat_message(cmd.table_id, cmd.player_id, cmd.message, now)?;
                Ok(CommandResponse::Accepted)
            }
        },
    }
}

/// Снимок стола в ответ на мутацию (наблюдатели получают свежее состояние).
fn snapshot_response(registry: &TableRegistry, table_id: TableId) -> CommandResponse {
    match registry.aggregate(table_id) {
        Some(agg) => CommandResponse::Snapshot(build_table_snapshot(agg, |pid| {
            registry
                .display_name(pid)
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("Player {}", pid))
        })),
        None => CommandResponse::Accepted,
    }
}
