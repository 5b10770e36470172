use serde::{Deserialize, Serialize};

use crate::domain::{PlayerId, TableId};
use crate::engine::registry::{TableAggregate, TableRegistry};

use super::dto::{SeatDto, TableSnapshotDto, TableSummaryDto};

/// Запросы "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Query {
    /// Полный снимок стола (стол + места + последний итог).
    GetTableSnapshot { table_id: TableId },

    /// Список столов (для лобби).
    ListTables,
}

/// Результат запроса "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum QueryResponse {
    Snapshot(TableSnapshotDto),
    Tables(Vec<TableSummaryDto>),

    /// Стол не найден.
    NotFound(TableId),
}

/// Выполнить запрос над реестром.
pub fn run_query(registry: &TableRegistry, query: Query) -> QueryResponse {
    match query {
        Query::GetTableSnapshot { table_id } => match registry.aggregate(table_id) {
            Some(agg) => QueryResponse::Snapshot(build_table_snapshot(agg, |pid| {
                resolve_name(registry, pid)
            })),
            None => QueryResponse::NotFound(table_id),
        },

        Query::ListTables => {
            let summaries = registry
                .table_ids()
                .into_iter()
                .filter_map(|id| registry.table(id))
                .map(|table| TableSummaryDto {
                    table_id: table.id,
                    name: table.config.name.clone(),
                    phase: table.phase,
                    seated: table.seated_count() as u8,
                    max_seats: table.max_seats(),
                    small_blind: table.config.small_blind,
                    big_blind: table.config.big_blind,
                    hand_number: table.hand_number,
                })
                .collect();
            QueryResponse::Tables(summaries)
        }
    }
}

fn resolve_name(registry: &TableRegistry, player_id: PlayerId) -> String {
    registry
        .display_name(player_id)
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("Player {}", player_id))
}

/// Сформировать снимок стола из агрегата.
///
/// Снимок отражает последнее зафиксированное состояние: незавершённые
/// запросы к оракулу видны только флагом awaiting_oracle.
pub fn build_table_snapshot(
    agg: &TableAggregate,
    resolve_name: impl Fn(PlayerId) -> String,
) -> TableSnapshotDto {
    let table = &agg.table;

    let seats = table
        .seats
        .iter()
        .filter_map(|s| s.as_ref())
        .map(|seat| SeatDto {
            player_id: seat.player_id,
            display_name: resolve_name(seat.player_id),
            seat_index: seat.seat_index,
            stack: seat.stack,
            street_bet: seat.street_bet,
            total_contributed: seat.total_contributed,
            status: seat.status,
            action_seq: seat.action_seq,
            time_bank_secs: seat.time_bank_secs,
            last_reaction: seat.last_reaction,
            last_message: seat.last_message.clone(),
        })
        .collect();

    let (side_pots, players_acted, players_to_act, awaiting_oracle) = match &agg.hand {
        Some(engine) => (
            engine.side_pots.clone(),
            engine.betting.acted_this_street,
            engine.betting.to_act.len() as u8,
            engine.pending.is_some(),
        ),
        None => (Vec::new(), 0, 0, false),
    };

    TableSnapshotDto {
        table_id: table.id,
        name: table.config.name.clone(),
        creator: table.creator,
        phase: table.phase,
        small_blind: table.config.small_blind,
        big_blind: table.config.big_blind,
        min_seats: table.config.min_seats,
        max_seats: table.config.max_seats,
        pot: table.pot,
        current_bet: table.current_bet,
        dealer_seat: table.dealer_seat,
        current_turn: table.current_turn,
        hand_number: table.hand_number,
        board: table.board,
        side_pots,
        players_acted,
        players_to_act,
        awaiting_oracle,
        last_action_ts: table.last_action_ts,
        seats,
        latest_result: agg.latest_result().cloned(),
    }
}
