use crate::api::commands::{CreateTableCommand, TokenGateApi};
use crate::domain::table::{TableConfig, TokenGate};

/// Маппинг токен-гейта между API и доменом.
pub fn token_gate_from_api(api: TokenGateApi) -> TokenGate {
    TokenGate {
        mint: api.mint,
        min_balance: api.min_balance,
    }
}

pub fn token_gate_to_api(domain: TokenGate) -> TokenGateApi {
    TokenGateApi {
        mint: domain.mint,
        min_balance: domain.min_balance,
    }
}

/// Собрать доменный конфиг стола из команды создания.
pub fn table_config_from_api(cmd: &CreateTableCommand) -> TableConfig {
    TableConfig {
        name: cmd.name.clone(),
        small_blind: cmd.small_blind,
        big_blind: cmd.big_blind,
        min_seats: cmd.min_seats,
        max_seats: cmd.max_seats,
        starting_stack: cmd.starting_stack,
        turn_seconds: cmd.turn_seconds,
        time_bank_secs: cmd.time_bank_secs,
        token_gate: cmd.token_gate.clone().map(token_gate_from_api),
    }
}
