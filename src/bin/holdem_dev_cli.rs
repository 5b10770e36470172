//! Dev-CLI: один стол, четыре бота, несколько раздач подряд.
//!
//! Весь ввод идёт через api::apply_command — тем же путём, каким команды
//! приходят из контрактного слоя; роль MPC играет локальный оракул.

use oracle_holdem::api::commands::{
    Command, CreateTableCommand, JoinTableCommand, StartGameCommand, SubmitActionCommand,
    TableCommand,
};
use oracle_holdem::api::queries::{run_query, Query, QueryResponse};
use oracle_holdem::api::{apply_command, ApiError};
use oracle_holdem::domain::chips::Chips;
use oracle_holdem::domain::hand::Phase;
use oracle_holdem::domain::{PlayerId, TableId};
use oracle_holdem::engine::actions::{ActionKey, ActionKind, SubmittedAction};
use oracle_holdem::engine::TableRegistry;
use oracle_holdem::infra::{IdGenerator, LocalOracle, SystemRng};

const PLAYERS: u64 = 4;
const HANDS: u32 = 3;

fn main() {
    println!("holdem_dev_cli: стол с локальным оракулом, {PLAYERS} бота, {HANDS} раздачи…");

    let id_gen = IdGenerator::new();
    let mut registry = TableRegistry::new();
    let mut oracle = LocalOracle::new(SystemRng::default());
    let mut now: u64 = 1_700_000_000;

    let table_id: TableId = id_gen.next_table_id();
    let creator: PlayerId = 1;

    let create = Command::CreateTable(CreateTableCommand {
        table_id,
        creator,
        name: "DEV TABLE".to_string(),
        small_blind: Chips::new(50),
        big_blind: Chips::new(100),
        min_seats: 2,
        max_seats: 6,
        starting_stack: Chips::new(10_000),
        turn_seconds: 30,
        time_bank_secs: 30,
        token_gate: None,
    });
    run_or_die(&mut registry, create, now, &mut oracle);

    for seat in 0..PLAYERS {
        let join = Command::TableCommand(TableCommand::JoinTable(JoinTableCommand {
            table_id,
            player_id: seat + 1,
            seat_index: seat as u8,
            display_name: format!("Bot {}", seat + 1),
            token_balance: None,
        }));
        run_or_die(&mut registry, join, now, &mut oracle);
    }

    for hand in 1..=HANDS {
        now += 1;
        let start = Command::TableCommand(TableCommand::StartGame(StartGameCommand {
            table_id,
            caller: creator,
        }));
        run_or_die(&mut registry, start, now, &mut oracle);
        println!("--- раздача #{hand} ---");

        play_hand(&mut registry, &mut oracle, table_id, &mut now);
        print_snapshot(&registry, table_id);
    }

    println!("holdem_dev_cli: завершено.");
}

/// Крутим действия ботов + оракул, пока раздача не закроется.
fn play_hand(
    registry: &mut TableRegistry,
    oracle: &mut LocalOracle<SystemRng>,
    table_id: TableId,
    now: &mut u64,
) {
    const MAX_STEPS: u32 = 300;
    let mut step = 0;

    loop {
        step += 1;
        if step > MAX_STEPS {
            eprintln!("[dev_cli] превышен лимит шагов, выходим из раздачи");
            return;
        }

        if let Err(e) = oracle.pump(registry, *now) {
            eprintln!("[dev_cli] ошибка оракула: {e:?}");
            return;
        }

        let table = match registry.table(table_id) {
            Some(t) => t,
            None => return,
        };
        if table.phase == Phase::Complete {
            return;
        }

        let seat_idx = match table.current_turn {
            Some(s) => s,
            None => continue, // ждём оракула; pump выше разрулит
        };
        let seat = match table.seat(seat_idx) {
            Some(s) => s,
            None => return,
        };

        let to_call = table.current_bet.saturating_sub(seat.street_bet);
        let kind = if to_call.is_zero() {
            if step % 5 == 0 && seat.stack >= table.config.big_blind {
                ActionKind::Raise(table.config.big_blind)
            } else {
                ActionKind::Check
            }
        } else if seat.stack <= to_call {
            ActionKind::AllIn
        } else {
            ActionKind::Call
        };

        let action = SubmittedAction {
            key: ActionKey {
                hand_number: table.hand_number,
                player_id: seat.player_id,
                seq: seat.action_seq + 1,
            },
            kind,
        };

        *now += 1;
        let command = Command::TableCommand(TableCommand::SubmitAction(SubmitActionCommand {
            table_id,
            action,
        }));
        if let Err(e) = apply_command(registry, command, *now, oracle) {
            eprintln!("[dev_cli] действие отклонено: {e:?}");
            return;
        }
    }
}

fn run_or_die(
    registry: &mut TableRegistry,
    command: Command,
    now: u64,
    oracle: &mut LocalOracle<SystemRng>,
) {
    if let Err(e) = apply_command(registry, command, now, oracle) {
        die(e);
    }
}

fn die(e: ApiError) -> ! {
    eprintln!("[dev_cli] команда отклонена: {e:?}");
    std::process::exit(1);
}

/// Снимок стола в JSON — то же, что видит фронт.
fn print_snapshot(registry: &TableRegistry, table_id: TableId) {
    match run_query(registry, Query::GetTableSnapshot { table_id }) {
        QueryResponse::Snapshot(snapshot) => match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("[dev_cli] сериализация снимка: {e}"),
        },
        other => eprintln!("[dev_cli] неожиданный ответ на запрос: {other:?}"),
    }
}
