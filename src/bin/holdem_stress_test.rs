//! Стресс-прогон движка: много столов, много раздач, после каждой —
//! проверка сохранения фишек (стек + банк = константа стола).

use oracle_holdem::domain::chips::Chips;
use oracle_holdem::domain::hand::Phase;
use oracle_holdem::domain::table::TableConfig;
use oracle_holdem::domain::{PlayerId, TableId};
use oracle_holdem::engine::actions::{ActionKey, ActionKind, SubmittedAction};
use oracle_holdem::engine::TableRegistry;
use oracle_holdem::infra::{IdGenerator, LocalOracle, SystemRng};

fn main() {
    println!("holdem_stress_test: стартуем стресс-прогон движка…");

    // Параметры нагрузки — можно смело крутить.
    const NUM_TABLES: usize = 16; // сколько столов
    const PLAYERS_PER_TABLE: u64 = 6; // игроков за столом
    const HANDS_PER_TABLE: u32 = 100; // сколько раздач на стол
    const STARTING_STACK: u64 = 10_000;

    let id_gen = IdGenerator::new();
    let mut registry = TableRegistry::new();
    let mut oracle = LocalOracle::new(SystemRng::default());
    let mut now: u64 = 1_700_000_000;

    let config = TableConfig {
        name: "STRESS".to_string(),
        small_blind: Chips::new(50),
        big_blind: Chips::new(100),
        min_seats: 2,
        max_seats: 6,
        starting_stack: Chips::new(STARTING_STACK),
        turn_seconds: 30,
        time_bank_secs: 30,
        token_gate: None,
    };

    // 1. Создаём столы и рассаживаем игроков.
    let mut table_ids: Vec<TableId> = Vec::with_capacity(NUM_TABLES);
    let mut next_player: PlayerId = 1;

    for t in 0..NUM_TABLES {
        let table_id = id_gen.next_table_id();
        let mut cfg = config.clone();
        cfg.name = format!("STRESS {}", t + 1);

        let creator = next_player;
        if let Err(e) = registry.create_table(table_id, creator, cfg, now) {
            eprintln!("[STRESS] create_table: {e:?}");
            continue;
        }
        for seat in 0..PLAYERS_PER_TABLE {
            let pid = next_player;
            next_player += 1;
            if let Err(e) = registry.join_table(
                table_id,
                pid,
                seat as u8,
                format!("Bot {pid}"),
                None,
                now,
            ) {
                eprintln!("[STRESS] join_table: {e:?}");
            }
        }
        table_ids.push(table_id);
    }

    println!(
        "[STRESS] Создано {} столов, по {} игроков, по {} рук на стол.",
        table_ids.len(),
        PLAYERS_PER_TABLE,
        HANDS_PER_TABLE
    );

    // Статистика.
    let mut total_hands: u64 = 0;
    let mut total_pot: u64 = 0;
    let mut max_pot: u64 = 0;
    let mut conservation_failures: u64 = 0;

    // 2. Гоним раздачи.
    let expected_total = Chips::new(STARTING_STACK * PLAYERS_PER_TABLE);

    for &table_id in &table_ids {
        let creator = match registry.table(table_id) {
            Some(t) => t.creator,
            None => continue,
        };

        for _ in 0..HANDS_PER_TABLE {
            now += 1;
            if let Err(e) = registry.start_game(table_id, creator, now, &mut oracle) {
                // Обычная причина — выбыли игроки (стек 0): идём дальше.
                eprintln!("[STRESS][table_id={table_id}] start_game: {e:?}");
                break;
            }

            match play_single_hand(&mut registry, &mut oracle, table_id, &mut now) {
                Ok(pot) => {
                    total_hands += 1;
                    total_pot += pot;
                    if pot > max_pot {
                        max_pot = pot;
                    }
                }
                Err(msg) => {
                    eprintln!("[STRESS][table_id={table_id}] {msg}");
                    break;
                }
            }

            // Инвариант: фишки стола никуда не деваются.
            if let Some(table) = registry.table(table_id) {
                if table.total_chips() != expected_total {
                    conservation_failures += 1;
                    eprintln!(
                        "[STRESS][table_id={table_id}] НАРУШЕНО СОХРАНЕНИЕ: {} != {}",
                        table.total_chips(),
                        expected_total
                    );
                }
            }
        }
    }

    println!();
    println!("=========== STRESS TEST SUMMARY ===========");
    println!("Всего сыграно рук: {total_hands}");
    if total_hands > 0 {
        println!("Суммарный пот за все руки: {total_pot}");
        println!("Средний пот: {}", total_pot / total_hands);
        println!("Максимальный пот: {max_pot}");
    }
    println!("Нарушений сохранения фишек: {conservation_failures}");
    println!("===========================================");
    println!("holdem_stress_test: завершено.");
}

/// Прогон одной раздачи простыми ботами; возвращает размер банка на пике.
fn play_single_hand(
    registry: &mut TableRegistry,
    oracle: &mut LocalOracle<SystemRng>,
    table_id: TableId,
    now: &mut u64,
) -> Result<u64, String> {
    const MAX_STEPS: u32 = 400;
    let mut step = 0;
    let mut peak_pot: u64 = 0;

    loop {
        step += 1;
        if step > MAX_STEPS {
            return Err(format!("превышен лимит шагов ({MAX_STEPS})"));
        }

        oracle
            .pump(registry, *now)
            .map_err(|e| format!("оракул: {e:?}"))?;

        let table = registry
            .table(table_id)
            .ok_or_else(|| "стол исчез".to_string())?;

        if table.pot.0 > peak_pot {
            peak_pot = table.pot.0;
        }
        if table.phase == Phase::Complete {
            return Ok(peak_pot);
        }

        let seat_idx = match table.current_turn {
            Some(s) => s,
            None => continue, // ждём колбэк; pump на следующем витке доставит
        };
        let seat = table
            .seat(seat_idx)
            .ok_or_else(|| "current_turn указывает на пустое место".to_string())?;

        // Простая бот-логика: уравнено → изредка рейз, иначе check;
        // нужно доплачивать → call либо all-in на остаток.
        let to_call = table.current_bet.saturating_sub(seat.street_bet);
        let bb = table.config.big_blind;
        let kind = if to_call.is_zero() {
            if step % 7 == 0 && seat.stack >= bb {
                ActionKind::Raise(bb)
            } else {
                ActionKind::Check
            }
        } else if seat.stack <= to_call {
            ActionKind::AllIn
        } else if step % 11 == 0 {
            ActionKind::Fold
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
        registry
            .submit_action(table_id, action, *now, oracle)
            .map_err(|e| format!("действие: {e:?}"))?;
    }
}
