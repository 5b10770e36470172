// tests/settlement_tests.rs

//! Фиксация итога раздачи:
//! - валидный settlement разносит выплаты и закрывает раздачу;
//! - повторная присылка того же номера — no-op, двойных выплат нет;
//! - несведённая сумма, чужие места и превышение слоёв отклоняются
//!   без единой мутации;
//! - фазовая решётка: settlement валиден только в Showdown.

use oracle_holdem::domain::card::Card;
use oracle_holdem::domain::chips::Chips;
use oracle_holdem::domain::hand::{HandCategory, Phase};
use oracle_holdem::domain::player::Seat;
use oracle_holdem::domain::table::{Table, TableConfig};
use oracle_holdem::domain::PlayerId;
use oracle_holdem::engine::actions::{ActionKey, ActionKind, SubmittedAction};
use oracle_holdem::engine::errors::EngineError;
use oracle_holdem::engine::game_loop::{apply_action, start_hand, HandEngine};
use oracle_holdem::engine::oracle::{
    apply_community_cards, apply_settlement, RecordingOracle, SettlementOutcome,
    ShowdownSubmission,
};
use oracle_holdem::domain::hand::GameResult;

fn make_table(stacks: &[u64]) -> Table {
    let config = TableConfig {
        name: "Settlement test table".to_string(),
        small_blind: Chips(50),
        big_blind: Chips(100),
        min_seats: 2,
        max_seats: 6,
        starting_stack: Chips(10_000),
        turn_seconds: 30,
        time_bank_secs: 30,
        token_gate: None,
    };

    let mut table = Table::new(1, 1, config, 0);
    for (idx, &stack) in stacks.iter().enumerate() {
        table.seats[idx] = Some(Seat::new(idx as PlayerId + 1, idx as u8, Chips(stack), 30));
    }
    table
}

fn act(
    table: &mut Table,
    engine: &mut HandEngine,
    oracle: &mut RecordingOracle,
    player_id: PlayerId,
    kind: ActionKind,
) {
    let seq = table
        .seat_of_player(player_id)
        .and_then(|s| table.seat(s))
        .map(|s| s.action_seq + 1)
        .expect("игрок должен сидеть за столом");

    apply_action(
        table,
        engine,
        SubmittedAction {
            key: ActionKey {
                hand_number: table.hand_number,
                player_id,
                seq,
            },
            kind,
        },
        table.last_action_ts + 1,
        oracle,
    )
    .expect("действие должно применяться");
}

fn cards(values: &[u8]) -> Vec<Card> {
    values
        .iter()
        .map(|&v| Card::from_index(v).expect("валидный индекс карты"))
        .collect()
}

/// Догнать стол heads-up до шоудауна чек-чеком; банк = 200.
fn play_heads_up_to_showdown(
    table: &mut Table,
    engine: &mut HandEngine,
    oracle: &mut RecordingOracle,
) {
    // Префлоп: SB (seat 1) уравнивает, BB (seat 0, он же дилер) чекает.
    act(table, engine, oracle, 2, ActionKind::Call);
    act(table, engine, oracle, 1, ActionKind::Check);
    let hn = table.hand_number;
    apply_community_cards(table, engine, hn, &[0, 1, 2], &cards(&[0, 14, 28]), oracle)
        .expect("флоп");

    act(table, engine, oracle, 2, ActionKind::Check);
    act(table, engine, oracle, 1, ActionKind::Check);
    let hn = table.hand_number;
    apply_community_cards(table, engine, hn, &[3], &cards(&[37]), oracle)
        .expect("тёрн");

    act(table, engine, oracle, 2, ActionKind::Check);
    act(table, engine, oracle, 1, ActionKind::Check);
    let hn = table.hand_number;
    apply_community_cards(table, engine, hn, &[4], &cards(&[51]), oracle)
        .expect("ривер");

    act(table, engine, oracle, 2, ActionKind::Check);
    act(table, engine, oracle, 1, ActionKind::Check);

    assert_eq!(table.phase, Phase::Showdown);
}

fn submission(table: &Table, winners: Vec<PlayerId>, payouts: Vec<Chips>) -> ShowdownSubmission {
    ShowdownSubmission {
        hand_number: table.hand_number,
        winners,
        payouts,
        winning_category: HandCategory::OnePair,
        final_board: table.board,
        proof: b"test-proof".to_vec(),
    }
}

//
// ====================== УСПЕШНАЯ ФИКСАЦИЯ ======================
//

#[test]
fn valid_settlement_pays_and_completes() {
    let mut table = make_table(&[10_000, 10_000]);
    let mut engine = start_hand(&mut table, 1).expect("start_hand");
    let mut oracle = RecordingOracle::new();
    let mut results: Vec<GameResult> = Vec::new();

    play_heads_up_to_showdown(&mut table, &mut engine, &mut oracle);
    assert_eq!(table.pot, Chips(200));

    let sub = submission(&table, vec![1], vec![Chips(200)]);
    let outcome = apply_settlement(
        &mut table,
        &mut engine,
        &mut results,
        sub,
        99,
    )
    .expect("валидный settlement");
    assert_eq!(outcome, SettlementOutcome::Settled);

    assert_eq!(table.phase, Phase::Complete);
    assert_eq!(table.pot, Chips::ZERO);
    assert_eq!(table.seat(0).expect("seat 0").stack, Chips(10_100));
    assert_eq!(table.seat(1).expect("seat 1").stack, Chips(9_900));

    // Итог записан ровно один раз, с аттестатом и бордом.
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].hand_number, table.hand_number);
    assert_eq!(results[0].payouts, vec![Chips(200)]);
    assert_eq!(results[0].proof, b"test-proof".to_vec());
    assert!(results[0].final_board.iter().all(|c| c.is_some()));

    // Сохранение фишек: 20 000 как было.
    assert_eq!(table.total_chips(), Chips(20_000));
}

/// Повторная присылка того же номера — идемпотентный успех,
/// даже с другими цифрами выплат: стеки отражают только первый вызов.
#[test]
fn duplicate_settlement_is_a_noop() {
    let mut table = make_table(&[10_000, 10_000]);
    let mut engine = start_hand(&mut table, 1).expect("start_hand");
    let mut oracle = RecordingOracle::new();
    let mut results: Vec<GameResult> = Vec::new();

    play_heads_up_to_showdown(&mut table, &mut engine, &mut oracle);

    let sub1 = submission(&table, vec![1], vec![Chips(200)]);
    apply_settlement(
        &mut table,
        &mut engine,
        &mut results,
        sub1,
        99,
    )
    .expect("первый settlement");

    let stacks_after_first: Vec<Chips> =
        table.seats.iter().flatten().map(|s| s.stack).collect();

    // Второй с другим распределением — no-op.
    let sub2 = submission(&table, vec![2], vec![Chips(200)]);
    let outcome = apply_settlement(
        &mut table,
        &mut engine,
        &mut results,
        sub2,
        120,
    )
    .expect("повтор должен быть no-op");
    assert_eq!(outcome, SettlementOutcome::AlreadySettled);

    let stacks_after_second: Vec<Chips> =
        table.seats.iter().flatten().map(|s| s.stack).collect();
    assert_eq!(stacks_after_first, stacks_after_second, "Выплат второй раз нет");
    assert_eq!(results.len(), 1, "Итог не задублирован");
}

//
// ====================== ОТКЛОНЕНИЯ БЕЗ МУТАЦИЙ ======================
//

#[test]
fn payout_sum_mismatch_is_rejected_without_mutation() {
    let mut table = make_table(&[10_000, 10_000]);
    let mut engine = start_hand(&mut table, 1).expect("start_hand");
    let mut oracle = RecordingOracle::new();
    let mut results: Vec<GameResult> = Vec::new();

    play_heads_up_to_showdown(&mut table, &mut engine, &mut oracle);
    let table_before = table.clone();

    let sub = submission(&table, vec![1], vec![Chips(300)]);
    let err = apply_settlement(
        &mut table,
        &mut engine,
        &mut results,
        sub,
        99,
    )
    .expect_err("сумма не сходится с банком");
    assert!(matches!(err, EngineError::InvalidPayoutDistribution(_)));

    assert_eq!(table, table_before, "Ни одна фишка не сдвинулась");
    assert!(results.is_empty());
}

/// Выплата игроку, которого нет за столом.
#[test]
fn payout_to_unknown_player_is_rejected() {
    let mut table = make_table(&[10_000, 10_000]);
    let mut engine = start_hand(&mut table, 1).expect("start_hand");
    let mut oracle = RecordingOracle::new();
    let mut results: Vec<GameResult> = Vec::new();

    play_heads_up_to_showdown(&mut table, &mut engine, &mut oracle);

    let sub = submission(&table, vec![77], vec![Chips(200)]);
    let err = apply_settlement(
        &mut table,
        &mut engine,
        &mut results,
        sub,
        99,
    )
    .expect_err("неизвестный победитель");
    assert!(matches!(err, EngineError::InvalidPayoutDistribution(_)));
}

/// Сфолдивший не допущен ни к одному слою — выплата ему отклоняется.
#[test]
fn payout_to_folded_player_is_rejected() {
    let mut table = make_table(&[10_000, 10_000, 10_000]);
    let mut engine = start_hand(&mut table, 1).expect("start_hand");
    let mut oracle = RecordingOracle::new();
    let mut results: Vec<GameResult> = Vec::new();

    // seat 0 фолдит сразу; остальные доходят до шоудауна чек-чеком.
    act(&mut table, &mut engine, &mut oracle, 1, ActionKind::Fold);
    act(&mut table, &mut engine, &mut oracle, 2, ActionKind::Call);
    act(&mut table, &mut engine, &mut oracle, 3, ActionKind::Check);
    let hn = table.hand_number;
    apply_community_cards(&mut table, &mut engine, hn, &[0, 1, 2], &cards(&[0, 14, 28]), &mut oracle)
        .expect("флоп");

    act(&mut table, &mut engine, &mut oracle, 2, ActionKind::Check);
    act(&mut table, &mut engine, &mut oracle, 3, ActionKind::Check);
    let hn = table.hand_number;
    apply_community_cards(&mut table, &mut engine, hn, &[3], &cards(&[37]), &mut oracle)
        .expect("тёрн");

    act(&mut table, &mut engine, &mut oracle, 2, ActionKind::Check);
    act(&mut table, &mut engine, &mut oracle, 3, ActionKind::Check);
    let hn = table.hand_number;
    apply_community_cards(&mut table, &mut engine, hn, &[4], &cards(&[51]), &mut oracle)
        .expect("ривер");

    act(&mut table, &mut engine, &mut oracle, 2, ActionKind::Check);
    act(&mut table, &mut engine, &mut oracle, 3, ActionKind::Check);
    assert_eq!(table.phase, Phase::Showdown);

    // Банк 200 (SB+BB), победителем объявлен сфолдивший player 1.
    let sub = submission(&table, vec![1], vec![table.pot]);
    let err = apply_settlement(
        &mut table,
        &mut engine,
        &mut results,
        sub,
        99,
    )
    .expect_err("сфолдивший не может выигрывать");
    assert!(matches!(err, EngineError::InvalidPayoutDistribution(_)));
}

/// Settlement вне Showdown отклоняется фазовой решёткой.
#[test]
fn settlement_outside_showdown_is_rejected() {
    let mut table = make_table(&[10_000, 10_000]);
    let mut engine = start_hand(&mut table, 1).expect("start_hand");
    let mut results: Vec<GameResult> = Vec::new();

    // Ещё префлоп — шоудауна не было.
    let sub = submission(&table, vec![1], vec![table.pot]);
    let err = apply_settlement(
        &mut table,
        &mut engine,
        &mut results,
        sub,
        99,
    )
    .expect_err("фаза не Showdown");
    assert_eq!(err, EngineError::WrongPhase);
}

/// Чужой номер раздачи отклоняется как устаревший колбэк.
#[test]
fn stale_settlement_is_rejected() {
    let mut table = make_table(&[10_000, 10_000]);
    let mut engine = start_hand(&mut table, 1).expect("start_hand");
    let mut oracle = RecordingOracle::new();
    let mut results: Vec<GameResult> = Vec::new();

    play_heads_up_to_showdown(&mut table, &mut engine, &mut oracle);

    let mut sub = submission(&table, vec![1], vec![Chips(200)]);
    sub.hand_number = 42;
    let err = apply_settlement(&mut table, &mut engine, &mut results, sub, 99)
        .expect_err("чужой номер раздачи");
    assert!(matches!(err, EngineError::StaleCallback { .. }));
}

/// Борд в присланном итоге обязан совпадать с бордом стола.
#[test]
fn settlement_with_wrong_board_is_rejected() {
    let mut table = make_table(&[10_000, 10_000]);
    let mut engine = start_hand(&mut table, 1).expect("start_hand");
    let mut oracle = RecordingOracle::new();
    let mut results: Vec<GameResult> = Vec::new();

    play_heads_up_to_showdown(&mut table, &mut engine, &mut oracle);

    let mut sub = submission(&table, vec![1], vec![Chips(200)]);
    sub.final_board[0] = Card::from_index(45);
    let err = apply_settlement(&mut table, &mut engine, &mut results, sub, 99)
        .expect_err("подменённый борд");
    assert_eq!(err, EngineError::BoardMismatch);
}
