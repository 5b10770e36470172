// tests/registry_tests.rs

//! Реестр столов: создание, посадка, старт, перезапуск раздачи,
//! токен-гейт, реакции/чат, отклонения по фазам.

use oracle_holdem::domain::chips::Chips;
use oracle_holdem::domain::hand::Phase;
use oracle_holdem::domain::table::{TableConfig, TokenGate};
use oracle_holdem::domain::TableId;
use oracle_holdem::engine::actions::{ActionKey, ActionKind, SubmittedAction};
use oracle_holdem::engine::errors::EngineError;
use oracle_holdem::engine::oracle::RecordingOracle;
use oracle_holdem::engine::registry::RegistryError;
use oracle_holdem::engine::TableRegistry;
use oracle_holdem::infra::{DeterministicRng, LocalOracle};

fn base_config() -> TableConfig {
    TableConfig {
        name: "Registry table".to_string(),
        small_blind: Chips(50),
        big_blind: Chips(100),
        min_seats: 2,
        max_seats: 4,
        starting_stack: Chips(10_000),
        turn_seconds: 30,
        time_bank_secs: 30,
        token_gate: None,
    }
}

fn registry_with_players(n: u64) -> (TableRegistry, TableId) {
    let mut registry = TableRegistry::new();
    registry.create_table(1, 1, base_config(), 0).expect("create_table");
    for i in 0..n {
        registry
            .join_table(1, i + 1, i as u8, format!("P{}", i + 1), None, 0)
            .expect("join_table");
    }
    (registry, 1)
}

//
// ====================== СОЗДАНИЕ ======================
//

#[test]
fn duplicate_table_id_is_rejected() {
    let mut registry = TableRegistry::new();
    registry.create_table(1, 1, base_config(), 0).expect("первый стол");

    let err = registry
        .create_table(1, 2, base_config(), 0)
        .expect_err("повторный id");
    assert!(matches!(err, RegistryError::TableAlreadyExists(1)));
}

#[test]
fn invalid_config_is_rejected() {
    let mut registry = TableRegistry::new();

    // Имя длиннее 32 байт.
    let mut config = base_config();
    config.name = "X".repeat(40);
    let err = registry.create_table(1, 1, config, 0).expect_err("имя");
    assert!(matches!(
        err,
        RegistryError::Engine(EngineError::InvalidConfig(_))
    ));

    // Нулевой блайнд.
    let mut config = base_config();
    config.small_blind = Chips::ZERO;
    let err = registry.create_table(2, 1, config, 0).expect_err("блайнд");
    assert!(matches!(
        err,
        RegistryError::Engine(EngineError::InvalidConfig(_))
    ));

    // min_seats < 2.
    let mut config = base_config();
    config.min_seats = 1;
    let err = registry.create_table(3, 1, config, 0).expect_err("места");
    assert!(matches!(
        err,
        RegistryError::Engine(EngineError::InvalidConfig(_))
    ));
}

//
// ====================== ПОСАДКА ======================
//

#[test]
fn join_validations() {
    let (mut registry, table_id) = registry_with_players(2);

    // Занятое место.
    let err = registry
        .join_table(table_id, 5, 0, "X".into(), None, 0)
        .expect_err("место занято");
    assert!(matches!(err, RegistryError::Engine(EngineError::SeatTaken(0))));

    // Несуществующее место.
    let err = registry
        .join_table(table_id, 5, 9, "X".into(), None, 0)
        .expect_err("нет такого места");
    assert!(matches!(err, RegistryError::Engine(EngineError::InvalidSeat(9))));

    // Повторная посадка того же игрока.
    let err = registry
        .join_table(table_id, 1, 2, "X".into(), None, 0)
        .expect_err("игрок уже сидит");
    assert!(matches!(err, RegistryError::Engine(EngineError::AlreadySeated(1))));
}

#[test]
fn join_after_start_is_rejected() {
    let (mut registry, table_id) = registry_with_players(2);
    let mut oracle = RecordingOracle::new();
    registry.start_game(table_id, 1, 1, &mut oracle).expect("start");

    let err = registry
        .join_table(table_id, 5, 2, "X".into(), None, 2)
        .expect_err("посадка после старта");
    assert!(matches!(err, RegistryError::Engine(EngineError::WrongPhase)));
}

#[test]
fn table_full_is_rejected() {
    let (mut registry, table_id) = registry_with_players(4); // max_seats = 4

    let err = registry
        .join_table(table_id, 9, 3, "X".into(), None, 0)
        .expect_err("все места заняты");
    // Место 3 занято; полный стол виден и так.
    assert!(matches!(
        err,
        RegistryError::Engine(EngineError::TableFull) | RegistryError::Engine(EngineError::SeatTaken(_))
    ));
}

//
// ====================== ТОКЕН-ГЕЙТ ======================
//

#[test]
fn token_gate_requires_balance() {
    let mut registry = TableRegistry::new();
    let mut config = base_config();
    config.token_gate = Some(TokenGate {
        mint: "GATE".to_string(),
        min_balance: 1_000,
    });
    registry.create_table(1, 1, config, 0).expect("create");

    // Без предъявленного баланса.
    let err = registry
        .join_table(1, 1, 0, "X".into(), None, 0)
        .expect_err("нет баланса");
    assert!(matches!(
        err,
        RegistryError::Engine(EngineError::TokenGateRequired)
    ));

    // Баланс меньше порога.
    let err = registry
        .join_table(1, 1, 0, "X".into(), Some(999), 0)
        .expect_err("мало токенов");
    assert!(matches!(
        err,
        RegistryError::Engine(EngineError::InsufficientTokens)
    ));

    // Достаточный баланс проходит.
    registry
        .join_table(1, 1, 0, "X".into(), Some(1_000), 0)
        .expect("достаточно токенов");
}

//
// ====================== СТАРТ ======================
//

#[test]
fn start_game_validations() {
    let (mut registry, table_id) = registry_with_players(1);
    let mut oracle = RecordingOracle::new();

    // Мало игроков.
    let err = registry
        .start_game(table_id, 1, 1, &mut oracle)
        .expect_err("один игрок");
    assert!(matches!(
        err,
        RegistryError::Engine(EngineError::NotEnoughPlayers)
    ));

    registry
        .join_table(table_id, 2, 1, "P2".into(), None, 0)
        .expect("join");

    // Не создатель.
    let err = registry
        .start_game(table_id, 2, 1, &mut oracle)
        .expect_err("чужой старт");
    assert!(matches!(
        err,
        RegistryError::Engine(EngineError::NotCreator(2))
    ));

    // Создатель стартует.
    registry.start_game(table_id, 1, 1, &mut oracle).expect("start");
    let table = registry.table(table_id).expect("стол");
    assert_eq!(table.phase, Phase::PreFlop);
    assert_eq!(table.hand_number, 1);

    // Повторный старт во время раздачи запрещён.
    let err = registry
        .start_game(table_id, 1, 2, &mut oracle)
        .expect_err("раздача уже идёт");
    assert!(matches!(err, RegistryError::Engine(EngineError::WrongPhase)));
}

//
// ====================== НОВАЯ РАЗДАЧА ======================
//

/// Complete → PreFlop: номер растёт, кнопка сдвигается, борд чистый.
#[test]
fn new_hand_reset_rotates_dealer_and_clears_board() {
    let (mut registry, table_id) = registry_with_players(3);
    let mut oracle = LocalOracle::new(DeterministicRng::from_seed(3));

    registry.start_game(table_id, 1, 1, &mut oracle).expect("start");
    let dealer_first = registry.table(table_id).expect("стол").dealer_seat;

    // Сворачиваем раздачу фолдами (двое из трёх) и даём оракулу докатать.
    let mut now = 2;
    for _ in 0..2 {
        let (player_id, hand_number, seq) = {
            let table = registry.table(table_id).expect("стол");
            let seat_idx = table.current_turn.expect("актёр");
            let seat = table.seat(seat_idx).expect("место");
            (seat.player_id, table.hand_number, seat.action_seq + 1)
        };
        registry
            .submit_action(
                table_id,
                SubmittedAction {
                    key: ActionKey {
                        hand_number,
                        player_id,
                        seq,
                    },
                    kind: ActionKind::Fold,
                },
                now,
                &mut oracle,
            )
            .expect("fold");
        now += 1;
    }
    oracle.pump(&mut registry, now).expect("pump");

    assert_eq!(registry.table(table_id).expect("стол").phase, Phase::Complete);

    // Перезапуск.
    registry.start_game(table_id, 1, now, &mut oracle).expect("новая раздача");

    let table = registry.table(table_id).expect("стол");
    assert_eq!(table.phase, Phase::PreFlop);
    assert_eq!(table.hand_number, 2, "Номер раздачи монотонный");
    assert_ne!(table.dealer_seat, dealer_first, "Кнопка сдвинулась");
    assert!(table.board.iter().all(|c| c.is_none()), "Борд чистый");
    assert_eq!(table.pot, Chips(150), "Новые блайнды уже в банке");
}

//
// ====================== КОЛБЭКИ ЧЕРЕЗ РЕЕСТР ======================
//

#[test]
fn reveal_with_garbage_card_value_is_rejected() {
    let (mut registry, table_id) = registry_with_players(2);
    let mut oracle = RecordingOracle::new();
    registry.start_game(table_id, 1, 1, &mut oracle).expect("start");

    let hand_number = registry.table(table_id).expect("стол").hand_number;
    let err = registry
        .submit_revealed_cards(table_id, hand_number, &[0], &[99], &mut oracle)
        .expect_err("мусорное значение карты");
    assert!(matches!(
        err,
        RegistryError::Engine(EngineError::InvalidCardValue(99))
    ));
}

#[test]
fn callbacks_without_active_hand_are_rejected() {
    let (mut registry, table_id) = registry_with_players(2);
    let mut oracle = RecordingOracle::new();

    let err = registry
        .submit_revealed_cards(table_id, 1, &[0], &[5], &mut oracle)
        .expect_err("раздачи ещё нет");
    assert!(matches!(err, RegistryError::NoActiveHand(_)));
}

//
// ====================== РЕАКЦИИ / ЧАТ ======================
//

#[test]
fn reactions_and_chat_live_on_the_seat() {
    let (mut registry, table_id) = registry_with_players(2);

    registry
        .submit_reaction(table_id, 1, 3, 50)
        .expect("реакция");
    registry
        .send_chat_message(table_id, 2, "привет стол".to_string(), 60)
        .expect("чат");

    let table = registry.table(table_id).expect("стол");
    let seat0 = table.seat(0).expect("seat 0");
    assert_eq!(seat0.last_reaction, 3);
    assert_eq!(seat0.last_reaction_ts, 50);

    let seat1 = table.seat(1).expect("seat 1");
    assert_eq!(seat1.last_message, "привет стол");
    assert_eq!(seat1.last_message_ts, 60);
}

/// Чат обрезается до 64 байт по границе символа.
#[test]
fn chat_is_truncated_to_limit() {
    let (mut registry, table_id) = registry_with_players(2);

    let long = "ы".repeat(100); // 2 байта на символ
    registry
        .send_chat_message(table_id, 1, long, 1)
        .expect("чат");

    let table = registry.table(table_id).expect("стол");
    let msg = &table.seat(0).expect("seat 0").last_message;
    assert!(msg.len() <= 64);
    assert_eq!(msg.chars().count(), 32, "Обрезка по границе символа");
}

//
// ====================== АВАРИЙНЫЙ ВОЗВРАТ ======================
//

/// Возврат вкладов зависшей раздачи: фишки сходятся, итог не пишется.
#[test]
fn force_refund_restores_all_contributions() {
    let (mut registry, table_id) = registry_with_players(3);
    let mut oracle = RecordingOracle::new();
    registry.start_game(table_id, 1, 1, &mut oracle).expect("start");

    // Догоняем префлоп до закрытия: call, call, check BB → ждём оракула.
    let mut now = 2;
    for _ in 0..3 {
        let (player_id, hand_number, seq, kind) = {
            let table = registry.table(table_id).expect("стол");
            let seat_idx = table.current_turn.expect("актёр");
            let seat = table.seat(seat_idx).expect("место");
            let to_call = table.current_bet.saturating_sub(seat.street_bet);
            let kind = if to_call.is_zero() {
                ActionKind::Check
            } else {
                ActionKind::Call
            };
            (seat.player_id, table.hand_number, seat.action_seq + 1, kind)
        };
        registry
            .submit_action(
                table_id,
                SubmittedAction {
                    key: ActionKey {
                        hand_number,
                        player_id,
                        seq,
                    },
                    kind,
                },
                now,
                &mut oracle,
            )
            .expect("действие");
        now += 1;
    }
    assert_eq!(oracle.reveals.len(), 1, "Раздача ждёт флопа");

    // Рефанд не создателю запрещён.
    let err = registry
        .force_refund(table_id, 2, now)
        .expect_err("не создатель");
    assert!(matches!(err, RegistryError::Engine(EngineError::NotCreator(2))));

    // Создатель возвращает вклады.
    registry.force_refund(table_id, 1, now).expect("refund");

    let table = registry.table(table_id).expect("стол");
    assert_eq!(table.phase, Phase::Complete);
    assert_eq!(table.pot, Chips::ZERO);
    for seat in table.seats.iter().flatten() {
        assert_eq!(seat.stack, Chips(10_000), "Вклад вернулся в стек");
        assert_eq!(seat.total_contributed, Chips::ZERO);
    }
    assert_eq!(table.total_chips(), Chips(30_000));

    // Итога за этой раздачей нет.
    assert!(registry.results(table_id).expect("история").is_empty());

    // Стол перезапускается обычным порядком.
    registry
        .start_game(table_id, 1, now + 1, &mut oracle)
        .expect("новая раздача после рефанда");
    assert_eq!(registry.table(table_id).expect("стол").hand_number, 2);
}

/// Рефанд без зависшего запроса к оракулу отклоняется.
#[test]
fn force_refund_requires_pending_oracle_request() {
    let (mut registry, table_id) = registry_with_players(2);
    let mut oracle = RecordingOracle::new();
    registry.start_game(table_id, 1, 1, &mut oracle).expect("start");

    let err = registry
        .force_refund(table_id, 1, 2)
        .expect_err("раздача не зависла");
    assert!(matches!(err, RegistryError::Engine(EngineError::WrongPhase)));
}
