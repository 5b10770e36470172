use crate::domain::{Chips, HandNumber, PlayerId, SeatIndex, TableId};

use thiserror::Error;

/// Ошибки движка стола.
///
/// Валидационные ошибки возвращаются синхронно и не оставляют частичных
/// изменений: либо действие применяется целиком, либо состояние не трогается.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Стол {0} не найден")]
    TableNotFound(TableId),

    #[error("Операция недопустима в текущей фазе стола")]
    WrongPhase,

    #[error("Сейчас не ход игрока {0}")]
    NotYourTurn(PlayerId),

    #[error("Игрок {0} не может действовать (фолд/олл-ин/вне раздачи)")]
    InvalidActor(PlayerId),

    #[error("Игрок {0} не сидит за этим столом")]
    PlayerNotAtTable(PlayerId),

    #[error("Игрок {0} уже сидит за этим столом")]
    AlreadySeated(PlayerId),

    #[error("Место {0} не существует за столом")]
    InvalidSeat(SeatIndex),

    #[error("Место {0} уже занято")]
    SeatTaken(SeatIndex),

    #[error("Все места заняты")]
    TableFull,

    #[error("Недостаточно игроков для старта")]
    NotEnoughPlayers,

    #[error("Операция доступна только создателю стола, а не игроку {0}")]
    NotCreator(PlayerId),

    #[error("Для посадки за стол нужен токен-гейт")]
    TokenGateRequired,

    #[error("Предъявленного баланса токена недостаточно")]
    InsufficientTokens,

    #[error("Недостаточно фишек для этой ставки")]
    InsufficientChips,

    #[error("Размер рейза слишком мал: минимум {min}, прислано {got}")]
    RaiseTooSmall { min: Chips, got: Chips },

    #[error("Невозможно выполнить check – нужно хотя бы уравнять ставку")]
    CannotCheck,

    #[error("Невозможно выполнить call – нет ставки для уравнивания")]
    CannotCall,

    #[error("Торговля закрыта неполным олл-ином: только call или fold")]
    BettingClosed,

    #[error("Раунд ставок ещё не завершён")]
    BettingNotComplete,

    #[error("Раздача ждёт ответа оракула – действия временно запрещены")]
    AwaitingOracle,

    #[error("Номер раздачи не совпадает: ожидается {expected}, прислано {got}")]
    StaleCallback { expected: HandNumber, got: HandNumber },

    #[error("Недопустимый слот борда: {0}")]
    InvalidRevealSlot(u8),

    #[error("Недопустимое значение карты: {0}")]
    InvalidCardValue(u8),

    #[error("Борд в результате не совпадает с бордом стола")]
    BoardMismatch,

    #[error("Распределение выплат не прошло проверку: {0}")]
    InvalidPayoutDistribution(String),

    #[error("Время на ход истекло")]
    TimeExpired,

    #[error("Время на ход ещё не истекло")]
    TimeNotExpired,

    #[error("Некорректный конфиг стола: {0}")]
    InvalidConfig(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}
