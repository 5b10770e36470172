use serde::{Deserialize, Serialize};

use crate::domain::{PlayerId, TableId};
use crate::engine::{EngineError, RegistryError};

/// Ошибки внешнего API (то, что отдаём клиенту).
///
/// Раскладку по человеческим сообщениям делает уже презентационный слой —
/// здесь только сериализуемая классификация.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ApiError {
    /// Неправильные входные данные (например, битый JSON).
    BadRequest(String),

    /// Стол не найден.
    TableNotFound(TableId),

    /// Игрок не найден за столом.
    PlayerNotAtTable(PlayerId),

    /// Команда не может быть выполнена в текущем состоянии.
    InvalidCommand(String),

    /// Ошибка движка (фазы, ставки, колбэки, сохранение фишек).
    EngineError(String),

    /// Внутренняя ошибка.
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::TableNotFound(id) => ApiError::TableNotFound(id),
            EngineError::PlayerNotAtTable(id) => ApiError::PlayerNotAtTable(id),
            other => ApiError::EngineError(other.to_string()),
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::TableNotFound(id) => ApiError::TableNotFound(id),
            RegistryError::Engine(e) => e.into(),
            other => ApiError::InvalidCommand(other.to_string()),
        }
    }
}
