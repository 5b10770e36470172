//! Доменная модель стола: карты, фишки, места, фазы раздачи, результаты.

pub mod card;
pub mod chips;
pub mod deck;
pub mod hand;
pub mod player;
pub mod table;

// Базовые идентификаторы (потом можно вынести в отдельный модуль ids/infra)
pub type PlayerId = u64;
pub type TableId = u64;

/// Номер раздачи — монотонный счётчик внутри одного стола.
/// Все колбэки оракула и ключи действий привязаны к нему.
pub type HandNumber = u64;

// Удобные реэкспорты, чтобы в других модулях писать crate::domain::Card и т.п.
pub use card::*;
pub use chips::*;
pub use deck::*;
pub use hand::*;
pub use player::*;
pub use table::*;
