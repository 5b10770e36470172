//! Инфраструктура вокруг движка: генерация ID, источники случайности,
//! локальный оракул для dev/tests, маппинг API ↔ домен, хранилище.

pub mod ids;
pub mod local_oracle;
pub mod mapping;
pub mod persistence;
pub mod rng;

pub use ids::IdGenerator;
pub use local_oracle::LocalOracle;
pub use mapping::table_config_from_api;
pub use persistence::{HoldemStorage, InMemoryHoldemStorage};
#[cfg(not(target_arch = "wasm32"))]
pub use rng::DeterministicRng;
pub use rng::{RandomSource, SystemRng};
