use linera_sdk::views::{linera_views, MapView, RegisterView, RootView, ViewStorageContext};

use crate::domain::hand::GameResult;
use crate::domain::table::Table;
use crate::domain::{PlayerId, TableId};
use crate::engine::game_loop::HandEngine;

/// Глобальное реплицируемое состояние приложения.
///
/// Важное:
/// - НЕ вкладываем RegisterView внутрь MapView.
/// - Доменные структуры (Table, HandEngine, GameResult) сериализуемы
///   и хранятся во Views напрямую; агрегат стола собирается из трёх map
///   по одному ключу TableId.
#[derive(RootView)]
#[view(context = ViewStorageContext)]
pub struct HoldemState {
    /// Все столы.
    ///
    /// Ключ: TableId (u64 / alias),
    /// Значение: доменная структура Table (Serialize + Deserialize).
    #[view(map)]
    pub tables: MapView<TableId, Table>,

    /// Активные раздачи по каждому столу.
    ///
    /// Ключ: TableId,
    /// Значение: Option<HandEngine> (None, если раздачи сейчас нет).
    #[view(map)]
    pub active_hands: MapView<TableId, Option<HandEngine>>,

    /// Append-only история итогов по каждому столу
    /// (внутри — по номеру раздачи, строго по возрастанию).
    #[view(map)]
    pub results: MapView<TableId, Vec<GameResult>>,

    /// Сколько всего раздач зафиксировано (статистика / мониторинг).
    #[view(register)]
    pub total_hands_settled: RegisterView<u64>,

    /// Имена игроков для фронта: PlayerId -> отображаемое имя.
    #[view(map)]
    pub player_names: MapView<PlayerId, String>,
}
