use super::AggregateId;

/// Трейт для корня агрегата
///
/// Определяет идентичность записи и статические метаданные агрегата,
/// которые используются для имен таблиц, категорий логов и заголовков UI.
pub trait AggregateRoot {
    /// Тип идентификатора агрегата
    type Id: AggregateId;

    /// Получить ID записи
    fn id(&self) -> Self::Id;

    /// Индекс агрегата в системе (например, "a001")
    fn aggregate_index() -> &'static str;

    /// Имя коллекции для БД (например, "pricing_category")
    fn collection_name() -> &'static str;

    /// Имя элемента для UI (единственное число)
    fn element_name() -> &'static str;

    /// Имя списка для UI (множественное число)
    fn list_name() -> &'static str;

    /// Полное имя агрегата для системы (например, "a001_pricing_category")
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }
}
