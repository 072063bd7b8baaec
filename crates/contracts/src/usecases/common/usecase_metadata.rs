/// Метаданные UseCase для идентификации и маршрутизации
pub trait UseCaseMetadata {
    /// Индекс UseCase (например, "u508")
    fn usecase_index() -> &'static str;

    /// Техническое имя (например, "import_translations")
    fn usecase_name() -> &'static str;

    /// Отображаемое имя для UI
    fn display_name() -> &'static str;

    fn description() -> &'static str {
        ""
    }

    /// Полное имя вида "u508_import_translations"
    fn full_name() -> String {
        format!("{}_{}", Self::usecase_index(), Self::usecase_name())
    }

    /// Префикс HTTP-маршрутов UseCase, например "/api/u508"
    fn route_prefix() -> String {
        format!("/api/{}", Self::usecase_index())
    }
}
