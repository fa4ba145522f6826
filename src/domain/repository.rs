use super::model::library::Library;

/// 永続化の抽象。Infra層が実装する。
pub trait LibraryRepository {
    type Error: std::error::Error + Send + Sync + 'static;

    /// 保存済みのLibraryを読み込む。未保存なら空のLibraryを返す。
    fn load(&self) -> Result<Library, Self::Error>;
    fn save(&self, library: &Library) -> Result<(), Self::Error>;
}
