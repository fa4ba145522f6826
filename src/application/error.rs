#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 永続化ファイルの読み書きに失敗した（ファイル破損を含む）。
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}
