use crate::domain::model::book::{AddBookRequest, Book, SearchField};
use crate::domain::model::library::{Library, LibraryStats};
use crate::domain::repository::LibraryRepository;

use super::error::AppError;

/// Libraryに対するユースケース。
/// 起動時に一度だけloadし、以降はメモリ上のLibraryを変更するたびにsaveする。
pub struct LibraryService<R: LibraryRepository> {
    repo: R,
    library: Library,
}

impl<R: LibraryRepository> LibraryService<R> {
    /// 保存済みのLibraryを読み込んでServiceを作る。ファイルが無ければ空で始める。
    pub fn open(repo: R) -> Result<Self, AppError> {
        let library = repo.load().map_err(|e| AppError::Storage(Box::new(e)))?;
        tracing::info!(books = library.len(), "library opened");
        Ok(Self { repo, library })
    }

    /// 本を末尾に追加して永続化する。正規化後のBookを返す。
    pub fn add_book(&mut self, req: AddBookRequest) -> Result<Book, AppError> {
        let book = self.library.add(req).clone();
        tracing::info!(title = book.title(), author = book.author(), "book added");
        self.persist()?;
        Ok(book)
    }

    /// タイトル完全一致の本を全て削除して永続化する。削除件数を返す。
    pub fn remove_book(&mut self, title: &str) -> Result<usize, AppError> {
        let removed = self.library.remove(title);
        tracing::info!(title, removed, "books removed");
        self.persist()?;
        Ok(removed)
    }

    pub fn search(&self, field: SearchField, query: &str) -> Vec<&Book> {
        self.library.search(field, query)
    }

    pub fn list(&self) -> &[Book] {
        self.library.list()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.library.titles()
    }

    pub fn stats(&self) -> LibraryStats {
        self.library.stats()
    }

    /// 現在の状態を明示的に保存する（終了時など）。
    pub fn save(&self) -> Result<(), AppError> {
        self.persist()?;
        tracing::info!(books = self.library.len(), "library saved");
        Ok(())
    }

    // --- private ---

    fn persist(&self) -> Result<(), AppError> {
        self.repo
            .save(&self.library)
            .map_err(|e| AppError::Storage(Box::new(e)))
    }
}
