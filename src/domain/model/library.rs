use serde::{Deserialize, Serialize};

use super::book::{AddBookRequest, Book, SearchField};

/// 蔵書統計。read_percentは丸めずに保持し、表示時にのみ丸める。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LibraryStats {
    pub total: usize,
    pub read_count: usize,
    pub read_percent: f64,
}

/// Library — 集約ルート。挿入順を保持し、表示番号はこの順に振られる。
/// タイトルを含めどのフィールドにも一意制約はない。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library {
    books: Vec<Book>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// 末尾に追加する。失敗しない。
    pub fn add(&mut self, req: AddBookRequest) -> &Book {
        let index = self.books.len();
        self.books.push(Book::from_request(req));
        &self.books[index]
    }

    /// タイトルが完全一致（大文字小文字を区別）する本を全て削除し、削除件数を返す。
    pub fn remove(&mut self, title: &str) -> usize {
        let before = self.books.len();
        self.books.retain(|book| book.title() != title);
        before - self.books.len()
    }

    /// 指定フィールドにqueryを含む本をLibrary順で返す（大文字小文字を区別しない）。
    /// 空のqueryは全件に一致する。
    pub fn search(&self, field: SearchField, query: &str) -> Vec<&Book> {
        let query = query.to_lowercase();
        self.books
            .iter()
            .filter(|book| field.get(book).to_lowercase().contains(&query))
            .collect()
    }

    pub fn list(&self) -> &[Book] {
        &self.books
    }

    pub fn titles(&self) -> Vec<&str> {
        self.books.iter().map(Book::title).collect()
    }

    pub fn stats(&self) -> LibraryStats {
        let total = self.books.len();
        let read_count = self.books.iter().filter(|book| book.is_read()).count();
        let read_percent = if total > 0 {
            read_count as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        LibraryStats {
            total,
            read_count,
            read_percent,
        }
    }
}
