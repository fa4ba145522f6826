//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use library_mcp::application::service::LibraryService;
use library_mcp::domain::model::book::AddBookRequest;
use library_mcp::domain::model::library::Library;
use library_mcp::domain::repository::LibraryRepository;

// =============================================================================
// InMemoryRepo — テスト用リポジトリ
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InMemoryError {
    #[error("in-memory store error: save disabled")]
    SaveDisabled,
    #[error("in-memory store error: {0}")]
    Json(#[from] serde_json::Error),
}

/// ファイルI/O不要のインメモリリポジトリ。
/// cloneは同じ保存領域を共有するので、Serviceに渡した後も中身を検査できる。
#[derive(Clone, Default)]
pub struct InMemoryRepo {
    stored: Rc<RefCell<Option<String>>>,
    saves: Rc<Cell<usize>>,
    fail_saves: Rc<Cell<bool>>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// 生のJSONを直接書き込む（破損ファイルの再現用）。
    pub fn with_raw(json: &str) -> Self {
        let repo = Self::new();
        *repo.stored.borrow_mut() = Some(json.to_string());
        repo
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// 保存済みのLibraryを直接読む。
    pub fn stored(&self) -> Option<Library> {
        self.stored
            .borrow()
            .as_deref()
            .map(|json| serde_json::from_str(json).unwrap())
    }
}

impl LibraryRepository for InMemoryRepo {
    type Error = InMemoryError;

    fn load(&self) -> Result<Library, Self::Error> {
        match self.stored.borrow().as_deref() {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(Library::new()),
        }
    }

    fn save(&self, library: &Library) -> Result<(), Self::Error> {
        if self.fail_saves.get() {
            return Err(InMemoryError::SaveDisabled);
        }
        let json = serde_json::to_string(library)?;
        *self.stored.borrow_mut() = Some(json);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn book(title: &str, author: &str, year: i64, genre: &str, read: bool) -> AddBookRequest {
    AddBookRequest {
        title: title.into(),
        author: author.into(),
        year,
        genre: genre.into(),
        read,
    }
}

/// 標準的なテスト用Library:
/// ```text
/// 1. Dune — Frank Herbert (1965) Science Fiction, read
/// 2. Foundation — Isaac Asimov (1951) Science Fiction, unread
/// 3. Pride and Prejudice — Jane Austen (1813) Romance, unread
/// ```
pub fn standard_requests() -> Vec<AddBookRequest> {
    vec![
        book("Dune", "Frank Herbert", 1965, "Science Fiction", true),
        book("Foundation", "Isaac Asimov", 1951, "Science Fiction", false),
        book("Pride and Prejudice", "Jane Austen", 1813, "Romance", false),
    ]
}

pub fn standard_library() -> Library {
    let mut library = Library::new();
    for req in standard_requests() {
        library.add(req);
    }
    library
}

/// 標準LibraryをInMemoryRepoに保存してServiceを開く。repoのハンドルも返す。
pub fn service_with_standard() -> (LibraryService<InMemoryRepo>, InMemoryRepo) {
    let repo = InMemoryRepo::new();
    repo.save(&standard_library()).unwrap();
    let svc = LibraryService::open(repo.clone()).unwrap();
    (svc, repo)
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}
