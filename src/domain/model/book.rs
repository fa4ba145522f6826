use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// 本の追加リクエスト。文字列は未トリム、年は符号付きのまま受け取る。
#[derive(Debug, Clone)]
pub struct AddBookRequest {
    pub title: String,
    pub author: String,
    pub year: i64,
    pub genre: String,
    pub read: bool,
}

/// 蔵書1件。Libraryが所有し、Libraryを通じて追加・削除する。
///
/// フィールド順はそのまま永続化ファイルのキー順になる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    title: String,
    author: String,
    year: u32,
    genre: String,
    read: bool,
}

impl Book {
    /// リクエストを正規化してBookを作る。検証はしない（トリムと年の丸めのみ）。
    pub fn from_request(req: AddBookRequest) -> Self {
        Self {
            title: req.title.trim().to_string(),
            author: req.author.trim().to_string(),
            year: coerce_year(req.year),
            genre: req.genre.trim().to_string(),
            read: req.read,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn is_read(&self) -> bool {
        self.read
    }
}

/// 負の年は0、u32を超える年はu32::MAXに丸める。
fn coerce_year(year: i64) -> u32 {
    u32::try_from(year.max(0)).unwrap_or(u32::MAX)
}

/// 検索対象のフィールド。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
}

impl SearchField {
    /// 指定フィールドの値を返す。
    pub fn get(self, book: &Book) -> &str {
        match self {
            Self::Title => book.title(),
            Self::Author => book.author(),
        }
    }
}

impl FromStr for SearchField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            _ => Err(DomainError::UnknownSearchField(s.to_string())),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::Author => write!(f, "author"),
        }
    }
}
