use crate::domain::model::book::Book;
use crate::domain::model::library::LibraryStats;

/// Library → 表示用Markdownへの変換
pub struct ReportService;

impl ReportService {
    /// 1冊を1行のMarkdownに変換する。番号は1始まり。
    pub fn render_book(book: &Book, index: usize) -> String {
        let status = if book.is_read() {
            "✅ Read"
        } else {
            "📖 Unread"
        };
        format!(
            "**{}. {}** by *{}* ({}) - {} - {}",
            index + 1,
            book.title(),
            book.author(),
            book.year(),
            book.genre(),
            status
        )
    }

    /// 本の一覧を番号付きで改行区切りに変換する。番号は渡された順に振り直す。
    pub fn render_books<'a>(books: impl IntoIterator<Item = &'a Book>) -> String {
        books
            .into_iter()
            .enumerate()
            .map(|(i, book)| Self::render_book(book, i))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 統計を表示用に変換する。割合は小数1桁に丸める。
    pub fn render_stats(stats: &LibraryStats) -> String {
        format!(
            "**Total Books:** {}\n**Read:** {} ({:.1}%)",
            stats.total, stats.read_count, stats.read_percent
        )
    }
}
