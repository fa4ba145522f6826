//! MCP Server for library-mcp
//!
//! MCP Protocol (stdio) <-> application::LibraryService / ReportService
//!
//! 6 tools: add_book, remove_book, search_books, list_books, statistics, save_library

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use rmcp::{
    handler::server::{tool::ToolCallContext, tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
    transport::stdio,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::application::error::AppError;
use crate::application::report::ReportService;
use crate::application::service::LibraryService;
use crate::domain::model::book::{AddBookRequest, SearchField};
use crate::infra::json_store::JsonLibraryRepository;

// =============================================================================
// Public entry point
// =============================================================================

/// MCP Serverを起動する。library_pathは永続化ファイル。
/// 起動時に一度loadし、クライアント切断時に最終saveする。
pub async fn run(library_path: PathBuf) -> anyhow::Result<()> {
    let repo = JsonLibraryRepository::new(library_path);
    tracing::info!(path = %repo.path().display(), "serving library over stdio");
    let svc = LibraryService::open(repo)?;

    let server = LibraryMcpServer::new(svc);
    let store = server.store.clone();
    let service = server.serve(stdio()).await?;
    let quit = service.waiting().await;

    final_save(&store)?;
    quit?;
    Ok(())
}

/// 終了時の保存。待機が失敗した場合も先に保存する。
fn final_save(store: &Store) -> anyhow::Result<()> {
    let guard = store
        .lock()
        .map_err(|_| anyhow::anyhow!("library lock poisoned"))?;
    guard.save()?;
    Ok(())
}

// =============================================================================
// MCP Server
// =============================================================================

type Store = Arc<Mutex<LibraryService<JsonLibraryRepository>>>;

#[derive(Clone)]
struct LibraryMcpServer {
    store: Store,
    tool_router: ToolRouter<Self>,
}

impl LibraryMcpServer {
    fn new(svc: LibraryService<JsonLibraryRepository>) -> Self {
        Self {
            store: Arc::new(Mutex::new(svc)),
            tool_router: Self::tool_router(),
        }
    }

    fn service(&self) -> Result<MutexGuard<'_, LibraryService<JsonLibraryRepository>>, McpError> {
        self.store
            .lock()
            .map_err(|_| McpError::internal_error("Lock poisoned", None))
    }

    fn to_mcp_error(e: AppError) -> McpError {
        McpError::internal_error(format!("{e}"), None)
    }
}

// =============================================================================
// ServerHandler impl
// =============================================================================

impl ServerHandler for LibraryMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "library-mcp".to_string(),
                title: Some("Library MCP — Personal Book Catalog".to_string()),
                description: Some(
                    "Record books you own or have read, search them, and view reading statistics."
                        .to_string(),
                ),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Personal book catalog persisted to a JSON file.\n\
                 \n\
                 Tools: `add_book`, `remove_book` (removes every book with that exact title), \
                 `search_books` (by title or author, case-insensitive), `list_books`, \
                 `statistics`, `save_library`. Changes are saved after every edit."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool_ctx = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_ctx).await
    }
}

// =============================================================================
// Request types
// =============================================================================

fn parse_search_field(s: &str) -> Result<SearchField, McpError> {
    s.parse::<SearchField>()
        .map_err(|e| McpError::invalid_params(format!("{e}"), None))
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpAddBookRequest {
    #[schemars(description = "Book title")]
    pub title: String,
    #[schemars(description = "Author name")]
    pub author: String,
    #[schemars(description = "Publication year (negative values are stored as 0)")]
    pub year: i64,
    #[schemars(description = "Genre (free text)")]
    pub genre: String,
    #[schemars(description = "Whether you have read this book (default: false)")]
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpRemoveBookRequest {
    #[schemars(
        description = "Exact, case-sensitive title. Every book with this title is removed."
    )]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpSearchRequest {
    #[schemars(description = "Field to search: title or author")]
    pub field: String,
    #[schemars(description = "Search term (case-insensitive substring, must not be empty; whitespace is searched literally)")]
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpEmptyRequest {}

// =============================================================================
// Tool implementations
// =============================================================================

#[tool_router]
impl LibraryMcpServer {
    #[tool(
        name = "add_book",
        description = "Add a new book to the end of the library. Strings are trimmed.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn add_book(
        &self,
        Parameters(req): Parameters<McpAddBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut svc = self.service()?;
        let book = svc
            .add_book(AddBookRequest {
                title: req.title,
                author: req.author,
                year: req.year,
                genre: req.genre,
                read: req.read,
            })
            .map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "✅ Book added successfully: {} by {}",
            book.title(),
            book.author()
        ))]))
    }

    #[tool(
        name = "remove_book",
        description = "Remove every book whose title exactly matches (case-sensitive). Use `list_books` to see titles.",
        annotations(
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn remove_book(
        &self,
        Parameters(req): Parameters<McpRemoveBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut svc = self.service()?;
        if svc.list().is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "Your library is empty.",
            )]));
        }

        let removed = svc.remove_book(&req.title).map_err(Self::to_mcp_error)?;
        let output = match removed {
            0 => format!(
                "No book titled '{}'. Available titles: {}",
                req.title,
                svc.titles().join(", ")
            ),
            1 => format!("❌ Book removed successfully: {}", req.title),
            n => format!("❌ {} books removed successfully: {}", n, req.title),
        };
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(
        name = "search_books",
        description = "Search books by title or author (case-insensitive substring match).",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn search_books(
        &self,
        Parameters(req): Parameters<McpSearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let field = parse_search_field(&req.field)?;
        if req.query.is_empty() {
            return Err(McpError::invalid_params("query must not be empty", None));
        }

        let svc = self.service()?;
        let results = svc.search(field, &req.query);
        if results.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "No matching books found.",
            )]));
        }

        Ok(CallToolResult::success(vec![Content::text(
            ReportService::render_books(results),
        )]))
    }

    #[tool(
        name = "list_books",
        description = "Display all books in insertion order, numbered from 1.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn list_books(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpEmptyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let svc = self.service()?;
        let books = svc.list();
        if books.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "No books in your library yet.",
            )]));
        }

        Ok(CallToolResult::success(vec![Content::text(
            ReportService::render_books(books),
        )]))
    }

    #[tool(
        name = "statistics",
        description = "Show total number of books and how many (and what percentage) have been read.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn statistics(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpEmptyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let svc = self.service()?;
        Ok(CallToolResult::success(vec![Content::text(
            ReportService::render_stats(&svc.stats()),
        )]))
    }

    #[tool(
        name = "save_library",
        description = "Write the library to its file now. Edits are already saved automatically; use this before exiting.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn save_library(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpEmptyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let svc = self.service()?;
        svc.save().map_err(Self::to_mcp_error)?;
        Ok(CallToolResult::success(vec![Content::text(
            "✅ Library saved to file. Goodbye!",
        )]))
    }
}

// =============================================================================
// Tests
// =============================================================================
