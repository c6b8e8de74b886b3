//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes rhyme lookups to AI assistants over stdio. The dictionary loads on
//! the first tool call that needs it and is shared by every call after.
//!
//! # Adding Tools
//!
//! 1. Define a parameter struct with `Deserialize` + `JsonSchema`
//! 2. Add a `#[tool(description = "...")]` method to the `#[tool_router]` impl
//! 3. Call into the engine, convert errors to `McpError`
//! 4. Return `CallToolResult::success(vec![Content::text(...)])`

use std::sync::Arc;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use rhymekit_core::{DictionaryError, RhymeEngine, RhymeOrder, SharedEngine, words};

use crate::commands::EngineSource;

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for tools that take a single word.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct WordParams {
    /// The word to look up.
    pub word: String,
}

/// Parameters for the `perfect_rhymes` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct PerfectRhymesParams {
    /// The word to rhyme.
    pub word: String,
    /// Include stopwords and other words unsuitable as suggestions.
    #[serde(default)]
    pub all: bool,
}

/// Parameters for the `near_rhymes` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct NearRhymesParams {
    /// The word to rhyme.
    pub word: String,
    /// Candidates fetched from the index before filtering.
    pub limit: Option<usize>,
    /// "index" (dictionary order, default) or "score" (best first).
    #[serde(default)]
    pub order: RhymeOrder,
}

/// MCP server answering rhyme queries.
#[derive(Clone)]
pub struct RhymeServer {
    engine: Option<Arc<SharedEngine>>,
    near_limit: usize,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
}

fn internal_error(e: impl std::fmt::Display) -> McpError {
    McpError::internal_error(e.to_string(), None)
}

fn json_text<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

impl RhymeServer {
    /// Load the dictionary now rather than on the first tool call.
    pub fn preload(&self) -> anyhow::Result<()> {
        let shared = self
            .engine
            .as_ref()
            .ok_or(DictionaryError::NotConfigured)?;
        let engine = shared.get()?;
        tracing::info!(
            path = %shared.path(),
            words = engine.dictionary().len(),
            "dictionary preloaded"
        );
        Ok(())
    }
}

#[tool_router]
impl RhymeServer {
    /// Create a server for the given dictionary source.
    ///
    /// Without a dictionary, rhyme tools answer with an error.
    pub fn new(source: EngineSource, near_limit: usize) -> Self {
        let engine = source
            .dictionary
            .map(|path| Arc::new(SharedEngine::new(path, source.settings)));
        Self {
            engine,
            near_limit,
            tool_router: Self::tool_router(),
        }
    }

    /// The loaded engine. The first call reads and indexes the dictionary on
    /// the blocking pool so runtime workers keep serving other requests.
    async fn engine(&self) -> Result<Arc<RhymeEngine>, McpError> {
        let shared = self
            .engine
            .as_ref()
            .ok_or_else(|| internal_error(DictionaryError::NotConfigured))?;
        if shared.is_loaded() {
            return shared.get().map_err(internal_error);
        }
        let shared = Arc::clone(shared);
        tokio::task::spawn_blocking(move || shared.get())
            .await
            .map_err(internal_error)?
            .map_err(internal_error)
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "dictionary": self.engine.as_ref().map(|e| e.path().to_string()),
        });

        if params.format == "json" {
            return json_text(&info);
        }
        let text = format!(
            "{} v{}\n{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_DESCRIPTION"),
        );
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Count syllables in a word.
    #[tool(description = "Count syllables in a word. Unknown words count 0.")]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", word = %params.word))]
    async fn syllable_count(
        &self,
        Parameters(params): Parameters<WordParams>,
    ) -> Result<CallToolResult, McpError> {
        let engine = self.engine().await?;
        let syllables = engine.syllable_count(&params.word);
        tracing::info!(tool = "syllable_count", syllables, "MCP tool completed");
        json_text(&serde_json::json!({
            "known": engine.contains(&params.word),
            "syllables": syllables,
            "word": params.word,
        }))
    }

    /// Show the rhyme tail of a word.
    #[tool(
        description = "Get a word's rhyme tail: its phonemes from the last stressed vowel to the end, stress digits removed."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", word = %params.word))]
    async fn rhyme_tail(
        &self,
        Parameters(params): Parameters<WordParams>,
    ) -> Result<CallToolResult, McpError> {
        let engine = self.engine().await?;
        json_text(&serde_json::json!({
            "tail": engine.rhyme_tail(&params.word),
            "perfect_key": engine.perfect_key(&params.word),
            "word": params.word,
        }))
    }

    /// List perfect rhymes.
    #[tool(description = "List words whose rhyme tail is identical to the given word's.")]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", word = %params.word))]
    async fn perfect_rhymes(
        &self,
        Parameters(params): Parameters<PerfectRhymesParams>,
    ) -> Result<CallToolResult, McpError> {
        let engine = self.engine().await?;
        let mut rhymes = engine.perfect_rhyme_group(&params.word);
        if !params.all {
            rhymes.retain(|w| words::is_suggestable(w));
        }
        tracing::info!(
            tool = "perfect_rhymes",
            count = rhymes.len(),
            "MCP tool completed"
        );
        json_text(&serde_json::json!({ "word": params.word, "rhymes": rhymes }))
    }

    /// List near rhymes.
    #[tool(
        description = "List near rhymes: same final vowel sound, similar ending and length. Each has a 0-1 quality score."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", word = %params.word))]
    async fn near_rhymes(
        &self,
        Parameters(params): Parameters<NearRhymesParams>,
    ) -> Result<CallToolResult, McpError> {
        let engine = self.engine().await?;
        let limit = params.limit.unwrap_or(self.near_limit);
        let rhymes = engine.ranked_near_rhymes(&params.word, limit, params.order);
        tracing::info!(
            tool = "near_rhymes",
            limit,
            count = rhymes.len(),
            "MCP tool completed"
        );
        json_text(&serde_json::json!({ "word": params.word, "rhymes": rhymes }))
    }
}

#[tool_handler]
impl ServerHandler for RhymeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use tools to count syllables and find perfect and near rhymes.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;
    use rmcp::model::RawContent;

    /// Extract text from the first content item in a `CallToolResult`.
    fn extract_text(result: &CallToolResult) -> Option<&str> {
        result.content.first().and_then(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
    }

    fn json_of(result: &CallToolResult) -> serde_json::Value {
        let text = extract_text(result).expect("should have text content");
        serde_json::from_str(text).expect("valid JSON")
    }

    fn word(w: &str) -> Parameters<WordParams> {
        Parameters(WordParams { word: w.to_string() })
    }

    #[test]
    fn server_info_has_correct_name() {
        let server = RhymeServer::new(EngineSource::default(), 200);
        let info = ServerHandler::get_info(&server);

        assert_eq!(info.server_info.name, env!("CARGO_PKG_NAME"));
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn get_info_tool_returns_json_when_requested() {
        let (_dir, source) = test_support::source();
        let server = RhymeServer::new(source, 200);
        let params = Parameters(GetInfoParams {
            format: "json".to_string(),
        });

        let result = server.get_info(params).expect("get_info should succeed");
        let json = json_of(&result);
        assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
        assert!(json["dictionary"].as_str().unwrap().ends_with("test.dict"));
    }

    #[test]
    fn get_info_does_not_load_dictionary() {
        let (_dir, source) = test_support::source();
        let server = RhymeServer::new(source, 200);
        let params = Parameters(GetInfoParams {
            format: "text".to_string(),
        });
        server.get_info(params).expect("get_info should succeed");
        assert!(!server.engine.as_ref().unwrap().is_loaded());
    }

    #[test]
    fn preload_loads_once() {
        let (_dir, source) = test_support::source();
        let server = RhymeServer::new(source, 200);
        server.preload().unwrap();
        assert!(server.engine.as_ref().unwrap().is_loaded());
    }

    #[tokio::test]
    async fn rhyme_tools_fail_without_dictionary() {
        let server = RhymeServer::new(EngineSource::default(), 200);
        let err = server.syllable_count(word("cat")).await.unwrap_err();
        assert!(err.message.contains("no dictionary configured"));
    }

    #[tokio::test]
    async fn syllable_count_tool_works() {
        let (_dir, source) = test_support::source();
        let server = RhymeServer::new(source, 200);

        let json = json_of(&server.syllable_count(word("night")).await.unwrap());
        assert_eq!(json["syllables"], 1);
        assert_eq!(json["known"], true);
    }

    #[tokio::test]
    async fn rhyme_tail_tool_works() {
        let (_dir, source) = test_support::source();
        let server = RhymeServer::new(source, 200);

        let json = json_of(&server.rhyme_tail(word("cat")).await.unwrap());
        assert_eq!(json["perfect_key"], "AE T");
        assert_eq!(json["tail"], serde_json::json!(["AE", "T"]));
    }

    #[tokio::test]
    async fn perfect_rhymes_tool_filters_unsuitable_words() {
        let (_dir, source) = test_support::source();
        let server = RhymeServer::new(source, 200);

        let params = Parameters(PerfectRhymesParams {
            word: "cat".to_string(),
            all: false,
        });
        let json = json_of(&server.perfect_rhymes(params).await.unwrap());
        assert_eq!(json["rhymes"], serde_json::json!(["hat", "flat", "matte"]));
    }

    #[tokio::test]
    async fn near_rhymes_tool_scores_candidates() {
        let (_dir, source) = test_support::source();
        let server = RhymeServer::new(source, 200);

        let params = Parameters(NearRhymesParams {
            word: "night".to_string(),
            limit: None,
            order: RhymeOrder::Index,
        });
        let json = json_of(&server.near_rhymes(params).await.unwrap());
        let rhymes = json["rhymes"].as_array().unwrap();
        let words: Vec<&str> = rhymes.iter().map(|r| r["word"].as_str().unwrap()).collect();
        assert_eq!(words, ["light", "kite", "time", "rhyme"]);
        assert!(rhymes.iter().all(|r| r["score"].as_f64().unwrap() >= 0.45));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_first_calls_share_one_load() {
        let (_dir, source) = test_support::source();
        let server = RhymeServer::new(source, 200);
        assert!(!server.engine.as_ref().unwrap().is_loaded());

        let (a, b) = tokio::join!(
            server.syllable_count(word("night")),
            server.rhyme_tail(word("cat")),
        );
        assert_eq!(json_of(&a.unwrap())["syllables"], 1);
        assert_eq!(json_of(&b.unwrap())["perfect_key"], "AE T");
        assert!(server.engine.as_ref().unwrap().is_loaded());
    }
}
