use std::sync::Arc;

use algo_lsp_core::Vocabulary;
use dashmap::DashMap;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::capabilities;
use crate::document::Document;
use crate::handlers;

pub struct Backend {
    client: Client,
    documents: DashMap<Url, Document>,
    vocabulary: Arc<Vocabulary>,
    debug: bool,
}

impl Backend {
    pub fn new(client: Client, vocabulary: Arc<Vocabulary>, debug: bool) -> Self {
        Self {
            client,
            documents: DashMap::new(),
            vocabulary,
            debug,
        }
    }

    async fn log_debug(&self, message: &str) {
        tracing::debug!("{message}");
        if self.debug {
            self.client
                .log_message(MessageType::INFO, format!("[DEBUG] {}", message))
                .await;
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        self.log_debug("Initializing Algo LSP server").await;

        Ok(InitializeResult {
            capabilities: capabilities::server_capabilities(),
            server_info: Some(ServerInfo {
                name: "algo-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        tracing::info!("client initialized");
        self.client
            .log_message(MessageType::INFO, "Algo LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.log_debug("Shutting down server").await;
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        self.log_debug(&format!("Document opened: {}", uri)).await;
        self.documents
            .insert(uri, Document::new(params.text_document.text));
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        self.log_debug(&format!("Document changed: {}", uri)).await;

        if let Some(mut doc) = self.documents.get_mut(&uri) {
            // Full sync: the last change holds the whole text
            for change in params.content_changes {
                doc.update_text(change.text);
            }
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.log_debug(&format!("Document closed: {}", uri)).await;
        self.documents.remove(&uri);
    }

    async fn completion(
        &self,
        params: CompletionParams,
    ) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        self.log_debug(&format!("Completion request at {:?}", position))
            .await;

        let items = match self.documents.get(uri) {
            Some(doc) => handlers::completion::get_completions(&doc, &self.vocabulary, position),
            None => return Ok(None),
        };
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn folding_range(
        &self,
        params: FoldingRangeParams,
    ) -> Result<Option<Vec<FoldingRange>>> {
        let uri = &params.text_document.uri;

        self.log_debug(&format!("Folding ranges for: {}", uri)).await;

        let ranges = match self.documents.get(uri) {
            Some(doc) => handlers::folding::get_folding_ranges(&doc),
            None => return Ok(None),
        };
        Ok(Some(ranges))
    }

    async fn semantic_tokens_full(
        &self,
        params: SemanticTokensParams,
    ) -> Result<Option<SemanticTokensResult>> {
        let uri = &params.text_document.uri;

        self.log_debug(&format!("Semantic tokens for: {}", uri)).await;

        let data = match self.documents.get(uri) {
            Some(doc) => handlers::semantic_tokens::get_semantic_tokens(&doc, &self.vocabulary),
            None => return Ok(None),
        };
        Ok(Some(SemanticTokensResult::Tokens(SemanticTokens {
            result_id: None,
            data,
        })))
    }
}
