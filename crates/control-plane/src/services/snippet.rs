// Snippet service for business logic
//
// Inputs arrive already validated and normalized (see api::validation).

use snippets_core::{
    NewSnippet, Principal, Result, Snippet, SnippetFilter, SnippetPatch, SnippetStore, TagSummary,
};
use std::sync::Arc;
use tracing::Instrument;

pub struct SnippetService {
    store: Arc<dyn SnippetStore>,
}

impl SnippetService {
    pub fn new(store: Arc<dyn SnippetStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: SnippetFilter) -> Result<Vec<Snippet>> {
        self.store.list_snippets(&filter).await
    }

    pub async fn get(&self, id: i64) -> Result<Option<Snippet>> {
        self.store.get_snippet(id).await
    }

    pub async fn create(&self, principal: &Principal, input: NewSnippet) -> Result<Snippet> {
        let span = tracing::info_span!(
            "snippet.create",
            principal_id = %principal.id,
            principal = %principal.label,
            snippet_id = tracing::field::Empty,
        );

        self.create_inner(input).instrument(span).await
    }

    async fn create_inner(&self, input: NewSnippet) -> Result<Snippet> {
        let snippet = self.store.create_snippet(input).await?;

        // Record snippet ID on span
        tracing::Span::current().record("snippet_id", snippet.id);
        tracing::info!(
            language = %snippet.language,
            tags = snippet.tags.len(),
            "Snippet created"
        );
        Ok(snippet)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: i64,
        patch: SnippetPatch,
    ) -> Result<Option<Snippet>> {
        let span = tracing::info_span!(
            "snippet.update",
            principal_id = %principal.id,
            principal = %principal.label,
            snippet_id = id,
        );

        self.update_inner(id, patch).instrument(span).await
    }

    async fn update_inner(&self, id: i64, patch: SnippetPatch) -> Result<Option<Snippet>> {
        if patch.is_empty() {
            return self.store.get_snippet(id).await;
        }
        let updated = self.store.update_snippet(id, patch).await?;
        if updated.is_some() {
            tracing::info!("Snippet updated");
        }
        Ok(updated)
    }

    pub async fn delete(&self, principal: &Principal, id: i64) -> Result<bool> {
        let deleted = self.store.delete_snippet(id).await?;
        if deleted {
            tracing::info!(
                principal_id = %principal.id,
                principal = %principal.label,
                snippet_id = id,
                "Snippet deleted"
            );
        }
        Ok(deleted)
    }

    pub async fn languages(&self) -> Result<Vec<String>> {
        self.store.list_languages().await
    }

    pub async fn tags(&self) -> Result<Vec<TagSummary>> {
        self.store.list_tags().await
    }
}
