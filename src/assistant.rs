//! Question answering over live web content.
//!
//! Turns a cricket question into a search query, searches, extracts the
//! first candidate page that works and asks the generator for an answer
//! grounded in that page.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::llm::TextGenerator;
use crate::orchestrator::Extractor;
use crate::search::{SearchOptions, Searcher};
use crate::text::truncate_chars;

/// Prior turns included in prompts.
const HISTORY_TURNS: usize = 3;

/// Characters of extracted text handed to the answer prompt.
const CONTEXT_CHARS: usize = 1_500;

/// One exchange of an earlier conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user: String,
    pub assistant: String,
}

/// A composed answer and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub reply: String,
    pub search_query: String,
    pub source_url: String,
    /// Candidate URLs attempted, including the one that succeeded.
    pub candidates_tried: usize,
    pub answered_at: DateTime<Utc>,
}

/// Search -> extract -> generate.
///
/// Borrows the extractor; closing it stays with the caller.
pub struct Assistant<'a> {
    extractor: &'a Extractor,
    searcher: Arc<dyn Searcher>,
    generator: Arc<dyn TextGenerator>,
    search_options: SearchOptions,
}

impl<'a> Assistant<'a> {
    #[must_use]
    pub fn new(
        extractor: &'a Extractor,
        searcher: Arc<dyn Searcher>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            extractor,
            searcher,
            generator,
            search_options: SearchOptions::default(),
        }
    }

    #[must_use]
    pub fn with_search_options(mut self, options: SearchOptions) -> Self {
        self.search_options = options;
        self
    }

    /// Answer `question` in the context of `history`.
    pub async fn answer(&self, question: &str, history: &[ChatTurn]) -> Result<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::EmptyQuestion);
        }

        let search_query = self
            .generator
            .generate(&query_prompt(&question.to_lowercase(), history))
            .await?;
        let search_query = search_query.lines().next().unwrap_or_default().trim().to_string();
        info!(query = %search_query, "generated search query");

        let hits = self.searcher.search(&search_query, &self.search_options).await?;
        if hits.is_empty() {
            return Err(Error::NoSearchResults(search_query));
        }

        let mut candidates_tried = 0;
        let mut found = None;
        for (index, hit) in hits.iter().enumerate() {
            candidates_tried += 1;
            info!(candidate = index + 1, of = hits.len(), url = %hit.url, "trying candidate");

            let result = self.extractor.extract_single(&hit.url).await;
            if let Some(page) = result.data() {
                found = Some((hit.url.clone(), page.content.text.clone()));
                break;
            }
            warn!(url = %hit.url, error = result.error().unwrap_or_default(), "candidate failed");
        }
        let Some((source_url, text)) = found else {
            return Err(Error::NoInformationFound(question.to_string()));
        };

        let context = truncate_chars(text.trim(), CONTEXT_CHARS);
        let reply = self
            .generator
            .generate(&answer_prompt(question, context, history))
            .await?;

        info!(source = %source_url, reply_len = reply.len(), candidates_tried, "answer composed");
        Ok(Answer {
            reply,
            search_query,
            source_url,
            candidates_tried,
            answered_at: Utc::now(),
        })
    }
}

fn conversation_context(history: &[ChatTurn]) -> String {
    if history.is_empty() {
        return String::new();
    }
    let mut context = String::from("\n\nPrevious conversation:\n");
    for turn in &history[history.len().saturating_sub(HISTORY_TURNS)..] {
        let _ = writeln!(context, "User: {}\nAssistant: {}", turn.user, turn.assistant);
    }
    context
}

fn query_prompt(question: &str, history: &[ChatTurn]) -> String {
    format!(
        "You are an advanced cricket assistant. For the question I'm about to ask, provide only a \
         single line with the most relevant search query that will help find current cricket \
         information. Keep it concise and focused.\n{}\nCurrent question: {question}",
        conversation_context(history)
    )
}

fn answer_prompt(question: &str, context: &str, history: &[ChatTurn]) -> String {
    format!(
        "You are an expert cricket assistant. Answer the user's question using the provided \
         context and conversation history.\n\
         RESPONSE REQUIREMENTS:\n\
         - Be concise and to the point\n\
         - Use proper formatting with line breaks\n\
         - Focus only on answering the question asked\n\
         - Use bullet points for multiple items\n\
         {}\n\
         Current question: {question}\n\
         Available context:\n{context}\n\n\
         Provide a well-formatted, accurate answer:",
        conversation_context(history)
    )
}
