//! Chat session state for askcache
//!
//! A `ChatSession` owns one answer cache for its whole lifetime, keeps the
//! transcript shown to the user, and turns input lines into questions, URL
//! submissions, and cache housekeeping commands.

use chrono::Local;
use reqwest::Client;
use serde_json::Value;
use std::fmt;

use crate::cache::{AnswerCache, AnswerSource};
use crate::remote::{validate_url_input, AnswerClient, ApiConfig, Submission, UrlSubmitter};

/// Shown after the cache has been emptied
pub const CACHE_CLEARED_MESSAGE: &str =
    "Cache has been cleared. All future questions will fetch fresh responses.";

/// Shown for `/help`
pub const HELP_MESSAGE: &str = "Type a question to ask it. Commands: /url <URL> submits a URL, \
/stats shows cached questions, /clear empties the cache, /reset clears the chat, /quit exits.";

/// Who a transcript line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    /// The person typing
    User,
    /// An answer or an error from the gateway
    Assistant,
    /// Session notices (cache cleared, stats, submissions)
    System,
}

/// One line of the chat transcript
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub author: Author,
    pub text: String,
    /// Local wall-clock time, `HH:MM`
    pub timestamp: String,
    /// Set on assistant answers served from the cache
    pub from_cache: bool,
}

impl ChatMessage {
    fn new(author: Author, text: impl Into<String>, from_cache: bool) -> Self {
        Self {
            author,
            text: text.into(),
            timestamp: Local::now().format("%H:%M").to_string(),
            from_cache,
        }
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let who = match self.author {
            Author::User => "you",
            Author::Assistant => "assistant",
            Author::System => "system",
        };
        if self.from_cache {
            write!(f, "[{}] {} (cached): {}", self.timestamp, who, self.text)
        } else {
            write!(f, "[{}] {}: {}", self.timestamp, who, self.text)
        }
    }
}

/// What the caller should do after an input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Continue,
    Quit,
}

/// Text shown for an answer payload: strings as-is, anything else as compact JSON
pub fn render_answer(answer: &Value) -> String {
    match answer {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// A chat session backed by an answer cache and a URL submitter
pub struct ChatSession<S: AnswerSource<Answer = Value> = AnswerClient> {
    cache: AnswerCache<S>,
    submitter: UrlSubmitter,
    messages: Vec<ChatMessage>,
}

impl ChatSession<AnswerClient> {
    /// Creates a session talking to the gateway described by `config`
    pub fn connect(config: &ApiConfig) -> Self {
        let http_client = Client::new();
        Self::new(
            AnswerClient::with_client(http_client.clone(), config.clone()),
            UrlSubmitter::with_client(http_client, config.clone()),
        )
    }
}

impl<S: AnswerSource<Answer = Value>> ChatSession<S> {
    /// Creates a session with an empty cache and transcript
    pub fn new(source: S, submitter: UrlSubmitter) -> Self {
        Self {
            cache: AnswerCache::new(source),
            submitter,
            messages: Vec::new(),
        }
    }

    /// The session's answer cache
    pub fn cache(&self) -> &AnswerCache<S> {
        &self.cache
    }

    /// Transcript so far, oldest first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn push(&mut self, author: Author, text: impl Into<String>, from_cache: bool) {
        self.messages.push(ChatMessage::new(author, text, from_cache));
    }

    /// Asks a question and records both sides of the exchange
    ///
    /// Blank questions are ignored. Failures are recorded as the classified
    /// error message.
    pub async fn ask(&mut self, question: &str) {
        if question.trim().is_empty() {
            return;
        }
        self.push(Author::User, question, false);

        match self.cache.get_answer(question).await {
            Ok(outcome) => {
                let text = render_answer(&outcome.answer);
                self.push(Author::Assistant, text, outcome.from_cache);
            }
            Err(err) => self.push(Author::Assistant, err.to_string(), false),
        }
    }

    /// Empties the cache and notes it in the transcript
    pub fn clear_cache(&mut self) {
        self.cache.clear_cache();
        self.push(Author::System, CACHE_CLEARED_MESSAGE, false);
    }

    /// Empties the transcript; the cache is untouched
    pub fn clear_chat(&mut self) {
        self.messages.clear();
    }

    /// Records the cache size and keys
    pub fn show_stats(&mut self) {
        let stats = self.cache.stats();
        let text = if stats.keys.is_empty() {
            "Cache is empty.".to_string()
        } else {
            format!("{} cached: {}", stats.size, stats.keys.join(" | "))
        };
        self.push(Author::System, text, false);
    }

    /// Validates and submits a URL, recording the outcome
    ///
    /// Input that fails validation never reaches the network.
    pub async fn submit_url(&mut self, url: &str) -> Submission {
        let url = url.trim();
        let submission = match validate_url_input(url) {
            Err(err) => Submission {
                success: false,
                message: err.to_string(),
                data: None,
            },
            Ok(()) => match self.submitter.submit_url(url).await {
                Ok(submission) => submission,
                Err(err) => Submission::rejected(&err),
            },
        };

        let text = match &submission.data {
            Some(data) => format!("{} {}", submission.message, data),
            None => submission.message.clone(),
        };
        self.push(Author::System, text, false);
        submission
    }

    /// Handles one line of user input
    pub async fn handle_line(&mut self, line: &str) -> SessionAction {
        let line = line.trim();
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "/quit" | "/exit" => return SessionAction::Quit,
            "/clear" => self.clear_cache(),
            "/reset" => self.clear_chat(),
            "/stats" => self.show_stats(),
            "/help" => self.push(Author::System, HELP_MESSAGE, false),
            "/url" => {
                self.submit_url(argument).await;
            }
            _ => self.ask(line).await,
        }
        SessionAction::Continue
    }
}
