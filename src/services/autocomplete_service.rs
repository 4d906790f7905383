use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, sleep_until},
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    config::ClientConfig, dto::search::Suggestion, error::ServiceResult,
    services::collaborators::SearchCatalog,
};

/// Where the suggestion dropdown is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutocompleteState {
    /// Nothing pending and no list shown.
    Idle,
    /// Waiting for the player to stop typing.
    Debouncing {
        /// Query that will be searched if no further input arrives.
        query: String,
    },
    /// A search for `query` is in flight.
    Fetching {
        /// Query sent to the catalog.
        query: String,
    },
    /// Suggestions are displayed.
    Showing,
}

/// Keys the dropdown reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Move the highlight down.
    ArrowDown,
    /// Move the highlight up, back to none past the top.
    ArrowUp,
    /// Commit the highlight or submit the form.
    Enter,
    /// Close the list.
    Escape,
}

/// What the caller should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key has no effect in the current state.
    Ignored,
    /// The highlighted suggestion changed.
    SelectionMoved(Option<usize>),
    /// A suggestion was picked: fill the guess field with this text and refocus it.
    Committed(String),
    /// No suggestion is highlighted; submit the guess form as typed.
    SubmitForm,
    /// The list was closed.
    Dismissed,
}

/// Observable effect of a background report, returned by
/// [`AutocompleteController::next_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutocompleteEvent {
    /// The debounce elapsed and a search was sent.
    SearchStarted {
        /// Query sent to the catalog.
        query: String,
    },
    /// A fresh result list is displayed.
    SuggestionsShown {
        /// Number of suggestions shown after capping.
        count: usize,
    },
    /// The search returned nothing or failed; the list is closed.
    SuggestionsCleared,
    /// A response arrived for a query that is no longer current.
    StaleDiscarded {
        /// Query the dropped response belonged to.
        query: String,
    },
}

/// Identifies the only search whose outcome may still be displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SearchTicket {
    token: Uuid,
    query: String,
}

enum Report {
    Fired {
        token: Uuid,
        query: String,
    },
    Completed {
        token: Uuid,
        query: String,
        result: ServiceResult<Vec<Suggestion>>,
    },
}

/// Debounced, keyboard-navigable search dropdown backing the guess field.
///
/// Timers and searches run as Tokio tasks and report back over a channel;
/// reports are only applied when the owner awaits [`next_event`](Self::next_event),
/// so every state change happens on the owner's task.
pub struct AutocompleteController {
    catalog: Arc<dyn SearchCatalog>,
    debounce: Duration,
    min_query_chars: usize,
    suggestion_limit: usize,
    state: AutocompleteState,
    input: String,
    suggestions: Vec<Suggestion>,
    selected: Option<usize>,
    ticket: Option<SearchTicket>,
    debounce_task: Option<JoinHandle<()>>,
    reports_tx: mpsc::UnboundedSender<Report>,
    reports_rx: mpsc::UnboundedReceiver<Report>,
}

impl AutocompleteController {
    /// Build an idle controller searching `catalog` with the configured timing and caps.
    pub fn new(catalog: Arc<dyn SearchCatalog>, config: &ClientConfig) -> Self {
        let (reports_tx, reports_rx) = mpsc::unbounded_channel();
        Self {
            catalog,
            debounce: config.debounce,
            min_query_chars: config.min_query_chars,
            suggestion_limit: config.suggestion_limit,
            state: AutocompleteState::Idle,
            input: String::new(),
            suggestions: Vec::new(),
            selected: None,
            ticket: None,
            debounce_task: None,
            reports_tx,
            reports_rx,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &AutocompleteState {
        &self.state
    }

    /// Suggestions currently displayed, best first.
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Highlighted suggestion, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Current contents of the guess field.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The guess field changed.
    ///
    /// Any change discards the displayed suggestions. Short queries also
    /// cancel any pending search; longer ones restart the debounce.
    pub fn on_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.cancel_debounce();
        self.suggestions.clear();
        self.selected = None;

        let query = text.trim();
        if query.chars().count() < self.min_query_chars {
            self.ticket = None;
            self.close_list();
            return;
        }

        let ticket = SearchTicket {
            token: Uuid::new_v4(),
            query: query.to_string(),
        };
        let deadline = Instant::now() + self.debounce;
        let tx = self.reports_tx.clone();
        let (token, fired_query) = (ticket.token, ticket.query.clone());
        self.debounce_task = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            let _ = tx.send(Report::Fired {
                token,
                query: fired_query,
            });
        }));

        self.state = AutocompleteState::Debouncing {
            query: ticket.query.clone(),
        };
        self.ticket = Some(ticket);
    }

    /// Wait for the next timer or search report and apply it.
    ///
    /// Reports made obsolete by later input are skipped silently when they
    /// are timers and surfaced as [`AutocompleteEvent::StaleDiscarded`] when
    /// they are search responses.
    pub async fn next_event(&mut self) -> Option<AutocompleteEvent> {
        while let Some(report) = self.reports_rx.recv().await {
            if let Some(event) = self.apply(report) {
                return Some(event);
            }
        }
        None
    }

    fn apply(&mut self, report: Report) -> Option<AutocompleteEvent> {
        match report {
            Report::Fired { token, query } => {
                if !self.is_current(token, &query) {
                    debug!(%query, "ignoring superseded debounce timer");
                    return None;
                }
                self.debounce_task = None;
                self.state = AutocompleteState::Fetching {
                    query: query.clone(),
                };

                let search = self.catalog.search(query.clone());
                let tx = self.reports_tx.clone();
                let fetched_query = query.clone();
                tokio::spawn(async move {
                    let result = search.await;
                    let _ = tx.send(Report::Completed {
                        token,
                        query: fetched_query,
                        result,
                    });
                });

                Some(AutocompleteEvent::SearchStarted { query })
            }
            Report::Completed {
                token,
                query,
                result,
            } => {
                if !self.is_current(token, &query) {
                    debug!(%query, "discarding stale search response");
                    return Some(AutocompleteEvent::StaleDiscarded { query });
                }
                self.ticket = None;

                match result {
                    Ok(mut suggestions) if !suggestions.is_empty() => {
                        suggestions.truncate(self.suggestion_limit);
                        let count = suggestions.len();
                        self.suggestions = suggestions;
                        self.selected = None;
                        self.state = AutocompleteState::Showing;
                        Some(AutocompleteEvent::SuggestionsShown { count })
                    }
                    Ok(_) => {
                        self.close_list();
                        Some(AutocompleteEvent::SuggestionsCleared)
                    }
                    Err(err) => {
                        debug!(%query, error = %err, "search failed; closing suggestions");
                        self.close_list();
                        Some(AutocompleteEvent::SuggestionsCleared)
                    }
                }
            }
        }
    }

    /// React to a key press while the guess field has focus.
    pub fn on_key(&mut self, key: Key) -> KeyOutcome {
        match key {
            Key::ArrowDown => {
                let Some(last) = self.suggestions.len().checked_sub(1) else {
                    return KeyOutcome::Ignored;
                };
                self.selected = Some(self.selected.map_or(0, |index| (index + 1).min(last)));
                KeyOutcome::SelectionMoved(self.selected)
            }
            Key::ArrowUp => {
                if self.suggestions.is_empty() {
                    return KeyOutcome::Ignored;
                }
                self.selected = self.selected.and_then(|index| index.checked_sub(1));
                KeyOutcome::SelectionMoved(self.selected)
            }
            Key::Enter => match self.selected.and_then(|index| self.select(index)) {
                Some(text) => KeyOutcome::Committed(text),
                None => KeyOutcome::SubmitForm,
            },
            Key::Escape => {
                if self.suggestions.is_empty() {
                    return KeyOutcome::Ignored;
                }
                self.close_list();
                KeyOutcome::Dismissed
            }
        }
    }

    /// Highlight the suggestion under the pointer.
    pub fn hover(&mut self, index: usize) {
        if index < self.suggestions.len() {
            self.selected = Some(index);
        }
    }

    /// Pick suggestion `index`, returning the text written into the guess field.
    ///
    /// The programmatic field change never triggers a search.
    pub fn select(&mut self, index: usize) -> Option<String> {
        let text = self.suggestions.get(index)?.guess_text();
        self.cancel_debounce();
        self.ticket = None;
        self.input = text.clone();
        self.close_list();
        Some(text)
    }

    /// A click landed outside the field and the list.
    pub fn click_outside(&mut self) {
        self.suggestions.clear();
        self.selected = None;
        if matches!(self.state, AutocompleteState::Showing) {
            self.state = AutocompleteState::Idle;
        }
    }

    /// Forget everything, e.g. once the guess has been submitted.
    pub fn clear(&mut self) {
        self.cancel_debounce();
        self.ticket = None;
        self.input.clear();
        self.close_list();
    }

    fn is_current(&self, token: Uuid, query: &str) -> bool {
        self.ticket
            .as_ref()
            .is_some_and(|ticket| ticket.token == token && ticket.query == query)
    }

    fn cancel_debounce(&mut self) {
        if let Some(handle) = self.debounce_task.take() {
            handle.abort();
        }
    }

    fn close_list(&mut self) {
        self.suggestions.clear();
        self.selected = None;
        self.state = AutocompleteState::Idle;
    }
}

impl Drop for AutocompleteController {
    fn drop(&mut self) {
        self.cancel_debounce();
    }
}
