//! Dashboard State
//!
//! One snapshot of everything the page shows. Transitions consume the
//! snapshot and return the next one:
//!
//! ```text
//! Idle ──begin──▶ Loading{ticket} ──resolve(ticket, Ok)──▶ Loaded
//!                    │    ▲        └─resolve(ticket, Err)─▶ Failed
//!                    └────┘ begin (supersedes, old ticket goes stale)
//! ```
//!
//! Each search gets a [`Ticket`]. Only the ticket currently loading can
//! resolve; answers for superseded tickets are dropped, so a slow earlier
//! request never overwrites a later one.

use crate::error::FALLBACK_MESSAGE;
use crate::history::RecentSymbols;
use crate::model::AnalysisReport;

/// Placeholder pair in the search box
pub const DEFAULT_QUERY: &str = "BTC/USDT";

/// Identifies one search request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Request lifecycle
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading { ticket: Ticket, symbol: String },
    Loaded,
    Failed(String),
}

/// What the page should render
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum View<'a> {
    /// Nothing searched yet
    Idle,
    /// Spinner
    Loading { symbol: &'a str },
    /// Latest search succeeded
    Loaded(&'a AnalysisReport),
    /// Latest search failed; the banner sits above the previous report, if any
    Failed {
        message: &'a str,
        previous: Option<&'a AnalysisReport>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Dashboard {
    query: String,
    status: Status,
    report: Option<AnalysisReport>,
    history: RecentSymbols,
    issued: u64,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::with_history(RecentSymbols::default())
    }
}

impl Dashboard {
    pub fn with_history(history: RecentSymbols) -> Self {
        Self {
            query: DEFAULT_QUERY.into(),
            status: Status::Idle,
            report: None,
            history,
            issued: 0,
        }
    }

    /// Update the search box text
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Start a search for `symbol`.
    ///
    /// Blank input leaves the snapshot untouched and yields no ticket. A
    /// search already in flight is superseded.
    #[must_use]
    pub fn begin(mut self, symbol: &str) -> (Self, Option<Ticket>) {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return (self, None);
        }

        if let Status::Loading { ticket, .. } = &self.status {
            tracing::debug!(superseded = %ticket, "New search supersedes pending request");
        }

        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.query = symbol.to_string();
        self.status = Status::Loading {
            ticket,
            symbol: symbol.to_string(),
        };

        (self, Some(ticket))
    }

    /// Apply the outcome of a search.
    ///
    /// Outcomes for any ticket other than the one loading are discarded.
    #[must_use]
    pub fn resolve(mut self, ticket: Ticket, outcome: Result<AnalysisReport, String>) -> Self {
        let symbol = match &self.status {
            Status::Loading { ticket: current, symbol } if *current == ticket => symbol.clone(),
            _ => {
                tracing::debug!(%ticket, "Discarding stale analysis response");
                return self;
            }
        };

        self.status = match outcome {
            Ok(report) => {
                self.history.record(&symbol);
                self.report = Some(report);
                Status::Loaded
            }
            Err(message) if message.trim().is_empty() => Status::Failed(FALLBACK_MESSAGE.into()),
            Err(message) => Status::Failed(message),
        };

        self
    }

    pub fn view(&self) -> View<'_> {
        match (&self.status, &self.report) {
            (Status::Loading { symbol, .. }, _) => View::Loading {
                symbol: symbol.as_str(),
            },
            (Status::Failed(message), previous) => View::Failed {
                message: message.as_str(),
                previous: previous.as_ref(),
            },
            (Status::Loaded, Some(report)) => View::Loaded(report),
            (Status::Idle | Status::Loaded, _) => View::Idle,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub const fn status(&self) -> &Status {
        &self.status
    }

    pub const fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    pub const fn history(&self) -> &RecentSymbols {
        &self.history
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self.status, Status::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            Status::Failed(message) => Some(message),
            _ => None,
        }
    }
}
