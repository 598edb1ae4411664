//! # pulse-analyzer
//!
//! Turns a trading pair into a structured market read by asking a hosted
//! model, and keeps the view state the dashboard renders from.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────┐   begin()   ┌─────────┐  analyze()  ┌─────────────┐
//! │  symbol  │────────────▶│ Loading │────────────▶│ LlmProvider │
//! └──────────┘             └─────────┘             └──────┬──────┘
//!                               ▲ resolve(ticket, ..)     │ one call
//!                               │                         ▼
//! ┌──────────────────┐    ┌─────┴──────┐   decode   ┌───────────┐
//! │ Loaded / Failed  │◀───│  Dashboard │◀───────────│ JSON text │
//! │ + history update │    └────────────┘  + sources └───────────┘
//! └──────────────────┘
//! ```
//!
//! The chart next to the analysis is a random walk seeded from the
//! sentiment score. It is filler, not market data.

pub mod chart;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod model;
pub mod presentation;
pub mod prompt;
pub mod sources;

#[cfg(feature = "runtime")]
pub mod analyzer;

pub use dashboard::{Dashboard, Status, Ticket, View};
pub use error::{AnalyzerError, Result};
pub use history::RecentSymbols;
pub use model::{AnalysisReport, AnalysisResult, ChartPoint, Signal, Source, TechnicalIndicators};

#[cfg(feature = "runtime")]
pub use analyzer::{LlmAnalyzer, MarketAnalyzer, MockAnalyzer};
