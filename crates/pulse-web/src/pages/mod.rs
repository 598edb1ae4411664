//! Page Components

mod analyzer;

pub use analyzer::AnalyzerPage;
