//! Execution and decoration contract tests
//!
//! Scenarios pin the dispatch ordering rules, the in-flight rejection
//! behavior and the stats-to-decoration pipeline end to end.
