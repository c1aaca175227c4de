//! Travel planner server.
//!
//! A web application that answers: "How do I get from here to there by
//! rail?" Visitors pick two places through an autocomplete lookup; the pair
//! goes to a remote journey endpoint and the returned itinerary is shown
//! grouped by line.

pub mod config;
pub mod debounce;
pub mod domain;
pub mod form;
pub mod journey;
pub mod places;
pub mod web;
