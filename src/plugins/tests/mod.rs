//! Unit tests for the bundled plugins.

mod web_search_tests;
