//! Unit tests for the chat turn driver.
