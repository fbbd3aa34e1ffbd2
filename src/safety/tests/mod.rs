//! Unit tests for escalation tracking and the safety plugin.
