//! Unit tests for the backlog item module.

mod backlog_item_tests;
