//! Unit tests for the sprint module.

mod service_tests;
