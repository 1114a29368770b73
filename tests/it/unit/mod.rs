//! Unit tests for spinebox.

mod config_tests;
