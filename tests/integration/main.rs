//! Integration tests for the harvester
//!
//! These tests use wiremock to serve seed and article pages and run the
//! full fetch/extract/persist pipeline end-to-end.

mod harvest_tests;
