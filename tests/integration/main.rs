//! Integration tests for the harvester
//!
//! These tests use wiremock to serve source and article pages and tempfile
//! directories as the content store, and drive the engine end to end.

mod extraction_tests;
mod harvest_tests;
