//! Tests for the elevated operation gateway

#[cfg(test)]
mod listing_tests;
