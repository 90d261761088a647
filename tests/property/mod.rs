//! Property-based tests

mod config_test;
mod membership_proptest;
