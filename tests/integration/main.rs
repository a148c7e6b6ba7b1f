//! Integration tests for poly-history

mod collect_test;
mod config_test;
mod support;
