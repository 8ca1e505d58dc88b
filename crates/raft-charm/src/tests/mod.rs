//! Test suites for the charm lifecycle.

mod support;
