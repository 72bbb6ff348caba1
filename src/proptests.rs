//! Property-based tests for the polynomial normal form.
