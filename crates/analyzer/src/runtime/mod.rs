//! Runtime module: process setup for the `analyzer` binary.

pub mod boot;
