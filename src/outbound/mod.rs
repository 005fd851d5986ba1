//! Outbound adapters: concrete implementations of domain-facing ports.

pub mod stub_provider;
