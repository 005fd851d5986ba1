//! Inbound adapters: translate external protocols into domain calls.

pub mod http;
