//! Request-scoped services: upload ingest and conversion orchestration.

pub mod convert;
pub mod ingest;
