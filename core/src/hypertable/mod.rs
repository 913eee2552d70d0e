//! Hypertable ThriftBroker bindings.
//!
//! Responsibilities:
//! - Declare the record tables of the Hypertable IDL
//! - Describe the HQL/client service methods
//! - Offer typed views and a typed client on top of the generic RPC layer

pub mod types;
pub mod schemas;
pub mod views;
pub mod service;
pub mod client;

pub use types::{key_flag_ids, mutator_flag_ids, KeyFlag, MutatorFlags};
pub use views::{Cell, ClientException, HqlResult, HqlResultArrays, Key, MutateSpec};
pub use service::{method_by_name, METHODS};
pub use client::{HqlClient, HqlError};
