//! Content checksums embedded in file names.
//!
//! A file `report.txt` is renamed to `report.<digest>.txt`, where the digest
//! is a 13-character base-36 rendering of the first 64 bits of the SHA-256
//! of its contents. Verification recomputes the digest and compares.

pub mod config;
pub mod logging;

pub mod calculator;
pub mod checksum;
pub mod command;
pub mod digester;
pub mod error;
pub mod factory;
pub mod marker;
pub mod presenter;
pub mod repository;

pub use checksum::Checksum;
pub use command::{Command, CommandKind, CommandRequest, CommandResponse, Detail, Outcome, Services, Status, Verdict};
pub use error::{ChecksumError, ErrorKind};
pub use factory::CommandFactory;
pub use presenter::Presenter;
