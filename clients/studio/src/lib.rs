pub mod chain;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod repl;
pub mod session;

pub use chain::LocalChain;
pub use client::{ContractLibrary, LibraryClient, WireContent};
pub use controller::{EditorController, Feedback};
pub use error::{EditorError, LibraryError};
pub use session::{EditorSession, LibraryPane, Operation, Ticket};
