//! The single shared table behind an async actor.
//!
//! The engine in [`crate::game`] is plain synchronous state; this module
//! gives it the single-logical-writer discipline the table needs. One Tokio
//! task owns the [`game::TableState`](crate::game::TableState) and consumes
//! a command inbox, so no two commands ever interleave. Acks travel back on
//! oneshot channels; state snapshots fan out to subscribers with a fresh
//! per-viewer projection after every mutation.
//!
//! ## Example
//!
//! ```no_run
//! use nl_holdem::table::{TableActor, TableCommand, TableConfig};
//! use tokio::sync::{mpsc, oneshot};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, handle) = TableActor::new(TableConfig::default());
//!     tokio::spawn(actor.run());
//!
//!     let (tx, _events) = mpsc::channel(16);
//!     handle
//!         .send(TableCommand::Connect { client: 1, subscriber: tx })
//!         .await
//!         .unwrap();
//!     let (ack, rx) = oneshot::channel();
//!     handle
//!         .send(TableCommand::SetUsername { client: 1, name: "alice".into(), ack })
//!         .await
//!         .unwrap();
//!     rx.await.unwrap().unwrap();
//! }
//! ```

pub mod actor;
pub mod config;
pub mod messages;

pub use actor::{TableActor, TableHandle};
pub use config::TableConfig;
pub use messages::{TableCommand, TableEvent};
