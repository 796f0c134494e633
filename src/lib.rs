//! # customers
//!
//! An in-memory customer service: create, read, update and delete over a
//! map keyed by an auto-incrementing id, served by a small hyper-based
//! router.
//!
//! ## Layout
//!
//! - [`CustomerStore`] owns the map and the id counter. No HTTP in here.
//! - [`resource`] holds the five handlers and builds the route table.
//! - [`Rejection`] is the single place failures become status codes and
//!   `{"reason":"…"}` bodies.
//! - [`Router`] and [`Server`] are the plumbing: one matchit tree per
//!   method, one tokio task per connection, graceful shutdown on SIGTERM.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use customers::{resource, CustomerStore, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(CustomerStore::new());
//!     let app = resource::router(store, "/spring");
//!
//!     Server::bind("0.0.0.0:2001".parse().unwrap())
//!         .serve(app)
//!         .await
//!         .unwrap();
//! }
//! ```

mod customer;
mod error;
mod handler;
mod method;
mod rejection;
mod request;
mod response;
mod router;
mod server;
mod status;
mod store;

pub mod config;
pub mod resource;

pub use config::Config;
pub use customer::Customer;
pub use error::Error;
pub use handler::Handler;
pub use method::{Method, UnknownMethod};
pub use rejection::{reason_body, Rejection};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use store::{CustomerStore, Fields, StoreError, NAME_FIELD};
