//! Domain layer containing business entities and logic.
//!
//! Defines entities, repository interfaces, and domain services independent
//! of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`tracking_param`] - Allow-listed tracking parameters
//! - [`url_template`] - Compiled candidate URL templates
//! - [`errors`] - Resolution and template errors
//! - [`visit_event`] - Visit snapshot handed to the background log
//! - [`visit_queue`] - Non-blocking dispatch and outcome counters
//! - [`visit_worker`] - Asynchronous visit persistence worker
//!
//! # Visit Processing Flow
//!
//! 1. A redirect resolves (or a beacon arrives)
//! 2. [`visit_event::VisitEvent`] is offered to the bounded queue
//! 3. [`visit_worker::run_visit_worker`] writes it with timeout and retry
//! 4. The row lands via [`repositories::VisitRepository`]

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod tracking_param;
pub mod url_template;
pub mod visit_event;
pub mod visit_queue;
pub mod visit_worker;
