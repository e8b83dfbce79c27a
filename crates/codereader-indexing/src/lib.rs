//! Job lifecycle and batch-pipeline orchestration: [`JobService`] creates and queries
//! jobs, [`Processor`] runs their scan→extract→chunk→embed→persist pipeline, and
//! [`Queue`] serializes job actions one at a time per process. See spec.md §4.7–§4.8.

pub mod error;
pub mod job_service;
pub mod processor;
pub mod queue;

pub use error::{IndexingError, IndexingResult};
pub use job_service::{CreateJobInput, JobService, ProgressUpdate};
pub use processor::Processor;
pub use queue::{JobAction, Queue};
