//! # Core Module
//!
//! Fundamental concurrency primitives used throughout the mesher.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking
//! - `exchange_slot`: Capacity-one, non-blocking handoff from a producer thread to a consumer
//!
//! ## Usage
//! ```rust
//! use voxel_mesher::core::{exchange_slot, MtResource};
//!
//! // Thread-safe resource
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//!
//! // Publish once, consume once
//! let (publisher, receiver) = exchange_slot();
//! publisher.publish("snapshot").unwrap();
//! assert_eq!(receiver.try_take(), Some("snapshot"));
//! assert_eq!(receiver.try_take(), None);
//! ```

pub mod exchange_slot;
pub mod mt_resource;

pub use exchange_slot::{exchange_slot, SlotPublisher, SlotReceiver};
pub use mt_resource::MtResource;
