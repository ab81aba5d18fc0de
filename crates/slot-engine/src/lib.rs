//! # slot-engine
//!
//! Deterministic generation of bookable time slots for a single offering and
//! calendar date: recurring weekly availability windows, minus the intervals
//! already held by committed appointments.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{TimeZone, Utc, Weekday};
//! use slot_engine::{
//!     AvailabilityWindow, GeneratorConfig, InMemoryStore, OfferingId, SlotGenerator, Snapshot,
//! };
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! let store = Arc::new(InMemoryStore::new(Snapshot {
//!     windows: vec![AvailabilityWindow {
//!         offering_id: OfferingId(7),
//!         weekday: Weekday::Mon,
//!         start_minute: 9 * 60,
//!         end_minute: 10 * 60,
//!         duration_minutes: 30,
//!         active: true,
//!     }],
//!     bookings: vec![],
//! }));
//! let generator = SlotGenerator::new(store.clone(), store, GeneratorConfig::default());
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let slots = runtime
//!     .block_on(generator.generate_slots_for_str(
//!         OfferingId(7),
//!         "2026-03-02",
//!         &CancellationToken::new(),
//!     ))
//!     .unwrap();
//!
//! assert_eq!(slots.len(), 2);
//! assert_eq!(slots[0].starts_at, Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap());
//! assert_eq!(slots[1].ends_at, Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`generator`] — `SlotGenerator`: concurrent fetch, then the pure pipeline
//! - [`expander`] — window selection and candidate expansion
//! - [`conflict`] — half-open overlap test and sweep-based conflict filtering
//! - [`assembly`] — dedup + sort of the final slot list
//! - [`anchor`] — local-midnight resolution and date parsing
//! - [`repository`] — window/booking source traits and an in-memory store
//! - [`model`] — windows, booked intervals, slots
//! - [`config`] — timezone and fetch deadline
//! - [`error`] — error types

pub mod anchor;
pub mod assembly;
pub mod config;
pub mod conflict;
pub mod error;
pub mod expander;
pub mod generator;
pub mod model;
pub mod repository;

pub use anchor::{parse_date, parse_timezone, DayAnchor};
pub use config::GeneratorConfig;
pub use conflict::{filter_free, is_slot_free, overlaps, select_bookings};
pub use error::{RepositoryError, SlotError};
pub use generator::SlotGenerator;
pub use model::{AvailabilityWindow, BookedInterval, BookingStatus, OfferingId, Slot};
pub use repository::{BookingSource, InMemoryStore, Snapshot, WindowSource};
