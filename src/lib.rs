//! Weekly timetabling engine for academic terms.
//!
//! Places teaching obligations (a cohort, a course and a teacher for one
//! term) into recurring weekly slots and rooms, without double-booking
//! any teacher, room or cohort and honoring teachers' avoid preferences.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Term`, `Cohort`, `Teacher`, `Room`,
//!   `Course`, `Slot`, `TeachingObligation`, `AvoidPreference`,
//!   `Snapshot`, `Timetable`, `Placement`, `Conflict`
//! - **`validation`**: Snapshot integrity checks (term length, slot grid,
//!   keys, references)
//! - **`dispatching`**: Obligation priority rules and the rule engine
//! - **`ledger`**: Teacher/room/cohort occupancy per week and slot
//! - **`scheduler`**: Room matching, week-1 templates, replication,
//!   cohort orchestration, run coordination, KPIs
//! - **`store`**: Snapshot loading and placement persistence seams
//! - **`config`**: Run configuration
//! - **`error`**: Error types
//!
//! # Architecture
//!
//! The engine is synchronous and single-threaded. It reads a snapshot
//! through [`store::SnapshotSource`] and writes placements through
//! [`store::PlacementStore`]; it never talks to a database itself.
//! Randomness (tie-breaking, pool order, room choice) flows from one RNG
//! per run, seeded from [`config::SchedulerConfig::seed`] when set.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4

pub mod config;
pub mod dispatching;
pub mod error;
pub mod ledger;
pub mod models;
pub mod scheduler;
pub mod store;
pub mod validation;
