//! Data layer: core types, loading, cleaning and filtering.
//!
//! Architecture:
//! ```text
//!  .xlsx / .csv / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  read sheet → StudentDataset (checks required columns)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌────────────────┐
//!   │ StudentDataset  │  Vec<StudentRecord>, program index
//!   └────────────────┘   ratings parsed, observations coded by `clean`
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  program selection + name search → visible indices
//!   └──────────┘
//! ```

pub mod clean;
pub mod filter;
pub mod loader;
pub mod model;
