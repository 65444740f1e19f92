//! Newsletter rendering and output.
//!
//! # Submodules
//!
//! - [`layout`]: the two markup backends (legacy tables, modern flex)
//! - [`sections`]: hero pair, thumbnail list, compact list, digest
//! - [`document`]: assembles the full document for one edition
//! - [`html`]: writes the document to disk
//!
//! # Document Structure
//!
//! ```text
//! header (masthead, edition date)
//! ── thick divider ──
//! AI SUMMARY          (only if the digest has bullets)
//! HOT TREND           (only if an article has ≥ 10 comments)
//!   hero pair         ranks 1-2
//!   thumbnails        ranks 3-5
//! REGULATION & ISSUES   thumbnails ┐
//! NEW RELEASES          thumbnails │
//! REVENUE & PERFORMANCE compact    │ each only if non-empty
//! UPDATES & PATCHES     compact    │
//! IP & COLLABORATIONS   compact    │
//! COMMUNITY & EVENTS    compact    ┘
//! footer
//! ```

pub mod document;
pub mod html;
pub mod layout;
pub mod sections;
