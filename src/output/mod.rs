//! Rendering and persistence of run results
//!
//! Console summary, CSV export, and on-disk storage of fetched page
//! bodies all live here, away from the fetch engine itself.

mod console;
mod csv;
mod persist;

pub use console::{print_report, render_report};
pub use csv::write_csv_report;
pub use persist::{document_path, persist_body};
