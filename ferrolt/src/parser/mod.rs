//! Parsers for OLT command-line output.
//!
//! Device output is written for a terminal, not for machines. These
//! parsers turn it into typed records without ever failing: lines that
//! don't fit are skipped and incomplete records are dropped, so truncated
//! or empty output simply yields fewer records.

pub mod autofind;
pub mod board;
pub mod labels;

pub use autofind::{AutofindParser, AutofindState, OntRecord, PartialOnt, parse_ont_autofind};
pub use board::{BoardRecord, format_board_status, parse_boards};
pub use labels::{Extractor, LabelRule, LabelTable, OntField};
