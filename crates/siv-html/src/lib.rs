//! siv HTML
//!
//! Fragment-level HTML parsing for the siv engine: turn the raw tag that
//! referenced an external resource (e.g. a `<script src=...>` element) into
//! an attribute view the verification pipeline can query.

mod fragment;

pub use fragment::TagFragment;
