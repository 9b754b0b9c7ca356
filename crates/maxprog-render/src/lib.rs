//! # maxprog-render
//!
//! Rendering backends for reconciled progress reports.
//!
//! This crate provides:
//! - The report sheet model and its formatting operations
//! - Styled XLSX output (the downloadable report)
//! - Plain-text summaries for the terminal
//!
//! ## Example
//!
//! ```rust,ignore
//! use maxprog_core::Renderer;
//! use maxprog_render::{ExcelRenderer, TextRenderer};
//!
//! // Styled workbook
//! let xlsx_bytes = ExcelRenderer::new().render(&report)?;
//! std::fs::write("max_progress_3ajna_output.xlsx", xlsx_bytes)?;
//!
//! // Terminal summary
//! println!("{}", TextRenderer::new().render(&report)?);
//! ```

pub mod excel;
pub mod report;
pub mod text;

pub use excel::ExcelRenderer;
pub use report::{apply_borders, apply_header_style, CellStyle, ReportCell, ReportSheet};
pub use text::TextRenderer;
