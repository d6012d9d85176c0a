/*!
 * Session management module for clip rendering.
 *
 * This module provides:
 * - Persisting an analyzed transcript once per session
 * - Reloading it for any number of clip renders
 * - Request and report models exchanged with the calling pipeline
 */

pub mod models;
pub mod store;

// Re-export main types
pub use models::{AnalysisReport, ErrorReport, RenderReport, RenderRequest, SegmentSummary};
pub use store::{SessionStore, generate_session_id, validate_session_id};
