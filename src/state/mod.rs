/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The browsing/full-screen state machine (session.rs)
/// - Zoom, pan and rotation of the full-screen image (transform.rs)

pub mod data;
pub mod session;
pub mod transform;
