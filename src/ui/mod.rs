/// User interface
///
/// - browser.rs: folder picker, image list and preview
/// - viewer.rs: full-screen canvas with gesture input

pub mod browser;
pub mod viewer;
