/// State management module
///
/// This module holds everything the detection window knows:
/// - The picked image and the processed result (data.rs)
/// - The select/submit/resolve flow and its bookkeeping (view.rs)

pub mod data;
pub mod view;
