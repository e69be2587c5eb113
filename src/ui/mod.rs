/// Native dialogs used by the detection window
///
/// - File picker producing a `SelectedImage` (picker.rs)
/// - Message box for user notices (notice.rs)

pub mod notice;
pub mod picker;
