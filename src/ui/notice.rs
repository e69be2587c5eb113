use rfd::{AsyncMessageDialog, MessageButtons, MessageLevel};

use crate::detect::ErrorKind;

/// Show a message box for an error kind
/// Runs as its own task, so the rest of the app keeps processing messages
pub async fn show_notice(kind: ErrorKind) {
    let level = match kind {
        ErrorKind::MissingInput => MessageLevel::Warning,
        ErrorKind::DetectionRequestFailed => MessageLevel::Error,
    };

    AsyncMessageDialog::new()
        .set_level(level)
        .set_title("Object Detection App")
        .set_description(kind.user_message())
        .set_buttons(MessageButtons::Ok)
        .show()
        .await;
}
