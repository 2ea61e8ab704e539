use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Success,
    Failure,
}

/// A short, non-fatal message for the user. Goes to stderr so stdout stays
/// pipeable.
pub fn show(style: Style, message: &str) {
    match style {
        Style::Success => {
            info!("{}", message);
            eprintln!("✓ {}", message);
        }
        Style::Failure => {
            warn!("{}", message);
            eprintln!("✗ {}", message);
        }
    }
}
