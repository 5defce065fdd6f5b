mod view;
pub use view::{View, log_event, render};

mod progress;
pub use progress::ProgressView;
