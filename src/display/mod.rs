//! Display surfaces.
//!
//! A surface is a pure sink: it shows whatever text it is handed and keeps
//! no extraction logic of its own.

mod writer;

pub use writer::{StdoutDisplay, WriterDisplay};

use crate::poller::DisplayState;

/// Anything that can show a text label.
///
/// Called once per poll cycle from the poller task, so implementations must
/// be safe to call repeatedly.
pub trait DisplaySurface: Send + Sync {
    fn set_text(&self, text: &str);

    /// Show a classified state. The default renders the state's label text.
    fn render(&self, state: &DisplayState) {
        self.set_text(&state.to_string());
    }
}

impl<T: DisplaySurface + ?Sized> DisplaySurface for std::sync::Arc<T> {
    fn set_text(&self, text: &str) {
        (**self).set_text(text);
    }

    fn render(&self, state: &DisplayState) {
        (**self).render(state);
    }
}
