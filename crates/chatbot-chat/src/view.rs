use chatbot_types::Message;

/// Appended to a reply while it is still streaming
pub const IN_PROGRESS_MARKER: &str = "▌";

/// Rendering seam between the conversation core and whatever UI shows it.
///
/// Every failure the core survives is surfaced through [`ChatView::show_error`]
/// as plain text.
pub trait ChatView {
    /// A complete message: history replay or the user's own utterance
    fn show_message(&mut self, message: &Message);

    /// The reply received so far; the view adds [`IN_PROGRESS_MARKER`]
    fn show_partial_reply(&mut self, buffer: &str);

    /// The finished reply, without the marker
    fn show_final_reply(&mut self, buffer: &str);

    fn show_error(&mut self, error: &str);

    fn show_notice(&mut self, notice: &str);
}
