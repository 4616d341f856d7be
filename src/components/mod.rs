// Export components
pub mod google_calendar;
pub mod notifier;
pub mod planner;

// Re-export the calendar fetcher
pub use google_calendar::CalendarWindowFetcher;
// Re-export the text generation seam
pub use planner::TextGenerator;
// Re-export the chat sink seam
pub use notifier::ChatSink;
