use chrono::{DateTime, Utc};

use crate::domain::{PlatformStatus, SummaryCounts};

/// What the status table body should show after a poll.
#[derive(Debug, Clone, PartialEq)]
pub enum TableContent {
    Rows(Vec<PlatformStatus>),
    Empty,
    Error(String),
}

impl TableContent {
    pub fn from_platforms(platforms: Vec<PlatformStatus>) -> Self {
        if platforms.is_empty() {
            TableContent::Empty
        } else {
            TableContent::Rows(platforms)
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            TableContent::Rows(rows) => rows.len(),
            TableContent::Empty | TableContent::Error(_) => 1,
        }
    }
}

/// Rendering surface driven by the poller.
///
/// Implementations own their document and are responsible for their own
/// output errors; a failed render must never stop the poll loop.
pub trait DashboardView: Send + Sync {
    fn render_table(&self, content: TableContent);
    fn render_summary(&self, counts: SummaryCounts);
    fn render_last_updated(&self, at: DateTime<Utc>);
    fn show_indicator(&self);
    fn hide_indicator(&self);
}

#[cfg(test)]
pub mod testing {
    use parking_lot::Mutex;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum ViewCall {
        Table(TableContent),
        Summary(SummaryCounts),
        LastUpdated(DateTime<Utc>),
        ShowIndicator,
        HideIndicator,
    }

    /// Records every call so tests can assert on what was rendered.
    #[derive(Default)]
    pub struct RecordingView {
        calls: Mutex<Vec<ViewCall>>,
    }

    impl RecordingView {
        pub fn calls(&self) -> Vec<ViewCall> {
            self.calls.lock().clone()
        }

        pub fn tables(&self) -> Vec<TableContent> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    ViewCall::Table(content) => Some(content),
                    _ => None,
                })
                .collect()
        }

        pub fn summaries(&self) -> Vec<SummaryCounts> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    ViewCall::Summary(counts) => Some(counts),
                    _ => None,
                })
                .collect()
        }

        pub fn indicator_visible(&self) -> bool {
            self.calls()
                .iter()
                .rev()
                .find_map(|call| match call {
                    ViewCall::ShowIndicator => Some(true),
                    ViewCall::HideIndicator => Some(false),
                    _ => None,
                })
                .unwrap_or(false)
        }

        fn push(&self, call: ViewCall) {
            self.calls.lock().push(call);
        }
    }

    impl DashboardView for RecordingView {
        fn render_table(&self, content: TableContent) {
            self.push(ViewCall::Table(content));
        }

        fn render_summary(&self, counts: SummaryCounts) {
            self.push(ViewCall::Summary(counts));
        }

        fn render_last_updated(&self, at: DateTime<Utc>) {
            self.push(ViewCall::LastUpdated(at));
        }

        fn show_indicator(&self) {
            self.push(ViewCall::ShowIndicator);
        }

        fn hide_indicator(&self) {
            self.push(ViewCall::HideIndicator);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_platform_list_becomes_placeholder() {
        let content = TableContent::from_platforms(Vec::new());
        assert_eq!(content, TableContent::Empty);
        assert_eq!(content.row_count(), 1);
    }

    #[test]
    fn row_count_matches_input_length() {
        let platforms = vec![PlatformStatus::default(); 3];
        assert_eq!(TableContent::from_platforms(platforms).row_count(), 3);
    }
}
