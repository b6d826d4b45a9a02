use geopal_shared::models::SelectionRow;
use geopal_shared::surface::NotificationSink;

/// A dialog waiting to be shown.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Error { title: String, message: String },
    Selection { title: String, rows: Vec<SelectionRow> },
}

impl Notice {
    pub fn title(&self) -> &str {
        match self {
            Notice::Error { title, .. } | Notice::Selection { title, .. } => title,
        }
    }

    pub fn is_selection(&self) -> bool {
        matches!(self, Notice::Selection { .. })
    }
}

/// Dialog stack fed by the session. The most recent notice is on top.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    stack: Vec<Notice>,
}

impl NoticeBoard {
    pub fn current(&self) -> Option<&Notice> {
        self.stack.last()
    }

    /// Close the top dialog and hand it back, so the caller can react to a
    /// closed selection listing.
    pub fn dismiss(&mut self) -> Option<Notice> {
        self.stack.pop()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }
}

impl NotificationSink for NoticeBoard {
    fn error(&mut self, title: &str, message: &str) {
        self.stack.push(Notice::Error {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn selection(&mut self, title: &str, rows: &[SelectionRow]) {
        // A fresh listing supersedes an older one still open.
        self.stack.retain(|n| !n.is_selection());
        self.stack.push(Notice::Selection {
            title: title.to_string(),
            rows: rows.to_vec(),
        });
    }
}
