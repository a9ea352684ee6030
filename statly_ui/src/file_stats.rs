//! File statistics widget.
//!
//! Shows `"<chars>:<lines> / <size>"` for the active file, e.g.
//! `"120:5 / 500 B"`, and nothing when no file is active. The text is
//! recomputed whenever the active file changes or any document is edited.

use crate::format::format_size;
use crate::status_bar::StatusBarHandle;
use crate::widget::{Alignment, StatusBarWidget, StatusBarWidgetFactory};
use statly_core::{Session, Subscriber, Subscription, Topic, Workspace};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Identifier of the file statistics widget.
pub const WIDGET_ID: &str = "Statly";

/// Name of the widget shown in settings.
pub const DISPLAY_NAME: &str = "File Info Widget";

/// Hover text of the widget.
pub const TOOLTIP: &str = "Number of lines and file size";

/// Statistics of the active file at one moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSnapshot {
    /// Raw byte length of the file.
    pub byte_len: u64,
    /// Characters in the document, 0 without a document.
    pub char_len: usize,
    /// Lines in the document, 0 without a document.
    pub line_count: usize,
}

impl FileSnapshot {
    /// Captures the active file, if there is one.
    pub fn capture(workspace: &Workspace) -> Option<Self> {
        let file = workspace.active_file()?;
        let (char_len, line_count) = workspace
            .active_document()
            .map(|doc| (doc.char_len(), doc.line_count()))
            .unwrap_or((0, 0));

        Some(Self {
            byte_len: file.len(),
            char_len,
            line_count,
        })
    }

    /// Formats the snapshot as shown in the status bar.
    pub fn summary(&self) -> String {
        format!(
            "{}:{} / {}",
            self.char_len,
            self.line_count,
            format_size(self.byte_len)
        )
    }
}

/// State shared between the widget and its listeners.
struct WidgetState {
    workspace: Rc<RefCell<Workspace>>,
    text: RefCell<String>,
    status_bar: RefCell<Option<StatusBarHandle>>,
}

impl WidgetState {
    fn recompute(&self) {
        let text = match self.workspace.try_borrow() {
            Ok(workspace) => FileSnapshot::capture(&workspace)
                .map(|snapshot| snapshot.summary())
                .unwrap_or_default(),
            Err(_) => {
                log::debug!("Workspace busy, keeping {:?}", self.text.borrow());
                return;
            }
        };

        log::trace!("{} text: {:?}", WIDGET_ID, text);
        *self.text.borrow_mut() = text;

        if let Some(status_bar) = self.status_bar.borrow().as_ref() {
            status_bar.update_widget(WIDGET_ID);
        }
    }
}

/// Status bar widget showing character count, line count and size of the
/// active file.
pub struct FileStatsWidget {
    state: Rc<WidgetState>,
    subscriber: Subscriber,
    subscriptions: Vec<Subscription>,
}

impl FileStatsWidget {
    /// Creates an uninstalled widget for a session. Its text is empty.
    pub fn new(session: &Session) -> Self {
        Self {
            state: Rc::new(WidgetState {
                workspace: Rc::clone(session.workspace()),
                text: RefCell::new(String::new()),
                status_bar: RefCell::new(None),
            }),
            subscriber: session.bus().subscriber(),
            subscriptions: Vec::new(),
        }
    }

    /// Recomputes the text from the active file and requests a repaint.
    pub fn recompute(&self) {
        self.state.recompute();
    }

    /// Returns whether the widget is listening for events.
    pub fn is_installed(&self) -> bool {
        self.subscriptions.iter().any(|s| s.is_attached())
    }

    fn listen(&self, topic: Topic) -> Subscription {
        let state: Weak<WidgetState> = Rc::downgrade(&self.state);
        self.subscriber.subscribe(topic, move |_| {
            if let Some(state) = state.upgrade() {
                state.recompute();
            }
        })
    }

    fn release(&mut self) {
        for mut subscription in self.subscriptions.drain(..) {
            if let Err(e) = subscription.unsubscribe() {
                log::trace!("Ignoring {:?} unsubscribe failure: {}", subscription.topic(), e);
            }
        }
    }
}

impl StatusBarWidget for FileStatsWidget {
    fn id(&self) -> &str {
        WIDGET_ID
    }

    fn text(&self) -> String {
        self.state.text.borrow().clone()
    }

    fn tooltip_text(&self) -> Option<String> {
        Some(TOOLTIP.to_string())
    }

    fn alignment(&self) -> Alignment {
        Alignment::Left
    }

    fn install(&mut self, status_bar: StatusBarHandle) {
        self.release();
        *self.state.status_bar.borrow_mut() = Some(status_bar);
        self.state.recompute();

        let selection = self.listen(Topic::FileEditorSelection);
        let edits = self.listen(Topic::DocumentEdits);
        self.subscriptions.push(selection);
        self.subscriptions.push(edits);
    }

    fn dispose(&mut self) {
        self.release();
        self.state.status_bar.borrow_mut().take();
    }
}

/// Creates one [`FileStatsWidget`] per session.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStatsWidgetFactory;

impl StatusBarWidgetFactory for FileStatsWidgetFactory {
    fn id(&self) -> &str {
        WIDGET_ID
    }

    fn display_name(&self) -> &str {
        DISPLAY_NAME
    }

    fn create_widget(&self, session: &Session) -> Box<dyn StatusBarWidget> {
        Box::new(FileStatsWidget::new(session))
    }
}
