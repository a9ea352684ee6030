//! Status bar host.
//!
//! Widgets ask for a repaint through a [`StatusBarHandle`]. Requests are
//! queued and applied by [`StatusBar::process_repaints`] on the UI thread.

use crate::settings::StatusBarSettings;
use crate::widget::{Alignment, StatusBarWidget, StatusBarWidgetFactory};
use crossbeam_channel::{Receiver, Sender};
use statly_core::Session;

/// Separator between neighbouring widgets.
const WIDGET_GAP: &str = "  ";

/// Repaint channel handed to installed widgets.
#[derive(Debug, Clone)]
pub struct StatusBarHandle {
    sender: Sender<String>,
}

impl StatusBarHandle {
    /// Asks the status bar to repaint the widget with this id.
    pub fn update_widget(&self, id: &str) {
        if self.sender.send(id.to_string()).is_err() {
            log::trace!("Repaint of {} dropped: status bar is gone", id);
        }
    }
}

struct Slot {
    widget: Box<dyn StatusBarWidget>,
    /// Text as of the last repaint.
    text: String,
}

/// A one-line status bar holding installed widgets.
pub struct StatusBar {
    settings: StatusBarSettings,
    slots: Vec<Slot>,
    sender: Sender<String>,
    receiver: Receiver<String>,
}

impl StatusBar {
    /// Creates an empty status bar.
    pub fn new(settings: StatusBarSettings) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            settings,
            slots: Vec::new(),
            sender,
            receiver,
        }
    }

    /// Returns the settings in use.
    pub fn settings(&self) -> &StatusBarSettings {
        &self.settings
    }

    /// Returns a repaint handle for this bar.
    pub fn handle(&self) -> StatusBarHandle {
        StatusBarHandle {
            sender: self.sender.clone(),
        }
    }

    /// Creates and installs the widget of a factory.
    ///
    /// Returns false when the widget is unavailable, disabled in settings,
    /// or already present.
    pub fn add_widget(&mut self, factory: &dyn StatusBarWidgetFactory, session: &Session) -> bool {
        let id = factory.id();
        if !self.settings.is_enabled(id) {
            log::info!("Widget {} disabled in settings", id);
            return false;
        }
        if !factory.is_available(session) {
            log::debug!("Widget {} unavailable for this session", id);
            return false;
        }
        if self.slots.iter().any(|s| s.widget.id() == id) {
            log::warn!("Widget {} already installed", id);
            return false;
        }

        let mut widget = factory.create_widget(session);
        widget.install(self.handle());
        let text = widget.text();
        log::debug!("Installed widget {} ({})", id, factory.display_name());
        self.slots.push(Slot { widget, text });
        true
    }

    /// Disposes and removes a widget. Returns false if it was not present.
    pub fn remove_widget(&mut self, id: &str) -> bool {
        match self.slots.iter().position(|s| s.widget.id() == id) {
            Some(pos) => {
                let mut slot = self.slots.remove(pos);
                slot.widget.dispose();
                true
            }
            None => false,
        }
    }

    /// Returns the ids of installed widgets in display order.
    pub fn widget_ids(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.widget.id().to_string()).collect()
    }

    /// Returns the painted text of a widget.
    pub fn text_of(&self, id: &str) -> Option<&str> {
        self.slot(id).map(|s| s.text.as_str())
    }

    /// Returns the tooltip of a widget.
    pub fn tooltip_of(&self, id: &str) -> Option<String> {
        self.slot(id).and_then(|s| s.widget.tooltip_text())
    }

    fn slot(&self, id: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.widget.id() == id)
    }

    /// Applies queued repaint requests.
    ///
    /// Returns the ids that were repainted, each once, in request order.
    pub fn process_repaints(&mut self) -> Vec<String> {
        let mut repainted: Vec<String> = Vec::new();
        while let Ok(id) = self.receiver.try_recv() {
            if repainted.contains(&id) {
                continue;
            }
            match self.slots.iter_mut().find(|s| s.widget.id() == id) {
                Some(slot) => {
                    slot.text = slot.widget.text();
                    repainted.push(id);
                }
                None => log::debug!("Repaint requested for unknown widget {}", id),
            }
        }
        repainted
    }

    /// Renders the bar as one line of the given width.
    ///
    /// Left-aligned widgets are packed from the left, right-aligned ones
    /// from the right. Empty widgets take no space. Content wider than
    /// `width` is not truncated.
    pub fn render(&self, width: usize) -> String {
        let side = |alignment: Alignment| {
            self.slots
                .iter()
                .filter(|s| s.widget.alignment() == alignment && !s.text.is_empty())
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join(WIDGET_GAP)
        };
        let left = side(Alignment::Left);
        let right = side(Alignment::Right);

        let used = left.chars().count() + right.chars().count();
        let padding = width.saturating_sub(used);
        format!("{}{}{}", left, " ".repeat(padding), right)
    }

    /// Disposes every widget.
    pub fn dispose(&mut self) {
        for mut slot in self.slots.drain(..) {
            slot.widget.dispose();
        }
    }
}

impl Drop for StatusBar {
    fn drop(&mut self) {
        self.dispose();
    }
}
