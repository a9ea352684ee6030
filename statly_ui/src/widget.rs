//! Status bar widget traits and the factory registry.

use crate::file_stats::FileStatsWidgetFactory;
use crate::status_bar::StatusBarHandle;
use statly_core::Session;

/// Horizontal placement of a widget in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Packed from the left edge.
    #[default]
    Left,
    /// Packed from the right edge.
    Right,
}

impl Alignment {
    /// Returns the alignment as a fraction of the bar width.
    pub fn as_f32(&self) -> f32 {
        match self {
            Alignment::Left => 0.0,
            Alignment::Right => 1.0,
        }
    }
}

/// A text widget living in the status bar.
pub trait StatusBarWidget {
    /// Unique identifier, used for repaint requests.
    fn id(&self) -> &str;

    /// Text currently displayed.
    fn text(&self) -> String;

    /// Text shown on hover.
    fn tooltip_text(&self) -> Option<String> {
        None
    }

    /// Placement in the bar.
    fn alignment(&self) -> Alignment {
        Alignment::Left
    }

    /// Called when the widget is added to a status bar.
    fn install(&mut self, status_bar: StatusBarHandle);

    /// Called when the widget is removed or the status bar goes away.
    /// Must tolerate being called more than once.
    fn dispose(&mut self);
}

/// Creates one widget per session.
pub trait StatusBarWidgetFactory {
    /// Identifier of the widgets this factory creates.
    fn id(&self) -> &str;

    /// Name shown in settings.
    fn display_name(&self) -> &str;

    /// Whether the widget makes sense for this session.
    fn is_available(&self, _session: &Session) -> bool {
        true
    }

    /// Creates the widget for a session.
    fn create_widget(&self, session: &Session) -> Box<dyn StatusBarWidget>;
}

/// Ordered collection of widget factories.
#[derive(Default)]
pub struct WidgetRegistry {
    factories: Vec<Box<dyn StatusBarWidgetFactory>>,
}

impl WidgetRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in widgets.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(FileStatsWidgetFactory));
        registry
    }

    /// Adds a factory. Returns false if one with the same id exists.
    pub fn register(&mut self, factory: Box<dyn StatusBarWidgetFactory>) -> bool {
        if self.get(factory.id()).is_some() {
            log::warn!("Widget factory {} already registered", factory.id());
            return false;
        }
        self.factories.push(factory);
        true
    }

    /// Looks up a factory by widget id.
    pub fn get(&self, id: &str) -> Option<&dyn StatusBarWidgetFactory> {
        self.factories
            .iter()
            .find(|f| f.id() == id)
            .map(|f| f.as_ref())
    }

    /// Returns the factories in registration order.
    pub fn factories(&self) -> impl Iterator<Item = &dyn StatusBarWidgetFactory> {
        self.factories.iter().map(|f| f.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_stats::WIDGET_ID;

    #[test]
    fn test_defaults() {
        let registry = WidgetRegistry::with_defaults();
        let factory = registry.get(WIDGET_ID).unwrap();
        assert_eq!(factory.display_name(), "File Info Widget");
        assert!(factory.is_available(&Session::new()));
        assert_eq!(registry.factories().count(), 1);
    }

    #[test]
    fn test_duplicate_register() {
        let mut registry = WidgetRegistry::with_defaults();
        assert!(!registry.register(Box::new(FileStatsWidgetFactory)));
        assert_eq!(registry.factories().count(), 1);
    }

    #[test]
    fn test_alignment_fraction() {
        assert_eq!(Alignment::Left.as_f32(), 0.0);
        assert_eq!(Alignment::Right.as_f32(), 1.0);
    }
}
