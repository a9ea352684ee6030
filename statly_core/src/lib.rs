//! Statly Core - Editor host model.
//!
//! Open files, their documents and the session bus that announces
//! selection changes and edits. Nothing here renders anything.

pub mod buffer;
pub mod document;
pub mod events;
pub mod file;
pub mod session;
pub mod workspace;

pub use buffer::TextBuffer;
pub use document::Document;
pub use events::{
    BusError, EditorEvent, EventBus, EventPublisher, Subscriber, Subscription, Topic,
};
pub use file::FileHandle;
pub use session::Session;
pub use workspace::{BufferId, TabInfo, Workspace};
