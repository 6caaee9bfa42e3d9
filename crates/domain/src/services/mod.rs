//! Domain services for the invitation service.
//!
//! Services contain business logic that operates on domain models.

pub mod editor;
pub mod preview;
pub mod template_save;

pub use editor::{EditorCommand, EditorError, EditorStatus, EditorTab, TemplateEditor};
pub use preview::{render_invitation_html, render_page, PreviewDevice};
pub use template_save::{
    FallbackReason, LocalStore, LocalStoreError, LocalTemplateRecord, MemoryLocalStore,
    RemoteError, RemoteTemplateStore, SaveError, SaveOutcome, SyncReport, TemplateSaver,
};
