// Components module - reusable UI building blocks
//
// Shell components are rendered on every screen:
// - Title bar: app name, screen tabs, busy spinner
// - Status bar: session user, backend URL, key hints
// - Logs panel: captured tracing output (toggleable)
//
// Page components:
// - Resource table: the entity list with resolved foreign keys
// - Form panel: labelled fields, focus, validation/request error
// - Status banner: the page's success or error message

pub mod form_panel;
pub mod logs_panel;
pub mod resource_table;
pub mod status_banner;
pub mod status_bar;
pub mod title_bar;
pub mod toast;

pub use form_panel::FormView;
pub use toast::Toast;
