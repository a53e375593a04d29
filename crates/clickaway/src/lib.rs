//! clickaway - outside-interaction detection
//!
//! Calls back when the user presses, touches or focuses somewhere outside a
//! set of monitored DOM regions: the behavior dropdowns, popovers and modals
//! use to close themselves.
//!
//! Features:
//! - Declarative regions (`Options::refs`) or imperative registration
//! - Ignore markers: a class on the origin or any ancestor suppresses detection
//! - Optional scrollbar-gutter exclusion for pointer events
//! - Focus moving into an embedded `<iframe>` counts as outside
//! - Passive touch listeners where the environment supports them
//!
//! ```ignore
//! use clickaway::{OnClickOutside, Options};
//!
//! let detector = OnClickOutside::attach(&window, |event| close_menu(event), Options::default());
//! detector.registration().register(Some(menu_node));
//! ```

mod engine;
mod hook;
mod lifecycle;
mod matcher;
mod options;
mod passive;
mod region;
mod scrollbar;

pub use engine::Callback;
pub use hook::{OnClickOutside, RegistrationHandle};
pub use matcher::has_ignore_class;
pub use options::{DEFAULT_IGNORE_CLASS, IgnoreClass, Options, default_event_types};
pub use passive::listener_options;
pub use region::NodeRef;
pub use scrollbar::clicked_on_scrollbar;
