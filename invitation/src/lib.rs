pub mod branding;
pub mod clock;
pub mod config;
pub mod countdown;
pub mod cursor;
pub mod error;
pub mod expand;
pub mod input;
pub mod lightbox;
pub mod overlay;
pub mod particles;
pub mod presentation;
pub mod runtime;
pub mod scene;
pub mod script;
pub mod sequencer;
pub mod serde_millis;
pub mod view;

pub use config::PresentationConfig;
pub use input::{NavIntent, RawInput};
pub use presentation::Presentation;
pub use scene::{SceneCount, SceneIndex};
