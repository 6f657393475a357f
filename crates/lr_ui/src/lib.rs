pub mod screens;

pub use screens::{UiActions, UiLayer, UiView};
