//! Widget styles: cards, buttons, inputs and notice banners.

mod buttons;
mod containers;
mod inputs;
pub mod palette;
mod shadows;

pub use containers::{
    card_style, editor_panel_style, error_banner_style, info_banner_style, page_style,
    preview_backdrop_style, toolbar_style,
};

pub use buttons::{danger_button_style, primary_button_style, secondary_button_style};

pub use inputs::field_input_style;
