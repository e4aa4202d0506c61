//! Descriptor helpers for the fields intake forms use most.

mod checkbox;
mod custom;
mod select;
mod text;

pub use checkbox::checkbox_field;
pub use custom::{custom_field, file_uploader, radio_group};
pub use select::select_field;
pub use text::{date_field, email_field, phone_field, text_field, textarea_field};
