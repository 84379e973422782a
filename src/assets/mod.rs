//! Input media access: directory catalogs, image decoding and caption fonts.

pub mod catalog;
pub mod decode;
pub mod fonts;
