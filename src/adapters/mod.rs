// Adapters: input files, geocoding and HTML rendering.

pub mod geocoder;
pub mod html;
pub mod input;
