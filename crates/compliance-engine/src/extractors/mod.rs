//! Value extraction from raw form input

pub mod numeric;
