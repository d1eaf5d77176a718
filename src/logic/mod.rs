//! Core Logic - Classification Pipeline
//!
//! Model provider, inference and advice lookup. The presentation
//! layer calls these in a straight line: image bytes -> predict ->
//! get_advice -> render.

pub mod advice;
pub mod labels;
pub mod model;
