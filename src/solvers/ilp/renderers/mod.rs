//! ILP Formulation Renderers

pub mod typst;
