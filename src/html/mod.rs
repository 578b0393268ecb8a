pub mod inline;
pub mod render;
pub mod scanner;

#[cfg(test)]
mod tests;

pub use inline::{ImageInliner, InlinedImage};
pub use render::render_document;
