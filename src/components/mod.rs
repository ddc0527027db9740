//! UI components: the vortex background, the morphing headline and the theme toggle.

pub mod gooey_text;
pub mod theme;
pub mod vortex;
