pub mod algebra_2d;
pub mod drawer;
pub mod input;
pub mod mechanics;
