pub mod element;
pub mod direction;
pub mod bounds;
pub mod rng;
