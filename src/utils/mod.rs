pub mod compare;
pub mod random;
pub mod sort;
