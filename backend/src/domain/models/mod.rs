pub mod bird;
pub mod cage;
pub mod nest;
pub mod pair;
pub mod user;
