pub mod bird_mapper;
pub mod cage_mapper;
pub mod nest_mapper;
pub mod pair_mapper;
pub mod user_mapper;

pub use bird_mapper::BirdMapper;
pub use cage_mapper::CageMapper;
pub use nest_mapper::NestMapper;
pub use pair_mapper::PairMapper;
pub use user_mapper::UserMapper;
