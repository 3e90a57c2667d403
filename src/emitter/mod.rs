pub mod c;

pub use c::CEmitter;
