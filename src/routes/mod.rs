pub mod drop;
pub mod judge;
pub mod submissions;
