pub mod effects;
pub mod io;
