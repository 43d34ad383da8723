pub mod async_walker;
pub mod io;

pub use io::atomic_write_str;
