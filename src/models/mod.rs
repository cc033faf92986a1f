pub mod process;

pub use process::ProcessSnapshot;
