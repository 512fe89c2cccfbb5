pub mod arch;
pub mod paths;

pub use arch::Arch;
