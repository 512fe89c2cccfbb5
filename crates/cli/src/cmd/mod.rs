mod configure;
mod package;
mod stamp;

pub use configure::{ConfigureArgs, cmd_configure};
pub use package::cmd_package;
pub use stamp::cmd_stamp;
