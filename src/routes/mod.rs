mod handle_approval;
mod health_check;
mod notify_admin;

pub use handle_approval::*;
pub use health_check::*;
pub use notify_admin::*;
