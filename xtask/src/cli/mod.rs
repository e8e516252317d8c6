mod exit;
mod types;

pub use exit::Exit;
pub use types::*;
