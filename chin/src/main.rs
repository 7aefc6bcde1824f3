mod application;
mod presentation {
    pub mod cli;
    pub mod format;
    pub mod progress;
}

use chin_core::error::Result;

fn main() -> Result<()> {
    application::run()
}
