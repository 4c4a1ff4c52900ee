//! Live glassmorphism configurator.
//!
//! Run with:  `RUST_LOG=debug frosted`

use anyhow::Result;

fn main() -> Result<()> {
    frosted::run()?;
    Ok(())
}
