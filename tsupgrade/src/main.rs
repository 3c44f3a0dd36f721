//! Main binary entry point for tsupgrade.
//!
//! This binary simply delegates to the shared `entry_point::run_with_args()` function.

use anyhow::Result;

fn main() -> Result<()> {
    let code = tsupgrade::entry_point::run_with_args(std::env::args().skip(1).collect())?;
    std::process::exit(code);
}
