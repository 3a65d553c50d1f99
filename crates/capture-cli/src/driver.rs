use capture_runtime::{Launch, Scenario};
use miette::Result;
use std::io::Write;

/// Run every scenario in order and print one result per line.
///
/// Each scenario is awaited before the next one starts.
pub fn run_all(launch: Launch, out: &mut impl Write) -> Result<()> {
    for scenario in Scenario::ALL {
        let value = scenario.run(launch)?;
        log::info!("{}: {}", scenario, value);
        writeln!(out, "{}", value)
            .map_err(|e| miette::miette!("Failed to write output: {}", e))?;
    }
    out.flush()
        .map_err(|e| miette::miette!("Failed to flush output: {}", e))?;
    Ok(())
}
