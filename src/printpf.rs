use crate::losses::branch_losses;
use crate::mpopt::PFOpt;
use crate::pf::PFResults;
use crate::polar::to_polar;

use anyhow::{bail, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Writes the bus voltages, line currents, losses and power balance of a
/// converged power flow. Powers are scaled to kW/kVA by `opt.base_mva`.
pub fn print_results(w: &mut dyn Write, results: &PFResults, opt: &PFOpt) -> Result<()> {
    if !results.converged() {
        bail!(
            "power flow did not converge in {} iterations",
            results.convergence.iterations()
        );
    }
    let net = &results.network;
    let kva = opt.base_mva * 1e3;
    let sep = "#".repeat(70);

    writeln!(
        w,
        "Backward/forward sweep converged in {} iterations ({:.3} ms).",
        results.convergence.iterations(),
        results.et.as_secs_f64() * 1e3
    )?;
    writeln!(w, "Base: {} MVA, {} kV", opt.base_mva, opt.base_kv)?;
    writeln!(w, "{}", sep)?;

    writeln!(w, "Bus voltages:")?;
    for (b, &v) in net.bus.iter().zip(results.v()) {
        writeln!(w, "{:02}-> {}", b.bus_i, to_polar(v))?;
    }
    writeln!(w, "Line currents:")?;
    for (l, &i) in net.line.iter().zip(results.i_line()) {
        writeln!(w, "{:02}-{:02}-> {}", l.from_bus, l.to_bus, to_polar(i))?;
    }
    writeln!(w, "{}", sep)?;

    let balance = &results.balance;
    writeln!(w, "Line losses: {} kW", balance.p_loss() * kva)?;
    writeln!(
        w,
        "S_in = {} kVA  S_out = {} kVA",
        to_polar(balance.s_in * kva),
        to_polar(balance.s_out() * kva)
    )?;
    Ok(())
}

#[derive(Serialize)]
struct BusResult {
    bus: usize,
    vm: f64,
    va_deg: f64,
}

#[derive(Serialize)]
struct LineResult {
    from: usize,
    to: usize,
    i_mag: f64,
    i_ang_deg: f64,
    p_loss_kw: f64,
    q_loss_kvar: f64,
}

/// Writes `bus_results.csv` and `line_results.csv` to `out_dir`.
pub fn write_csv(out_dir: &Path, results: &PFResults, opt: &PFOpt) -> Result<()> {
    if !results.converged() {
        bail!("power flow did not converge, no results written");
    }
    let net = &results.network;
    let kva = opt.base_mva * 1e3;

    let mut wtr = csv::Writer::from_path(out_dir.join("bus_results.csv"))?;
    for (b, v) in net.bus.iter().zip(results.v()) {
        wtr.serialize(BusResult {
            bus: b.bus_i,
            vm: v.norm(),
            va_deg: v.arg().to_degrees(),
        })?;
    }
    wtr.flush()?;

    let losses = branch_losses(net, results.i_line());
    let mut wtr = csv::Writer::from_path(out_dir.join("line_results.csv"))?;
    for ((l, i), s) in net.line.iter().zip(results.i_line()).zip(losses) {
        wtr.serialize(LineResult {
            from: l.from_bus,
            to: l.to_bus,
            i_mag: i.norm(),
            i_ang_deg: i.arg().to_degrees(),
            p_loss_kw: s.re * kva,
            q_loss_kvar: s.im * kva,
        })?;
    }
    wtr.flush()?;

    log::info!("results written to {}", out_dir.display());
    Ok(())
}
