use crate::error::Result;
use crate::losses::PowerBalance;
use crate::mpopt::PFOpt;
use crate::network::{Case, Network};
use crate::radial::{radial_pf, Convergence, ProgressMonitor, SweepState};

use num_complex::Complex64;
use std::time::{Duration, Instant};

/// Solved radial network.
#[derive(Debug, Clone)]
pub struct PFResults {
    pub network: Network,
    pub state: SweepState,
    pub convergence: Convergence,
    /// Largest voltage change of each iteration.
    pub history: Vec<f64>,
    pub balance: PowerBalance,
    /// Elapsed solution time.
    pub et: Duration,
}

impl PFResults {
    pub fn converged(&self) -> bool {
        self.convergence.is_converged()
    }

    /// Bus voltages (p.u.) in input bus order.
    pub fn v(&self) -> &[Complex64] {
        &self.state.v
    }

    /// Line currents (p.u.) in input line order.
    pub fn i_line(&self) -> &[Complex64] {
        &self.state.i_line
    }
}

/// Runs a backward/forward sweep power flow on `case`.
///
/// Structural problems with the case and numerical breakdown of the sweep
/// are returned as errors. Whether the iterations converged is recorded in
/// the results.
pub fn runpf(
    case: &Case,
    opt: &PFOpt,
    progress: Option<&dyn ProgressMonitor>,
) -> Result<PFResults> {
    let net = Network::new(case, opt.slack)?;

    let t0 = Instant::now();
    let soln = radial_pf(&net, opt, progress)?;
    let et = t0.elapsed();

    let balance = PowerBalance::new(&net, &soln.state);
    log::debug!(
        "S_in = {}, S_out = {}, mismatch {:e}",
        balance.s_in,
        balance.s_out(),
        balance.mismatch()
    );

    Ok(PFResults {
        network: net,
        state: soln.state,
        convergence: soln.convergence,
        history: soln.history,
        balance,
        et,
    })
}
