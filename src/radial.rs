use crate::error::{RadialError, Result};
use crate::math::norm_inf_diff;
use crate::mpopt::PFOpt;
use crate::network::Network;
use crate::polar::{format_polar_vec, format_rect_vec};

use num_complex::Complex64;
use num_traits::{One, Zero};

pub trait ProgressMonitor {
    fn update(&self, i: usize, max_delta: f64);
}

pub struct PrintProgress {}

impl ProgressMonitor for PrintProgress {
    fn update(&self, i: usize, max_delta: f64) {
        if i == 1 {
            println!(" it    max |dV| (p.u.)");
            println!("----  -----------------");
        }
        println!("{:3}      {:10.3e}", i, max_delta);
    }
}

/// Termination state of the sweep iterations.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Convergence {
    /// The largest voltage change fell below the tolerance.
    Converged { iterations: usize },
    /// `max_it` iterations were performed without meeting the tolerance.
    IterationLimitReached { iterations: usize, max_delta: f64 },
}

impl Convergence {
    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Converged { .. })
    }

    pub fn iterations(&self) -> usize {
        match *self {
            Convergence::Converged { iterations } => iterations,
            Convergence::IterationLimitReached { iterations, .. } => iterations,
        }
    }
}

/// Iteration state of the backward/forward sweep, indexed by internal bus
/// and line numbers.
#[derive(Debug, Clone)]
pub struct SweepState {
    /// Bus voltages.
    pub v: Vec<Complex64>,
    /// Bus voltages at the end of the previous iteration.
    pub v_prev: Vec<Complex64>,
    /// Current drawn by the load at each bus.
    pub i_load: Vec<Complex64>,
    /// Current flowing through each line, from its upstream bus.
    pub i_line: Vec<Complex64>,
}

impl SweepState {
    /// Flat start: 1 p.u. at every bus and no current anywhere.
    pub fn flat_start(net: &Network) -> Self {
        let v = vec![Complex64::one(); net.nb()];
        Self {
            v_prev: v.clone(),
            v,
            i_load: vec![Complex64::zero(); net.nb()],
            i_line: vec![Complex64::zero(); net.nl()],
        }
    }

    /// Load currents `conj(S / V)` at the present voltage estimate.
    pub fn update_load_currents(
        &mut self,
        net: &Network,
        min_voltage: f64,
        iteration: usize,
    ) -> Result<()> {
        for (i, (&v, &s)) in self.v.iter().zip(net.s_load()).enumerate() {
            if !v.is_finite() || v.norm() < min_voltage {
                return Err(RadialError::NumericalInstability {
                    bus: net.order.i2e[i],
                    iteration,
                });
            }
            self.i_load[i] = (s / v).conj();
        }
        Ok(())
    }

    /// Line currents from the leaves towards the slack bus. A line carries
    /// the load current of its downstream bus plus the currents of all lines
    /// leaving that bus.
    pub fn backward_sweep(&mut self, net: &Network) {
        let topo = &net.topology;
        for l in topo.backward() {
            let t = topo.t[l];
            self.i_line[l] = if topo.is_leaf(l) {
                self.i_load[t]
            } else {
                topo.children[t]
                    .iter()
                    .fold(self.i_load[t], |sum, &c| sum + self.i_line[c])
            };
        }
    }

    /// Bus voltages from the slack bus towards the leaves, subtracting the
    /// voltage drop across each line.
    pub fn forward_sweep(&mut self, net: &Network, iteration: usize) -> Result<()> {
        let topo = &net.topology;
        let z = net.z();
        for &l in &topo.forward {
            let (f, t) = (topo.f[l], topo.t[l]);
            let v = self.v[f] - self.i_line[l] * z[l];
            if !v.is_finite() {
                return Err(RadialError::NumericalInstability {
                    bus: net.order.i2e[t],
                    iteration,
                });
            }
            self.v[t] = v;
        }
        Ok(())
    }

    /// Largest change in bus voltage since the previous iteration.
    pub fn max_delta(&self) -> f64 {
        norm_inf_diff(&self.v, &self.v_prev)
    }

    fn snapshot(&mut self) {
        self.v_prev.copy_from_slice(&self.v);
    }
}

/// Result of the sweep iterations.
#[derive(Debug, Clone)]
pub struct SweepSoln {
    pub state: SweepState,
    pub convergence: Convergence,
    /// Largest voltage change of each iteration.
    pub history: Vec<f64>,
}

/// Solves the power flow of a radial network using the backward/forward
/// sweep method, starting from a flat voltage profile.
///
/// The slack bus voltage is held at 1 p.u. Each iteration updates the load
/// currents from the latest voltages, accumulates line currents leaves-first
/// and then recomputes the voltages root-first. Iterations stop when the
/// largest bus voltage change is below `opt.tolerance`, or after
/// `opt.max_it` iterations. Reaching the limit is reported through
/// `Convergence::IterationLimitReached`, not as an error.
pub fn radial_pf(
    net: &Network,
    opt: &PFOpt,
    progress: Option<&dyn ProgressMonitor>,
) -> Result<SweepSoln> {
    let mut state = SweepState::flat_start(net);
    let mut history = Vec::new();

    log::info!(
        "backward/forward sweep: {} buses, {} lines, tolerance {:e}, max {} iterations",
        net.nb(),
        net.nl(),
        opt.tolerance,
        opt.max_it
    );

    for it in 1..=opt.max_it {
        state.update_load_currents(net, opt.min_voltage, it)?;
        state.backward_sweep(net);
        state.forward_sweep(net, it)?;

        let max_delta = state.max_delta();
        history.push(max_delta);

        log::debug!("iteration {}: max |dV| = {:e}", it, max_delta);
        log::trace!("I_line: {}", format_rect_vec(&state.i_line));
        log::trace!("V: {}", format_polar_vec(&state.v));
        if let Some(pm) = progress {
            pm.update(it, max_delta);
        }

        if max_delta < opt.tolerance {
            log::info!("backward/forward sweep converged in {} iterations", it);
            return Ok(SweepSoln {
                state,
                convergence: Convergence::Converged { iterations: it },
                history,
            });
        }
        state.snapshot();
    }

    let max_delta = history.last().copied().unwrap_or(f64::INFINITY);
    log::warn!(
        "backward/forward sweep did not converge in {} iterations (max |dV| = {:e})",
        opt.max_it,
        max_delta
    );
    Ok(SweepSoln {
        state,
        convergence: Convergence::IterationLimitReached {
            iterations: opt.max_it,
            max_delta,
        },
        history,
    })
}
