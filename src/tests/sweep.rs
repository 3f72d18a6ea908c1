use super::radial_case;
use crate::losses::PowerBalance;
use crate::mpopt::{PFOpt, SlackBus};
use crate::network::Network;
use crate::radial::radial_pf;

use proptest::prelude::*;

fn opt() -> PFOpt {
    PFOpt {
        tolerance: 1e-10,
        ..PFOpt::default()
    }
}

proptest! {
    #[test]
    fn light_radial_networks_converge(case in radial_case()) {
        let net = Network::new(&case, SlackBus::ByType).unwrap();
        let soln = radial_pf(&net, &opt(), None).unwrap();

        prop_assert!(soln.convergence.is_converged());
        prop_assert!(soln.convergence.iterations() < 20);
        prop_assert_eq!(soln.history.len(), soln.convergence.iterations());
    }

    #[test]
    fn max_delta_is_non_increasing(case in radial_case()) {
        let net = Network::new(&case, SlackBus::ByType).unwrap();
        let soln = radial_pf(&net, &opt(), None).unwrap();

        for (k, w) in soln.history.windows(2).enumerate() {
            prop_assert!(
                w[1] <= w[0] * (1.0 + 1e-9) + 1e-15,
                "iteration {}: {} > {}", k + 2, w[1], w[0]
            );
        }
    }

    #[test]
    fn power_balance_holds(case in radial_case()) {
        let net = Network::new(&case, SlackBus::ByType).unwrap();
        let soln = radial_pf(&net, &opt(), None).unwrap();
        let balance = PowerBalance::new(&net, &soln.state);

        prop_assert!(balance.mismatch() < 1e-8, "mismatch {}", balance.mismatch());
        prop_assert!(balance.p_loss() >= 0.0);
    }

    #[test]
    fn leaf_line_current_is_load_current(case in radial_case()) {
        let net = Network::new(&case, SlackBus::ByType).unwrap();
        let soln = radial_pf(&net, &opt(), None).unwrap();

        for l in (0..net.nl()).filter(|&l| net.is_leaf(l)) {
            let t = net.topology.t[l];
            prop_assert_eq!(soln.state.i_line[l], soln.state.i_load[t]);
        }
    }
}
