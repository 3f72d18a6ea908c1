use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use radpf::printpf::{print_results, write_csv};
use radpf::{
    load_case, load_case_files, runpf, Network, PFOpt, PFOptBuilder, PrintProgress,
    ProgressMonitor, SlackBus, BUS_FILE, LINE_FILE,
};
use std::path::PathBuf;

/// Backward/forward sweep power flow for radial distribution networks.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Power Flow
    #[clap(name = "pf")]
    PowerFlow(PfArgs),

    /// Check that a case describes a single radial network
    Check(CaseArgs),
}

#[derive(Args)]
struct CaseArgs {
    /// Case directory containing Bus.txt and Line.txt
    #[arg(required = true)]
    input: PathBuf,

    /// Bus data file, instead of <INPUT>/Bus.txt
    #[arg(long)]
    bus_file: Option<PathBuf>,

    /// Line data file, instead of <INPUT>/Line.txt
    #[arg(long)]
    line_file: Option<PathBuf>,

    /// Number of the slack bus, instead of the bus of type REF.
    #[arg(long)]
    slack: Option<usize>,
}

#[derive(Args)]
struct PfArgs {
    #[command(flatten)]
    case: CaseArgs,

    /// Output directory for bus_results.csv and line_results.csv
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Termination tolerance on the largest bus voltage change (p.u.).
    #[arg(long)]
    tol: Option<f64>,

    /// Maximum number of iterations.
    #[arg(long)]
    max_it: Option<usize>,

    /// Power base (MVA) for reported powers.
    #[arg(long)]
    base_mva: Option<f64>,

    /// Voltage base (kV).
    #[arg(long)]
    base_kv: Option<f64>,

    /// Print the largest voltage change of each iteration.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() {
    env_logger::Builder::from_default_env()
        .format_level(false)
        .format_target(false)
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    match execute(&cli) {
        Ok(_) => {
            std::process::exit(0);
        }
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(2);
        }
    }
}

fn execute(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::PowerFlow(args) => power_flow(args),
        Commands::Check(args) => check(args),
    }
}

fn read_case(args: &CaseArgs) -> Result<radpf::Case> {
    let case = match (&args.bus_file, &args.line_file) {
        (None, None) => load_case(&args.input)?,
        (bus_file, line_file) => {
            let name = args
                .input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let bus_path = bus_file.clone().unwrap_or_else(|| args.input.join(BUS_FILE));
            let line_path = line_file
                .clone()
                .unwrap_or_else(|| args.input.join(LINE_FILE));
            load_case_files(&name, &bus_path, &line_path)?
        }
    };
    Ok(case)
}

fn slack(args: &CaseArgs) -> SlackBus {
    match args.slack {
        Some(bus_i) => SlackBus::Bus(bus_i),
        None => SlackBus::ByType,
    }
}

fn power_flow(args: &PfArgs) -> Result<()> {
    let case = read_case(&args.case)?;

    let mut builder = PFOptBuilder::default();
    builder.slack(slack(&args.case));
    if let Some(tol) = args.tol {
        builder.tolerance(tol);
    }
    if let Some(max_it) = args.max_it {
        builder.max_it(max_it);
    }
    if let Some(base_mva) = args.base_mva {
        builder.base_mva(base_mva);
    }
    if let Some(base_kv) = args.base_kv {
        builder.base_kv(base_kv);
    }
    let opt: PFOpt = builder.build()?;

    let progress = PrintProgress {};
    let progress: Option<&dyn ProgressMonitor> = if args.verbose {
        Some(&progress)
    } else {
        None
    };

    let results = runpf(&case, &opt, progress)?;
    if !results.converged() {
        return Err(anyhow::anyhow!(
            "power flow did not converge in {} iterations",
            results.convergence.iterations()
        ));
    }

    print_results(&mut std::io::stdout().lock(), &results, &opt)?;

    if let Some(out_dir) = &args.output {
        std::fs::create_dir_all(out_dir)?;
        write_csv(out_dir, &results, &opt)?;
    }

    Ok(())
}

fn check(args: &CaseArgs) -> Result<()> {
    let case = read_case(args)?;
    let net = Network::new(&case, slack(args))?;

    let leaves = (0..net.nl()).filter(|&l| net.is_leaf(l)).count();
    println!(
        "{}: {} buses, {} lines ({} leaf lines), slack bus {}",
        case.name,
        net.nb(),
        net.nl(),
        leaves,
        net.order.i2e[net.slack]
    );
    Ok(())
}
