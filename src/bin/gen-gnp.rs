use std::io::ErrorKind;
use std::path::PathBuf;
use structopt::StructOpt;

use rand::SeedableRng;
use rand_pcg::Pcg64;

use ufvs::graph::io::FileFormat;
use ufvs::graph::{io::DefaultWriter, AdjArray, Node};
use ufvs::random_models::gnp::generate_gnp;

#[derive(Debug, StructOpt)]
#[structopt(name = "gen-gnp", about = "Samples an undirected Gilbert G(n,p) graph")]
struct Opt {
    /// Output file. `stdout` if not specified.
    #[structopt(parse(from_os_str))]
    output: Option<PathBuf>,

    #[structopt(short, long)]
    format: Option<FileFormat>,

    /// Number of nodes to generate
    #[structopt(short, long)]
    nodes: Node,

    /// Edge probability
    #[structopt(short, long)]
    probability: f64,

    /// Seed value
    #[structopt(short, long)]
    seed: Option<u64>,
}

fn main() -> std::io::Result<()> {
    let opt = Opt::from_args();

    if !(0.0..=1.0).contains(&opt.probability) {
        return Err(std::io::Error::new(
            ErrorKind::InvalidInput,
            "Probability has to be in interval [0, 1]",
        ));
    }

    let mut rng = match opt.seed {
        Some(s) => Pcg64::seed_from_u64(s),
        None => Pcg64::from_entropy(),
    };

    let writer = DefaultWriter::from_path(opt.output, opt.format)?;

    let graph: AdjArray = generate_gnp(&mut rng, opt.nodes, opt.probability);

    writer.write(&graph)?;

    Ok(())
}
