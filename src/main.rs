use std::error::Error;
use std::fs::create_dir_all;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use merkletree::{
  Blake3, Digest, HashStrategy, Keccak256, LeafMode, PairOrdering, Positional, Sha3_256, SortedPair, Tree, TreeConfig,
  splitmix64, verify,
};
use rand::Rng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::allocation::Allocation;
use crate::stat::Report;

mod allocation;
mod stat;

#[derive(Parser)]
#[command(name = "merkletree")]
#[command(author, version, about = "Build Merkle trees, print inclusion proofs and measure their cost")]
struct Args {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Build a tree over allocations and print its root, a proof and the leaf digests
  Demo(DemoArgs),
  /// Time tree construction, proof generation and verification for growing trees
  Measure(MeasureArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum HashKind {
  Keccak256,
  #[value(name = "sha3-256")]
  Sha3_256,
  Blake3,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderKind {
  Sorted,
  Positional,
}

#[derive(clap::Args)]
struct TreeArgs {
  #[arg(long, value_enum, default_value_t = HashKind::Keccak256)]
  hash: HashKind,

  /// Sibling ordering: `sorted` makes proofs position independent
  #[arg(long, value_enum, default_value_t = OrderKind::Sorted)]
  order: OrderKind,

  /// Hash content digests once more before using them as leaves
  #[arg(long, default_value_t = false)]
  hash_leaves: bool,
}

impl TreeArgs {
  fn config(&self) -> TreeConfig {
    let hash: Arc<dyn HashStrategy> = match self.hash {
      HashKind::Keccak256 => Arc::new(Keccak256),
      HashKind::Sha3_256 => Arc::new(Sha3_256),
      HashKind::Blake3 => Arc::new(Blake3),
    };
    let order: Arc<dyn PairOrdering> = match self.order {
      OrderKind::Sorted => Arc::new(SortedPair),
      OrderKind::Positional => Arc::new(Positional),
    };
    let leaf_mode = if self.hash_leaves { LeafMode::Hashed } else { LeafMode::Raw };
    TreeConfig::from_arcs(hash, order).with_leaf_mode(leaf_mode)
  }
}

#[derive(clap::Args)]
struct DemoArgs {
  /// Allocation to commit to, repeatable; defaults to three sample allocations
  #[arg(short, long = "item", value_name = "ADDRESS:AMOUNT")]
  items: Vec<Allocation>,

  /// Index of the item to prove
  #[arg(short, long, default_value_t = 1)]
  prove: usize,

  #[command(flatten)]
  tree: TreeArgs,
}

#[derive(clap::Args)]
struct MeasureArgs {
  /// Largest number of leaves to measure
  #[arg(long, default_value_t = 1 << 14)]
  max_n: u64,

  /// Number of tree sizes measured between 0 and `max_n`
  #[arg(short, long, default_value_t = 8)]
  division: u64,

  /// Repetitions per tree size
  #[arg(short, long, default_value_t = 10)]
  trials: usize,

  /// Directory for CSV reports; nothing is written when omitted
  #[arg(short, long)]
  output: Option<PathBuf>,

  #[arg(short, long, default_value_t = Local::now().format("%Y%m%d%H%M%S").to_string())]
  session: String,

  #[command(flatten)]
  tree: TreeArgs,
}

fn main() -> Result<(), Box<dyn Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("merkletree=info")))
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  match args.command {
    Command::Demo(args) => demo(args),
    Command::Measure(args) => measure(args),
  }
}

fn demo(args: DemoArgs) -> Result<(), Box<dyn Error>> {
  let items = if args.items.is_empty() { Allocation::samples()? } else { args.items };
  let config = args.tree.config();
  debug!(?config, items = items.len(), "building demo tree");

  let tree = Tree::build(&items, config.clone())?;
  println!("Root: {}", tree.root());

  let target = items.get(args.prove).ok_or_else(|| format!("no item at index {}", args.prove))?;
  let (proof, index) = tree.generate_path(target)?;
  println!("Proof for {target} (leaf {index}):");
  for (i, sibling) in proof.siblings().iter().enumerate() {
    println!("  proof[{i}]: {sibling}");
  }

  for (i, leaf) in tree.leaves().take(tree.leaf_count()).enumerate() {
    println!("leaf[{i}] hash: {leaf}");
  }

  let leaf = config.leaf_digest(target)?;
  let valid = verify(&leaf, &proof, tree.root(), &config)?;
  println!("Verified: {valid}");
  Ok(())
}

fn measure(args: MeasureArgs) -> Result<(), Box<dyn Error>> {
  let config = args.tree.config();
  let division = args.division.max(1);
  let step = (args.max_n / division).max(1);
  let mut build = Report::new();
  let mut prove = Report::new();
  let mut check = Report::new();
  let mut rng = rand::rng();

  info!(max_n = args.max_n, division, trials = args.trials, hash = config.hash().name(), "measuring");
  for n in (step..=args.max_n).step_by(step as usize) {
    let items = (0..n).map(|i| config.hash().hash(&splitmix64(i).to_le_bytes())).collect::<Result<Vec<Digest>, _>>()?;
    for _ in 0..args.trials {
      let t0 = Instant::now();
      let tree = Tree::build(&items, config.clone())?;
      build.add(n, t0.elapsed());

      let k = rng.random_range(0..items.len());
      let t0 = Instant::now();
      let proof = tree.proof_at(k)?;
      prove.add(n, t0.elapsed());

      let leaf = config.leaf_digest(&items[k])?;
      let t0 = Instant::now();
      let valid = verify(&leaf, &proof, tree.root(), &config)?;
      check.add(n, t0.elapsed());
      if !valid {
        return Err(format!("proof for leaf {k} of {n} did not verify").into());
      }
    }
    for (name, report) in [("build", &build), ("prove", &prove), ("verify", &check)] {
      if let Some(stat) = report.single(n) {
        println!("[{name}] n={n} {stat}");
      }
    }
  }

  if let Some(dir) = &args.output {
    create_dir_all(dir)?;
    for (name, report) in [("build", &build), ("prove", &prove), ("verify", &check)] {
      let path = dir.join(format!("{}-{name}.csv", args.session));
      report.save_to_csv(&path)?;
      info!(path = %path.display(), "report saved");
    }
  }
  Ok(())
}
