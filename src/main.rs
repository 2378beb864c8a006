use clap::{Parser, Subcommand};
use shale::block::Block;
use shale::chain::Chain;

#[derive(Parser)]
#[command(
    name = "shale",
    version,
    about = "Append-only, tamper-evident ledger of hash-chained blocks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a small ledger, tamper with a block, and show the detection
    Demo,
}

fn main() {
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Demo => cmd_demo(),
    }
}

fn cmd_demo() {
    let mut chain = Chain::new();

    println!("Adding blocks...");
    chain.append("Transaction Data 1");
    chain.append("Transaction Data 2");
    chain.append("Another important transaction");

    println!("\nLedger contents:");
    for block in &chain.blocks {
        print_block(block);
    }

    println!("\nVerifying ledger integrity...");
    report(&chain);

    println!("\nTampering with the second block's data...");
    // Mutate the stored block directly, bypassing any hash recomputation.
    chain.blocks[1].data = "MODIFIED DATA!".into();

    println!("\nVerifying ledger integrity after tampering...");
    report(&chain);
}

fn print_block(block: &Block) {
    println!("Index: {}", block.index);
    println!("Timestamp: {}", block.timestamp.format("%Y-%m-%d %H:%M:%S"));
    println!("Data: {}", block.data);
    println!("Previous Hash: {}", block.previous_hash);
    println!("Current Hash: {}", block.current_hash);
    println!("{}", "-".repeat(30));
}

fn report(chain: &Chain) {
    let outcome = chain.verify();
    if outcome.is_valid() {
        println!("Ledger is valid.");
    } else {
        println!("{}", outcome);
        println!("Ledger is invalid.");
    }
}
