//! ec-decode: print a hex-encoded transaction, block or block header as JSON.
//!
//! ```text
//! ec-decode tx 070102000000000000
//! RUST_LOG=debug ec-decode block <hex>
//! ```

mod view;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ec_02_legacy::{Block, BlockHeader, TxData};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use view::{BlockHeaderView, BlockView, TxView};

#[derive(Parser, Debug)]
#[command(name = "ec-decode")]
#[command(about = "Decode Entry-Chain wire objects and print them as JSON")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a transaction
    Tx { hex: String },
    /// Decode a full block
    Block { hex: String },
    /// Decode a block header
    Blockheader { hex: String },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match &args.command {
        Command::Tx { hex } => {
            let tx = TxData::from_hex(hex).context("decoding transaction")?;
            debug!("[ec-decode] {} inputs, {} outputs", tx.inputs.len(), tx.outputs.len());
            print(&TxView::new(&tx).context("mapping transaction")?)
        }
        Command::Block { hex } => {
            let block = Block::from_hex(hex).context("decoding block")?;
            debug!("[ec-decode] {} transactions", block.transactions.len());
            print(&BlockView::new(&block).context("mapping block")?)
        }
        Command::Blockheader { hex } => {
            let header = BlockHeader::from_hex(hex).context("decoding block header")?;
            print(&BlockHeaderView::new(&header).context("mapping block header")?)
        }
    }
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
