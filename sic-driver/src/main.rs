//! Shader IR Compiler Driver
//!
//! Command-line entry point for running the optimization passes over
//! JSON-serialized shader IR and for inspecting the storage descriptor layout.

use clap::{Parser, Subcommand};
use log::info;
use sic_common::{ShaderStage, STORAGE_MAX_COUNT};
use sic_ir::Function;
use sic_opt::storage_layout::STORAGE_DESC_SIZE;
use sic_opt::{optimize_function, storage_cb_offset, storage_region, PassOptions};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sic")]
#[command(about = "Shader IR Compiler")]
#[command(version = "0.1.0")]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the optimization passes over a JSON IR function
    Optimize {
        /// Input IR file
        input: PathBuf,

        /// Shader stage the function belongs to
        #[arg(short, long)]
        stage: ShaderStage,

        /// Output IR file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print IR to stdout before and after optimizing
        #[arg(long)]
        print_ir: bool,

        /// Leave global memory accesses alone
        #[arg(long)]
        no_global_to_storage: bool,
    },

    /// Print the constant buffer 0 offset of a storage descriptor
    StorageOffset {
        /// Shader stage
        #[arg(short, long)]
        stage: ShaderStage,

        /// Storage buffer slot
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..STORAGE_MAX_COUNT as i64))]
        slot: u32,
    },

    /// Print the storage descriptor block of every stage
    Layout,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match cli.command {
        Commands::Optimize { input, stage, output, print_ir, no_global_to_storage } => {
            let options = PassOptions {
                global_to_storage: !no_global_to_storage,
            };
            if let Err(e) = optimize_file(&input, stage, output.as_deref(), print_ir, &options) {
                eprintln!("Error optimizing {}: {}", input.display(), e);
                std::process::exit(1);
            }
        }
        Commands::StorageOffset { stage, slot } => {
            let offset = storage_cb_offset(stage, slot);
            println!("{offset:#x}");
        }
        Commands::Layout => print_layout(),
    }
}

fn optimize_file(
    input_path: &Path,
    stage: ShaderStage,
    output_path: Option<&Path>,
    print_ir: bool,
    options: &PassOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(input_path)?;
    let mut function = Function::from_json(&text)?;
    info!("Loaded '{}' with {} blocks", function.name, function.blocks.len());

    if print_ir {
        println!("Input IR:");
        println!("{function}");
    }

    let report = optimize_function(&mut function, stage, options);
    function.validate()?;

    if print_ir {
        println!("\nOptimized IR:");
        println!("{function}");
    }
    println!(
        "{}: {} accesses rewritten to storage buffers across {} blocks ({stage})",
        function.name, report.rewritten, report.blocks
    );

    if let Some(path) = output_path {
        fs::write(path, function.to_json()?)?;
        println!("IR written to: {}", path.display());
    }

    Ok(())
}

fn print_layout() {
    println!("{:<14} {:>8} {:>8} {:>6}", "stage", "start", "end", "slots");
    for stage in ShaderStage::ALL {
        let region = storage_region(stage);
        let slots = (region.end - region.start) / STORAGE_DESC_SIZE;
        println!(
            "{:<14} {:>#8x} {:>#8x} {:>6}",
            stage.short_name(),
            region.start,
            region.end,
            slots
        );
    }
}
