use crate::ProjectArgs;
use clap::Subcommand;
use extguard_core::Publication;
use extguard_core::metadata;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum AdjustCommands {
    /// Inject the companion dependency into a generated POM
    Pom {
        /// Publication the POM belongs to (runtime, deployment or spi)
        #[arg(long)]
        publication: Publication,
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Rename variants and inject the companion dependency into module metadata
    Module {
        /// Publication the module metadata belongs to (runtime, deployment or spi)
        #[arg(long)]
        publication: Publication,
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

pub fn run(args: &ProjectArgs, cmd: AdjustCommands) -> Result<(), Box<dyn std::error::Error>> {
    let project = args.load()?;

    match cmd {
        AdjustCommands::Pom { publication, file } => {
            metadata::adjust_pom(&file, publication, &project)?;
        }
        AdjustCommands::Module { publication, file } => {
            metadata::adjust_module_metadata(&file, publication, &project)?;
        }
    }
    Ok(())
}
