use crate::ProjectArgs;
use clap::Subcommand;
use extguard_core::generate;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum GenerateCommands {
    /// Write the extension marker properties
    Properties {
        /// Defaults to the build directory's quarkus-extension.properties
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Write the quarkus-extension.yaml descriptor
    Descriptor {
        /// Defaults to the build directory's quarkus-extension.yaml
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

pub fn run(args: &ProjectArgs, cmd: GenerateCommands) -> Result<(), Box<dyn std::error::Error>> {
    let project = args.load()?;
    let layout = project.layout();

    match cmd {
        GenerateCommands::Properties { output } => {
            let path = output.unwrap_or_else(|| layout.extension_properties());
            generate::generate_extension_properties(&project, &path)?;
        }
        GenerateCommands::Descriptor { output } => {
            let path = output.unwrap_or_else(|| layout.descriptor_file());
            generate::generate_descriptor(&project, &path)?;
        }
    }
    Ok(())
}
