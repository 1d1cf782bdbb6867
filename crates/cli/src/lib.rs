mod adjust;
mod catalog;
mod generate;
mod verify;

use clap::{Args, Parser, Subcommand};
use extguard_core::ExtensionProject;
use extguard_core::project::DEFAULT_PROJECT_FILE;
use std::path::PathBuf;

pub use adjust::AdjustCommands;
pub use catalog::CatalogCommands;
pub use generate::GenerateCommands;

#[derive(Parser)]
#[command(
    name = "extguard",
    version,
    about = "Keeps an extension's runtime, deployment and spi artifacts consistent",
    long_about = "Extguard checks the resolved classpaths of an extension's runtime and deployment \
                  artifacts against each other and post-processes the descriptors generated for \
                  their publications."
)]
pub struct Cli {
    #[command(flatten)]
    pub project: ProjectArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Extension project file
    #[arg(long, global = true, value_name = "FILE", default_value = DEFAULT_PROJECT_FILE)]
    pub project: PathBuf,

    /// Override the project's build directory
    #[arg(long, global = true, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,
}

impl ProjectArgs {
    pub fn load(&self) -> Result<ExtensionProject, Box<dyn std::error::Error>> {
        let project = ExtensionProject::load(&self.project)?;
        Ok(match &self.build_dir {
            Some(dir) => project.with_build_dir(dir),
            None => project,
        })
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ClasspathArgs {
    /// Resolution report of the runtime artifact's classpath
    #[arg(long, value_name = "REPORT")]
    pub runtime_classpath: Option<PathBuf>,

    /// Resolution report of the deployment artifact's classpath
    #[arg(long, value_name = "REPORT")]
    pub deployment_classpath: Option<PathBuf>,
}

impl ClasspathArgs {
    fn resolver(&self) -> Box<dyn extguard_api::ClasspathResolver> {
        extguard_runtime::build_resolver(
            self.runtime_classpath.as_deref(),
            self.deployment_classpath.as_deref(),
        )
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build or inspect the runtime extension catalog
    #[command(subcommand)]
    Catalog(CatalogCommands),
    /// Verify the deployment classpath against the runtime catalog
    Verify {
        #[command(flatten)]
        classpath: ClasspathArgs,
    },
    /// Build the catalog, then verify the deployment classpath
    Check {
        #[command(flatten)]
        classpath: ClasspathArgs,
    },
    /// Adjust a generated descriptor of one publication
    #[command(subcommand)]
    Adjust(AdjustCommands),
    /// Generate the resources carried by the runtime artifact
    #[command(subcommand)]
    Generate(GenerateCommands),
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let _guard = extguard_runtime::init_logging("cli", true);

    match cli.command {
        Commands::Catalog(cmd) => catalog::run(&cli.project, cmd),
        Commands::Verify { classpath } => verify::run(&cli.project, &classpath),
        Commands::Check { classpath } => verify::run_check(&cli.project, &classpath),
        Commands::Adjust(cmd) => adjust::run(&cli.project, cmd),
        Commands::Generate(cmd) => generate::run(&cli.project, cmd),
    }
}
