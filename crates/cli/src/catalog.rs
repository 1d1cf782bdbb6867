use crate::{ClasspathArgs, ProjectArgs};
use clap::Subcommand;
use extguard_core::{Catalog, CatalogOutcome};
use tabled::{Table, Tabled};
use tracing::info;

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Scan the runtime classpath and write the extension catalog
    Build {
        #[command(flatten)]
        classpath: ClasspathArgs,
    },
    /// Print the persisted extension catalog
    Show,
}

#[derive(Tabled)]
struct CatalogRow {
    #[tabled(rename = "Extension")]
    extension: String,
    #[tabled(rename = "Deployment")]
    deployment: String,
}

pub fn run(args: &ProjectArgs, cmd: CatalogCommands) -> Result<(), Box<dyn std::error::Error>> {
    let project = args.load()?;

    match cmd {
        CatalogCommands::Build { classpath } => {
            let resolver = classpath.resolver();
            match extguard_runtime::build_catalog(&project, resolver.as_ref())? {
                CatalogOutcome::Built(catalog) => {
                    info!("Catalog written with {} extensions", catalog.len())
                }
                CatalogOutcome::UpToDate(catalog) => {
                    info!("Catalog up-to-date with {} extensions", catalog.len())
                }
            }
        }
        CatalogCommands::Show => {
            let path = project.layout().catalog_file();
            let catalog = Catalog::load(&path)?;
            println!("Catalog: {}", path.display());
            if let Some(fingerprint) = catalog.fingerprint() {
                println!("Fingerprint: {:016x}", fingerprint);
            }

            let rows: Vec<CatalogRow> = catalog
                .iter()
                .map(|(extension, deployment)| CatalogRow {
                    extension: extension.to_string(),
                    deployment: deployment.to_string(),
                })
                .collect();

            if rows.is_empty() {
                println!("No extensions on the runtime classpath.");
            } else {
                println!("{}", Table::new(rows));
            }
        }
    }
    Ok(())
}
