use clap::Subcommand;
use questline_core::{Catalog, Config};

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List the challenge templates the engine samples from
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: CatalogAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let catalog = match config.catalog.path.as_deref() {
        Some(path) => Catalog::from_json(&std::fs::read_to_string(path)?)?,
        None => Catalog::builtin(),
    };

    match action {
        CatalogAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(catalog.templates())?);
            } else {
                for (index, template) in catalog.templates().iter().enumerate() {
                    println!(
                        "{index:2}  [{:?}] {} ({} xp)",
                        template.kind, template.description, template.amount
                    );
                }
            }
        }
    }
    Ok(())
}
