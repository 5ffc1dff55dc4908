use std::io::Write;

use liftoff_build::bundle::BUNDLE_DIR;
use liftoff_cloud::AzureProvider;

use super::{Overrides, Project};

/// Delete the resource group and the local build context.
pub async fn destroy(project: &Project, skip_confirm: bool, wait: bool) -> anyhow::Result<()> {
    let config = project.load_config()?;
    let deployment = Overrides::default().resolve(config, project);
    let resource_group = &deployment.resource_group;

    if !skip_confirm {
        println!("This will delete:");
        println!("  - Resource group '{resource_group}' and every resource in it");
        println!("  - Local {BUNDLE_DIR}/");
        println!();
        print!("Are you sure? [y/N] ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !is_yes(&input) {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("Deleting resource group '{resource_group}'...");
    let client = AzureProvider::new();
    client.delete_resource_group(resource_group, wait).await?;
    if wait {
        println!("  Deleted.");
    } else {
        println!("  Deletion started; it continues in the background.");
    }

    let bundle_dir = project.dir.join(BUNDLE_DIR);
    if bundle_dir.exists() {
        std::fs::remove_dir_all(&bundle_dir)?;
        println!("Removed local {BUNDLE_DIR}/");
    }

    println!();
    println!("Destroy complete.");
    Ok(())
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim(), "y" | "Y" | "yes" | "YES")
}
