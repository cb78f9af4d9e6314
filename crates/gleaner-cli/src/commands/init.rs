//! Init command implementation.

use crate::error::Result;
use crate::output::Formatter;
use crate::vault::Vault;
use gleaner_domain::traits::DocumentStore;
use gleaner_domain::Category;
use gleaner_filer::default_template;
use tracing::info;

/// Execute the init command.
pub fn execute_init(vault: &Vault, formatter: &Formatter) -> Result<()> {
    let written = write_templates(vault)?;
    println!("{}", formatter.format_init(&written)?);
    Ok(())
}

/// Write each missing category template; existing ones are kept
///
/// Returns every template path with whether it was created.
pub fn write_templates(vault: &Vault) -> Result<Vec<(String, bool)>> {
    let folder = &vault.config().vault.layout.templates_folder;
    let mut store = vault.store();
    let mut written = Vec::new();

    for category in Category::ALL {
        let path = format!("{}/{}.md", folder, category.spec().template);
        let created = !store.exists(&path);
        if created {
            store.create(&path, default_template(category))?;
            info!("Created template {}", path);
        }
        written.push((path, created));
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_writes_missing_templates_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Templates")).unwrap();
        std::fs::write(dir.path().join("Templates/Idea-Template.md"), "custom").unwrap();

        let vault = Vault::open(dir.path().to_path_buf(), Config::default()).unwrap();
        let written = write_templates(&vault).unwrap();

        assert_eq!(written.len(), 4);
        assert!(written.contains(&("Templates/Person-Template.md".to_string(), true)));
        assert!(written.contains(&("Templates/Idea-Template.md".to_string(), false)));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("Templates/Idea-Template.md")).unwrap(),
            "custom"
        );
        assert!(std::fs::read_to_string(dir.path().join("Templates/Admin-Template.md"))
            .unwrap()
            .contains("type: admin"));

        let again = write_templates(&vault).unwrap();
        assert!(again.iter().all(|(_, created)| !created));
    }
}
