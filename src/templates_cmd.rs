use crate::cli::TemplatesArgs;
use colored::*;
use repodump::{Result, TemplateRegistry};

pub fn run(args: TemplatesArgs) -> Result<()> {
    let registry = TemplateRegistry::builtin();

    if let Some(key) = args.key {
        if let Some(text) = registry.text(key) {
            print!("{}", text);
        }
        return Ok(());
    }

    for template in registry.iter() {
        let name = format!("{:<18}", template.key.to_string());
        println!("{} {}", name.cyan(), template.summary);
    }

    Ok(())
}
