use std::path::PathBuf;

use clap::Parser;
use regmaps::{
    domain::hierarchy::{Chapter, Standard, Subsection},
    storage::HierarchyFile,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Print the regulation hierarchy with subsection anchors")]
pub struct Outline {
    /// JSON file holding the backend's hierarchy response
    file: PathBuf,

    /// Only show this standard
    #[arg(long, short, value_name = "CODE")]
    standard: Option<String>,
}

impl Outline {
    #[instrument(level = "debug", skip(self), fields(file = %self.file.display()))]
    pub fn run(self) -> anyhow::Result<()> {
        let hierarchy = HierarchyFile::new(&self.file).load()?;

        let standards: Vec<&Standard> = match &self.standard {
            Some(code) => {
                let Some(standard) = hierarchy.standard(code) else {
                    anyhow::bail!("Standard {code} not found");
                };
                vec![standard]
            }
            None => hierarchy.standards.iter().collect(),
        };

        if standards.is_empty() {
            println!("{}", "No standards".dim());
            return Ok(());
        }

        for standard in standards {
            Self::print_standard(standard);
        }
        Ok(())
    }

    fn print_standard(standard: &Standard) {
        println!("{}  {}", standard.code.code(), standard.name);
        for chapter in &standard.chapters {
            println!("  {}  {}", chapter.code, chapter.title);
            for subsection in &chapter.subsections {
                Self::print_subsection(standard, chapter, subsection, "    ");
            }
            for section in &chapter.sections {
                println!("    {}", section.title.dim());
                for subsection in &section.subsections {
                    Self::print_subsection(standard, chapter, subsection, "      ");
                }
            }
        }
    }

    fn print_subsection(
        standard: &Standard,
        chapter: &Chapter,
        subsection: &Subsection,
        indent: &str,
    ) {
        println!(
            "{indent}{}  {}",
            subsection.number,
            format!("#{}", subsection.anchor(standard, chapter)).dim()
        );
    }
}
