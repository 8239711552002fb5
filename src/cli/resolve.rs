use clap::Parser;
use regmaps::{Config, ReferenceAttrs};
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Resolve a reference to its path")]
pub struct Resolve {
    /// Standard code, e.g. POJK11
    standard: String,

    /// Chapter code, e.g. 02
    chapter: Option<String>,

    /// Subsection number within the chapter, e.g. 6
    subsection: Option<String>,

    /// Print only the in-page anchor
    #[arg(long)]
    anchor: bool,
}

impl Resolve {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        println!("{}", self.resolve(config)?);
        Ok(())
    }

    /// The reference path, or only its anchor with `--anchor`.
    fn resolve(&self, config: &Config) -> anyhow::Result<String> {
        let reference = ReferenceAttrs::new(
            Some(self.standard.as_str()),
            self.chapter.as_deref(),
            self.subsection.as_deref(),
        )?;
        let path = reference.path_under(config.base_path());

        if !self.anchor {
            return Ok(path.to_string());
        }
        path.fragment().ok_or_else(|| {
            anyhow::anyhow!("{reference} does not name a subsection, so it has no anchor")
        })
    }
}
