use std::path::PathBuf;

use clap::Parser;
use regmaps::{Config, Content, render::Renderer, storage};
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Render a stored content file")]
pub struct Render {
    /// File holding one stored content value
    file: PathBuf,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "html")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// HTML markup
    #[default]
    Html,
    /// The text of every run, without markup
    Text,
    /// The content as a normalised stored document
    Json,
}

impl Render {
    #[instrument(level = "debug", skip(self, config), fields(file = %self.file.display()))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let content = storage::load_content(&self.file)?;

        match self.output {
            OutputFormat::Html => println!("{}", Renderer::new(config).render_html(&content)),
            OutputFormat::Text => println!("{}", Self::text(content)),
            OutputFormat::Json => {
                let document = content.into_document();
                println!("{}", serde_json::to_string_pretty(&document)?);
            }
        }
        Ok(())
    }

    fn text(content: Content) -> String {
        match content {
            Content::PlainText(text) => text,
            other => other.into_document().text(),
        }
    }
}
