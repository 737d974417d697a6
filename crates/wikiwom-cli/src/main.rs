//! wikiwom - inspect and edit wikitext pages through the Wiki Object Model

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use wikiwom_config::WikiConfig;
use wikiwom_engine::{BuildOptions, UnsupportedElements, WomDocument};

#[derive(Parser)]
#[command(name = "wikiwom")]
#[command(version, about = "Inspect and edit wikitext pages", long_about = None)]
#[command(after_help = "EXAMPLES:
    wikiwom dump Page.wiki                       Show the object model
    wikiwom category rename Page.wiki Foo Bar    Rename a category
    wikiwom set-attr Page.wiki i 0 style color:red --write")]
struct Cli {
    /// Namespace configuration (defaults to ~/.config/wikiwom/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Page title (defaults to the file name)
    #[arg(long, global = true)]
    title: Option<String>,

    /// Keep unsupported XML elements instead of rejecting the page
    #[arg(long, global = true)]
    preserve_unknown: bool,

    /// Write edits back to the file instead of printing them
    #[arg(short, long, global = true)]
    write: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse the page and print it back
    Print { file: PathBuf },
    /// Show the object model as an indented outline
    Dump { file: PathBuf },
    /// List, add, rename or remove categories
    #[command(subcommand)]
    Category(CategoryCommand),
    /// Set an attribute on the n-th element with the given name
    SetAttr {
        file: PathBuf,
        element: String,
        index: usize,
        name: String,
        value: String,
    },
    /// Remove an attribute from the n-th element with the given name
    RemoveAttr {
        file: PathBuf,
        element: String,
        index: usize,
        name: String,
    },
}

#[derive(Subcommand)]
enum CategoryCommand {
    List { file: PathBuf },
    Add { file: PathBuf, name: String },
    Rename { file: PathBuf, old: String, new: String },
    Remove { file: PathBuf, name: String },
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let options = BuildOptions {
        unsupported_elements: if cli.preserve_unknown {
            UnsupportedElements::Preserve
        } else {
            UnsupportedElements::Fail
        },
    };
    let page = PageFile {
        config,
        options,
        title: cli.title,
        write: cli.write,
    };

    match cli.command {
        Command::Print { file } => {
            let doc = page.open(&file)?;
            print!("{}", doc.to_wikitext()?);
        }
        Command::Dump { file } => {
            let doc = page.open(&file)?;
            print!("{}", doc.dump());
        }
        Command::Category(CategoryCommand::List { file }) => {
            let doc = page.open(&file)?;
            for id in doc.categories() {
                println!("{}", doc.category_name(id)?);
            }
        }
        Command::Category(CategoryCommand::Add { file, name }) => {
            let mut doc = page.open(&file)?;
            doc.add_category(&name)
                .with_context(|| format!("Failed to add category `{name}`"))?;
            page.save(&file, &doc)?;
        }
        Command::Category(CategoryCommand::Rename { file, old, new }) => {
            let mut doc = page.open(&file)?;
            doc.rename_category(&old, &new)
                .with_context(|| format!("Failed to rename category `{old}` to `{new}`"))?;
            page.save(&file, &doc)?;
        }
        Command::Category(CategoryCommand::Remove { file, name }) => {
            let mut doc = page.open(&file)?;
            doc.remove_category(&name)
                .with_context(|| format!("Failed to remove category `{name}`"))?;
            page.save(&file, &doc)?;
        }
        Command::SetAttr {
            file,
            element,
            index,
            name,
            value,
        } => {
            let mut doc = page.open(&file)?;
            let id = nth_element(&doc, &element, index)?;
            doc.set_attribute(id, &name, &value)
                .with_context(|| format!("Failed to set `{name}` on {element} #{index}"))?;
            page.save(&file, &doc)?;
        }
        Command::RemoveAttr {
            file,
            element,
            index,
            name,
        } => {
            let mut doc = page.open(&file)?;
            let id = nth_element(&doc, &element, index)?;
            doc.remove_attribute(id, &name)
                .with_context(|| format!("Failed to remove `{name}` from {element} #{index}"))?;
            page.save(&file, &doc)?;
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<WikiConfig> {
    let loaded = match path {
        Some(path) => {
            let config = WikiConfig::load_from_path(path)?;
            if config.is_none() {
                bail!("Config file {} does not exist", path.display());
            }
            config
        }
        None => WikiConfig::load()?,
    };
    match loaded {
        Some(config) => Ok(config),
        None => {
            log::debug!(
                "No config at {}, using default namespaces",
                WikiConfig::config_path().display()
            );
            Ok(WikiConfig::default())
        }
    }
}

fn nth_element(doc: &WomDocument, name: &str, index: usize) -> Result<wikiwom_engine::WomId> {
    let found = doc.elements_by_name(name)?;
    match found.get(index) {
        Some(id) => Ok(*id),
        None => bail!(
            "No {name} element #{index}; the page has {} of them",
            found.len()
        ),
    }
}

struct PageFile {
    config: WikiConfig,
    options: BuildOptions,
    title: Option<String>,
    write: bool,
}

impl PageFile {
    fn open(&self, file: &Path) -> Result<WomDocument> {
        let text = fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let title = match &self.title {
            Some(title) => title.clone(),
            None => title_from_path(file)?,
        };
        let ast = wikiwom_syntax::parse(&text);
        let doc = WomDocument::from_ast_with(ast, self.config.clone(), &title, &self.options)
            .with_context(|| format!("Failed to build the object model of {}", file.display()))?;
        log::info!(
            "Loaded `{title}` with {} categories",
            doc.categories().len()
        );
        Ok(doc)
    }

    fn save(&self, file: &Path, doc: &WomDocument) -> Result<()> {
        let text = doc.to_wikitext()?;
        if self.write {
            fs::write(file, text).with_context(|| format!("Failed to write {}", file.display()))?;
            log::info!("Saved {}", file.display());
        } else {
            print!("{text}");
        }
        Ok(())
    }
}

/// `Main_Page.wiki` is the page `Main Page`.
fn title_from_path(file: &Path) -> Result<String> {
    let stem = file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("Cannot derive a page title from {}", file.display()))?;
    Ok(stem.replace('_', " "))
}
