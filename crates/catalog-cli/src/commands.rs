use anyhow::Context;
use catalog_assets::AssetStore;
use catalog_server::{CatalogServer, ServerConfig};
use catalog_store::{DocumentStore, JsonFileStore};
use catalog_types::Product;
use colored::Colorize;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = ServerConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Serve(args) => cmd_serve(config, args).await,
        Command::Init => cmd_init(&config),
        Command::List(args) => cmd_list(&config, args),
    }
}

async fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address: {bind}"))?;
    }
    let server = CatalogServer::new(config)?;
    server.serve().await?;
    Ok(())
}

fn cmd_init(config: &ServerConfig) -> anyhow::Result<()> {
    let store = JsonFileStore::open(&config.products_path);
    let created = store.init()?;
    AssetStore::open(&config.public_dir, &config.uploads_dir)?;

    if created {
        println!("{} Created {}", "✓".green().bold(), config.products_path.display().to_string().bold());
    } else {
        println!("{} {} already exists", "✓".green().bold(), config.products_path.display().to_string().bold());
    }
    println!("  Uploads: {}", config.public_dir.join(&config.uploads_dir).display().to_string().cyan());
    if !config.users_path.exists() {
        println!(
            "  {} no credentials at {}; logins will fail",
            "!".yellow().bold(),
            config.users_path.display()
        );
    }
    Ok(())
}

fn cmd_list(config: &ServerConfig, args: ListArgs) -> anyhow::Result<()> {
    let products = JsonFileStore::open(&config.products_path)
        .load()
        .with_context(|| format!("cannot read {}", config.products_path.display()))?;
    println!("{}", render_products(&products, &args.format)?);
    Ok(())
}

fn render_products(products: &[Product], format: &OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(products)?),
        OutputFormat::Text => {
            if products.is_empty() {
                return Ok("No products.".to_string());
            }
            let lines: Vec<String> = products
                .iter()
                .map(|p| {
                    let stock = if p.in_stock {
                        "in stock".green()
                    } else {
                        "out of stock".red()
                    };
                    let image = if p.has_image() { p.image.as_str() } else { "-" };
                    format!("{}  {}  {}  {}", p.name.bold(), p.category.cyan(), stock, image.dimmed())
                })
                .collect();
            Ok(lines.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Product> {
        vec![
            Product::new("Sneaker A", "Casual").with_stock(true),
            Product::new("Oxford", "Formal").with_image("uploads/1-o.png"),
        ]
    }

    #[test]
    fn render_json_is_parseable() {
        let out = render_products(&sample(), &OutputFormat::Json).unwrap();
        let back: Vec<Product> = serde_json::from_str(&out).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn render_text_lists_every_product() {
        colored::control::set_override(false);
        let out = render_products(&sample(), &OutputFormat::Text).unwrap();
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("Sneaker A  Casual  in stock  -"));
        assert!(out.contains("uploads/1-o.png"));
    }

    #[test]
    fn render_text_empty() {
        let out = render_products(&[], &OutputFormat::Text).unwrap();
        assert_eq!(out, "No products.");
    }

    #[test]
    fn init_creates_document_and_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::default().rooted_at(dir.path());
        cmd_init(&config).unwrap();
        assert!(config.products_path.exists());
        assert!(config.public_dir.join("uploads").is_dir());
        cmd_init(&config).unwrap();
    }
}
